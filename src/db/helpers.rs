// Small query assembly helpers. The merge-update statements have
// a variable SET list depending on which fields the request
// carried, everything else is static SQL in db::mod.

pub fn generate_field_equal_qmark(name: &str) -> String {
  format!("{} = ?", name)
}

// UPDATE statement with only the provided columns in the SET
// clause. The caller binds the values in the same order and the
// key value last.
pub fn update_query(table: &str, columns: &[&str], key: &str) -> String {
  let set_list: Vec<String> = columns
    .iter()
    .map(|c| generate_field_equal_qmark(c))
    .collect();
  format!(
    "UPDATE {} SET {} WHERE {} = ?",
    table,
    set_list.join(", "),
    key
  )
}
