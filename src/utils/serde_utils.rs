// The dashboard form sends empty strings for fields the author
// left blank (the image URL mostly). Those should become NULL in
// the database, so plain old function instead of a custom
// deserializer, applied during the DTO conversions.
pub fn empty_string_to_none(value: Option<String>) -> Option<String> {
  match value {
    Some(s) => {
      let trimmed = s.trim();
      if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    },
    None => None
  }
}
