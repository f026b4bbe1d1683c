// Form validation, kept apart from the handlers so it can be
// tested without spinning up Actix. Messages are in Indonesian
// because they go straight to the author's screen.

const MIN_TITLE_LENGTH: usize = 5;
const MIN_CONTENT_LENGTH: usize = 50;

pub fn validate_article_form(
  title: &str,
  category: &str,
  content: &str
) -> Vec<String> {
  let mut errors = Vec::new();
  if title.trim().is_empty() {
    errors.push(String::from("Judul artikel wajib diisi"));
  } else if title.trim().chars().count() < MIN_TITLE_LENGTH {
    errors.push(format!("Judul minimal {} karakter", MIN_TITLE_LENGTH));
  }
  if category.trim().is_empty() {
    errors.push(String::from("Kategori wajib dipilih"));
  }
  if content.trim().is_empty() {
    errors.push(String::from("Konten artikel wajib diisi"));
  } else if content.trim().chars().count() < MIN_CONTENT_LENGTH {
    errors.push(format!("Konten minimal {} karakter", MIN_CONTENT_LENGTH));
  }
  errors
}

// Edit requests only carry the fields that changed, so only
// those get checked.
pub fn validate_article_edit(
  title: Option<&str>,
  content: Option<&str>
) -> Vec<String> {
  let mut errors = Vec::new();
  if let Some(title) = title {
    if title.trim().chars().count() < MIN_TITLE_LENGTH {
      errors.push(format!("Judul minimal {} karakter", MIN_TITLE_LENGTH));
    }
  }
  if let Some(content) = content {
    if content.trim().chars().count() < MIN_CONTENT_LENGTH {
      errors.push(format!("Konten minimal {} karakter", MIN_CONTENT_LENGTH));
    }
  }
  errors
}

pub fn validate_profile_form(name: &str) -> Vec<String> {
  let mut errors = Vec::new();
  if name.trim().is_empty() {
    errors.push(String::from("Nama lengkap wajib diisi"));
  }
  errors
}

// Emoji badge per category, same set the sidebar always showed.
pub fn category_icon(category: &str) -> &'static str {
  match category {
    "Pemerintahan" => "🏛️",
    "Pertanian" => "🌾",
    "Kesehatan" => "🏥",
    "Pendidikan" => "📚",
    "Ekonomi" => "💼",
    "Keamanan" => "🛡️",
    "Pembangunan" => "🏗️",
    "Lingkungan" => "🌳",
    "Sosial" => "👥",
    _ => "📄"
  }
}

// The comma-separated tags field from the editor form. Order is
// kept, blanks are dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(|t| t.trim().to_string())
    .filter(|t| !t.is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn valid_form_has_no_errors() {
    let errors = validate_article_form(
      "Panen Raya di Desa",
      "Pertanian",
      &"x".repeat(60)
    );
    assert!(errors.is_empty());
  }

  #[test]
  fn short_title_and_content_are_both_reported() {
    let errors = validate_article_form("Ab", "Pertanian", "pendek");
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("Judul"));
    assert!(errors[1].contains("Konten"));
  }

  #[test]
  fn missing_category_is_reported() {
    let errors = validate_article_form(
      "Judul Artikel",
      " ",
      &"x".repeat(60)
    );
    assert_eq!(errors, vec!["Kategori wajib dipilih".to_string()]);
  }

  #[test]
  fn edit_validation_only_checks_provided_fields() {
    assert!(validate_article_edit(None, None).is_empty());
    let errors = validate_article_edit(Some("Ab"), None);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Judul"));
  }

  #[test]
  fn parse_tags_keeps_order_and_drops_blanks() {
    assert_eq!(
      parse_tags("padi, sawah,, panen , "),
      vec!["padi", "sawah", "panen"]
    );
  }
}
