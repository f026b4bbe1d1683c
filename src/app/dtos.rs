use crate::content::{self, derive, formatter};
use crate::db::entities::*;
use crate::utils::{serde_utils, text_utils, time_utils};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use super::helpers;

// Entities stay snake_case and close to the tables, the JSON the
// frontend sees is camelCase with the dates pre-formatted. From
// conversions in one direction only, entity -> DTO, plus the two
// form objects going the other way through the save pipeline.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDto {
  pub id: i64,
  pub title: String,
  pub category: String,
  pub author: String,
  pub author_id: String,
  pub status: ArticleStatus,
  // Only the single-article endpoint ships the body:
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content: Option<String>,
  pub image: String,
  pub tags: Vec<String>,
  pub views: i64,
  pub read_time: i64,
  pub excerpt: String,
  pub date: String,
  pub relative_date: String
}

impl From<Article> for ArticleDto {
  fn from(article: Article) -> Self {
    // Match instead of unwrap_or_else: a closure here would
    // capture the whole struct and fight the later field moves.
    let image = match article.image {
      Some(image) => image,
      None => content::default_image_for_category(&article.category).to_string()
    };
    Self {
      id: article.id,
      title: article.title,
      category: article.category,
      author: article.author,
      author_id: article.author_id,
      status: article.status,
      content: None,
      image,
      tags: article.tags,
      views: article.views,
      read_time: article.read_time,
      // The stored excerpt is raw text, same escaping policy as
      // the search snippets:
      excerpt: text_utils::escape_html(&article.excerpt),
      date: time_utils::timestamp_to_indonesian_date(article.created_at),
      relative_date: time_utils::relative_time_string(
        article.created_at,
        time_utils::current_timestamp()
      )
    }
  }
}

impl ArticleDto {
  // The read view: same DTO with the display-formatted body in.
  pub fn with_body(article: Article) -> Self {
    let body = formatter::format_display(&article.content);
    let mut dto = ArticleDto::from(article);
    dto.content = Some(body);
    dto
  }
}

// What the editor form posts when creating an article. The author
// fields come from the identity collaborator on the client side,
// we only mirror them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleForm {
  pub title: String,
  pub category: String,
  pub status: Option<ArticleStatus>,
  pub content: String,
  // Comma-separated, like the form field:
  pub tags: Option<String>,
  pub image: Option<String>,
  pub author: String,
  pub author_id: String,
  // Derived when absent:
  pub read_time: Option<i64>,
  pub excerpt: Option<String>
}

impl ArticleForm {
  // The save pipeline: markup formatting for the body, derived
  // fields computed from the *raw* content, category default for
  // the image. The store fills in the id.
  pub fn into_article(self, now: i64) -> Article {
    let raw_content = self.content;
    let read_time = self.read_time
      .unwrap_or_else(|| derive::read_time(&raw_content));
    let excerpt = self.excerpt.unwrap_or_else(
      || derive::excerpt(&raw_content, derive::EXCERPT_MAX_CHARS)
    );
    let image = match serde_utils::empty_string_to_none(self.image) {
      Some(image) => image,
      None => content::default_image_for_category(&self.category).to_string()
    };
    Article {
      id: -1,
      title: self.title.trim().to_string(),
      category: self.category,
      author: self.author,
      author_id: self.author_id,
      status: self.status.unwrap_or(ArticleStatus::Draft),
      content: formatter::format_markup(&raw_content),
      image: Some(image),
      tags: helpers::parse_tags(&self.tags.unwrap_or_default()),
      views: 0,
      read_time,
      excerpt,
      created_at: now,
      updated_at: now,
      last_viewed: None
    }
  }
}

// Edit form: everything optional, only what's present gets
// merged. Author and creation time are not even accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleEditForm {
  pub title: Option<String>,
  pub category: Option<String>,
  pub status: Option<ArticleStatus>,
  pub content: Option<String>,
  pub tags: Option<String>,
  pub image: Option<String>,
  pub read_time: Option<i64>,
  pub excerpt: Option<String>,
  // Ownership assertion, checked against the stored article:
  pub author_id: String
}

impl ArticleEditForm {
  pub fn into_update(self, now: i64) -> ArticleUpdate {
    // New content means the derived fields get recomputed unless
    // the caller recomputed them itself:
    let (content, read_time, excerpt) = match self.content {
      Some(raw) => (
        Some(formatter::format_markup(&raw)),
        Some(self.read_time.unwrap_or_else(|| derive::read_time(&raw))),
        Some(self.excerpt.unwrap_or_else(
          || derive::excerpt(&raw, derive::EXCERPT_MAX_CHARS)
        ))
      ),
      None => (None, self.read_time, self.excerpt)
    };
    ArticleUpdate {
      title: self.title.map(|t| t.trim().to_string()),
      category: self.category,
      status: self.status,
      content,
      image: serde_utils::empty_string_to_none(self.image),
      tags: self.tags.map(|t| helpers::parse_tags(&t)),
      read_time,
      excerpt,
      updated_at: Some(now)
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
  pub articles: Vec<ArticleDto>,
  pub published_count: usize,
  pub draft_count: usize,
  pub total_views: i64
}

impl DashboardDto {
  pub fn new(articles: Vec<Article>) -> Self {
    let published_count = articles
      .iter()
      .filter(|a| a.status == ArticleStatus::Published)
      .count();
    let draft_count = articles
      .iter()
      .filter(|a| a.status == ArticleStatus::Draft)
      .count();
    let total_views = articles.iter().map(|a| a.views).sum();
    Self {
      articles: articles.into_iter().map(|a| a.into()).collect(),
      published_count,
      draft_count,
      total_views
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct SearchBody {
  pub term: String
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultDto {
  pub id: i64,
  pub title: String,
  pub category: String,
  pub author: String,
  pub snippet: String,
  pub image: String,
  pub views: i64,
  pub date: String
}

impl From<Article> for SearchResultDto {
  fn from(article: Article) -> Self {
    // The stored excerpt is raw text, escape it for the results
    // page:
    let snippet = text_utils::escape_html(&article.excerpt);
    let image = match article.image {
      Some(image) => image,
      None => content::default_image_for_category(&article.category).to_string()
    };
    Self {
      id: article.id,
      title: article.title,
      category: article.category,
      author: article.author,
      snippet,
      image,
      views: article.views,
      date: time_utils::timestamp_to_indonesian_date(article.created_at)
    }
  }
}

// Default author blurb when the profile has no bio yet:
const DEFAULT_BIO: &'static str =
  "Penulis aktif di DesaMedia yang berdedikasi menyampaikan \
  informasi terpercaya untuk masyarakat desa.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
  pub uid: String,
  pub username: String,
  pub name: String,
  pub bio: String,
  pub photo: Option<String>,
  pub role: String
}

impl From<User> for ProfileDto {
  fn from(user: User) -> Self {
    let bio = if user.bio.trim().is_empty() {
      DEFAULT_BIO.to_string()
    } else {
      user.bio
    };
    Self {
      uid: user.uid,
      username: user.username,
      name: user.name,
      bio,
      photo: user.photo,
      role: user.role
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
  pub name: Option<String>,
  pub bio: Option<String>,
  pub photo: Option<String>
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
  pub name: String,
  pub icon: String,
  pub count: i64
}

// Standard success/error envelope for the mutating endpoints.
#[derive(Debug, Deserialize, Serialize)]
pub struct JsonStatus {
  pub status: String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>
}

#[derive(Debug, Display)]
pub enum JsonStatusType {
  #[display(fmt = "success")]
  Success,
  #[display(fmt = "error")]
  Error
}

impl JsonStatus {
  pub fn new(status: JsonStatusType, message: &str) -> Self {
    Self {
      status: status.to_string(),
      message: String::from(message),
      id: None
    }
  }

  pub fn new_with_id(
    status: JsonStatusType,
    message: &str,
    id: i64
  ) -> Self {
    Self {
      status: status.to_string(),
      message: String::from(message),
      id: Some(id)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_form() -> ArticleForm {
    ArticleForm {
      title: "  Panen Raya di Desa  ".to_string(),
      category: "Pertanian".to_string(),
      status: Some(ArticleStatus::Published),
      content: "Judul Bagian Pertama\n\nIsi paragraf artikel yang cukup \
        panjang untuk disimpan.".to_string(),
      tags: Some("padi, panen".to_string()),
      image: None,
      author: "budi".to_string(),
      author_id: "uid-budi".to_string(),
      read_time: None,
      excerpt: None
    }
  }

  #[test]
  fn save_pipeline_derives_missing_fields() {
    let article = sample_form().into_article(1_700_000_000);
    assert_eq!(article.title, "Panen Raya di Desa");
    assert_eq!(article.read_time, 1);
    assert!(article.excerpt.ends_with("..."));
    // Derived from the raw text, not the formatted HTML:
    assert!(!article.excerpt.contains('<'));
    // The body went through the markup formatter:
    assert!(article.content.starts_with("<"));
    assert_eq!(article.tags, vec!["padi", "panen"]);
    assert_eq!(article.views, 0);
  }

  #[test]
  fn save_pipeline_keeps_supplied_derived_fields() {
    let mut form = sample_form();
    form.read_time = Some(7);
    form.excerpt = Some("Ringkasan khusus".to_string());
    let article = form.into_article(1_700_000_000);
    assert_eq!(article.read_time, 7);
    assert_eq!(article.excerpt, "Ringkasan khusus");
  }

  #[test]
  fn missing_image_falls_back_to_category_default() {
    let mut form = sample_form();
    form.image = Some("  ".to_string());
    let article = form.into_article(1_700_000_000);
    assert_eq!(
      article.image.as_deref(),
      Some(content::default_image_for_category("Pertanian"))
    );
  }

  #[test]
  fn edit_with_content_recomputes_derived_fields() {
    let form = ArticleEditForm {
      title: None,
      category: None,
      status: None,
      content: Some("Konten baru yang diperbarui oleh penulis.".to_string()),
      tags: None,
      image: None,
      read_time: None,
      excerpt: None,
      author_id: "uid-budi".to_string()
    };
    let update = form.into_update(1_700_000_100);
    assert!(update.content.is_some());
    assert_eq!(update.read_time, Some(1));
    assert!(update.excerpt.unwrap().ends_with("..."));
    assert_eq!(update.updated_at, Some(1_700_000_100));
  }

  #[test]
  fn edit_without_content_leaves_derived_fields_alone() {
    let form = ArticleEditForm {
      title: Some("Judul Saja".to_string()),
      category: None,
      status: None,
      content: None,
      tags: None,
      image: None,
      read_time: None,
      excerpt: None,
      author_id: "uid-budi".to_string()
    };
    let update = form.into_update(1_700_000_100);
    assert!(update.content.is_none());
    assert!(update.read_time.is_none());
    assert!(update.excerpt.is_none());
  }

  #[test]
  fn dto_conversion_fills_default_image() {
    let mut article = sample_form().into_article(0);
    article.image = None;
    let dto = ArticleDto::from(article);
    assert_eq!(dto.image, content::default_image_for_category("Pertanian"));
  }

  #[test]
  fn listing_excerpt_is_escaped() {
    let mut article = sample_form().into_article(0);
    article.excerpt = "ringkasan <b>kasar</b> & co".to_string();
    let dto = ArticleDto::from(article);
    assert_eq!(dto.excerpt, "ringkasan &lt;b&gt;kasar&lt;/b&gt; &amp; co");
  }

  #[test]
  fn empty_bio_gets_the_default_blurb() {
    let user = User {
      uid: "u".to_string(),
      username: "siti".to_string(),
      name: "Siti".to_string(),
      bio: " ".to_string(),
      photo: None,
      role: "penulis".to_string()
    };
    let dto = ProfileDto::from(user);
    assert!(dto.bio.starts_with("Penulis aktif"));
  }

  #[test]
  fn search_snippet_is_escaped() {
    let mut article = sample_form().into_article(0);
    article.excerpt = "ringkasan <b>kasar</b>".to_string();
    let dto = SearchResultDto::from(article);
    assert_eq!(dto.snippet, "ringkasan &lt;b&gt;kasar&lt;/b&gt;");
  }
}
