use serde::{Deserialize, Serialize};

// These map one to one onto the SQLite tables. The DTO layer in
// app::dtos owns the camelCase JSON shapes and the date strings.

// Article visibility. Transitions are author-controlled and not
// constrained, any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
  Draft,
  Review,
  Published
}

impl ArticleStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      ArticleStatus::Draft => "draft",
      ArticleStatus::Review => "review",
      ArticleStatus::Published => "published"
    }
  }

  // Unknown values fall back to draft, an article should never
  // leak into public listings because of a bad status string.
  pub fn from_str(value: &str) -> Self {
    match value {
      "published" => ArticleStatus::Published,
      "review" => ArticleStatus::Review,
      _ => ArticleStatus::Draft
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
  pub id: i64,
  pub title: String,
  pub category: String,
  pub author: String,
  pub author_id: String,
  pub status: ArticleStatus,
  pub content: String,
  pub image: Option<String>,
  // Tags keep their input order, persisted as a JSON array.
  pub tags: Vec<String>,
  pub views: i64,
  pub read_time: i64,
  pub excerpt: String,
  pub created_at: i64,
  pub updated_at: i64,
  pub last_viewed: Option<i64>
}

// Merge-update object: only fields that are present get written.
// author, author_id and created_at are deliberately absent, edits
// never touch them.
#[derive(Debug, Default)]
pub struct ArticleUpdate {
  pub title: Option<String>,
  pub category: Option<String>,
  pub status: Option<ArticleStatus>,
  pub content: Option<String>,
  pub image: Option<String>,
  pub tags: Option<Vec<String>>,
  pub read_time: Option<i64>,
  pub excerpt: Option<String>,
  pub updated_at: Option<i64>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub uid: String,
  pub username: String,
  pub name: String,
  pub bio: String,
  pub photo: Option<String>,
  // "penulis" or "editor":
  pub role: String
}

#[derive(Debug, Default)]
pub struct UserUpdate {
  pub name: Option<String>,
  pub bio: Option<String>,
  pub photo: Option<String>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
  pub name: String,
  pub order: i64,
  pub is_active: bool
}
