use super::entities::*;
use rusqlite::{Error, Row};

// Column order has to match the SELECT lists in db::mod, these
// mappers are positional on purpose (named gets are slower and
// the queries are all defined next door anyway).

pub fn map_article(row: &Row) -> Result<Article, Error> {
  let status: String = row.get(5)?;
  let tags_json: String = row.get(7)?;
  Ok(Article {
    id: row.get(0)?,
    title: row.get(1)?,
    category: row.get(2)?,
    author: row.get(3)?,
    author_id: row.get(4)?,
    status: ArticleStatus::from_str(&status),
    content: row.get(6)?,
    // A broken tags blob shouldn't make the whole article
    // unreadable:
    tags: serde_json::from_str(&tags_json).unwrap_or_default(),
    image: row.get(8)?,
    views: row.get(9)?,
    read_time: row.get(10)?,
    excerpt: row.get(11)?,
    created_at: row.get(12)?,
    updated_at: row.get(13)?,
    last_viewed: row.get(14)?
  })
}

pub fn map_user(row: &Row) -> Result<User, Error> {
  Ok(User {
    uid: row.get(0)?,
    username: row.get(1)?,
    name: row.get(2)?,
    bio: row.get(3)?,
    photo: row.get(4)?,
    role: row.get(5)?
  })
}

pub fn map_category(row: &Row) -> Result<Category, Error> {
  let is_active: i64 = row.get(2)?;
  Ok(Category {
    name: row.get(0)?,
    order: row.get(1)?,
    is_active: is_active != 0
  })
}
