use color_eyre::Result;
use eyre::WrapErr;
use rusqlite::{params, OptionalExtension, Row, ToSql, NO_PARAMS};
pub mod entities;
mod helpers;
mod mappers;
use entities::*;
use mappers::{map_article, map_category, map_user};

// Type alias to make function signatures much clearer:
pub type Pool = r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>;

// Max results for the search endpoint, fixed here rather than in
// the config because the old API hardcoded it too:
const MAX_SEARCH_RESULTS: usize = 15;

// Column list shared by every article SELECT. The mappers are
// positional, so this order is load-bearing.
const ARTICLE_COLUMNS: &'static str =
  "id, title, category, author, author_id, status, content, tags, \
  image, views, read_time, excerpt, created_at, updated_at, last_viewed";

const USER_COLUMNS: &'static str = "uid, username, name, bio, photo, role";

// The store owns id assignment and the view counter, both live in
// this schema. "ord" because "order" is a SQL keyword.
const SCHEMA: &'static str = "
  CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    category TEXT NOT NULL,
    author TEXT NOT NULL,
    author_id TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'draft',
    content TEXT NOT NULL,
    tags TEXT NOT NULL DEFAULT '[]',
    image TEXT,
    views INTEGER NOT NULL DEFAULT 0,
    read_time INTEGER NOT NULL DEFAULT 1,
    excerpt TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    last_viewed INTEGER
  );
  CREATE INDEX IF NOT EXISTS idx_articles_status_category
    ON articles (status, category);
  CREATE INDEX IF NOT EXISTS idx_articles_views ON articles (views);
  CREATE TABLE IF NOT EXISTS users (
    uid TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL DEFAULT '',
    bio TEXT NOT NULL DEFAULT '',
    photo TEXT,
    role TEXT NOT NULL DEFAULT 'penulis'
  );
  CREATE TABLE IF NOT EXISTS categories (
    name TEXT PRIMARY KEY,
    ord INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1
  );
";

pub fn init_schema(pool: &Pool) -> Result<()> {
  let conn = pool.clone().get()?;
  conn.execute_batch(SCHEMA)
    .context("Creating database schema")
}

// Stole most of the signature from the rusqlite doc.
fn select_many<T, P, F>(
  pool: &Pool,
  query: &str,
  params: P,
  mapper: F
) -> Result<Vec<T>>
  where
    P: IntoIterator,
    P::Item: ToSql,
    F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
{
  let conn = pool.clone().get()?;
  let mut stmt = conn.prepare(query)?;
  stmt.query_map(params, mapper)
    .and_then(Iterator::collect)
    .context("Generic select_many query")
}

fn select_one<T, P, F>(
  pool: &Pool,
  query: &str,
  params: P,
  mapper: F
) -> Result<Option<T>>
  where
    P: IntoIterator,
    P::Item: ToSql,
    F: FnOnce(&Row<'_>) -> Result<T, rusqlite::Error>,
{
  let conn = pool.clone().get()?;
  let mut stmt = conn.prepare(query)?;
  stmt.query_row(params, mapper)
    .optional()
    .context("Generic select_one query")
}

/* --- Articles --- */

pub fn article_by_id(pool: &Pool, id: i64) -> Result<Option<Article>> {
  select_one(
    pool,
    &format!("SELECT {} FROM articles WHERE id = ?", ARTICLE_COLUMNS),
    params![id],
    map_article
  )
}

// The store assigns the id, the entity gets it back on return.
pub fn insert_article(pool: &Pool, article: &mut Article) -> Result<i64> {
  let conn = pool.clone().get()?;
  let tags_json = serde_json::to_string(&article.tags)?;
  conn.execute(
    "INSERT INTO articles \
    (title, category, author, author_id, status, content, tags, image, \
    views, read_time, excerpt, created_at, updated_at, last_viewed) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    params![
      article.title,
      article.category,
      article.author,
      article.author_id,
      article.status.as_str(),
      article.content,
      tags_json,
      article.image,
      article.views,
      article.read_time,
      article.excerpt,
      article.created_at,
      article.updated_at,
      article.last_viewed
    ]
  ).context("Inserting article")?;
  article.id = conn.last_insert_rowid();
  Ok(article.id)
}

// Merge update: only the fields present in the update object end
// up in the SET clause. author, author_id and created_at are not
// even part of ArticleUpdate so an edit can't clobber them.
pub fn update_article(
  pool: &Pool,
  id: i64,
  update: &ArticleUpdate
) -> Result<usize> {
  let mut columns: Vec<&str> = Vec::new();
  let mut values: Vec<Box<dyn ToSql>> = Vec::new();
  if let Some(title) = &update.title {
    columns.push("title");
    values.push(Box::new(title.clone()));
  }
  if let Some(category) = &update.category {
    columns.push("category");
    values.push(Box::new(category.clone()));
  }
  if let Some(status) = &update.status {
    columns.push("status");
    values.push(Box::new(status.as_str().to_string()));
  }
  if let Some(content) = &update.content {
    columns.push("content");
    values.push(Box::new(content.clone()));
  }
  if let Some(image) = &update.image {
    columns.push("image");
    values.push(Box::new(image.clone()));
  }
  if let Some(tags) = &update.tags {
    columns.push("tags");
    values.push(Box::new(serde_json::to_string(tags)?));
  }
  if let Some(read_time) = update.read_time {
    columns.push("read_time");
    values.push(Box::new(read_time));
  }
  if let Some(excerpt) = &update.excerpt {
    columns.push("excerpt");
    values.push(Box::new(excerpt.clone()));
  }
  if let Some(updated_at) = update.updated_at {
    columns.push("updated_at");
    values.push(Box::new(updated_at));
  }
  if columns.is_empty() {
    // Nothing to merge, which isn't an error:
    return Ok(0);
  }
  values.push(Box::new(id));
  let conn = pool.clone().get()?;
  let query = helpers::update_query("articles", &columns, "id");
  let param_refs: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
  conn.execute(&query, &param_refs[..])
    .context("Merge-updating article")
}

// No soft delete, gone is gone.
pub fn delete_article(pool: &Pool, id: i64) -> Result<usize> {
  let conn = pool.clone().get()?;
  conn.execute("DELETE FROM articles WHERE id = ?", params![id])
    .context("Deleting article")
}

pub fn published_articles(
  pool: &Pool,
  category: Option<&str>,
  max: Option<usize>
) -> Result<Vec<Article>> {
  // Negative LIMIT means "no limit" to SQLite:
  let limit: i64 = max.map(|m| m as i64).unwrap_or(-1);
  match category {
    Some(category) => select_many(
      pool,
      &format!(
        "SELECT {} FROM articles \
        WHERE status = 'published' AND category = ? \
        ORDER BY created_at DESC LIMIT ?",
        ARTICLE_COLUMNS
      ),
      params![category, limit],
      map_article
    ),
    None => select_many(
      pool,
      &format!(
        "SELECT {} FROM articles WHERE status = 'published' \
        ORDER BY created_at DESC LIMIT ?",
        ARTICLE_COLUMNS
      ),
      params![limit],
      map_article
    )
  }
}

// Ordered query for the popular sidebar. Ties keep rowid order,
// which is the store snapshot order, stable enough for display.
pub fn popular_articles(pool: &Pool, limit: usize) -> Result<Vec<Article>> {
  select_many(
    pool,
    &format!(
      "SELECT {} FROM articles WHERE status = 'published' \
      ORDER BY views DESC LIMIT ?",
      ARTICLE_COLUMNS
    ),
    params![limit as i64],
    map_article
  )
}

// The atomic increment primitive. views only ever goes up and two
// concurrent readers can't lose an update, SQLite serializes the
// UPDATE itself.
pub fn increment_views(pool: &Pool, id: i64, now: i64) -> Result<usize> {
  let conn = pool.clone().get()?;
  conn.execute(
    "UPDATE articles SET views = views + 1, last_viewed = ? WHERE id = ?",
    params![now, id]
  ).context("Incrementing article views")
}

// Everything the author wrote, drafts included, for the dashboard.
pub fn author_articles(pool: &Pool, author_id: &str) -> Result<Vec<Article>> {
  select_many(
    pool,
    &format!(
      "SELECT {} FROM articles WHERE author_id = ? \
      ORDER BY created_at DESC",
      ARTICLE_COLUMNS
    ),
    params![author_id],
    map_article
  )
}

// Every term has to match at least one of the searchable fields.
// Terms arrive pre-sanitized (see text_utils).
pub fn search_published_articles(
  pool: &Pool,
  terms: &[String]
) -> Result<Vec<Article>> {
  if terms.is_empty() {
    return Ok(Vec::new());
  }
  let per_term = "(title LIKE ? OR content LIKE ? OR tags LIKE ? \
    OR category LIKE ? OR author LIKE ?)";
  let term_clauses: Vec<&str> = terms.iter().map(|_| per_term).collect();
  let query = format!(
    "SELECT {} FROM articles WHERE status = 'published' AND {} \
    ORDER BY created_at DESC LIMIT {}",
    ARTICLE_COLUMNS,
    term_clauses.join(" AND "),
    MAX_SEARCH_RESULTS
  );
  let patterns: Vec<String> = terms
    .iter()
    .flat_map(|t| {
      let pattern = format!("%{}%", t);
      vec![pattern.clone(), pattern.clone(), pattern.clone(),
        pattern.clone(), pattern]
    })
    .collect();
  select_many(pool, &query, &patterns, map_article)
}

/* --- Users --- */

pub fn user_by_username(pool: &Pool, username: &str) -> Result<Option<User>> {
  select_one(
    pool,
    &format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS),
    params![username],
    map_user
  )
}

pub fn user_by_uid(pool: &Pool, uid: &str) -> Result<Option<User>> {
  select_one(
    pool,
    &format!("SELECT {} FROM users WHERE uid = ?", USER_COLUMNS),
    params![uid],
    map_user
  )
}

// The identity provider owns account creation, we only mirror the
// profile. Insert or replace keeps this a single call.
pub fn upsert_user(pool: &Pool, user: &User) -> Result<usize> {
  let conn = pool.clone().get()?;
  conn.execute(
    "INSERT OR REPLACE INTO users (uid, username, name, bio, photo, role) \
    VALUES (?, ?, ?, ?, ?, ?)",
    params![user.uid, user.username, user.name, user.bio, user.photo, user.role]
  ).context("Upserting user profile")
}

pub fn update_user(
  pool: &Pool,
  uid: &str,
  update: &UserUpdate
) -> Result<usize> {
  let mut columns: Vec<&str> = Vec::new();
  let mut values: Vec<Box<dyn ToSql>> = Vec::new();
  if let Some(name) = &update.name {
    columns.push("name");
    values.push(Box::new(name.clone()));
  }
  if let Some(bio) = &update.bio {
    columns.push("bio");
    values.push(Box::new(bio.clone()));
  }
  if let Some(photo) = &update.photo {
    columns.push("photo");
    values.push(Box::new(photo.clone()));
  }
  if columns.is_empty() {
    return Ok(0);
  }
  values.push(Box::new(uid.to_string()));
  let conn = pool.clone().get()?;
  let query = helpers::update_query("users", &columns, "uid");
  let param_refs: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
  conn.execute(&query, &param_refs[..])
    .context("Merge-updating user profile")
}

/* --- Categories --- */

pub fn active_categories(pool: &Pool) -> Result<Vec<Category>> {
  select_many(
    pool,
    "SELECT name, ord, is_active FROM categories \
    WHERE is_active = 1 ORDER BY ord ASC",
    NO_PARAMS,
    map_category
  )
}

// Published article count per category, for the sidebar badges.
pub fn category_counts(pool: &Pool) -> Result<Vec<(String, i64)>> {
  select_many(
    pool,
    "SELECT category, COUNT(*) FROM articles \
    WHERE status = 'published' GROUP BY category",
    NO_PARAMS,
    |row| Ok((row.get(0)?, row.get(1)?))
  )
}
