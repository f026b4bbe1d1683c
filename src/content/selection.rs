use crate::db::entities::{Article, ArticleStatus};

// Default limits the site always used: three related cards under
// an article, five entries in the popular sidebar.
pub const RELATED_LIMIT: usize = 3;
pub const POPULAR_LIMIT: usize = 5;

// Same-category published articles, never the current one. When
// the category yields nothing we fall back to the most recent
// published articles so the section is only empty when the site
// itself is. The category-matched set keeps store order.
pub fn related_articles(
  all: &[Article],
  current: &Article,
  limit: usize
) -> Vec<Article> {
  let same_category: Vec<Article> = all
    .iter()
    .filter(|a| {
      a.status == ArticleStatus::Published
        && a.category == current.category
        && a.id != current.id
    })
    .take(limit)
    .cloned()
    .collect();
  if !same_category.is_empty() {
    return same_category;
  }
  let mut recent: Vec<Article> = all
    .iter()
    .filter(|a| a.status == ArticleStatus::Published && a.id != current.id)
    .cloned()
    .collect();
  recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  recent.truncate(limit);
  recent
}

// Published articles by view count. The sort is stable so ties
// keep the snapshot order they came in with.
pub fn popular_articles(all: &[Article], limit: usize) -> Vec<Article> {
  let mut published: Vec<Article> = all
    .iter()
    .filter(|a| a.status == ArticleStatus::Published)
    .cloned()
    .collect();
  published.sort_by(|a, b| b.views.cmp(&a.views));
  published.truncate(limit);
  published
}

#[cfg(test)]
mod tests {
  use super::*;

  fn article(
    id: i64,
    category: &str,
    status: ArticleStatus,
    views: i64,
    created_at: i64
  ) -> Article {
    Article {
      id,
      title: format!("Artikel {}", id),
      category: category.to_string(),
      author: "budi".to_string(),
      author_id: "uid-budi".to_string(),
      status,
      content: String::new(),
      image: None,
      tags: Vec::new(),
      views,
      read_time: 1,
      excerpt: String::new(),
      created_at,
      updated_at: created_at,
      last_viewed: None
    }
  }

  #[test]
  fn related_prefers_same_category_and_excludes_current() {
    let current = article(1, "Pertanian", ArticleStatus::Published, 0, 100);
    let all = vec![
      current.clone(),
      article(2, "Pertanian", ArticleStatus::Published, 0, 90),
      article(3, "Kesehatan", ArticleStatus::Published, 0, 80),
    ];
    let related = related_articles(&all, &current, RELATED_LIMIT);
    let ids: Vec<i64> = related.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![2]);
  }

  #[test]
  fn related_skips_unpublished_category_matches() {
    let current = article(1, "Pertanian", ArticleStatus::Published, 0, 100);
    let all = vec![
      current.clone(),
      article(2, "Pertanian", ArticleStatus::Draft, 0, 90),
      article(3, "Kesehatan", ArticleStatus::Published, 0, 80),
    ];
    // The draft doesn't count as a category match, so we get the
    // recent fallback instead:
    let related = related_articles(&all, &current, RELATED_LIMIT);
    let ids: Vec<i64> = related.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![3]);
  }

  #[test]
  fn related_falls_back_to_recent_descending() {
    let current = article(1, "Pemerintahan", ArticleStatus::Published, 0, 100);
    let all = vec![
      current.clone(),
      article(2, "Kesehatan", ArticleStatus::Published, 0, 50),
      article(3, "Ekonomi", ArticleStatus::Published, 0, 70),
      article(4, "Sosial", ArticleStatus::Published, 0, 60),
      article(5, "Pendidikan", ArticleStatus::Published, 0, 80),
    ];
    let related = related_articles(&all, &current, RELATED_LIMIT);
    let ids: Vec<i64> = related.iter().map(|a| a.id).collect();
    // Most recent first, capped at the limit:
    assert_eq!(ids, vec![5, 3, 4]);
  }

  #[test]
  fn related_respects_the_limit_on_category_matches() {
    let current = article(1, "Pertanian", ArticleStatus::Published, 0, 100);
    let mut all = vec![current.clone()];
    for id in 2..8 {
      all.push(article(id, "Pertanian", ArticleStatus::Published, 0, 90));
    }
    assert_eq!(related_articles(&all, &current, RELATED_LIMIT).len(), 3);
  }

  #[test]
  fn related_is_empty_when_nothing_is_published() {
    let current = article(1, "Pertanian", ArticleStatus::Published, 0, 100);
    let all = vec![
      current.clone(),
      article(2, "Pertanian", ArticleStatus::Draft, 0, 90),
    ];
    assert!(related_articles(&all, &current, RELATED_LIMIT).is_empty());
  }

  #[test]
  fn popular_orders_by_views_descending() {
    let all = vec![
      article(1, "Ekonomi", ArticleStatus::Published, 5, 10),
      article(2, "Ekonomi", ArticleStatus::Published, 20, 20),
      article(3, "Ekonomi", ArticleStatus::Published, 1, 30),
    ];
    let popular = popular_articles(&all, POPULAR_LIMIT);
    let views: Vec<i64> = popular.iter().map(|a| a.views).collect();
    assert_eq!(views, vec![20, 5, 1]);
  }

  #[test]
  fn popular_excludes_drafts_and_caps_at_limit() {
    let mut all = vec![article(99, "Sosial", ArticleStatus::Draft, 1000, 0)];
    for id in 1..10 {
      all.push(article(id, "Sosial", ArticleStatus::Published, id, 0));
    }
    let popular = popular_articles(&all, POPULAR_LIMIT);
    assert_eq!(popular.len(), 5);
    assert!(popular.iter().all(|a| a.status == ArticleStatus::Published));
  }

  #[test]
  fn popular_ties_keep_snapshot_order() {
    let all = vec![
      article(1, "Sosial", ArticleStatus::Published, 7, 0),
      article(2, "Sosial", ArticleStatus::Published, 7, 0),
      article(3, "Sosial", ArticleStatus::Published, 7, 0),
    ];
    let ids: Vec<i64> = popular_articles(&all, POPULAR_LIMIT)
      .iter()
      .map(|a| a.id)
      .collect();
    assert_eq!(ids, vec![1, 2, 3]);
  }
}
