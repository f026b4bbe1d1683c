/*
 * Periodic refresh of the popular-articles snapshot. The old
 * frontend polled on a timer and whichever response landed last
 * won, even when it was the stale one. Here every refresh takes
 * a generation number first and only gets applied when it is
 * still the newest one, so a slow query can never overwrite the
 * result of a later refresh.
 */

use crate::content::selection;
use crate::db::entities::Article;
use crate::db::{self, Pool};
use color_eyre::Result;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, SyncSender};
use std::sync::RwLock;
use std::thread::{self, JoinHandle};
use std::time::Duration;

// Monotonic request-generation counter.
pub struct RefreshSequencer {
  generation: AtomicU64
}

impl RefreshSequencer {

  pub fn new() -> Self {
    Self {
      generation: AtomicU64::new(0)
    }
  }

  pub fn begin(&self) -> u64 {
    self.generation.fetch_add(1, Ordering::SeqCst) + 1
  }

  pub fn is_current(&self, generation: u64) -> bool {
    self.generation.load(Ordering::SeqCst) == generation
  }

}

pub struct PopularCache {
  sequencer: RefreshSequencer,
  snapshot: RwLock<Vec<Article>>
}

impl PopularCache {

  pub fn new() -> Self {
    Self {
      sequencer: RefreshSequencer::new(),
      snapshot: RwLock::new(Vec::new())
    }
  }

  // A copy of the current snapshot. Empty means "not refreshed
  // yet or the site has no published articles", the handler falls
  // back to the store in that case.
  pub fn articles(&self) -> Vec<Article> {
    match self.snapshot.read() {
      Ok(articles) => articles.clone(),
      Err(e) => {
        error!("Popular snapshot lock poisoned - SHOULD NEVER HAPPEN - {}", e);
        Vec::new()
      }
    }
  }

  // Recompute and apply unless a newer refresh started meanwhile.
  // Returns whether the result was applied.
  pub fn refresh(&self, pool: &Pool) -> Result<bool> {
    let generation = self.sequencer.begin();
    let articles = fetch_popular(pool)?;
    Ok(self.try_apply(generation, articles))
  }

  fn try_apply(&self, generation: u64, articles: Vec<Article>) -> bool {
    if !self.sequencer.is_current(generation) {
      debug!(
        "Dropping stale popular refresh (generation {})",
        generation
      );
      return false;
    }
    match self.snapshot.write() {
      Ok(mut snapshot) => {
        *snapshot = articles;
        true
      },
      Err(e) => {
        error!("Popular snapshot lock poisoned - SHOULD NEVER HAPPEN - {}", e);
        false
      }
    }
  }

}

// Ordered store query first. When that fails (think missing
// index) we recover silently with the plain published listing
// plus an in-memory sort, which is exactly what the old frontend
// did.
fn fetch_popular(pool: &Pool) -> Result<Vec<Article>> {
  match db::popular_articles(pool, selection::POPULAR_LIMIT) {
    Ok(articles) => Ok(articles),
    Err(e) => {
      warn!("Ordered popular query failed, sorting manually - {}", e);
      let all = db::published_articles(pool, None, None)?;
      Ok(selection::popular_articles(&all, selection::POPULAR_LIMIT))
    }
  }
}

enum RefreshMessage {
  Close
}

// Background thread that refreshes the popular snapshot on an
// interval. Same lifecycle shape as a worker with an mpsc close
// message: drop the sender or send Close and the thread winds
// down.
pub struct PopularRefresher {
  tx: SyncSender<RefreshMessage>,
  thread_handle: Option<JoinHandle<()>>
}

impl PopularRefresher {

  pub fn start(
    pool: &Pool,
    cache: std::sync::Arc<PopularCache>,
    interval_secs: u64
  ) -> PopularRefresher {
    let (tx, rx) = mpsc::sync_channel::<RefreshMessage>(1);
    let pool = pool.clone();
    info!("Starting popular refresh thread...");
    let thread_handle = thread::spawn(move || {
      // One eager refresh so the sidebar isn't empty until the
      // first interval elapses:
      if let Err(e) = cache.refresh(&pool) {
        error!("Initial popular refresh failed - {}", e);
      }
      loop {
        match rx.recv_timeout(Duration::from_secs(interval_secs)) {
          Ok(RefreshMessage::Close) => {
            info!("Popular refresh thread terminating...");
            break;
          },
          Err(RecvTimeoutError::Timeout) => {
            if let Err(e) = cache.refresh(&pool) {
              error!("Popular refresh failed - {}", e);
            }
          },
          // Sender gone, nothing left to refresh for:
          Err(RecvTimeoutError::Disconnected) => break
        }
      }
    });
    PopularRefresher {
      tx,
      thread_handle: Some(thread_handle)
    }
  }

  pub fn close(&mut self) {
    // The thread might already be gone, in which case there's
    // nothing to do:
    let _ = self.tx.send(RefreshMessage::Close);
    if let Some(handle) = self.thread_handle.take() {
      let _ = handle.join();
    }
  }

}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::entities::ArticleStatus;

  fn article(id: i64, views: i64) -> Article {
    Article {
      id,
      title: format!("Artikel {}", id),
      category: "Sosial".to_string(),
      author: "budi".to_string(),
      author_id: "uid-budi".to_string(),
      status: ArticleStatus::Published,
      content: String::new(),
      image: None,
      tags: Vec::new(),
      views,
      read_time: 1,
      excerpt: String::new(),
      created_at: 0,
      updated_at: 0,
      last_viewed: None
    }
  }

  #[test]
  fn generations_are_strictly_increasing() {
    let seq = RefreshSequencer::new();
    let g1 = seq.begin();
    let g2 = seq.begin();
    assert!(g2 > g1);
    assert!(seq.is_current(g2));
    assert!(!seq.is_current(g1));
  }

  #[test]
  fn stale_refresh_is_not_applied() {
    let cache = PopularCache::new();
    let old_generation = cache.sequencer.begin();
    let new_generation = cache.sequencer.begin();
    // The newer refresh lands first:
    assert!(cache.try_apply(new_generation, vec![article(1, 10)]));
    // The slow old one arrives late and gets dropped:
    assert!(!cache.try_apply(old_generation, vec![article(2, 99)]));
    let ids: Vec<i64> = cache.articles().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1]);
  }
}
