use crate::utils::time_utils::current_timestamp;

/**
 * Counts how often the sensitive endpoints (saving articles,
 * search) get called per unit of time and blocks them entirely
 * for a configured duration once the ceiling is hit. Coarse and
 * process-wide on purpose, it only has to stop runaway clients.
 */
pub struct BasicRateLimiter {
  counter: u32,
  last_update: i64,
  is_limited: bool,
  max_requests: u32,
  max_requests_time: u32,
  block_duration: u32
}

impl BasicRateLimiter {

  pub fn new(
    max_requests: u32,
    max_requests_time: u32,
    block_duration: u32
  ) -> Self {
    Self {
      counter: 0,
      last_update: current_timestamp(),
      is_limited: false,
      max_requests,
      max_requests_time,
      block_duration
    }
  }

  pub fn is_locked(&self) -> bool {
    self.is_limited
  }

  pub fn is_expired(&self) -> bool {
    // If currently locked, check if past block_duration.
    // Check if past max_requests_time otherwise.
    if self.is_locked() {
      current_timestamp() - self.last_update >= self.block_duration.into()
    } else {
      current_timestamp() - self.last_update >= self.max_requests_time.into()
    }
  }

  // Registers one request and answers "is the caller blocked".
  pub fn update(&mut self) -> bool {
    if self.is_expired() {
      // Window or block over, start counting again:
      self.counter = 1;
      self.last_update = current_timestamp();
      self.is_limited = false;
    } else if !self.is_limited {
      self.counter += 1;
      if self.counter >= self.max_requests {
        self.is_limited = true;
        self.last_update = current_timestamp();
      }
    }
    self.is_limited
  }

}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stays_open_below_the_ceiling() {
    let mut rl = BasicRateLimiter::new(10, 60, 60);
    for _ in 0..8 {
      assert!(!rl.update());
    }
  }

  #[test]
  fn locks_once_the_ceiling_is_reached() {
    let mut rl = BasicRateLimiter::new(3, 60, 60);
    assert!(!rl.update());
    assert!(!rl.update());
    assert!(rl.update());
    assert!(rl.is_locked());
    // And stays locked for subsequent calls:
    assert!(rl.update());
  }
}
