use crate::utils::text_utils;

// Derived presentation fields: the excerpt shown on cards and the
// estimated reading time. Both are computed at save time when the
// author didn't supply them, and recomputed on edit only when the
// edit carries new content.

pub const EXCERPT_MAX_CHARS: usize = 150;
const WORDS_PER_MINUTE: usize = 200;

// First max chars of the raw content plus a literal ellipsis.
// No word-boundary logic, the old site didn't bother either.
pub fn excerpt(content: &str, max: usize) -> String {
  let mut result = text_utils::truncate_chars(content, max);
  result.push_str("...");
  result
}

// Word count over whitespace runs at 200 words a minute, rounded
// up, never below one minute. HTML bodies get their tags stripped
// first so markup doesn't count as reading material.
pub fn read_time(content: &str) -> i64 {
  let text = if content.contains('<') {
    text_utils::strip_html(content)
  } else {
    content.to_string()
  };
  let words = text.split_whitespace().count();
  let minutes = (words + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE;
  std::cmp::max(1, minutes) as i64
}

#[cfg(test)]
mod tests {
  use super::*;

  fn words(n: usize) -> String {
    vec!["kata"; n].join(" ")
  }

  #[test]
  fn excerpt_truncates_long_content() {
    let content = "a".repeat(300);
    let result = excerpt(&content, EXCERPT_MAX_CHARS);
    assert_eq!(result.chars().count(), 153);
    assert!(result.ends_with("..."));
  }

  #[test]
  fn excerpt_keeps_short_content_whole() {
    let result = excerpt("Berita singkat", EXCERPT_MAX_CHARS);
    assert_eq!(result, "Berita singkat...");
  }

  #[test]
  fn read_time_has_a_floor_of_one_minute() {
    assert_eq!(read_time(""), 1);
    assert_eq!(read_time("satu dua tiga"), 1);
  }

  #[test]
  fn read_time_rounds_up() {
    assert_eq!(read_time(&words(200)), 1);
    assert_eq!(read_time(&words(201)), 2);
    assert_eq!(read_time(&words(999)), 5);
  }

  #[test]
  fn read_time_is_non_decreasing_in_word_count() {
    let mut previous = 0;
    for n in &[1, 50, 200, 400, 1000] {
      let minutes = read_time(&words(*n));
      assert!(minutes >= previous);
      previous = minutes;
    }
  }

  #[test]
  fn read_time_strips_html_tags() {
    // Three words of actual text wrapped in markup:
    assert_eq!(read_time("<p><strong>satu</strong> dua tiga</p>"), 1);
  }
}
