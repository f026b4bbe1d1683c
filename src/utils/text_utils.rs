use html2text::from_read;
use lazy_static::lazy_static;
use regex::Regex;

// Escape the characters that matter for HTML injection.
// The old frontend was creating a detached DOM node and
// reading innerHTML back, we obviously can't do that here.
pub fn escape_html(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#39;"),
      _ => escaped.push(c)
    }
  }
  escaped
}

// Turn article HTML back into plain text, mostly for word
// counting and search snippets. The width is large on purpose,
// we don't care about the wrapping, only about the words.
pub fn strip_html(html: &str) -> String {
  from_read(html.as_bytes(), 2000)
}

// Keep at most max chars of a string. Can't use String::truncate
// because it panics when the cut point lands in the middle of a
// multibyte char.
pub fn truncate_chars(text: &str, max: usize) -> String {
  text.chars().take(max).collect()
}

// Search terms end up in LIKE patterns (as prepared statement
// params, but still). Remove the wildcard chars and anything
// space-like, and cap the amount of terms we process.
pub fn sanitize_search_terms(raw: &str, max_terms: usize) -> Vec<String> {
  raw
    .split_whitespace()
    .map(|t| t.replace(|c| c == '%' || c == '_' || c == '\'' || c == '"', ""))
    .filter(|t| !t.is_empty())
    .take(max_terms)
    .collect()
}

// Best-effort sanitizer for article bodies that were authored as
// raw HTML. Not a real parser: drops script/style blocks, HTML
// comments, on* event attributes and javascript: URLs. Everything
// the markup formatter emits survives untouched.
pub fn sanitize_html(html: &str) -> String {
  lazy_static! {
    static ref SCRIPT_RE: Regex =
      Regex::new(r"(?is)<script\b.*?</script\s*>").unwrap();
    static ref STYLE_RE: Regex =
      Regex::new(r"(?is)<style\b.*?</style\s*>").unwrap();
    static ref COMMENT_RE: Regex =
      Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref EVENT_ATTR_RE: Regex =
      Regex::new(r#"(?i)\son\w+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).unwrap();
    static ref JS_URL_RE: Regex =
      Regex::new(r#"(?i)(href|src)\s*=\s*(["']?)\s*javascript:[^"'\s>]*"#).unwrap();
  }
  let cleaned = SCRIPT_RE.replace_all(html, "");
  let cleaned = STYLE_RE.replace_all(&cleaned, "");
  let cleaned = COMMENT_RE.replace_all(&cleaned, "");
  let cleaned = EVENT_ATTR_RE.replace_all(&cleaned, "");
  let cleaned = JS_URL_RE.replace_all(&cleaned, "${1}=${2}#");
  cleaned.into_owned()
}
