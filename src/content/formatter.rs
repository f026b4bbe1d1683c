use crate::utils::text_utils;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

// What readers see when an article has no body at all:
const EMPTY_CONTENT_FRAGMENT: &'static str = "<p>Konten tidak tersedia.</p>";

// Display-time formatting. Content that already contains a "<" is
// considered pre-rendered HTML and passes through unchanged, which
// also makes this idempotent on its own output. Plain text gets
// split on blank lines, short dot-less paragraphs become section
// headings (the "is this a title line" heuristic the site always
// used), the rest become paragraphs. Plain text is escaped before
// wrapping.
pub fn format_display(content: &str) -> String {
  if content.trim().is_empty() {
    return EMPTY_CONTENT_FRAGMENT.to_string();
  }
  if content.contains('<') {
    return content.to_string();
  }
  let mut formatted = String::new();
  for paragraph in content.split("\n\n") {
    let trimmed = paragraph.trim();
    if trimmed.is_empty() {
      continue;
    }
    let escaped = text_utils::escape_html(trimmed);
    if looks_like_heading(trimmed) {
      formatted.push_str("<h2>");
      formatted.push_str(&escaped);
      formatted.push_str("</h2>");
    } else {
      formatted.push_str("<p>");
      formatted.push_str(&escaped);
      formatted.push_str("</p>");
    }
  }
  formatted
}

// Short, no sentence dot, but long enough to not be noise.
fn looks_like_heading(trimmed: &str) -> bool {
  let len = trimmed.chars().count();
  len < 100 && len > 10 && !trimmed.contains('.')
}

// Save-time formatting, the richer mode the editor offers:
// inline bold/italic/code/links plus #-headings, quotes and lists.
// Plain text is escaped first so the only tags in the output are
// the ones emitted here. Content that is already HTML is run
// through the sanitizer instead and otherwise left alone.
pub fn format_markup(content: &str) -> String {
  if content.trim().is_empty() {
    return EMPTY_CONTENT_FRAGMENT.to_string();
  }
  if content.contains('<') {
    return text_utils::sanitize_html(content);
  }

  let mut formatted = String::new();
  let mut list_items: Vec<String> = Vec::new();
  let mut paragraph_lines: Vec<String> = Vec::new();

  for line in content.lines() {
    let trimmed = line.trim();
    if trimmed.is_empty() {
      flush_paragraph(&mut formatted, &mut paragraph_lines);
      flush_list(&mut formatted, &mut list_items);
    } else if let Some(rest) = strip_prefix(trimmed, "### ") {
      flush_paragraph(&mut formatted, &mut paragraph_lines);
      flush_list(&mut formatted, &mut list_items);
      formatted.push_str(&format!("<h3>{}</h3>", inline_markup(rest)));
    } else if let Some(rest) = strip_prefix(trimmed, "## ") {
      flush_paragraph(&mut formatted, &mut paragraph_lines);
      flush_list(&mut formatted, &mut list_items);
      formatted.push_str(&format!("<h2>{}</h2>", inline_markup(rest)));
    } else if let Some(rest) = strip_prefix(trimmed, "# ") {
      flush_paragraph(&mut formatted, &mut paragraph_lines);
      flush_list(&mut formatted, &mut list_items);
      formatted.push_str(&format!("<h1>{}</h1>", inline_markup(rest)));
    } else if let Some(rest) = strip_prefix(trimmed, "> ") {
      flush_paragraph(&mut formatted, &mut paragraph_lines);
      flush_list(&mut formatted, &mut list_items);
      formatted.push_str(&format!("<blockquote>{}</blockquote>", inline_markup(rest)));
    } else if let Some(rest) = strip_prefix(trimmed, "- ")
      .or_else(|| strip_prefix(trimmed, "* ")) {
      // Consecutive list lines merge into a single <ul>:
      flush_paragraph(&mut formatted, &mut paragraph_lines);
      list_items.push(inline_markup(rest));
    } else {
      flush_list(&mut formatted, &mut list_items);
      paragraph_lines.push(inline_markup(trimmed));
    }
  }
  flush_paragraph(&mut formatted, &mut paragraph_lines);
  flush_list(&mut formatted, &mut list_items);
  formatted
}

// str::strip_prefix needs Rust 1.45, this crate still builds on
// the 2018 toolchain the server runs, hence the local version.
fn strip_prefix<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
  if line.starts_with(prefix) {
    Some(&line[prefix.len()..])
  } else {
    None
  }
}

fn flush_paragraph(out: &mut String, lines: &mut Vec<String>) {
  if !lines.is_empty() {
    out.push_str(&format!("<p>{}</p>", lines.join("<br>")));
    lines.clear();
  }
}

fn flush_list(out: &mut String, items: &mut Vec<String>) {
  if !items.is_empty() {
    out.push_str("<ul>");
    for item in items.iter() {
      out.push_str(&format!("<li>{}</li>", item));
    }
    out.push_str("</ul>");
    items.clear();
  }
}

// Inline conversions, applied to already-escaped text. Bold has
// to run before the star-italic so "**" never reads as two
// italics.
fn inline_markup(text: &str) -> String {
  lazy_static! {
    static ref BOLD_RE: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    static ref ITALIC_UNDERSCORE_RE: Regex = Regex::new(r"_(.+?)_").unwrap();
    static ref ITALIC_STAR_RE: Regex = Regex::new(r"\*([^*]+)\*").unwrap();
    static ref CODE_RE: Regex = Regex::new(r"`([^`]+)`").unwrap();
    static ref LINK_RE: Regex = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
  }
  let escaped = text_utils::escape_html(text);
  let step = BOLD_RE.replace_all(&escaped, "<strong>$1</strong>");
  let step = ITALIC_UNDERSCORE_RE.replace_all(&step, "<em>$1</em>");
  let step = ITALIC_STAR_RE.replace_all(&step, "<em>$1</em>");
  let step = CODE_RE.replace_all(&step, "<code>$1</code>");
  let step = LINK_RE.replace_all(&step, |caps: &Captures| {
    let label = &caps[1];
    let url = &caps[2];
    if safe_link_url(url) {
      format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
        url, label
      )
    } else {
      // Keep the label, point the link nowhere:
      format!(
        "<a href=\"#\" target=\"_blank\" rel=\"noopener\">{}</a>",
        label
      )
    }
  });
  step.into_owned()
}

// Only plain web links get through the markup path: http(s) or
// something relative without a scheme. javascript: and other
// schemes render as dead anchors.
fn safe_link_url(url: &str) -> bool {
  let trimmed = url.trim().to_lowercase();
  trimmed.starts_with("http://")
    || trimmed.starts_with("https://")
    || !trimmed.contains(':')
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_content_gets_the_placeholder() {
    assert_eq!(format_display(""), EMPTY_CONTENT_FRAGMENT);
    assert_eq!(format_display("   \n\n  "), EMPTY_CONTENT_FRAGMENT);
    assert_eq!(format_markup(""), EMPTY_CONTENT_FRAGMENT);
  }

  #[test]
  fn title_line_becomes_heading_paragraph_stays_paragraph() {
    let sut = "Judul Besar\n\nIni adalah paragraf pertama.";
    assert_eq!(
      format_display(sut),
      "<h2>Judul Besar</h2><p>Ini adalah paragraf pertama.</p>"
    );
  }

  #[test]
  fn short_or_dotted_lines_are_not_headings() {
    // Too short:
    assert_eq!(format_display("Pendek"), "<p>Pendek</p>");
    // Contains a dot:
    let dotted = "Kalimat ini pendek. Tapi ada titik";
    assert_eq!(format_display(dotted), format!("<p>{}</p>", dotted));
  }

  #[test]
  fn display_format_is_idempotent_on_html() {
    let html = "<h2>Judul</h2><p>Isi artikel.</p>";
    let once = format_display(html);
    assert_eq!(once, html);
    assert_eq!(format_display(&once), once);
  }

  #[test]
  fn plain_formatting_output_is_stable_too() {
    let sut = "Judul Berita Desa\n\nIsi berita pertama.";
    let once = format_display(sut);
    // The output contains tags, so a second pass is a no-op:
    assert_eq!(format_display(&once), once);
  }

  #[test]
  fn non_empty_input_never_formats_to_empty() {
    for sut in &["a", "halo dunia", "x\n\ny"] {
      assert!(!format_display(sut).is_empty());
    }
  }

  #[test]
  fn plain_text_is_escaped_on_display() {
    let sut = "Harga gabah & pupuk naik 5 persen pekan ini.";
    assert_eq!(
      format_display(sut),
      "<p>Harga gabah &amp; pupuk naik 5 persen pekan ini.</p>"
    );
  }

  #[test]
  fn markup_inline_conversions() {
    assert_eq!(
      format_markup("Ini **penting** dan _asing_ dan `kode`"),
      "<p>Ini <strong>penting</strong> dan <em>asing</em> dan <code>kode</code></p>"
    );
    assert_eq!(
      format_markup("Lihat [situs desa](https://desa.example)"),
      "<p>Lihat <a href=\"https://desa.example\" target=\"_blank\" \
      rel=\"noopener\">situs desa</a></p>"
    );
  }

  #[test]
  fn markup_link_with_javascript_url_is_disarmed() {
    let out = format_markup("Jangan [klik](javascript:alert(1))");
    assert!(!out.contains("javascript:"));
    assert!(out.contains("<a href=\"#\""));
    // The label survives:
    assert!(out.contains(">klik</a>"));
  }

  #[test]
  fn relative_links_are_still_allowed() {
    assert_eq!(
      format_markup("Baca [arsip](/berita/arsip)"),
      "<p>Baca <a href=\"/berita/arsip\" target=\"_blank\" \
      rel=\"noopener\">arsip</a></p>"
    );
  }

  #[test]
  fn markup_headings_and_quote() {
    let sut = "# Judul\n## Bagian\n### Sub\n> Kutipan penting";
    assert_eq!(
      format_markup(sut),
      "<h1>Judul</h1><h2>Bagian</h2><h3>Sub</h3>\
      <blockquote>Kutipan penting</blockquote>"
    );
  }

  #[test]
  fn consecutive_list_lines_merge_into_one_list() {
    let sut = "Persiapan:\n- cangkul\n- benih\n* pupuk\n\nSelesai.";
    assert_eq!(
      format_markup(sut),
      "<p>Persiapan:</p><ul><li>cangkul</li><li>benih</li>\
      <li>pupuk</li></ul><p>Selesai.</p>"
    );
  }

  #[test]
  fn single_newlines_become_line_breaks() {
    assert_eq!(
      format_markup("baris satu\nbaris dua"),
      "<p>baris satu<br>baris dua</p>"
    );
  }

  #[test]
  fn markup_on_html_input_sanitizes_instead_of_wrapping() {
    let sut = "<p>halo</p><script>alert(1)</script>";
    assert_eq!(format_markup(sut), "<p>halo</p>");
  }
}
