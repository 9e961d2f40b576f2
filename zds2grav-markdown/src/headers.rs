//! Header-level shifting over raw markdown text.
//!
//! Demotes every heading by one level so that extract fragments can sit
//! below the `# {title}` line the orchestrator inserts above them. ATX
//! headers are rewritten deepest-first (5→6, 4→5, 3→4, 2→3, 1→2) so that a
//! freshly written `## ` line is never re-matched by a shallower pass; level
//! 6 has no demotion target and passes through untouched. Setext headers are
//! handled after the ATX passes: a `-` underline becomes an ATX `###` line,
//! a `=` underline becomes a `-` underline of the same length.
//!
//! The patterns anchor on line boundaries without consuming them, so
//! adjacent headers all shift and surrounding whitespace is preserved
//! byte-for-byte. Text inside fenced code blocks is not excluded from
//! matching; fenced pseudo-headers are shifted like real ones.

use std::sync::LazyLock;

use log::error;
use regex::Regex;

/// ATX demotion passes, in the order they must be applied.
///
/// The required trailing space after the hash run keeps the levels
/// unambiguous (`^## ` cannot match a `### ` line), but the deepest-first
/// order is still load-bearing: a level-1 header rewritten to `## ` must not
/// be seen again by the level-2 pass.
static ATX_PASSES: LazyLock<[(Regex, &'static str); 5]> = LazyLock::new(|| {
  [
    (atx_header(5), "###### $1"),
    (atx_header(4), "##### $1"),
    (atx_header(3), "#### $1"),
    (atx_header(2), "### $1"),
    (atx_header(1), "## $1"),
  ]
});

/// Setext level-2 header: a text line over an underline of two or more `-`.
static SETEXT_LEVEL_2: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?m)^(.+)\r?\n-{2,}\r?$").unwrap_or_else(|e| {
    error!("Failed to compile SETEXT_LEVEL_2 regex: {e}");
    never_matching_regex()
  })
});

/// Setext level-1 header: a text line over an underline of two or more `=`.
static SETEXT_LEVEL_1: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?m)^(.+)\r?\n(={2,})\r?$").unwrap_or_else(|e| {
    error!("Failed to compile SETEXT_LEVEL_1 regex: {e}");
    never_matching_regex()
  })
});

fn atx_header(level: usize) -> Regex {
  let hashes = "#".repeat(level);
  Regex::new(&format!(r"(?m)^{hashes} (.+)$")).unwrap_or_else(|e| {
    error!("Failed to compile ATX level-{level} regex: {e}");
    never_matching_regex()
  })
}

/// Create a regex that never matches anything.
///
/// Used as a fallback when a pattern fails to compile, which turns the
/// affected pass into a no-op instead of a panic.
#[allow(
  clippy::unwrap_used,
  reason = "Both fallback patterns are known-valid constants"
)]
pub(crate) fn never_matching_regex() -> Regex {
  // Asserts something impossible, so it can never match any input
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| Regex::new(r"^\b$").unwrap())
}

/// Shift every markdown header in `text` one level deeper.
///
/// Pure text rewrite: no I/O, no shared state. Level-6 ATX headers are left
/// unchanged (there is no deeper level), a `=` underline keeps its exact
/// length when rewritten to `-`, and anything that is not a well-formed
/// header line is passed through untouched. Applying the shift twice demotes
/// twice; the transform is deliberately not idempotent.
///
/// ```rust
/// use zds2grav_markdown::shift_headers;
///
/// assert_eq!(shift_headers("# Head"), "## Head");
/// assert_eq!(shift_headers("###### Head"), "###### Head");
/// assert_eq!(shift_headers("Header 1\n========\n"), "Header 1\n--------\n");
/// ```
#[must_use]
pub fn shift_headers(text: &str) -> String {
  let mut shifted = text.to_string();

  for (pattern, replacement) in ATX_PASSES.iter() {
    shifted = pattern.replace_all(&shifted, *replacement).into_owned();
  }

  shifted = SETEXT_LEVEL_2.replace_all(&shifted, "### $1").into_owned();

  shifted = SETEXT_LEVEL_1
    .replace_all(&shifted, |caps: &regex::Captures| {
      format!("{}\n{}", &caps[1], "-".repeat(caps[2].len()))
    })
    .into_owned();

  shifted
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn atx_single_level() {
    assert_eq!(shift_headers("# Head"), "## Head");
  }

  #[test]
  fn level_6_floor_is_unchanged() {
    assert_eq!(shift_headers("###### Head"), "###### Head");
  }

  #[test]
  fn every_atx_level_demotes_by_one() {
    assert_eq!(shift_headers("## Head"), "### Head");
    assert_eq!(shift_headers("### Head"), "#### Head");
    assert_eq!(shift_headers("#### Head"), "##### Head");
    assert_eq!(shift_headers("##### Head"), "###### Head");
  }

  #[test]
  fn multi_header_document_shifts_each_header_once() {
    let source = "\n# Header 1\n\nLorem ipsum\n\n## Header 2\n\nLorem \
                  ipsum\n\nDolor sit\n\n##### Header 5\n\n###### Header 6\n";
    let expected = "\n## Header 1\n\nLorem ipsum\n\n### Header 2\n\nLorem \
                    ipsum\n\nDolor sit\n\n###### Header 5\n\n###### Header \
                    6\n";
    assert_eq!(shift_headers(source), expected);
  }

  #[test]
  fn body_text_and_blank_lines_are_preserved() {
    let source = "intro text\n\n# Title\n\nbody # not a header\n";
    assert_eq!(
      shift_headers(source),
      "intro text\n\n## Title\n\nbody # not a header\n"
    );
  }

  #[test]
  fn adjacent_headers_all_shift() {
    assert_eq!(shift_headers("# A\n## B\n"), "## A\n### B\n");
    assert_eq!(shift_headers("# A\n# B\n# C\n"), "## A\n## B\n## C\n");
  }

  #[test]
  fn header_without_trailing_newline_keeps_boundary() {
    assert_eq!(shift_headers("text\n## End"), "text\n### End");
  }

  #[test]
  fn setext_level_1_underline_length_is_preserved() {
    assert_eq!(shift_headers("Header 1\n========\n"), "Header 1\n--------\n");
    assert_eq!(shift_headers("Hi\n==\n"), "Hi\n--\n");
    assert_eq!(
      shift_headers("A longer header\n===============\n"),
      "A longer header\n---------------\n"
    );
  }

  #[test]
  fn setext_level_2_becomes_atx_level_3() {
    assert_eq!(shift_headers("Header 2\n--------\n"), "### Header 2\n");
  }

  #[test]
  fn both_setext_levels_in_one_fragment() {
    let source = "\nHeader 1\n========\n\nHeader 2\n--------\n";
    assert_eq!(
      shift_headers(source),
      "\nHeader 1\n--------\n\n### Header 2\n"
    );
  }

  #[test]
  fn single_underline_character_is_not_a_header() {
    assert_eq!(shift_headers("text\n-\n"), "text\n-\n");
    assert_eq!(shift_headers("text\n=\n"), "text\n=\n");
  }

  #[test]
  fn hash_without_space_is_not_a_header() {
    assert_eq!(shift_headers("#NoSpace"), "#NoSpace");
  }

  #[test]
  fn mid_line_hash_is_not_a_header() {
    assert_eq!(shift_headers("see # this"), "see # this");
  }

  #[test]
  fn empty_header_text_is_untouched() {
    // The patterns require at least one character of header text
    assert_eq!(shift_headers("# \n"), "# \n");
  }

  #[test]
  fn shifting_twice_demotes_twice() {
    // Deliberately not idempotent
    let once = shift_headers("# Head");
    let twice = shift_headers(&once);
    assert_eq!(once, "## Head");
    assert_eq!(twice, "### Head");
  }

  #[test]
  fn crlf_line_endings_are_accepted() {
    assert_eq!(shift_headers("# Head\r\nbody\r\n"), "## Head\r\nbody\r\n");
  }

  #[test]
  fn no_op_on_plain_text() {
    let source = "just a paragraph\n\nand another one\n";
    assert_eq!(shift_headers(source), source);
  }
}
