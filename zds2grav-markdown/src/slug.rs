//! Filesystem-safe slugs with run-scoped uniqueness.

use std::collections::HashSet;

use deunicode::deunicode;

/// Slugify free text for use as a filename stem.
///
/// Transliterates to ASCII, lower-cases, collapses every run of
/// non-alphanumeric characters into a single `-` and trims leading and
/// trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
  let mut slug = String::new();
  let mut pending_dash = false;

  for c in deunicode(text).chars() {
    if c.is_ascii_alphanumeric() {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      slug.push(c.to_ascii_lowercase());
      pending_dash = false;
    } else {
      pending_dash = true;
    }
  }

  slug
}

/// Hands out slugs that are unique for the lifetime of one conversion run.
///
/// When two distinct images would slugify to the same base, the later one
/// gets a `-1`, `-2`, … suffix, assigned deterministically in order of first
/// encounter.
#[derive(Debug, Default)]
pub struct SlugAssigner {
  taken: HashSet<String>,
}

impl SlugAssigner {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Slugify `text` and reserve a unique variant of the result.
  pub fn assign(&mut self, text: &str) -> String {
    let base = match slugify(text) {
      s if s.is_empty() => String::from("image"),
      s => s,
    };

    let mut candidate = base.clone();
    let mut counter = 1usize;
    while self.taken.contains(&candidate) {
      candidate = format!("{base}-{counter}");
      counter += 1;
    }

    self.taken.insert(candidate.clone());
    candidate
  }
}
