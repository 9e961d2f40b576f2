//! Image discovery, deduplication and relocation.
//!
//! Finds `![alt](url)` references in fragment text, downloads the remote
//! bytes, content-addresses them so byte-identical images are stored once,
//! and rewrites each reference to the bare local filename. Per-image
//! failures (unresolvable URLs, failed downloads) are warnings that leave
//! the reference untouched; a failed file write aborts the run.

use std::{
  collections::HashMap,
  fs,
  io::Read as _,
  path::Path,
  sync::LazyLock,
};

use log::{debug, error, warn};
use regex::Regex;
use sha2::{Digest as _, Sha256};

use crate::{
  error::{FetchError, ImageError},
  headers::never_matching_regex,
  slug::SlugAssigner,
};

/// Base origin used to resolve root-relative image URLs.
pub const SITE_BASE_URL: &str = "https://zestedesavoir.com";

/// Markdown image reference: `![alt](url)`, alt excludes `]`, url excludes
/// `)`.
static IMAGE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"!\[([^\]]+)\]\(([^)]+)\)").unwrap_or_else(|e| {
    error!("Failed to compile IMAGE_REFERENCE regex: {e}");
    never_matching_regex()
  })
});

/// Retrieves raw image bytes for a URL.
///
/// The seam between the rewriting logic and the network: production code
/// uses [`HttpFetcher`], tests substitute an in-memory map.
pub trait ImageFetcher {
  /// Fetch the full body behind `url`.
  ///
  /// # Errors
  ///
  /// Returns [`FetchError`] for non-success responses and transport
  /// failures. Callers treat every error as permanent for that reference;
  /// there is no retry.
  fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP fetcher backed by `ureq`.
pub struct HttpFetcher;

impl ImageFetcher for HttpFetcher {
  fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = ureq::get(url).call().map_err(|e| match e {
      ureq::Error::Status(code, _) => FetchError::Status(code),
      ureq::Error::Transport(transport) => {
        FetchError::Transport(transport.to_string())
      },
    })?;

    let mut bytes = Vec::new();
    response
      .into_reader()
      .read_to_end(&mut bytes)
      .map_err(|e| FetchError::Transport(e.to_string()))?;
    Ok(bytes)
  }
}

/// Dedup and filename-assignment state for one conversion run.
///
/// Maps the content hash of downloaded bytes to the filename assigned on
/// first encounter, and owns the slug-uniqueness state so no two distinct
/// images ever collide on filename. Create one registry per conversion and
/// pass it to every fragment; it grows monotonically and is dropped at the
/// end of the run.
#[derive(Debug, Default)]
pub struct ImageRegistry {
  filenames: HashMap<String, String>,
  slugs:     SlugAssigner,
}

impl ImageRegistry {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of distinct images registered so far.
  #[must_use]
  pub fn len(&self) -> usize {
    self.filenames.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.filenames.is_empty()
  }
}

/// Rewrites image references in fragment text to localized files.
pub struct ImageLocalizer<'a, F> {
  fetcher:     &'a F,
  destination: &'a Path,
  base_url:    &'a str,
}

impl<'a, F: ImageFetcher> ImageLocalizer<'a, F> {
  /// Localizer writing into `destination`, resolving root-relative URLs
  /// against [`SITE_BASE_URL`].
  pub fn new(fetcher: &'a F, destination: &'a Path) -> Self {
    Self::with_base_url(fetcher, destination, SITE_BASE_URL)
  }

  /// Localizer with an explicit base origin for root-relative URLs.
  pub const fn with_base_url(
    fetcher: &'a F,
    destination: &'a Path,
    base_url: &'a str,
  ) -> Self {
    Self {
      fetcher,
      destination,
      base_url,
    }
  }

  /// Download every image referenced in `text` and rewrite the references
  /// to bare local filenames.
  ///
  /// References are processed in left-to-right textual order, one blocking
  /// fetch at a time. Images whose bytes hash identically to an earlier
  /// download reuse the registered filename without a second write; each
  /// reference keeps its own alt text. Unresolvable and undownloadable
  /// references are logged and passed through byte-identical.
  ///
  /// # Errors
  ///
  /// Returns [`ImageError::Write`] if downloaded bytes cannot be persisted
  /// into the destination directory.
  pub fn localize(
    &self,
    text: &str,
    registry: &mut ImageRegistry,
  ) -> Result<String, ImageError> {
    let mut output = String::with_capacity(text.len());
    let mut last_end = 0;

    for caps in IMAGE_REFERENCE.captures_iter(text) {
      let Some(whole) = caps.get(0) else { continue };
      let alt = &caps[1];
      let url = &caps[2];

      output.push_str(&text[last_end..whole.start()]);
      match self.localize_reference(alt, url, registry)? {
        Some(filename) => {
          output.push_str("![");
          output.push_str(alt);
          output.push_str("](");
          output.push_str(&filename);
          output.push(')');
        },
        // Soft failure: keep the reference exactly as written
        None => output.push_str(whole.as_str()),
      }
      last_end = whole.end();
    }

    output.push_str(&text[last_end..]);
    Ok(output)
  }

  /// Handle one reference; `Ok(None)` means "leave it untouched".
  fn localize_reference(
    &self,
    alt: &str,
    url: &str,
    registry: &mut ImageRegistry,
  ) -> Result<Option<String>, ImageError> {
    let Some(resolved) = resolve_url(url, self.base_url) else {
      warn!("skipping image download for {url} (don't know where to fetch it)");
      return Ok(None);
    };

    debug!("downloading image {alt:?} from {resolved}");
    let bytes = match self.fetcher.fetch(&resolved) {
      Ok(bytes) => bytes,
      Err(e) => {
        warn!("unable to download image {resolved} ({e}), skipping");
        return Ok(None);
      },
    };

    let content_hash = hex::encode(Sha256::digest(&bytes));
    if let Some(filename) = registry.filenames.get(&content_hash) {
      // Already persisted earlier in this run
      return Ok(Some(filename.clone()));
    }

    let mut filename = registry.slugs.assign(alt);
    if let Some(extension) = url_extension(&resolved) {
      filename.push('.');
      filename.push_str(extension);
    }

    let path = self.destination.join(&filename);
    fs::write(&path, &bytes)
      .map_err(|source| ImageError::Write { path, source })?;

    registry
      .filenames
      .insert(content_hash, filename.clone());
    Ok(Some(filename))
  }
}

/// Resolve an image URL against the site base origin.
///
/// Absolute `http(s)` URLs pass through, root-relative paths are prefixed
/// with the base origin, anything else is unresolvable.
fn resolve_url(url: &str, base_url: &str) -> Option<String> {
  if url.starts_with("http://") || url.starts_with("https://") {
    Some(url.to_string())
  } else if url.starts_with('/') {
    Some(format!("{base_url}{url}"))
  } else {
    None
  }
}

/// File extension of the URL's last path segment, without query or fragment.
fn url_extension(url: &str) -> Option<&str> {
  let path = url.split(['?', '#']).next().unwrap_or(url);
  let segment = path.rsplit('/').next().unwrap_or(path);
  match segment.rsplit_once('.') {
    Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => {
      Some(extension)
    },
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn absolute_urls_pass_through() {
    assert_eq!(
      resolve_url("https://example.org/a.png", SITE_BASE_URL).as_deref(),
      Some("https://example.org/a.png")
    );
    assert_eq!(
      resolve_url("http://example.org/a.png", SITE_BASE_URL).as_deref(),
      Some("http://example.org/a.png")
    );
  }

  #[test]
  fn root_relative_urls_resolve_against_base_origin() {
    assert_eq!(
      resolve_url("/media/foo.png", SITE_BASE_URL).as_deref(),
      Some("https://zestedesavoir.com/media/foo.png")
    );
  }

  #[test]
  fn other_relative_urls_are_unresolvable() {
    assert_eq!(resolve_url("media/foo.png", SITE_BASE_URL), None);
    assert_eq!(resolve_url("../foo.png", SITE_BASE_URL), None);
  }

  #[test]
  fn extension_comes_from_last_path_segment() {
    assert_eq!(url_extension("https://x.com/media/foo.png"), Some("png"));
    assert_eq!(url_extension("https://x.com/a.b/foo.jpeg"), Some("jpeg"));
  }

  #[test]
  fn extension_ignores_query_and_fragment() {
    assert_eq!(url_extension("https://x.com/foo.png?v=2"), Some("png"));
    assert_eq!(url_extension("https://x.com/foo.svg#frag"), Some("svg"));
  }

  #[test]
  fn segment_without_dot_has_no_extension() {
    assert_eq!(url_extension("https://x.com/media/foo"), None);
    assert_eq!(url_extension("https://x.com/media/.hidden"), None);
  }
}
