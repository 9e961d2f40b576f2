//! # zds2grav-markdown
//!
//! Markdown fragment transforms for converting Zeste de Savoir exports into
//! self-contained Grav pages. Two independent, composable components operate
//! on raw fragment text via pattern matching (no AST is built):
//!
//! - [`shift_headers`] demotes every heading by one level, with a floor at
//!   level 6, handling both ATX (`#`) and Setext (underline) syntaxes.
//! - [`ImageLocalizer`] finds `![alt](url)` references, downloads the remote
//!   images, deduplicates them by content hash, writes them next to the final
//!   document and rewrites the references to bare local filenames.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zds2grav_markdown::{HttpFetcher, ImageLocalizer, ImageRegistry, shift_headers};
//!
//! let fragment = shift_headers("# Extract heading\n\nBody text.");
//!
//! let fetcher = HttpFetcher;
//! let localizer = ImageLocalizer::new(&fetcher, std::path::Path::new("out"));
//! let mut registry = ImageRegistry::new();
//! let rewritten = localizer.localize(&fragment, &mut registry)?;
//! # Ok::<(), zds2grav_markdown::ImageError>(())
//! ```
//!
//! The [`ImageRegistry`] carries the dedup and filename-uniqueness state for
//! one conversion run; pass the same registry to every fragment of a document
//! so byte-identical images collapse to a single file.

mod error;
mod headers;
mod images;
mod slug;

pub use crate::{
  error::{FetchError, ImageError},
  headers::shift_headers,
  images::{
    HttpFetcher,
    ImageFetcher,
    ImageLocalizer,
    ImageRegistry,
    SITE_BASE_URL,
  },
  slug::{SlugAssigner, slugify},
};
