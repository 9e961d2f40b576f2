use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to retrieve a remote image.
///
/// These are always recoverable: the caller logs a warning and leaves the
/// original reference untouched.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("server answered with status {0}")]
  Status(u16),

  #[error("transport error: {0}")]
  Transport(String),
}

/// Fatal errors while localizing images in a fragment.
///
/// Failed downloads are handled in place as warnings and never surface here;
/// a failed file write does, since a silently missing image file would
/// corrupt the output document.
#[derive(Debug, Error)]
pub enum ImageError {
  #[error("failed to write image file {path}: {source}")]
  Write {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}
