//! Export archive retrieval and container access.
//!
//! An export is a zip file containing `manifest.json` plus one markdown
//! file per content entry. It either sits on disk already or is downloaded
//! from the download link of the content's page on Zeste de Savoir.

use std::{
  fs::File,
  io::{Cursor, Read, Seek},
  path::Path,
};

use color_eyre::eyre::{Context as _, Result};
use serde::Deserialize;

/// Origin of the Zeste de Savoir website, used to resolve root-relative
/// download links.
pub const SITE_ORIGIN: &str = "https://zestedesavoir.com";

/// Whether the archive argument is a URL rather than a local path.
#[must_use]
pub fn is_url(argument: &str) -> bool {
  argument.starts_with("http://") || argument.starts_with("https://")
}

/// Whether a URL points at Zeste de Savoir.
#[must_use]
pub fn is_zds_url(url: &str) -> bool {
  url.starts_with("http://zestedesavoir.com/")
    || url.starts_with("https://zestedesavoir.com/")
}

/// Download a page as text.
///
/// # Errors
///
/// Fails on non-success responses, transport errors and non-text bodies.
pub fn fetch_page(url: &str) -> Result<String> {
  let response = ureq::get(url)
    .call()
    .wrap_err_with(|| format!("cannot download Zeste de Savoir page {url}"))?;
  response
    .into_string()
    .wrap_err_with(|| format!("page body of {url} is not valid text"))
}

/// Download an archive into memory.
///
/// # Errors
///
/// Fails on non-success responses and transport errors.
pub fn fetch_archive(url: &str) -> Result<Vec<u8>> {
  let response = ureq::get(url)
    .call()
    .wrap_err_with(|| format!("cannot download content archive {url}"))?;
  let mut bytes = Vec::new();
  response
    .into_reader()
    .read_to_end(&mut bytes)
    .wrap_err_with(|| format!("failed to read content archive {url}"))?;
  Ok(bytes)
}

/// Decoded `manifest.json` from an export archive.
#[derive(Debug, Deserialize)]
pub struct Manifest {
  pub version: u32,

  /// Content kind: `ARTICLE`, `OPINION`, `TUTORIAL`, …
  #[serde(rename = "type")]
  pub content_type: String,

  pub slug:        Option<String>,
  pub title:       Option<String>,
  pub description: Option<String>,
  pub licence:     Option<String>,

  /// Archive entry name of the introduction markdown, if any.
  pub introduction: Option<String>,
  /// Archive entry name of the conclusion markdown, if any.
  pub conclusion:   Option<String>,

  #[serde(default)]
  pub children: Vec<Child>,
}

/// One child entry of the manifest. Only `object == "extract"` children
/// carry fragment text; containers are ignored by the converter.
#[derive(Debug, Deserialize)]
pub struct Child {
  pub object: String,

  #[serde(default)]
  pub title: String,

  /// Archive entry name of the extract markdown.
  pub text: Option<String>,
}

impl Child {
  #[must_use]
  pub fn is_extract(&self) -> bool {
    self.object == "extract"
  }
}

/// An opened export archive.
pub struct ZdsArchive<R: Read + Seek> {
  zip: zip::ZipArchive<R>,
}

impl ZdsArchive<File> {
  /// Open an export archive from a local file.
  ///
  /// # Errors
  ///
  /// Fails if the file cannot be opened or is not a valid zip container.
  pub fn open(path: &Path) -> Result<Self> {
    let file = File::open(path)
      .wrap_err_with(|| format!("cannot open archive {}", path.display()))?;
    let zip = zip::ZipArchive::new(file).wrap_err_with(|| {
      format!("{} is not a valid export archive", path.display())
    })?;
    Ok(Self { zip })
  }
}

impl ZdsArchive<Cursor<Vec<u8>>> {
  /// Open an export archive from downloaded bytes.
  ///
  /// # Errors
  ///
  /// Fails if the bytes are not a valid zip container.
  pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
    let zip = zip::ZipArchive::new(Cursor::new(bytes))
      .wrap_err("downloaded content is not a valid export archive")?;
    Ok(Self { zip })
  }
}

impl<R: Read + Seek> ZdsArchive<R> {
  /// Decode `manifest.json`.
  ///
  /// # Errors
  ///
  /// Fails if the entry is missing or is not valid manifest JSON.
  pub fn manifest(&mut self) -> Result<Manifest> {
    let entry = self
      .zip
      .by_name("manifest.json")
      .wrap_err("archive has no manifest.json")?;
    serde_json::from_reader(entry).wrap_err("manifest.json is malformed")
  }

  /// Read a markdown entry as trimmed UTF-8 text.
  ///
  /// # Errors
  ///
  /// Fails if the entry is missing or not valid UTF-8.
  pub fn entry_text(&mut self, name: &str) -> Result<String> {
    let mut entry = self
      .zip
      .by_name(name)
      .wrap_err_with(|| format!("archive has no entry {name}"))?;
    let mut text = String::new();
    entry
      .read_to_string(&mut text)
      .wrap_err_with(|| format!("entry {name} is not valid UTF-8"))?;
    Ok(text.trim().to_string())
  }
}
