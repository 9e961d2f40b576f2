//! Conversion pipeline: manifest → transformed fragments → Grav page.

use std::{
  fs,
  io::{Read, Seek},
  path::{Path, PathBuf},
  time::{SystemTime, UNIX_EPOCH},
};

use color_eyre::eyre::{Context as _, Result, bail};
use log::{debug, info};
use zds2grav_markdown::{
  ImageFetcher,
  ImageLocalizer,
  ImageRegistry,
  shift_headers,
};

use crate::{
  archive::{Manifest, ZdsArchive},
  frontmatter::{FrontMatter, Taxonomy, grav_license},
  scrape::PageMetadata,
};

/// Options and page metadata for one conversion run.
pub struct Conversion<'a> {
  pub template_name: &'a str,
  pub lang:          Option<&'a str>,
  /// Slug override from the command line; wins over the manifest slug.
  pub slug:          Option<&'a str>,
  /// Metadata scraped from the content page; empty for local archives.
  pub metadata:      PageMetadata,
  /// Canonical URL of the content, when converting from a URL.
  pub canonical:     Option<String>,
}

/// Convert an export archive into a Grav page directory under
/// `output_root`.
///
/// The introduction and conclusion fragments are localized as-is; every
/// extract is first demoted one header level so it sits below the `#
/// {title}` heading inserted above it. One [`ImageRegistry`] spans the whole
/// run, so an image reused across fragments is stored once.
///
/// Returns the path of the written markdown file.
///
/// # Errors
///
/// Fails on unsupported manifests, unreadable archive entries, image write
/// failures and output I/O errors. Failed image downloads are warnings, not
/// errors.
pub fn convert<R: Read + Seek, F: ImageFetcher>(
  archive: &mut ZdsArchive<R>,
  options: &Conversion<'_>,
  output_root: &Path,
  fetcher: &F,
) -> Result<PathBuf> {
  let manifest = archive.manifest()?;

  if manifest.version < 2 {
    bail!(
      "unsupported manifest version {} (only version 2 is supported)",
      manifest.version
    );
  }
  if manifest.content_type != "ARTICLE" && manifest.content_type != "OPINION" {
    bail!(
      "unsupported content type {} (only articles and opinions are supported \
       at the moment)",
      manifest.content_type
    );
  }

  let slug = options
    .slug
    .map(str::to_string)
    .or_else(|| manifest.slug.clone())
    .unwrap_or_else(|| format!("unnamed-content-{}", unix_time()));

  let page_dir = output_root.join(&slug);
  fs::create_dir_all(&page_dir).wrap_err_with(|| {
    format!("cannot create page directory {}", page_dir.display())
  })?;

  let localizer = ImageLocalizer::new(fetcher, &page_dir);
  let mut registry = ImageRegistry::new();
  let mut body = String::new();

  if let Some(name) = &manifest.introduction {
    debug!("processing introduction ({name})");
    let introduction = archive.entry_text(name)?;
    body.push_str(&localizer.localize(&introduction, &mut registry)?);
  }

  for child in &manifest.children {
    if !child.is_extract() {
      continue;
    }
    let Some(name) = &child.text else { continue };
    debug!("processing extract {} ({name})", child.title);

    let extract = archive.entry_text(name)?;
    body.push_str("\n\n\n# ");
    body.push_str(&child.title);
    body.push_str("\n\n");
    body.push_str(&localizer.localize(&shift_headers(&extract), &mut registry)?);
  }

  if let Some(name) = &manifest.conclusion {
    debug!("processing conclusion ({name})");
    let conclusion = archive.entry_text(name)?;
    body.push_str("\n\n\n------\n\n\n");
    body.push_str(&localizer.localize(&conclusion, &mut registry)?);
  }

  let front_matter = build_front_matter(&manifest, options);
  let document = format!("{}{}", front_matter.to_yaml_block()?, body.trim());

  let filename = match options.lang {
    Some(lang) => format!("{}.{lang}.md", options.template_name),
    None => format!("{}.md", options.template_name),
  };
  let output_path = page_dir.join(filename);
  fs::write(&output_path, document).wrap_err_with(|| {
    format!("failed to write markdown file {}", output_path.display())
  })?;

  info!("markdown file written to {} successfully", output_path.display());
  Ok(output_path)
}

fn build_front_matter(
  manifest: &Manifest,
  options: &Conversion<'_>,
) -> FrontMatter {
  let title = manifest.title.clone().unwrap_or_else(|| {
    format!("Unnamed {}", manifest.content_type.to_lowercase())
  });

  FrontMatter {
    title,
    abstract_text: manifest.description.clone().unwrap_or_default(),
    taxonomy: Taxonomy {
      author:   options.metadata.authors.clone(),
      category: options.metadata.categories.clone(),
      tag:      options.metadata.tags.clone(),
    },
    date: options.metadata.date.clone(),
    license: manifest
      .licence
      .as_deref()
      .and_then(grav_license),
    canonical: options.canonical.clone(),
  }
}

fn unix_time() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|duration| duration.as_secs())
    .unwrap_or(0)
}
