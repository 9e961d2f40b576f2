use std::{
  env,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Result, bail, eyre};
use log::{LevelFilter, info};

mod archive;
mod cli;
mod convert;
mod frontmatter;
mod scrape;

use cli::Cli;
use convert::Conversion;
use zds2grav_markdown::HttpFetcher;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so warnings from the conversion are visible
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  let fetcher = HttpFetcher;

  if archive::is_url(&cli.zds_archive) {
    convert_from_url(&cli, &fetcher)
  } else {
    convert_from_path(&cli, &fetcher)
  }
}

/// Download the page for its metadata and archive link, then convert.
fn convert_from_url(cli: &Cli, fetcher: &HttpFetcher) -> Result<()> {
  if !archive::is_zds_url(&cli.zds_archive) {
    bail!("invalid URL, only Zeste de Savoir URLs are accepted");
  }

  info!("downloading archive and metadata from Zeste de Savoir…");
  let page = archive::fetch_page(&cli.zds_archive)?;

  info!("retrieving metadata…");
  let metadata = scrape::scrape_metadata(&page);
  let download_link = scrape::find_download_link(&page).ok_or_else(|| {
    eyre!(
      "cannot find the download link on the page; maybe it was not generated \
       by Zeste de Savoir?"
    )
  })?;

  info!("downloading content archive from {download_link}…");
  let bytes = archive::fetch_archive(&download_link)?;
  let mut zds_archive = archive::ZdsArchive::from_bytes(bytes)?;

  let output_root = match &cli.to {
    Some(to) => to.clone(),
    None => env::current_dir()?,
  };

  let options = Conversion {
    template_name: &cli.template_name,
    lang: cli.lang.as_deref(),
    slug: cli.slug.as_deref(),
    metadata,
    canonical: Some(cli.zds_archive.clone()),
  };
  convert::convert(&mut zds_archive, &options, &output_root, fetcher)
    .map(|_| ())
}

/// Convert a previously downloaded archive; no page metadata available.
fn convert_from_path(cli: &Cli, fetcher: &HttpFetcher) -> Result<()> {
  let archive_path = PathBuf::from(&cli.zds_archive);
  let output_root = match &cli.to {
    Some(to) => to.clone(),
    None => archive_path
      .parent()
      .filter(|parent| !parent.as_os_str().is_empty())
      .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
  };

  let mut zds_archive = archive::ZdsArchive::open(&archive_path)?;

  let options = Conversion {
    template_name: &cli.template_name,
    lang: cli.lang.as_deref(),
    slug: cli.slug.as_deref(),
    metadata: scrape::PageMetadata::default(),
    canonical: None,
  };
  convert::convert(&mut zds_archive, &options, &output_root, fetcher)
    .map(|_| ())
}
