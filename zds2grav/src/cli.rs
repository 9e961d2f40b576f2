use std::path::PathBuf;

use clap::Parser;

/// Command line interface for zds2grav
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Convert a Zeste de Savoir article or opinion to the Grav format"
)]
pub struct Cli {
  /// Path to a downloaded export archive, or the URL of an article or an
  /// opinion on Zeste de Savoir. URLs are preferred as they allow fetching
  /// metadata not contained in the archive (tags, categories, authors).
  pub zds_archive: String,

  /// The template name to use (default item for blog entries)
  #[arg(long, default_value = "item")]
  pub template_name: String,

  /// The lang to use, appended to the output filename (item.<lang>.md)
  #[arg(long)]
  pub lang: Option<String>,

  /// The default page slug to use. If not provided, fallbacks to the
  /// manifest slug. The folder will never be numbered.
  #[arg(long)]
  pub slug: Option<String>,

  /// Where to store the Grav article directory (default to the archive
  /// directory, or the current directory if input by URL)
  #[arg(long)]
  pub to: Option<PathBuf>,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
