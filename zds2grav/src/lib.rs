//! Expose zds2grav's internal API for use in integration tests. Not meant
//! for consumption as a library; the public surface is the command line.
pub mod archive;
pub mod cli;
pub mod convert;
pub mod frontmatter;
pub mod scrape;
