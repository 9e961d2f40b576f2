//! Grav front-matter assembly.

use color_eyre::eyre::Result;
use serde::Serialize;

/// YAML front-matter block of the generated Grav page.
#[derive(Debug, Serialize)]
pub struct FrontMatter {
  pub title: String,

  #[serde(rename = "abstract")]
  pub abstract_text: String,

  pub taxonomy: Taxonomy,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub date: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub license: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub canonical: Option<String>,
}

/// Grav taxonomy lists.
#[derive(Debug, Default, Serialize)]
pub struct Taxonomy {
  pub author:   Vec<String>,
  pub category: Vec<String>,
  pub tag:      Vec<String>,
}

impl FrontMatter {
  /// Render the `---`-delimited YAML block that precedes the page body.
  ///
  /// # Errors
  ///
  /// Fails if YAML serialization fails.
  pub fn to_yaml_block(&self) -> Result<String> {
    let yaml = serde_yaml::to_string(self)?;
    Ok(format!("---\n{yaml}---\n\n"))
  }
}

/// Map a manifest `licence` to Grav's license field.
///
/// Only Creative Commons licenses are carried over, lower-cased with the
/// `cc ` prefix stripped (`CC BY-SA` → `by-sa`).
#[must_use]
pub fn grav_license(licence: &str) -> Option<String> {
  licence
    .starts_with("CC")
    .then(|| licence.to_lowercase().replace("cc ", ""))
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn yaml_block_is_delimited_and_ordered() {
    let front_matter = FrontMatter {
      title:         "Un article".to_string(),
      abstract_text: "Résumé".to_string(),
      taxonomy:      Taxonomy {
        author:   vec!["alice".to_string()],
        category: vec![],
        tag:      vec!["rust".to_string()],
      },
      date:          Some("10:00 01-07-2019".to_string()),
      license:       Some("by-sa".to_string()),
      canonical:     None,
    };

    let block = front_matter.to_yaml_block().unwrap();
    assert!(block.starts_with("---\n"));
    assert!(block.ends_with("---\n\n"));
    assert!(block.contains("title: Un article"));
    assert!(block.contains("abstract:"));
    assert!(block.contains("- alice"));
    assert!(block.contains("- rust"));
    assert!(block.contains("date:"));
    assert!(block.contains("license: by-sa"));
    assert!(!block.contains("canonical"));
  }

  #[test]
  fn only_cc_licenses_are_mapped() {
    assert_eq!(grav_license("CC BY-SA").as_deref(), Some("by-sa"));
    assert_eq!(grav_license("CC BY-NC-ND").as_deref(), Some("by-nc-nd"));
    assert_eq!(grav_license("Tous droits réservés"), None);
  }

  #[test]
  fn cc_zero_keeps_its_tail() {
    assert_eq!(grav_license("CC 0").as_deref(), Some("0"));
  }
}
