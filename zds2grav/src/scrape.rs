//! Metadata scraping from the article or opinion page.
//!
//! The export archive does not carry tags, categories, authors or the
//! publication date; those only exist in the page markup. Everything here
//! is optional: a missing block simply yields empty metadata.

use jiff::civil::DateTime;
use kuchikikiki::{NodeRef, parse_html, traits::TendrilSink as _};
use log::debug;

use crate::archive::SITE_ORIGIN;

/// Grav's expected date format.
const GRAV_DATE_FORMAT: &str = "%H:%M %d-%m-%Y";

/// Metadata scraped from a content page on Zeste de Savoir.
#[derive(Debug, Default)]
pub struct PageMetadata {
  pub authors:    Vec<String>,
  pub categories: Vec<String>,
  pub tags:       Vec<String>,
  /// Publication date, already formatted for the Grav front matter.
  pub date:       Option<String>,
}

/// Find the archive download link in the page sidebar.
///
/// Root-relative links are resolved against the site origin. Returns `None`
/// when the page carries no download link (e.g. content not generated by
/// Zeste de Savoir).
#[must_use]
pub fn find_download_link(html: &str) -> Option<String> {
  let document = parse_html().one(html);
  let link = document.select_first("aside.sidebar a.download").ok()?;
  let attributes = link.attributes.borrow();
  let href = attributes.get("href")?;

  if href.starts_with('/') {
    Some(format!("{SITE_ORIGIN}{href}"))
  } else {
    Some(href.to_string())
  }
}

/// Extract tags, authors, categories and the publication date from a
/// content page.
#[must_use]
pub fn scrape_metadata(html: &str) -> PageMetadata {
  let document = parse_html().one(html);
  let mut metadata = PageMetadata {
    tags: select_texts(&document, "ul.taglist li"),
    ..PageMetadata::default()
  };

  // The authors block holds two lists: authors first, categories second
  let meta_lists: Vec<_> = document
    .select("article.content-wrapper header div.authors ul")
    .ok()
    .into_iter()
    .flatten()
    .collect();

  if let Some(authors_list) = meta_lists.first() {
    metadata.authors = select_texts(authors_list.as_node(), "li a span");
  }
  if let Some(categories_list) = meta_lists.get(1) {
    metadata.categories = select_texts(categories_list.as_node(), "a");
  }

  metadata.date = scrape_pubdate(&document);

  debug!(
    "scraped metadata: {} author(s), {} categorie(s), {} tag(s), date {:?}",
    metadata.authors.len(),
    metadata.categories.len(),
    metadata.tags.len(),
    metadata.date
  );
  metadata
}

/// Collect the trimmed text contents of every node matching `selector`.
fn select_texts(node: &NodeRef, selector: &str) -> Vec<String> {
  node
    .select(selector)
    .ok()
    .into_iter()
    .flatten()
    .map(|element| element.text_contents().trim().to_string())
    .filter(|text| !text.is_empty())
    .collect()
}

fn scrape_pubdate(document: &NodeRef) -> Option<String> {
  let time = document
    .select_first("article.content-wrapper header span.pubdate time")
    .ok()?;
  let attributes = time.attributes.borrow();
  let datetime = attributes.get("datetime")?;
  format_pubdate(datetime)
}

/// Parse an ISO-8601 datetime (wall-clock, any offset ignored) and format
/// it the way Grav expects.
fn format_pubdate(raw: &str) -> Option<String> {
  let parsed: DateTime = raw.parse().ok()?;
  Some(parsed.strftime(GRAV_DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  const PAGE: &str = r#"
    <html><body>
      <article class="content-wrapper">
        <header>
          <h1>Un super article</h1>
          <div class="authors">
            <ul>
              <li><a href="/@alice"><span>alice</span></a></li>
              <li><a href="/@bob"><span>bob</span></a></li>
            </ul>
            <ul>
              <li><a href="/articles/cat">Science</a></li>
            </ul>
          </div>
          <span class="pubdate">
            <time datetime="2021-06-15T18:30:00+02:00">15 juin 2021</time>
          </span>
        </header>
      </article>
      <ul class="taglist">
        <li>rust</li>
        <li>markdown</li>
      </ul>
      <aside class="sidebar">
        <a class="download" href="/contenus/telecharger/42/">Télécharger</a>
      </aside>
    </body></html>"#;

  #[test]
  fn scrapes_authors_categories_tags_and_date() {
    let metadata = scrape_metadata(PAGE);
    assert_eq!(metadata.authors, vec!["alice", "bob"]);
    assert_eq!(metadata.categories, vec!["Science"]);
    assert_eq!(metadata.tags, vec!["rust", "markdown"]);
    assert_eq!(metadata.date.as_deref(), Some("18:30 15-06-2021"));
  }

  #[test]
  fn download_link_is_resolved_against_origin() {
    assert_eq!(
      find_download_link(PAGE).as_deref(),
      Some("https://zestedesavoir.com/contenus/telecharger/42/")
    );
  }

  #[test]
  fn page_without_metadata_yields_empty_defaults() {
    let metadata = scrape_metadata("<html><body><p>nothing</p></body></html>");
    assert!(metadata.authors.is_empty());
    assert!(metadata.categories.is_empty());
    assert!(metadata.tags.is_empty());
    assert!(metadata.date.is_none());
    assert!(find_download_link("<html></html>").is_none());
  }

  #[test]
  fn pubdate_without_offset_still_parses() {
    assert_eq!(
      format_pubdate("2019-07-01T10:00:00").as_deref(),
      Some("10:00 01-07-2019")
    );
  }
}
