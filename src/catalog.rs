//! Catalog page scraping.
//!
//! One HTML view page per map ID. The page's header text is the map's
//! display name; a missing or empty header means the ID is past the end
//! of the catalog, which is a control signal rather than an error.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::error::Result;
use crate::source::HttpSource;
use crate::url::CatalogUrls;

/// Numeric map identifier in the catalog's ID space.
pub type MapId = u64;

/// Metadata scraped from one map's view page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// The map's catalog ID.
    pub id: MapId,
    /// Display name as shown on the page, untrimmed of duplicates.
    pub name: String,
    /// Preview image name, if the page declares one. Already stripped
    /// of the leading path segment.
    pub image: Option<String>,
}

/// Outcome of scraping one view page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The ID names a real map.
    Found(CatalogEntry),
    /// The ID yields no map name; enumeration is done.
    EndOfCatalog,
}

static NAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p > span.header").expect("valid selector"));

static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#imageslide").expect("valid selector"));

/// Fetches and scrapes the view page for `id`.
///
/// # Errors
///
/// Returns an error on transport failure. An empty or missing name is
/// *not* an error; it is reported as [`PageOutcome::EndOfCatalog`].
pub async fn fetch_entry(
    source: &dyn HttpSource,
    urls: &CatalogUrls,
    id: MapId,
) -> Result<PageOutcome> {
    let body = source.get_text(&urls.view(id)).await?;
    Ok(parse_page(id, &body))
}

fn parse_page(id: MapId, body: &str) -> PageOutcome {
    let document = Html::parse_document(body);

    let name: String = document
        .select(&NAME_SELECTOR)
        .next()
        .map(|el| el.text().collect())
        .unwrap_or_default();
    let name = name.trim();
    if name.is_empty() {
        return PageOutcome::EndOfCatalog;
    }

    let image = document
        .select(&IMAGE_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("src"))
        .map(strip_leading_segment);

    PageOutcome::Found(CatalogEntry {
        id,
        name: name.to_string(),
        image,
    })
}

/// Drops everything up to and including the first `/` of an image src,
/// leaving the bare image name the image endpoints expect.
fn strip_leading_segment(src: &str) -> String {
    match src.find('/') {
        Some(i) => src[i + 1..].to_string(),
        None => src.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::MockSource;

    fn page(name: &str, image: Option<&str>) -> String {
        let image_el = image
            .map(|src| format!(r#"<img id="imageslide" src="{src}">"#))
            .unwrap_or_default();
        format!(
            r#"<html><body><p><span class="header">{name}</span></p>{image_el}</body></html>"#
        )
    }

    #[test]
    fn parse_extracts_name_and_image() {
        let outcome = parse_page(5, &page("Hallway", Some("png/hallway_5.png")));
        assert_eq!(
            outcome,
            PageOutcome::Found(CatalogEntry {
                id: 5,
                name: "Hallway".into(),
                image: Some("hallway_5.png".into()),
            })
        );
    }

    #[test]
    fn parse_without_image_element() {
        let outcome = parse_page(1, &page("Bridge", None));
        match outcome {
            PageOutcome::Found(entry) => {
                assert_eq!(entry.name, "Bridge");
                assert_eq!(entry.image, None);
            }
            PageOutcome::EndOfCatalog => panic!("expected a found entry"),
        }
    }

    #[test]
    fn empty_name_signals_end_of_catalog() {
        assert_eq!(
            parse_page(9, &page("", None)),
            PageOutcome::EndOfCatalog
        );
        assert_eq!(
            parse_page(9, &page("   ", None)),
            PageOutcome::EndOfCatalog
        );
    }

    #[test]
    fn missing_header_signals_end_of_catalog() {
        let body = "<html><body><p>no header here</p></body></html>";
        assert_eq!(parse_page(3, body), PageOutcome::EndOfCatalog);
    }

    #[test]
    fn name_is_trimmed() {
        let outcome = parse_page(2, &page("  Spaced Out  ", None));
        match outcome {
            PageOutcome::Found(entry) => assert_eq!(entry.name, "Spaced Out"),
            PageOutcome::EndOfCatalog => panic!("expected a found entry"),
        }
    }

    #[test]
    fn strip_leading_segment_variants() {
        assert_eq!(strip_leading_segment("png/map.png"), "map.png");
        assert_eq!(strip_leading_segment("map.png"), "map.png");
        assert_eq!(strip_leading_segment("a/b/c.png"), "b/c.png");
    }

    #[tokio::test]
    async fn fetch_entry_roundtrip() {
        let urls = CatalogUrls::default();
        let source = MockSource::new().page(urls.view(0), page("First", None));

        match fetch_entry(&source, &urls, 0).await.unwrap() {
            PageOutcome::Found(entry) => {
                assert_eq!(entry.id, 0);
                assert_eq!(entry.name, "First");
            }
            PageOutcome::EndOfCatalog => panic!("expected a found entry"),
        }
    }

    #[tokio::test]
    async fn fetch_entry_transport_failure_is_an_error() {
        let urls = CatalogUrls::default();
        let source = MockSource::new();
        assert!(fetch_entry(&source, &urls, 0).await.is_err());
    }
}
