//! Link preview metadata extraction from HTML.
//!
//! ### Sources, in priority order
//! - Title: `og:title`, `twitter:title`, `<title>`
//! - Canonical URL: `og:url`, `<link rel="canonical">`
//! - Image: `og:image`, `og:image:url`, `og:image:secure_url`, `twitter:image`,
//!   `twitter:image:src`, `<link rel="image_src">`
//!
//! Meta tags are matched on either `property` or `name`, case-insensitively.
//! URLs are resolved against the page URL and only http(s) results are kept.

use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[content]").expect("invalid selector"));
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").expect("invalid selector"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[rel][href]").expect("invalid selector"));

const TITLE_KEYS: &[&str] = &["og:title", "twitter:title"];
const URL_KEYS: &[&str] = &["og:url"];
const IMAGE_KEYS: &[&str] = &["og:image", "og:image:url", "og:image:secure_url", "twitter:image", "twitter:image:src"];

/// Preview metadata found in a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub canonical_url: Option<String>,
    pub image_url: Option<String>,
}

/// Extract preview metadata from an HTML document served at `base_url`.
pub fn extract_metadata(html: &str, base_url: &Url) -> PageMetadata {
    let document = Html::parse_document(html);

    let mut meta: HashMap<String, String> = HashMap::new();
    for element in document.select(&META_SELECTOR) {
        let el = element.value();
        let Some(key) = el.attr("property").or_else(|| el.attr("name")) else {
            continue;
        };
        let content = el.attr("content").unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        meta.entry(key.trim().to_ascii_lowercase()).or_insert_with(|| content.to_string());
    }

    let mut links: HashMap<String, String> = HashMap::new();
    for element in document.select(&LINK_SELECTOR) {
        let el = element.value();
        let href = el.attr("href").unwrap_or_default().trim();
        if href.is_empty() {
            continue;
        }
        for rel in el.attr("rel").unwrap_or_default().split_ascii_whitespace() {
            links.entry(rel.to_ascii_lowercase()).or_insert_with(|| href.to_string());
        }
    }

    let title = first(&meta, TITLE_KEYS).map(collapse_whitespace).or_else(|| {
        document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|t| collapse_whitespace(&t.text().collect::<String>()))
            .filter(|t| !t.is_empty())
    });

    let canonical_url = first(&meta, URL_KEYS)
        .and_then(|u| resolve(base_url, u))
        .or_else(|| links.get("canonical").and_then(|u| resolve(base_url, u)));

    let image_url = IMAGE_KEYS
        .iter()
        .filter_map(|k| meta.get(*k))
        .chain(links.get("image_src"))
        .find_map(|u| resolve(base_url, u));

    PageMetadata { title, canonical_url, image_url }
}

fn first<'a>(meta: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| meta.get(*k)).map(String::as_str)
}

fn resolve(base_url: &Url, href: &str) -> Option<String> {
    let resolved = base_url.join(href).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
