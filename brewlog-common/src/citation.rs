//! Source-citation extraction
//!
//! The enrichment service reports provenance as free-text strings. Each entry
//! becomes a {url, display_text} pair for rendering: an embedded URL is
//! lifted out, otherwise a fixed known-vendor table supplies the link.
//! One bad entry never fails the batch; it degrades to display text only.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use url::Url;

/// Known roaster/vendor names and their home pages, matched by
/// case-insensitive containment when a source string carries no URL
const KNOWN_SOURCES: &[(&str, &str)] = &[
    ("onyx coffee lab", "https://onyxcoffeelab.com"),
    ("blue bottle", "https://bluebottlecoffee.com"),
    ("counter culture", "https://counterculturecoffee.com"),
    ("intelligentsia", "https://www.intelligentsia.com"),
    ("stumptown", "https://www.stumptowncoffee.com"),
    ("verve coffee", "https://www.vervecoffee.com"),
    ("heart coffee", "https://www.heartroasters.com"),
    ("fellow products", "https://fellowproducts.com"),
    ("james hoffmann", "https://www.jameshoffmann.co.uk"),
];

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("url regex is valid"));

/// One rendered citation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Citation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub display_text: String,
}

/// Extract citations from a batch of free-text source strings
pub fn extract_citations(sources: &[String]) -> Vec<Citation> {
    sources.iter().map(|s| extract_citation(s)).collect()
}

/// Extract one citation from a free-text source string
pub fn extract_citation(source: &str) -> Citation {
    if let Some(m) = URL_RE.find(source) {
        let url = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);

        // Display text is whatever surrounds the URL
        let mut remainder = String::with_capacity(source.len());
        remainder.push_str(&source[..m.start()]);
        remainder.push_str(&source[m.end()..]);
        let remainder = remainder.trim();

        let display_text = if remainder.is_empty() {
            hostname_label(url)
        } else {
            remainder.to_string()
        };

        return Citation {
            url: Some(url.to_string()),
            display_text,
        };
    }

    let lowered = source.to_lowercase();
    for (name, url) in KNOWN_SOURCES {
        if lowered.contains(name) {
            return Citation {
                url: Some((*url).to_string()),
                display_text: source.to_string(),
            };
        }
    }

    Citation {
        url: None,
        display_text: source.to_string(),
    }
}

/// Hostname with a leading "www." stripped, or the raw URL when the
/// hostname cannot be extracted
fn hostname_label(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .map(|h| h.strip_prefix("www.").unwrap_or(&h).to_string())
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_with_surrounding_text() {
        let c = extract_citation("Tasting notes from https://onyxcoffeelab.com/products/geometry roaster page");
        assert_eq!(
            c.url.as_deref(),
            Some("https://onyxcoffeelab.com/products/geometry")
        );
        assert_eq!(c.display_text, "Tasting notes from  roaster page");
    }

    #[test]
    fn test_url_trailing_punctuation_stripped() {
        let c = extract_citation("See https://bluebottlecoffee.com/bella-donovan.");
        assert_eq!(c.url.as_deref(), Some("https://bluebottlecoffee.com/bella-donovan"));
        assert_eq!(c.display_text, "See");
    }

    #[test]
    fn test_bare_url_falls_back_to_hostname() {
        let c = extract_citation("https://www.stumptowncoffee.com/products/hair-bender");
        assert_eq!(c.display_text, "stumptowncoffee.com");
    }

    #[test]
    fn test_known_vendor_without_url() {
        let c = extract_citation("Fellow Products makes great kettles");
        assert_eq!(c.url.as_deref(), Some("https://fellowproducts.com"));
        assert_eq!(c.display_text, "Fellow Products makes great kettles");
    }

    #[test]
    fn test_known_vendor_case_insensitive() {
        let c = extract_citation("per ONYX COFFEE LAB's published recipe");
        assert_eq!(c.url.as_deref(), Some("https://onyxcoffeelab.com"));
    }

    #[test]
    fn test_unknown_source_display_only() {
        let c = extract_citation("general espresso knowledge");
        assert_eq!(c.url, None);
        assert_eq!(c.display_text, "general espresso knowledge");
    }

    #[test]
    fn test_batch_preserves_order_and_length() {
        let sources = vec![
            "https://fellowproducts.com".to_string(),
            "Blue Bottle seasonal guide".to_string(),
            "barista hearsay".to_string(),
        ];
        let citations = extract_citations(&sources);
        assert_eq!(citations.len(), 3);
        assert_eq!(citations[0].display_text, "fellowproducts.com");
        assert_eq!(citations[1].url.as_deref(), Some("https://bluebottlecoffee.com"));
        assert_eq!(citations[2].url, None);
    }

    #[test]
    fn test_unparseable_url_degrades_to_raw_url_label() {
        // Matches the URL regex but has no host, so hostname extraction fails
        let c = extract_citation("https://?broken");
        assert_eq!(c.url.as_deref(), Some("https://?broken"));
        assert_eq!(c.display_text, "https://?broken");
    }
}
