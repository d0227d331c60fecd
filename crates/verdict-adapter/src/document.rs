//! The queryable-document abstraction extraction runs against.
//!
//! Live storefront markup is a duck-typed, constantly shifting schema;
//! coupling the adapter to a concrete DOM would make it untestable. The
//! trait exposes exactly the three lookups the engine needs, and
//! [`HtmlDocument`] backs it with a parsed HTML tree.

use scraper::{Html, Selector};

/// Read-only selector lookups over one loaded page.
///
/// Implementations must never panic on malformed selectors — a selector
/// that does not parse is simply a miss, so a stale profile entry degrades
/// instead of failing.
pub trait QueryableDocument {
    /// Trimmed text content of the first element matching `selector`.
    /// Returns `None` when nothing matches or the text is empty.
    fn select_text(&self, selector: &str) -> Option<String>;

    /// First non-empty value among `attrs` on the first element matching
    /// `selector`.
    fn select_attr(&self, selector: &str, attrs: &[&str]) -> Option<String>;

    /// `true` when at least one element matches `selector`.
    fn matches(&self, selector: &str) -> bool;
}

/// A parsed HTML page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses a full HTML document. Parsing is lenient and never fails;
    /// broken markup yields a best-effort tree.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    fn first_element(&self, selector: &str) -> Option<scraper::ElementRef<'_>> {
        let parsed = match Selector::parse(selector) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(selector, error = %e, "skipping unparseable selector");
                return None;
            }
        };
        self.html.select(&parsed).next()
    }
}

impl QueryableDocument for HtmlDocument {
    fn select_text(&self, selector: &str) -> Option<String> {
        let element = self.first_element(selector)?;
        let text = element.text().collect::<String>();
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_owned())
        }
    }

    fn select_attr(&self, selector: &str, attrs: &[&str]) -> Option<String> {
        let element = self.first_element(selector)?;
        attrs
            .iter()
            .filter_map(|attr| element.value().attr(attr))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(str::to_owned)
    }

    fn matches(&self, selector: &str) -> bool {
        self.first_element(selector).is_some()
    }
}
