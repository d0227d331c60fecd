use serde::{Deserialize, Serialize};

/// Structured data extracted from one product page.
///
/// One logical instance exists per (page, navigation epoch). Re-extraction
/// always produces a wholly new record; records are never patched in place.
/// Missing fields stay `None` — extraction degrades, it does not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Full address of the page the record was extracted from.
    pub url: String,
    /// Identifier of the site profile that matched (e.g., `"amazon"`).
    #[serde(rename = "site")]
    pub site_id: String,
    /// Product title. `None` means extraction was incomplete.
    #[serde(default)]
    pub title: Option<String>,
    /// Displayed price, verbatim as found on the page.
    #[serde(default)]
    pub price: Option<String>,
    /// Primary product image URL.
    #[serde(default, rename = "image")]
    pub image_url: Option<String>,
}

impl ProductRecord {
    /// Creates an empty record for a page; fields are filled by extraction.
    #[must_use]
    pub fn new(url: impl Into<String>, site_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            site_id: site_id.into(),
            title: None,
            price: None,
            image_url: None,
        }
    }

    /// Returns `true` when the record carries a title.
    ///
    /// Callers treat a title-less record as "extraction incomplete" and
    /// retry extraction rather than erroring.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// The title, or a generic placeholder for display and scoring.
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => "Product",
        }
    }
}
