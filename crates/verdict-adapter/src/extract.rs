//! Profile resolution, product-page detection, and field extraction.

use verdict_core::ProductRecord;

use crate::document::QueryableDocument;
use crate::profile::{registry, SiteProfile};

/// Resolves the site profile for a page's host. First match wins; `None`
/// means the site is unsupported and all downstream work is skipped.
#[must_use]
pub fn resolve_site(host: &str) -> Option<&'static SiteProfile> {
    let host = host.to_lowercase();
    registry().iter().find(|profile| {
        profile
            .domain_suffixes
            .iter()
            .any(|suffix| host == *suffix || host.ends_with(&format!(".{suffix}")))
    })
}

/// Resolves the site profile straight from a full page address.
#[must_use]
pub fn resolve_site_for_url(url: &str) -> Option<&'static SiteProfile> {
    resolve_site(host_of(url))
}

/// Extracts the hostname from a page address.
///
/// Strips the scheme and takes up to the first `/`; falls back to the full
/// string if there is nothing to strip.
#[must_use]
pub fn host_of(url: &str) -> &str {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme.split('/').next().unwrap_or(url)
}

/// `true` iff any of the profile's URL shapes matches the full address.
///
/// Must be re-evaluated on every navigation — single-page-app transitions
/// change the address without reloading, so a cached answer goes stale.
#[must_use]
pub fn is_product_page(profile: &SiteProfile, url: &str) -> bool {
    profile.url_patterns.iter().any(|p| p.is_match(url))
}

/// Extracts a [`ProductRecord`] from the page.
///
/// For each field the selector chain is walked in declared order; the first
/// selector yielding a non-empty value wins. A field whose whole chain
/// misses stays `None`. Extraction never fails — callers check
/// [`ProductRecord::is_complete`] and schedule a bounded retry when the
/// title is missing.
pub fn extract<D: QueryableDocument>(profile: &SiteProfile, doc: &D, url: &str) -> ProductRecord {
    let mut record = ProductRecord::new(url, profile.site_id);

    record.title = first_text(doc, profile.selectors.title, "title");
    record.price = first_text(doc, profile.selectors.price, "price");
    record.image_url = profile.selectors.image.iter().find_map(|selector| {
        let value = doc.select_attr(selector, &["src", "data-src"]);
        if value.is_some() {
            tracing::debug!(selector, field = "image", "selector hit");
        }
        value
    });

    tracing::debug!(
        site = profile.site_id,
        complete = record.is_complete(),
        has_price = record.price.is_some(),
        has_image = record.image_url.is_some(),
        "extracted product record"
    );
    record
}

fn first_text<D: QueryableDocument>(
    doc: &D,
    selectors: &[&str],
    field: &'static str,
) -> Option<String> {
    selectors.iter().find_map(|selector| {
        let value = doc.select_text(selector);
        if value.is_some() {
            tracing::debug!(selector, field, "selector hit");
        }
        value
    })
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
