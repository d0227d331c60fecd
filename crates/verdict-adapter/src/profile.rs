//! Static site profiles: how to recognize and scrape each supported site.
//!
//! Selector chains are ordered most-specific-first; storefront markup churns
//! constantly, so later entries are survivors from older page generations.
//!
//! **Update process**: when extraction starts missing fields on a site,
//! capture an HTML sample, extend the chain, and add a test fixture.

use std::sync::LazyLock;

use regex::Regex;

/// Ranked selector chains for each extracted field.
#[derive(Debug)]
pub struct FieldSelectors {
    pub title: &'static [&'static str],
    pub price: &'static [&'static str],
    pub image: &'static [&'static str],
}

/// Static configuration describing one supported e-commerce site.
#[derive(Debug)]
pub struct SiteProfile {
    /// Stable identifier carried on every extracted record.
    pub site_id: &'static str,
    /// Host suffixes this profile claims, e.g. `amazon.in`.
    pub domain_suffixes: &'static [&'static str],
    /// URL shapes that identify a product page. A page is a product page
    /// iff any pattern matches the full address.
    pub url_patterns: Vec<Regex>,
    pub selectors: FieldSelectors,
    /// Ranked site-specific anchors for attaching the interactive
    /// affordance, tried before the generic fallbacks.
    pub anchor_selectors: &'static [&'static str],
}

static REGISTRY: LazyLock<Vec<SiteProfile>> = LazyLock::new(|| {
    vec![
        SiteProfile {
            site_id: "amazon",
            domain_suffixes: &["amazon.in", "amazon.com"],
            // ASIN is always ten uppercase alphanumerics. The patterns are
            // unanchored, which also covers localized leading path segments.
            url_patterns: vec![
                Regex::new(r"/dp/[A-Z0-9]{10}").expect("static pattern"),
                Regex::new(r"/gp/product/[A-Z0-9]{10}").expect("static pattern"),
                Regex::new(r"/product/[A-Z0-9]{10}").expect("static pattern"),
            ],
            selectors: FieldSelectors {
                title: &[
                    "#productTitle",
                    ".product-title",
                    r#"h1[data-automation-id="product-title"]"#,
                    ".x-item-title-label",
                ],
                price: &[
                    ".a-price-whole",
                    ".a-price .a-offscreen",
                    ".a-price-current",
                    ".notranslate",
                    "._30jeq3",
                ],
                image: &["#landingImage", ".a-dynamic-image", "._396cs4", ".s-image"],
            },
            anchor_selectors: &[
                "#priceblock_ourprice",
                "#priceblock_dealprice",
                ".a-price-range",
                "#apex_desktop",
            ],
        },
        SiteProfile {
            site_id: "flipkart",
            domain_suffixes: &["flipkart.com"],
            url_patterns: vec![Regex::new(r"/p/[a-zA-Z0-9\-]+").expect("static pattern")],
            selectors: FieldSelectors {
                title: &[
                    ".VU-ZEz",
                    ".yhB1nd",
                    ".B_NuCI",
                    "._35KyD6",
                    "span.B_NuCI",
                    ".Nx9bqj",
                    ".x-item-title-label",
                    "h1",
                ],
                price: &[
                    "._30jeq3",
                    "._1_WHN1",
                    ".CEmiEU",
                    ".Nx9bqj",
                    "._16Jk6d",
                    "._3I9_wc",
                    "._25b18c",
                ],
                image: &["._396cs4", "._2r_T1I", ".CXW8mj", "._2amPTt", ".q6DClP", "img"],
            },
            anchor_selectors: &[
                "._30jeq3",
                "._16Jk6d",
                "._1vC4OE",
                "._3LWZlK",
                ".CEmiEU",
                ".Nx9bqj",
                "._25b18c",
                ".col.col-7-12",
                ".col.col-5-12",
            ],
        },
    ]
});

/// The full table of supported sites, in match-priority order.
#[must_use]
pub fn registry() -> &'static [SiteProfile] {
    &REGISTRY
}
