//! Site-adapter extraction engine.
//!
//! Resolves which supported e-commerce site a page belongs to, decides
//! whether the page is a product page, and extracts title/price/image
//! through ranked selector-fallback chains. Extraction runs against the
//! [`QueryableDocument`] abstraction rather than live markup, so the whole
//! engine is testable on fixture HTML.

pub mod document;
pub mod extract;
pub mod profile;

pub use document::{HtmlDocument, QueryableDocument};
pub use extract::{extract, host_of, is_product_page, resolve_site, resolve_site_for_url};
pub use profile::{registry, FieldSelectors, SiteProfile};
