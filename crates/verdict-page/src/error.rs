use thiserror::Error;

use crate::speech::SpeechError;

/// Failures surfaced by the in-page runtime.
///
/// This is the narrow end of the funnel: network and storage failures are
/// absorbed further down (fallback verdicts, logged warnings) and never
/// appear here. What remains is the small set of conditions a user-facing
/// caller must distinguish.
#[derive(Debug, Error)]
pub enum PageError {
    /// No site profile matches the page's host. Downstream work is skipped
    /// silently.
    #[error("site not supported: {host}")]
    SiteUnsupported { host: String },

    /// A user-triggered analysis found nothing to analyze — the page is not
    /// a product page or yielded no data at all. The only case that
    /// warrants a blocking notice asking the user to retry.
    #[error("cannot analyze: no product data available")]
    NoProductData,

    #[error(transparent)]
    Speech(#[from] SpeechError),
}
