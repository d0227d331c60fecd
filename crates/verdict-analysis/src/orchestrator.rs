use std::time::Duration;

use verdict_core::{ProductRecord, ScoreResult};
use verdict_scorer::score_product;

use crate::cache::VerdictCache;
use crate::client::VerdictClient;
use crate::error::AnalysisError;

/// Two-tier analysis coordinator: remote service first, local heuristic on
/// any failure, result cached either way.
///
/// Each request moves through probe → analyze → fallback states internally;
/// callers only ever see a well-formed [`ScoreResult`]. There is no
/// concurrent de-duplication: two concurrent analyses of the same URL may
/// both hit the service, and the later cache write wins. Callers needing
/// at-most-once must add their own gate.
pub struct AnalysisOrchestrator {
    client: VerdictClient,
    cache: VerdictCache,
}

impl AnalysisOrchestrator {
    #[must_use]
    pub fn new(client: VerdictClient, cache_ttl: Duration) -> Self {
        Self {
            client,
            cache: VerdictCache::new(cache_ttl),
        }
    }

    /// Returns the fresh cached verdict for `product_url`, if any.
    ///
    /// Callers wanting cheap reads consult this before [`Self::analyze`];
    /// `analyze` itself always performs a new analysis and overwrites the
    /// entry.
    #[must_use]
    pub fn cached(&self, product_url: &str) -> Option<ScoreResult> {
        self.cache.get(product_url).cloned()
    }

    /// Analyzes the product, remote-first with local fallback.
    ///
    /// The remote path is: liveness probe (short timeout) → analysis
    /// request (long timeout) → envelope check. Any failure — timeout,
    /// connection error, non-2xx, malformed body, `ok: false` — is logged
    /// with its reason and converted into a local heuristic verdict with
    /// `meta.offline = true`. The returned verdict is written to the cache
    /// keyed by the record's URL. This method cannot fail.
    pub async fn analyze(&mut self, record: &ProductRecord) -> ScoreResult {
        let result = match self.remote_analysis(record).await {
            Ok(result) => result,
            Err(err) => {
                // The failure reason stays here, in the log — the scorer
                // never sees it.
                tracing::warn!(
                    url = %record.url,
                    error = %err,
                    timeout = err.is_timeout(),
                    "remote analysis unavailable, falling back to local scorer"
                );
                score_product(record)
            }
        };

        self.cache.insert(record.url.clone(), result.clone());
        result
    }

    /// Drops all cached verdicts.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Builds the full-report page URL for a product.
    #[must_use]
    pub fn full_report_url(&self, product_url: &str) -> String {
        self.client.full_report_url(product_url)
    }

    async fn remote_analysis(&self, record: &ProductRecord) -> Result<ScoreResult, AnalysisError> {
        self.client.check_health().await?;
        let remote = self.client.analyze(&record.url).await?;
        Ok(remote.into_score_result())
    }
}
