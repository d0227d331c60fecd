//! Wire types for the remote analysis service.
//!
//! ## Observed response shape
//!
//! A successful `POST /api/extension/analyze` body carries `ok: true` plus
//! the analysis payload; failures carry `ok: false` and an `error` string.
//! The envelope's `ok` flag is checked by the client before this type is
//! deserialized, so every field here can be required unless the service is
//! known to omit it.
//!
//! The service's `recommendation` string is deliberately NOT trusted: the
//! recommendation is a fixed function of the score, so it is re-derived
//! locally from the clamped score. A service that disagreed with its own
//! score would otherwise break the invariant downstream code relies on.

use serde::Deserialize;
use verdict_core::{Alternative, AspectWeight, Recommendation, ResultMeta, ScoreResult};

/// A successful analysis response from the remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteAnalysis {
    /// Worth-to-buy score. Deserialized wide and clamped on conversion so
    /// an out-of-range value degrades instead of failing the whole parse.
    pub score: i64,
    /// Service-side recommendation label. Kept for logging; re-derived
    /// locally on conversion.
    #[serde(default)]
    pub recommendation: Option<String>,
    pub pros: Vec<AspectWeight>,
    pub cons: Vec<AspectWeight>,
    pub voice_verdict: String,
    #[serde(default)]
    pub product_title: Option<String>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub reviews_analyzed: u32,
    #[serde(default)]
    pub processing_time: f64,
    #[serde(default)]
    pub recommendations: Vec<Alternative>,
    pub meta: RemoteMeta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteMeta {
    pub confidence: f32,
    pub data_quality: f32,
}

impl RemoteAnalysis {
    /// Converts the wire payload into the shared [`ScoreResult`] model.
    ///
    /// The score is clamped into `0..=100` and the recommendation derived
    /// from the clamped value; `meta.offline` is `false` by definition.
    #[must_use]
    pub fn into_score_result(self) -> ScoreResult {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let score = self.score.clamp(0, 100) as u8;
        let derived = Recommendation::from_score(score);
        if let Some(remote) = self.recommendation.as_deref() {
            if remote != derived.to_string() {
                tracing::warn!(
                    remote,
                    derived = %derived,
                    score,
                    "remote recommendation disagrees with score; using derived value"
                );
            }
        }
        ScoreResult {
            score,
            recommendation: derived,
            pros: self.pros,
            cons: self.cons,
            verdict_text: self.voice_verdict,
            recommendations: self.recommendations,
            meta: ResultMeta {
                confidence: self.meta.confidence,
                data_quality: self.meta.data_quality,
                offline: false,
            },
        }
    }
}
