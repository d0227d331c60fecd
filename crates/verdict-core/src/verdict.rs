//! Verdict types shared by the remote client, the local scorer, and the UI.
//!
//! ## Wire shape
//!
//! Pros and cons travel as `[aspect, weight]` pairs — e.g.
//! `[["cooling", 0.7], ["capacity", 0.6]]` — matching the analysis service's
//! response body. [`AspectWeight`] keeps the struct form in Rust and the
//! pair form on the wire via `serde(from/into)`.

use serde::{Deserialize, Serialize};

/// Buy/skip verdict derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Recommended,
    Acceptable,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
}

impl Recommendation {
    /// Derives the recommendation from a clamped score.
    ///
    /// The thresholds are fixed: `>= 70` Recommended, `>= 50` Acceptable,
    /// anything below Not Recommended. Every producer of a [`ScoreResult`]
    /// must derive the recommendation through this function so the
    /// score/recommendation invariant cannot drift.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            Self::Recommended
        } else if score >= 50 {
            Self::Acceptable
        } else {
            Self::NotRecommended
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recommended => write!(f, "Recommended"),
            Self::Acceptable => write!(f, "Acceptable"),
            Self::NotRecommended => write!(f, "Not Recommended"),
        }
    }
}

/// One scored aspect of a product, e.g. `("battery", 0.5)`.
///
/// Positive weights are pros, negative weights are cons. Order is
/// significant: lists are ranked most-relevant-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f32)", into = "(String, f32)")]
pub struct AspectWeight {
    pub aspect: String,
    pub weight: f32,
}

impl AspectWeight {
    #[must_use]
    pub fn new(aspect: impl Into<String>, weight: f32) -> Self {
        Self {
            aspect: aspect.into(),
            weight,
        }
    }
}

impl From<(String, f32)> for AspectWeight {
    fn from((aspect, weight): (String, f32)) -> Self {
        Self { aspect, weight }
    }
}

impl From<AspectWeight> for (String, f32) {
    fn from(value: AspectWeight) -> Self {
        (value.aspect, value.weight)
    }
}

/// An alternative product suggested alongside a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub title: String,
    #[serde(default)]
    pub price: Option<String>,
    pub score: u8,
    pub url: String,
}

/// Quality metadata attached to every verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMeta {
    /// Confidence in the verdict, `0.0`–`1.0`.
    pub confidence: f32,
    /// Quality of the underlying data, `0.0`–`1.0`.
    pub data_quality: f32,
    /// `true` when the verdict came from the local fallback scorer.
    #[serde(default, rename = "offline_mode")]
    pub offline: bool,
}

/// The worth-to-buy verdict for one product, remote or local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Worth-to-buy score, always clamped to `0..=100` by the producer.
    pub score: u8,
    pub recommendation: Recommendation,
    pub pros: Vec<AspectWeight>,
    pub cons: Vec<AspectWeight>,
    /// Human-readable verdict sentence, suitable for speech output.
    #[serde(rename = "voice_verdict")]
    pub verdict_text: String,
    /// Better-alternative suggestions. Only the remote service produces
    /// these; the local fallback leaves the list empty.
    #[serde(default)]
    pub recommendations: Vec<Alternative>,
    pub meta: ResultMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_thresholds_hold_across_range() {
        for score in 0..=100u8 {
            let rec = Recommendation::from_score(score);
            let expected = if score >= 70 {
                Recommendation::Recommended
            } else if score >= 50 {
                Recommendation::Acceptable
            } else {
                Recommendation::NotRecommended
            };
            assert_eq!(rec, expected, "score {score}");
        }
    }

    #[test]
    fn recommendation_boundary_values() {
        assert_eq!(Recommendation::from_score(70), Recommendation::Recommended);
        assert_eq!(Recommendation::from_score(69), Recommendation::Acceptable);
        assert_eq!(Recommendation::from_score(50), Recommendation::Acceptable);
        assert_eq!(
            Recommendation::from_score(49),
            Recommendation::NotRecommended
        );
    }

    #[test]
    fn aspect_weight_round_trips_as_pair() {
        let pros = vec![
            AspectWeight::new("cooling", 0.7),
            AspectWeight::new("capacity", 0.6),
        ];
        let json = serde_json::to_string(&pros).unwrap();
        assert_eq!(json, r#"[["cooling",0.7],["capacity",0.6]]"#);

        let parsed: Vec<AspectWeight> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pros);
    }

    #[test]
    fn not_recommended_serializes_with_space() {
        let json = serde_json::to_string(&Recommendation::NotRecommended).unwrap();
        assert_eq!(json, r#""Not Recommended""#);
    }
}
