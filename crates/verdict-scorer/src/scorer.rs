use verdict_core::{AspectWeight, ProductRecord, Recommendation, ResultMeta, ScoreResult};

use crate::lexicon::{
    CATEGORIES, GENERIC_CONS, GENERIC_PROS, NEGATIVE_KEYWORDS, NEGATIVE_WEIGHT, POSITIVE_KEYWORDS,
    POSITIVE_WEIGHT,
};

/// Base score every product starts from before keyword adjustments.
const BASE_SCORE: i32 = 60;

/// Bounds the accumulated score is clamped into before the recommendation
/// is derived.
const SCORE_FLOOR: i32 = 30;
const SCORE_CEIL: i32 = 95;

/// Confidence/data-quality attached to every offline verdict. Deliberately
/// low: the heuristic sees only the title.
const OFFLINE_CONFIDENCE: f32 = 0.4;
const OFFLINE_DATA_QUALITY: f32 = 0.3;

/// Scores a product from its extracted record alone.
///
/// Deterministic and side-effect-free; identical input yields identical
/// output. The result is always well-formed: the score is clamped into
/// `[30, 95]`, the recommendation is derived from the clamped score, and
/// `meta.offline` is `true`. This function cannot fail — a record with no
/// title scores as a generic `"Product"`.
#[must_use]
pub fn score_product(record: &ProductRecord) -> ScoreResult {
    let title = record.title_or_default();
    let title_lower = title.to_lowercase();

    let mut score = BASE_SCORE;

    // One hit per keyword, however often it repeats in the title.
    for keyword in POSITIVE_KEYWORDS {
        if title_lower.contains(keyword) {
            score += POSITIVE_WEIGHT;
        }
    }
    for keyword in NEGATIVE_KEYWORDS {
        if title_lower.contains(keyword) {
            score -= NEGATIVE_WEIGHT;
        }
    }

    // At most one category branch applies: first trigger match in declared
    // precedence order.
    let category = CATEGORIES
        .iter()
        .find(|c| c.triggers.iter().any(|t| title_lower.contains(t)));
    let (pros, cons) = match category {
        Some(c) => {
            score += c.delta;
            (c.pros, c.cons)
        }
        None => (GENERIC_PROS, GENERIC_CONS),
    };

    let score = score.clamp(SCORE_FLOOR, SCORE_CEIL);
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let score = score as u8;

    ScoreResult {
        score,
        recommendation: Recommendation::from_score(score),
        pros: pros
            .iter()
            .map(|&(aspect, weight)| AspectWeight::new(aspect, weight))
            .collect(),
        cons: cons
            .iter()
            .map(|&(aspect, weight)| AspectWeight::new(aspect, weight))
            .collect(),
        recommendations: Vec::new(),
        verdict_text: format!(
            "Offline analysis: {title} scores {score}%. This is a basic assessment. \
             Connect to the analysis service for a detailed review-based verdict."
        ),
        meta: ResultMeta {
            confidence: OFFLINE_CONFIDENCE,
            data_quality: OFFLINE_DATA_QUALITY,
            offline: true,
        },
    }
}
