//! Keyword tables for the offline heuristic.
//!
//! Keys are matched case-insensitively as substrings of the product title.
//! Each keyword contributes at most once, regardless of repeats.

/// Score added per matched positive keyword (premium brands and
/// marketing tiers).
pub(crate) const POSITIVE_WEIGHT: i32 = 8;

/// Score removed per matched negative keyword (budget brands and
/// bargain-bin wording).
pub(crate) const NEGATIVE_WEIGHT: i32 = 10;

pub(crate) const POSITIVE_KEYWORDS: &[&str] = &[
    "samsung", "apple", "lg", "sony", "dell", "hp", "asus", "best", "premium", "pro", "plus",
    "ultra",
];

pub(crate) const NEGATIVE_KEYWORDS: &[&str] = &[
    "micromax",
    "intex",
    "karbonn",
    "cheap",
    "basic",
    "old",
    "refurbished",
];

/// A product-category branch: trigger words, a score delta, and the
/// category's characteristic pros/cons.
///
/// Categories are checked in declared order and at most one applies —
/// the first whose trigger matches the title.
pub(crate) struct Category {
    pub triggers: &'static [&'static str],
    pub delta: i32,
    pub pros: &'static [(&'static str, f32)],
    pub cons: &'static [(&'static str, f32)],
}

pub(crate) const CATEGORIES: &[Category] = &[
    Category {
        triggers: &["refrigerator", "fridge"],
        delta: 5,
        pros: &[("cooling", 0.7), ("capacity", 0.6)],
        cons: &[("power_consumption", -0.3), ("noise", -0.2)],
    },
    Category {
        triggers: &["phone", "smartphone", "mobile"],
        delta: 8,
        pros: &[("camera", 0.6), ("battery", 0.5)],
        cons: &[("price", -0.4), ("heating", -0.2)],
    },
    Category {
        triggers: &["laptop", "computer"],
        delta: 6,
        pros: &[("performance", 0.7), ("display", 0.6)],
        cons: &[("battery_life", -0.3), ("weight", -0.2)],
    },
];

/// Pros/cons used when no category trigger matches.
pub(crate) const GENERIC_PROS: &[(&str, f32)] = &[("quality", 0.6), ("features", 0.5)];
pub(crate) const GENERIC_CONS: &[(&str, f32)] = &[("price", -0.3), ("availability", -0.2)];
