//! Local heuristic scorer — the offline fallback for the verdict engine.
//!
//! Pure and deterministic: the same `ProductRecord` always yields the same
//! `ScoreResult`. Used whenever the remote analysis service is
//! unreachable or erroring, and clearly labeled as offline in its output.

mod lexicon;
mod scorer;

pub use scorer::score_product;
