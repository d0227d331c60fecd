//! Analysis orchestration: remote verdict service first, local heuristic
//! fallback second, TTL-cached either way.
//!
//! The remote service is consulted through a two-step procedure — a short
//! liveness probe, then the analysis request proper — and any failure along
//! that path (timeout, non-2xx, malformed body, service-level rejection)
//! collapses into the same local-fallback transition. Nothing in this crate
//! lets a network fault escape to the caller.

pub mod cache;
pub mod client;
pub mod error;
pub mod orchestrator;
pub mod types;

pub use cache::VerdictCache;
pub use client::VerdictClient;
pub use error::AnalysisError;
pub use orchestrator::AnalysisOrchestrator;
pub use types::RemoteAnalysis;
