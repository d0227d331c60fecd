//! Shared data model and configuration for the worth-to-buy verdict engine.
//!
//! Everything downstream crates exchange lives here: the extracted
//! [`ProductRecord`], the [`ScoreResult`] verdict with its score-derived
//! [`Recommendation`], and the environment-driven [`AppConfig`].

pub mod config;
pub mod product;
pub mod verdict;

pub use config::{load_app_config, load_app_config_from_env, AppConfig, ConfigError};
pub use product::ProductRecord;
pub use verdict::{Alternative, AspectWeight, Recommendation, ResultMeta, ScoreResult};
