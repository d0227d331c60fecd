use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Runtime configuration for the verdict engine.
///
/// Every field has a default, so the engine runs with no environment at all;
/// env vars exist to retarget the analysis service and to tune timeouts.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the remote analysis service.
    pub api_base_url: String,
    /// Liveness-probe timeout. Non-response within this window means the
    /// service is treated as unavailable.
    pub health_timeout_secs: u64,
    /// Analysis-request timeout.
    pub analyze_timeout_secs: u64,
    /// Time-to-live for cached verdicts.
    pub cache_ttl_secs: u64,
    /// Maximum UI attachment attempts before the overlay is forced.
    pub max_attach_attempts: u32,
    /// Base delay for the attachment backoff schedule.
    pub attach_backoff_base_ms: u64,
    /// Upper bound on any single attachment backoff delay.
    pub attach_backoff_cap_ms: u64,
    /// Delay after a client-side navigation before re-initializing, letting
    /// the new view render.
    pub navigation_settle_ms: u64,
    /// Delay before the one extraction retry when no title was found.
    pub extraction_retry_delay_ms: u64,
    pub log_level: String,
    pub user_agent: String,
}

/// Load configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// This is the core parsing logic, decoupled from the actual environment so
/// it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var`
/// needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_base_url = or_default("VERDICT_API_BASE_URL", "http://localhost:5000");
    let health_timeout_secs = parse_u64("VERDICT_HEALTH_TIMEOUT_SECS", "3")?;
    let analyze_timeout_secs = parse_u64("VERDICT_ANALYZE_TIMEOUT_SECS", "45")?;
    let cache_ttl_secs = parse_u64("VERDICT_CACHE_TTL_SECS", "300")?;
    let max_attach_attempts = parse_u32("VERDICT_MAX_ATTACH_ATTEMPTS", "5")?;
    let attach_backoff_base_ms = parse_u64("VERDICT_ATTACH_BACKOFF_BASE_MS", "1000")?;
    let attach_backoff_cap_ms = parse_u64("VERDICT_ATTACH_BACKOFF_CAP_MS", "8000")?;
    let navigation_settle_ms = parse_u64("VERDICT_NAVIGATION_SETTLE_MS", "500")?;
    let extraction_retry_delay_ms = parse_u64("VERDICT_EXTRACTION_RETRY_DELAY_MS", "3000")?;
    let log_level = or_default("VERDICT_LOG_LEVEL", "info");
    let user_agent = or_default("VERDICT_USER_AGENT", "verdict/0.1 (worth-to-buy)");

    Ok(AppConfig {
        api_base_url,
        health_timeout_secs,
        analyze_timeout_secs,
        cache_ttl_secs,
        max_attach_attempts,
        attach_backoff_base_ms,
        attach_backoff_cap_ms,
        navigation_settle_ms,
        extraction_retry_delay_ms,
        log_level,
        user_agent,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
