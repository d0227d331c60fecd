use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};

use crate::error::AnalysisError;
use crate::types::RemoteAnalysis;

/// HTTP client for the remote verdict service.
///
/// Both requests carry their own bounded timeout: the liveness probe must
/// answer fast or the service is treated as down, while the analysis call
/// is allowed the long window a review crawl needs. A timeout surfaces as
/// an ordinary [`AnalysisError::Http`] — the orchestrator turns it into a
/// local fallback, never a fault.
#[derive(Debug)]
pub struct VerdictClient {
    client: Client,
    base_url: Url,
    health_timeout: Duration,
    analyze_timeout: Duration,
}

/// Request body for `POST /api/extension/analyze`.
#[derive(serde::Serialize)]
struct AnalyzeRequest<'a> {
    url: &'a str,
    include_recommendations: bool,
}

impl VerdictClient {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AnalysisError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &verdict_core::AppConfig) -> Result<Self, AnalysisError> {
        Self::with_base_url(
            &config.api_base_url,
            Duration::from_secs(config.health_timeout_secs),
            Duration::from_secs(config.analyze_timeout_secs),
            &config.user_agent,
        )
    }

    /// Creates a client with an explicit base URL and timeouts (for tests
    /// pointing at a mock server with sub-second timeouts).
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AnalysisError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        health_timeout: Duration,
        analyze_timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // joining endpoint paths appends rather than replaces.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| AnalysisError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            health_timeout,
            analyze_timeout,
        })
    }

    /// Probes the service's liveness endpoint.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Http`] on network failure or timeout.
    /// - [`AnalysisError::UnexpectedStatus`] on any non-2xx status.
    pub async fn check_health(&self) -> Result<(), AnalysisError> {
        let url = self.endpoint("api/extension/health");
        let response = self
            .client
            .get(url.clone())
            .timeout(self.health_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AnalysisError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }

    /// Requests a full analysis for `product_url`.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Http`] on network failure or timeout.
    /// - [`AnalysisError::UnexpectedStatus`] on a non-2xx status.
    /// - [`AnalysisError::ServiceRejected`] when the body carries `ok: false`.
    /// - [`AnalysisError::Deserialize`] when the body is not valid JSON or
    ///   does not match the expected shape.
    pub async fn analyze(&self, product_url: &str) -> Result<RemoteAnalysis, AnalysisError> {
        let url = self.endpoint("api/extension/analyze");
        let response = self
            .client
            .post(url.clone())
            .timeout(self.analyze_timeout)
            .json(&AnalyzeRequest {
                url: product_url,
                include_recommendations: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| AnalysisError::Deserialize {
                context: format!("analyze response for {product_url}"),
                source: e,
            })?;

        // The envelope's own success flag gates everything else.
        if value.get("ok").and_then(serde_json::Value::as_bool) != Some(true) {
            let reason = value
                .get("error")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("analysis failed")
                .to_owned();
            return Err(AnalysisError::ServiceRejected { reason });
        }

        serde_json::from_value(value).map_err(|e| AnalysisError::Deserialize {
            context: format!("analyze response for {product_url}"),
            source: e,
        })
    }

    /// Builds the full-report page URL for a product, percent-encoding the
    /// product address into the query string.
    #[must_use]
    pub fn full_report_url(&self, product_url: &str) -> String {
        let encoded = utf8_percent_encode(product_url, NON_ALPHANUMERIC);
        format!("{}?url={encoded}", self.base_url)
    }

    fn endpoint(&self, path: &str) -> Url {
        // The base URL always ends in a slash, so join() appends the path.
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
