//! The message contract between the panel and the in-page context.
//!
//! Requests are tagged by an `action` field on the wire, e.g.
//! `{"action": "playVerdict", "text": "..."}`. Responses are untagged:
//! `getProductData` answers with the product snapshot, every other action
//! with a success/error acknowledgement.

use serde::{Deserialize, Serialize};
use verdict_core::{ProductRecord, ScoreResult};

/// A request from the panel to the in-page context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum SyncRequest {
    /// Fetch the current product snapshot and any verdict already computed.
    GetProductData,
    /// Run the same user-initiated analysis path as a direct interaction.
    AnalyzeProduct,
    /// Speak the verdict text through the in-page speech collaborator.
    PlayVerdict { text: String },
}

impl SyncRequest {
    /// Wire-level action name, for logs.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetProductData => "getProductData",
            Self::AnalyzeProduct => "analyzeProduct",
            Self::PlayVerdict { .. } => "playVerdict",
        }
    }
}

/// A response from the in-page context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SyncResponse {
    ProductData(ProductDataResponse),
    Ack(AckResponse),
}

/// Answer to [`SyncRequest::GetProductData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDataResponse {
    pub product_data: Option<ProductRecord>,
    pub analysis_result: Option<ScoreResult>,
    pub is_product_page: bool,
}

/// Success/error acknowledgement for action requests.
///
/// Handlers are defensive: an internal failure becomes
/// `{success: false, error}` rather than an unanswered request, because the
/// calling context blocks on the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_serialize_with_action_tags() {
        let json = serde_json::to_value(&SyncRequest::GetProductData).unwrap();
        assert_eq!(json, serde_json::json!({"action": "getProductData"}));

        let json = serde_json::to_value(&SyncRequest::PlayVerdict {
            text: "Buy it.".to_owned(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"action": "playVerdict", "text": "Buy it."})
        );
    }

    #[test]
    fn requests_parse_from_wire_form() {
        let request: SyncRequest =
            serde_json::from_str(r#"{"action": "analyzeProduct"}"#).unwrap();
        assert_eq!(request, SyncRequest::AnalyzeProduct);
    }

    #[test]
    fn ack_omits_error_when_successful() {
        let json = serde_json::to_value(AckResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"success": true}));

        let json = serde_json::to_value(AckResponse::failure("speech unavailable")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "speech unavailable"})
        );
    }

    #[test]
    fn product_data_response_uses_camel_case_fields() {
        let response = SyncResponse::ProductData(ProductDataResponse {
            product_data: None,
            analysis_result: None,
            is_product_page: false,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "productData": null,
                "analysisResult": null,
                "isProductPage": false
            })
        );
    }
}
