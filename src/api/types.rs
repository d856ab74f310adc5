// src/api/types.rs

use serde::{Deserialize, Serialize};

use crate::models::{CartItem, Product};
use crate::session::SearchStatus;

/// Request body for the unified voice-command endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceCommandRequest {
    pub command: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Request body for the asynchronous search endpoint. Explicit price bounds
/// are fallbacks: bounds spoken inside the query win.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub min_price: Option<u32>,
    #[serde(default)]
    pub max_price: Option<u32>,
}

/// Immediate acknowledgement for a search that now runs in the background.
#[derive(Debug, Serialize)]
pub struct SearchAccepted {
    pub status: String,
    pub message: String,
    pub session_id: String,
    pub voice_response: String,
}

/// Polling response for an in-flight or finished search.
#[derive(Debug, Serialize)]
pub struct SearchStatusResponse {
    pub status: SearchStatus,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_found: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_index: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigateRequest {
    pub command: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartAddRequest {
    pub product: Product,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartRemoveRequest {
    pub item_title: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartSessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Query string for GET /api/cart/items.
#[derive(Debug, Clone, Deserialize)]
pub struct CartQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TtsQuery {
    pub text: String,
}

/// Uniform cart endpoint response.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub success: bool,
    pub message: String,
    pub items: Vec<CartItem>,
    pub total: u64,
    pub item_count: usize,
}

/// Body of the transport-level catch-all error.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub voice_response: String,
    pub error: String,
}
