// src/api/handlers.rs

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::api::types::*;
use crate::api::ApiState;
use crate::parser;
use crate::router::CommandResponse;
use crate::session::SearchStatus;

/// Transport-level catch-all. Handlers absorb expected failures themselves;
/// anything that still escapes becomes a 500 with a spoken apology instead
/// of an unhandled fault.
pub struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Unhandled error at transport boundary: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                success: false,
                voice_response: "Sorry, something went wrong. Please try again.".to_string(),
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// GET /api/health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

/// GET /api — feature and endpoint overview for the front end.
pub async fn api_info(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "VoiceCart API - voice-driven shopping",
        "version": env!("CARGO_PKG_VERSION"),
        "stores": state.router.finder_stores(),
        "endpoints": {
            "search": "/api/search",
            "search-status": "/api/search-status/{session_id}",
            "voice-command": "/api/voice-command",
            "navigate": "/api/navigate",
            "tts": "/api/tts",
            "cart": {
                "add": "/api/cart/add",
                "remove": "/api/cart/remove",
                "items": "/api/cart/items",
                "clear": "/api/cart/clear",
                "checkout": "/api/cart/checkout"
            }
        }
    }))
}

/// POST /api/voice-command — synchronous routing through the full command set.
pub async fn voice_command(
    State(state): State<ApiState>,
    Json(request): Json<VoiceCommandRequest>,
) -> Json<CommandResponse> {
    Json(
        state
            .router
            .handle_command(&request.command, request.session_id.as_deref())
            .await,
    )
}

/// POST /api/search — acknowledge immediately, scrape in the background.
/// The caller polls /api/search-status/{session_id} for the outcome.
pub async fn search(
    State(state): State<ApiState>,
    Json(request): Json<SearchRequest>,
) -> Json<SearchAccepted> {
    let mut intent = parser::parse_search_query(&request.query);
    // Bounds spoken in the query win over the structured fields.
    if intent.min_price.is_none() {
        intent.min_price = request.min_price;
    }
    if intent.max_price.is_none() {
        intent.max_price = request.max_price;
    }

    let session_id = state
        .router
        .sessions()
        .resolve_id(request.session_id.as_deref());

    {
        let session = state
            .router
            .sessions()
            .get_or_create(Some(&session_id))
            .await;
        session.lock().await.begin_search(&request.query);
    }

    let router = state.router.clone();
    let query = request.query.clone();
    let task_session_id = session_id.clone();
    tokio::spawn(async move {
        router
            .run_search(&query, intent, Some(&task_session_id))
            .await;
    });

    Json(SearchAccepted {
        status: "processing".to_string(),
        message: format!("Search in progress. Poll /api/search-status/{session_id}."),
        session_id,
        voice_response: "Searching for products. This might take a moment.".to_string(),
    })
}

/// GET /api/search-status/{session_id}
pub async fn search_status(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Json<SearchStatusResponse> {
    let Some(session) = state.router.sessions().get(Some(&session_id)).await else {
        return Json(SearchStatusResponse {
            status: SearchStatus::Idle,
            session_id,
            products: None,
            total_found: None,
            voice_response: Some("No search has been started for this session.".to_string()),
            current_index: None,
        });
    };

    let session = session.lock().await;
    let response = match session.search_status {
        SearchStatus::Pending => SearchStatusResponse {
            status: SearchStatus::Pending,
            session_id,
            products: None,
            total_found: None,
            voice_response: Some("Still searching, one moment please.".to_string()),
            current_index: None,
        },
        SearchStatus::Complete if session.has_results() => {
            let first = &session.current_products[0];
            SearchStatusResponse {
                status: SearchStatus::Complete,
                session_id,
                products: Some(session.current_products.clone()),
                total_found: Some(session.current_products.len()),
                voice_response: Some(format!(
                    "Found {} products. First result: {}. Say next for more options or buy this to purchase.",
                    session.current_products.len(),
                    first.voice_summary()
                )),
                current_index: Some(session.current_index),
            }
        }
        SearchStatus::Complete => SearchStatusResponse {
            status: SearchStatus::Complete,
            session_id,
            products: Some(Vec::new()),
            total_found: Some(0),
            voice_response: Some(format!(
                "Sorry, I couldn't find any products for {}. Please try different keywords.",
                session.last_query
            )),
            current_index: None,
        },
        SearchStatus::Idle => SearchStatusResponse {
            status: SearchStatus::Idle,
            session_id,
            products: None,
            total_found: None,
            voice_response: Some("No search has been started for this session.".to_string()),
            current_index: None,
        },
    };
    Json(response)
}

/// POST /api/navigate
pub async fn navigate(
    State(state): State<ApiState>,
    Json(request): Json<NavigateRequest>,
) -> Json<CommandResponse> {
    match parser::parse_navigation(&request.command) {
        Some(action) => Json(
            state
                .router
                .navigate(action, request.session_id.as_deref())
                .await,
        ),
        None => Json(CommandResponse::failure(
            "I didn't understand that navigation command. Try next, previous, first, last, repeat, or buy this.",
        )),
    }
}

/// POST /api/cart/add
pub async fn cart_add(
    State(state): State<ApiState>,
    Json(request): Json<CartAddRequest>,
) -> Json<CartResponse> {
    let session = state
        .router
        .sessions()
        .get_or_create(request.session_id.as_deref())
        .await;
    let mut session = session.lock().await;

    let message = session.add_to_cart(&request.product);
    Json(CartResponse {
        success: true,
        message,
        items: session.cart.clone(),
        total: session.cart_total(),
        item_count: session.cart.len(),
    })
}

/// POST /api/cart/remove
pub async fn cart_remove(
    State(state): State<ApiState>,
    Json(request): Json<CartRemoveRequest>,
) -> Json<CartResponse> {
    let session = state
        .router
        .sessions()
        .get_or_create(request.session_id.as_deref())
        .await;
    let mut session = session.lock().await;

    let (success, message) = session.remove_from_cart(&request.item_title);
    Json(CartResponse {
        success,
        message,
        items: session.cart.clone(),
        total: session.cart_total(),
        item_count: session.cart.len(),
    })
}

/// GET /api/cart/items
pub async fn cart_items(
    State(state): State<ApiState>,
    Query(query): Query<CartQuery>,
) -> Json<CartResponse> {
    let session = state
        .router
        .sessions()
        .get_or_create(query.session_id.as_deref())
        .await;
    let session = session.lock().await;

    Json(CartResponse {
        success: true,
        message: session.cart_summary(),
        items: session.cart.clone(),
        total: session.cart_total(),
        item_count: session.cart.len(),
    })
}

/// POST /api/cart/clear
pub async fn cart_clear(
    State(state): State<ApiState>,
    Json(request): Json<CartSessionRequest>,
) -> Json<CartResponse> {
    let session = state
        .router
        .sessions()
        .get_or_create(request.session_id.as_deref())
        .await;
    let mut session = session.lock().await;

    let message = session.clear_cart();
    Json(CartResponse {
        success: true,
        message,
        items: Vec::new(),
        total: 0,
        item_count: 0,
    })
}

/// POST /api/cart/checkout
pub async fn cart_checkout(
    State(state): State<ApiState>,
    Json(request): Json<CartSessionRequest>,
) -> Json<CartResponse> {
    let session = state
        .router
        .sessions()
        .get_or_create(request.session_id.as_deref())
        .await;
    let mut session = session.lock().await;

    let (success, message) = session.checkout();
    Json(CartResponse {
        success,
        message,
        items: session.cart.clone(),
        total: session.cart_total(),
        item_count: session.cart.len(),
    })
}

/// GET /api/tts?text=... — external service passthrough returning audio bytes.
pub async fn tts(
    State(state): State<ApiState>,
    Query(query): Query<TtsQuery>,
) -> Result<Response, ApiError> {
    let audio = state.tts.synthesize(&query.text).await?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}
