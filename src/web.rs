use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::error::{Result, VerbaError};
use crate::service::{TranslationRequest, TranslationService};

/// Shared state handed to every handler
pub struct AppState {
    pub service: TranslationService,
}

pub fn create_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/languages", get(list_languages))
        .route("/api/translate", post(translate))
        .with_state(state)
}

/// Bind the listener and serve the API until the process is stopped
pub async fn serve(state: Arc<AppState>, bind_addr: &str, port: u16) -> Result<()> {
    let app = create_routes(state);
    let addr = format!("{}:{}", bind_addr, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateReply {
    translated_text: String,
}

async fn translate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TranslationRequest>,
) -> std::result::Result<Json<TranslateReply>, ApiError> {
    info!("Received translation request from {}", request.client_id);

    let translated_text = state.service.translate(&request).await?;
    Ok(Json(TranslateReply { translated_text }))
}

async fn list_languages(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "langs": state.service.registry().languages() }))
}

async fn health() -> &'static str {
    "ok"
}

/// Maps the error taxonomy onto HTTP status codes: client mistakes are 400,
/// a failing translation resource is 502, everything else is 500.
struct ApiError(VerbaError);

impl From<VerbaError> for ApiError {
    fn from(e: VerbaError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            VerbaError::Validation(_) => StatusCode::BAD_REQUEST,
            VerbaError::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        error!("Request failed with {}: {}", status, self.0);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
