use axum::{
    extract::State,
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::presenter::{self, PriceQuote};

#[derive(Debug, Serialize, Deserialize)]
pub struct PriceRequest {
    // Missing fields default to empty strings, which the aggregator treats
    // as a soft failure yielding an empty array.
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub query: String,
}

/// Handler for POST /fetch_prices. Always answers with a well-formed
/// (possibly empty) array; only a registry/connector mismatch surfaces
/// as a 500.
pub async fn fetch_prices(
    State(state): State<AppState>,
    Json(request): Json<PriceRequest>,
) -> Result<Json<Vec<PriceQuote>>, ApiError> {
    tracing::info!(country = %request.country, query = %request.query, "price lookup requested");

    match state.aggregator.aggregate(&request.country, &request.query).await {
        Ok(results) => Ok(Json(presenter::present(results))),
        Err(e) => {
            tracing::error!(error = %e, "aggregation failed");
            Err(ApiError::internal("price aggregation failed"))
        }
    }
}

/// Liveness probe for GET /health.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "dealscout"
    }))
}
