use axum::Json;

/// GET /health: liveness probe for whatever fronts the endpoint.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "vouchbot",
    }))
}
