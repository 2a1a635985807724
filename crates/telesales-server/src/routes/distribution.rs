use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// POST /api/admin/distribute: replace the active assignment set.
pub async fn distribute(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let summary = app.distribute().await?;
    Ok(Json(serde_json::json!({
        "message": "leads distributed",
        "summary": summary,
    })))
}
