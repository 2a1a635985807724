use axum::extract::{Query, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct AssignmentQuery {
    #[serde(default)]
    pub agent_id: Option<String>,
}

/// GET /api/assignments: active assignments, optionally for one agent.
pub async fn list_active(
    State(app): State<AppState>,
    Query(query): Query<AssignmentQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let result = tokio::task::spawn_blocking(move || {
        let assignments = store.active_assignments(query.agent_id.as_deref())?;
        Ok::<_, telesales_core::CrmError>(serde_json::json!(assignments))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
