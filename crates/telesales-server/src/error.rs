use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use telesales_core::error::CrmError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<CrmError>() {
            Some(e) => match e {
                CrmError::NoActiveAgents
                | CrmError::NoEligibleLeads
                | CrmError::InvalidScore(_)
                | CrmError::InvalidConfig(_)
                | CrmError::NotInitialized => StatusCode::BAD_REQUEST,
                CrmError::AgentNotFound(_) | CrmError::LeadNotFound(_) => StatusCode::NOT_FOUND,
                CrmError::StoreTransaction(_)
                | CrmError::Database(_)
                | CrmError::Io(_)
                | CrmError::Yaml(_)
                | CrmError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %format!("{:#}", self.0), "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
