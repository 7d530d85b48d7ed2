//! Error types for the observer API.
//!
//! [`ObserverError`] converts into an HTTP response with a JSON body
//! `{"error": ..., "status": ...}`. A guarded command that needs the
//! operator's confirmation answers `409` and names the action under
//! `confirmationRequired`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scorebug_core::command::CommandError;
use scorebug_core::guard::GuardedAction;

/// Errors that can occur in the observer API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The command failed validation; nothing changed.
    #[error("{0}")]
    Rejected(#[from] CommandError),

    /// The request body could not be read.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The action is guarded and must be resent with `confirm`.
    #[error("confirmation required")]
    ConfirmationRequired(GuardedAction),
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, confirmation) = match &self {
            Self::Rejected(_) => (StatusCode::UNPROCESSABLE_ENTITY, None),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, None),
            Self::ConfirmationRequired(action) => (StatusCode::CONFLICT, Some(*action)),
        };

        let mut body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        if let (Some(action), Some(fields)) = (confirmation, body.as_object_mut()) {
            fields.insert(
                "confirmationRequired".to_owned(),
                serde_json::json!(action),
            );
        }

        (status, axum::Json(body)).into_response()
    }
}
