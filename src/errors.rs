use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failures talking to the scheduling backend. The detail is for logs only;
/// users see the generic flow messages.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("slot fetch failed: {0}")]
    SlotFetch(String),

    #[error("booking submission failed: {0}")]
    BookingSubmission(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FlowError {
    #[error("{0}")]
    Validation(String),

    #[error("cannot {action} while {step}")]
    InvalidTransition {
        action: &'static str,
        step: &'static str,
    },

    #[error("unknown slot: {0}")]
    UnknownSlot(String),

    #[error("unknown service: {0}")]
    UnknownService(String),

    #[error("a booking submission is already in flight")]
    SubmissionInFlight,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Flow(FlowError::Validation(_))
            | AppError::Flow(FlowError::UnknownSlot(_))
            | AppError::Flow(FlowError::UnknownService(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Flow(FlowError::InvalidTransition { .. })
            | AppError::Flow(FlowError::SubmissionInFlight) => StatusCode::CONFLICT,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
