use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use vtrelay_core::error::CoreError;
use vtrelay_xmlrpc::RpcError;

/// Body returned when the workflow id or version is missing.
pub const MISSING_IDENTITY_MESSAGE: &str = "ERROR: Vistrails id or version not provided.";

/// Body returned when a response envelope cannot be decoded.
pub const BAD_XML_MESSAGE: &str = "bad xml";

/// Body returned when the XML-RPC server cannot be reached.
pub const BACKEND_UNAVAILABLE_MESSAGE: &str = "ERROR: workflow server unavailable.";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for request validation and [`RpcError`] for remote
/// calls. Implements [`IntoResponse`] to produce the relay's fixed
/// plain-text messages; details only go to the log.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vtrelay_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed or undecodable XML-RPC call.
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::MissingWorkflowIdentity => {
                    (StatusCode::OK, MISSING_IDENTITY_MESSAGE.to_string())
                }
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, format!("ERROR: {msg}.")),
            },

            // --- Remote call errors ---
            AppError::Rpc(RpcError::Decode(err)) => {
                tracing::warn!(error = %err, "Undecodable XML-RPC response");
                (StatusCode::OK, BAD_XML_MESSAGE.to_string())
            }
            AppError::Rpc(RpcError::Transport(err)) => {
                tracing::error!(error = %err, "XML-RPC transport failure");
                (
                    StatusCode::BAD_GATEWAY,
                    BACKEND_UNAVAILABLE_MESSAGE.to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
