//! HTTP error mapping. Every error body is plain text.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hcmo_blueprint::BlueprintError;
use hcmo_conformance::ExportError;
use hcmo_ontology::FormError;

/// Errors a handler can return.
#[derive(Debug)]
pub enum AppError {
    /// `/api/export` body has no usable `jsonld` member.
    MissingDocument,
    /// The form failed validation.
    Form(FormError),
    /// The export pipeline failed.
    Export(ExportError),
    /// A blueprint request named an unknown example or field.
    Blueprint(BlueprintError),
    /// The blueprint failed to load at startup.
    Unavailable(Arc<str>),
    /// A response body could not be built.
    Internal(String),
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        AppError::Form(err)
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Export(err)
    }
}

impl From<BlueprintError> for AppError {
    fn from(err: BlueprintError) -> Self {
        AppError::Blueprint(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MissingDocument => (
                StatusCode::BAD_REQUEST,
                "Missing jsonld document in request body.".to_owned(),
            ),
            AppError::Form(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            AppError::Export(err) => {
                tracing::error!(error = %err, "export failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to process export: {err}"),
                )
            }
            AppError::Blueprint(err @ BlueprintError::UnknownExample(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            AppError::Blueprint(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Unavailable(reason) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Blueprint unavailable: {reason}"),
            ),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, message).into_response()
    }
}
