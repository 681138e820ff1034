use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use equus_booking::{AssemblyError, SessionError, ValidationErrors};
use equus_catalog::CatalogError;
use equus_core::{CoreError, SubmitError};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(ValidationErrors),
    UnprocessableError(String),
    BadRequestError(String),
    NotFoundError(String),
    SubmissionFailed,
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationError(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "errors": errors }))
            }
            AppError::UnprocessableError(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": msg }))
            }
            AppError::BadRequestError(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::SubmissionFailed => {
                (StatusCode::BAD_GATEWAY, json!({ "error": "submission failed" }))
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal Server Error" }))
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal Server Error" }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ServiceNotFound(_) => Self::NotFoundError(err.to_string()),
            CoreError::InternalError(msg) => Self::InternalServerError(msg),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => Self::NotFoundError(err.to_string()),
            CatalogError::UnknownTag(_) => Self::BadRequestError(err.to_string()),
            CatalogError::Inactive(_) | CatalogError::InvalidPrice { .. } => {
                Self::UnprocessableError(err.to_string())
            }
        }
    }
}

impl From<AssemblyError> for AppError {
    fn from(err: AssemblyError) -> Self {
        let mut errors = ValidationErrors::new();
        match &err {
            AssemblyError::MissingField { field } => errors.add(field, "required"),
            AssemblyError::InvalidSchedule => errors.add("endDate", "end date must be after start"),
            AssemblyError::InvalidQuantity(_) => errors.add("quantity", "quantity must be at least 1"),
            AssemblyError::EmptyCart => return Self::BadRequestError(err.to_string()),
        }
        Self::ValidationError(errors)
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Invalid(errors) => Self::ValidationError(errors),
            SessionError::Catalog(e) => e.into(),
            SessionError::Assembly(e) => e.into(),
            SessionError::UnknownBenefit { .. } | SessionError::ServiceMismatch { .. } => {
                Self::BadRequestError(err.to_string())
            }
        }
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Session(e) => e.into(),
            SubmitError::SubmissionFailed => Self::SubmissionFailed,
        }
    }
}
