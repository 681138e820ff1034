use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use equus_booking::{BookingSession, FlowStep, ReservationDraft, ValidationErrors};
use equus_catalog::{PriceQuote, PriceUnit, ServiceType};
use equus_core::load_service;
use equus_shared::Reference;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub draft: ReservationDraft,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub draft: ReservationDraft,
    /// Only rules owned by this step are checked; `review` or absent checks the whole draft
    #[serde(default)]
    pub step: Option<FlowStep>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: ValidationErrors,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReservationRequest {
    pub user_ref: String,
    #[serde(default)]
    pub draft: Option<ReservationDraft>,
    /// Several services booked together as one reservation
    #[serde(default)]
    pub drafts: Vec<ReservationDraft>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReservationResponse {
    pub id: String,
    pub total_price: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepsQuery {
    #[serde(default)]
    pub price_unit: Option<PriceUnit>,
}

#[derive(Debug, Serialize)]
pub struct StepsResponse {
    pub steps: Vec<FlowStep>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/reservations", post(submit_reservation))
        .route("/v1/reservations/quote", post(quote_reservation))
        .route("/v1/reservations/validate", post(validate_reservation))
        .route("/v1/reservations/steps/{service_type}", get(list_steps))
}

/// Rebuild a session for a client-held draft against the current catalog record
async fn resume_session(state: &AppState, draft: ReservationDraft) -> Result<BookingSession, AppError> {
    if draft.service_ref.trim().is_empty() {
        let mut errors = ValidationErrors::new();
        errors.add("serviceRef", "service required");
        return Err(AppError::ValidationError(errors));
    }

    let service = load_service(state.catalog.as_ref(), &draft.service_ref).await?;
    Ok(BookingSession::resume(Arc::clone(&state.policy), service, draft)?)
}

/// POST /v1/reservations/quote
async fn quote_reservation(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<PriceQuote>, AppError> {
    let session = resume_session(&state, req.draft).await?;
    Ok(Json(session.quote()))
}

/// POST /v1/reservations/validate
async fn validate_reservation(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, AppError> {
    let session = resume_session(&state, req.draft).await?;
    let step = req.step.unwrap_or(FlowStep::Review);
    let errors = state.policy.rules.validate(session.draft(), step, Utc::now());

    Ok(Json(ValidateResponse {
        valid: errors.is_empty(),
        errors,
    }))
}

/// POST /v1/reservations
/// Validate, price and store a reservation
async fn submit_reservation(
    State(state): State<AppState>,
    Json(req): Json<SubmitReservationRequest>,
) -> Result<(StatusCode, Json<SubmitReservationResponse>), AppError> {
    if req.user_ref.trim().is_empty() {
        let mut errors = ValidationErrors::new();
        errors.add("userRef", "user required");
        return Err(AppError::ValidationError(errors));
    }
    let user = Reference::new(req.user_ref.trim());

    let mut drafts = req.drafts;
    if let Some(draft) = req.draft {
        drafts.insert(0, draft);
    }

    let mut sessions = Vec::with_capacity(drafts.len());
    for draft in drafts {
        sessions.push(resume_session(&state, draft).await?);
    }

    // An empty cart comes back as a 400 from the assembler
    let receipt = state.submitter.submit_cart(sessions, &user, Utc::now()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitReservationResponse {
            id: receipt.id,
            total_price: receipt.total_price,
            currency: receipt.currency,
        }),
    ))
}

/// GET /v1/reservations/steps/{service_type}?priceUnit=per_day
async fn list_steps(
    State(state): State<AppState>,
    Path(service_type): Path<String>,
    Query(query): Query<StepsQuery>,
) -> Result<Json<StepsResponse>, AppError> {
    let service_type: ServiceType = service_type.parse()?;
    let price_unit = query.price_unit.unwrap_or_default();

    Ok(Json(StepsResponse {
        steps: state.policy.rules.steps_for(service_type, price_unit),
    }))
}
