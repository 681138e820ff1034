use crate::repository::{CatalogRepository, ReservationStore};
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use equus_booking::{BookingSession, Reservation, SessionError};
use equus_catalog::ServiceRecord;
use equus_shared::models::events::ReservationSubmittedEvent;
use equus_shared::Reference;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// What the caller gets back once a reservation is stored
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: String,
    pub reservation_id: uuid::Uuid,
    pub total_price: i64,
    pub currency: String,
}

/// Validates, assembles and persists reservations
pub struct ReservationSubmitter {
    store: Arc<dyn ReservationStore>,
}

impl ReservationSubmitter {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    pub async fn submit(
        &self,
        session: BookingSession,
        user: &Reference,
        now: DateTime<Utc>,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let reservation = session.finish(user, now)?;
        self.persist(reservation, now).await
    }

    /// Submit several services as one reservation
    pub async fn submit_cart(
        &self,
        sessions: Vec<BookingSession>,
        user: &Reference,
        now: DateTime<Utc>,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let reservation = BookingSession::finish_cart(sessions, user, now)?;
        self.persist(reservation, now).await
    }

    async fn persist(
        &self,
        reservation: Reservation,
        now: DateTime<Utc>,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let store_id = self
            .store
            .create_reservation(&reservation)
            .await
            .map_err(|e| {
                error!("Failed to store reservation {}: {}", reservation.id, e);
                SubmitError::SubmissionFailed
            })?;

        let event = ReservationSubmittedEvent {
            reservation_id: reservation.id,
            store_id: store_id.clone(),
            user_id: reservation.user.id.clone(),
            service_ids: reservation.service_ids(),
            total_price: reservation.total_price,
            currency: reservation.currency.clone(),
            timestamp: now.timestamp(),
        };
        info!(
            reservation_id = %event.reservation_id,
            store_id = %event.store_id,
            total_price = event.total_price,
            "Reservation submitted: {:?}",
            event.service_ids
        );

        Ok(SubmissionReceipt {
            id: store_id,
            reservation_id: reservation.id,
            total_price: reservation.total_price,
            currency: reservation.currency,
        })
    }
}

/// Look up a service that can currently be booked
pub async fn load_service(catalog: &dyn CatalogRepository, id: &str) -> CoreResult<ServiceRecord> {
    let service = catalog
        .get_service(id)
        .await
        .map_err(|e| CoreError::InternalError(e.to_string()))?
        .ok_or_else(|| CoreError::ServiceNotFound(id.to_string()))?;
    Ok(service)
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The store rejected the write; details are in the log only
    #[error("submission failed")]
    SubmissionFailed,
}
