use equus_booking::BookingPolicy;
use equus_core::{CatalogRepository, ReservationSubmitter};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub submitter: Arc<ReservationSubmitter>,
    pub policy: Arc<BookingPolicy>,
}
