use async_trait::async_trait;
use equus_booking::Reservation;
use equus_catalog::{HorseRecord, JourneyRecord, ServiceRecord};

/// Read access to services, horses and journeys
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn get_service(
        &self,
        id: &str,
    ) -> Result<Option<ServiceRecord>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_user_horses(
        &self,
        user_id: &str,
    ) -> Result<Vec<HorseRecord>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_journeys(
        &self,
    ) -> Result<Vec<JourneyRecord>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Write side for assembled reservations
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Persist the record and return the id the store assigned
    async fn create_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}
