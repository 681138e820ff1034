use async_trait::async_trait;
use equus_booking::Reservation;
use equus_catalog::{HorseRecord, JourneyRecord, ServiceRecord};
use equus_core::repository::{CatalogRepository, ReservationStore};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Catalog held in process memory, for development and tests
#[derive(Default)]
pub struct InMemoryCatalog {
    services: RwLock<HashMap<String, ServiceRecord>>,
    horses: RwLock<Vec<HorseRecord>>,
    journeys: RwLock<Vec<JourneyRecord>>,
}

/// Catalog contents loaded from a JSON file at startup
#[derive(Debug, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
    #[serde(default)]
    pub horses: Vec<HorseRecord>,
    #[serde(default)]
    pub journeys: Vec<JourneyRecord>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: CatalogSeed) -> Self {
        Self {
            services: RwLock::new(
                seed.services
                    .into_iter()
                    .map(|s| (s.id.clone(), s))
                    .collect(),
            ),
            horses: RwLock::new(seed.horses),
            journeys: RwLock::new(seed.journeys),
        }
    }

    pub async fn add_service(&self, service: ServiceRecord) {
        self.services.write().await.insert(service.id.clone(), service);
    }

    pub async fn add_horse(&self, horse: HorseRecord) {
        self.horses.write().await.push(horse);
    }

    pub async fn add_journey(&self, journey: JourneyRecord) {
        self.journeys.write().await.push(journey);
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn get_service(
        &self,
        id: &str,
    ) -> Result<Option<ServiceRecord>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.services.read().await.get(id).cloned())
    }

    async fn list_user_horses(
        &self,
        user_id: &str,
    ) -> Result<Vec<HorseRecord>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .horses
            .read()
            .await
            .iter()
            .filter(|h| h.owner_ref.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn list_journeys(
        &self,
    ) -> Result<Vec<JourneyRecord>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.journeys.read().await.clone())
    }
}

/// Reservations held in process memory, keyed by the id the store hands out
#[derive(Default)]
pub struct InMemoryReservationStore {
    reservations: RwLock<HashMap<String, Reservation>>,
    unavailable: AtomicBool,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, as an unreachable backend would
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn get(&self, id: &str) -> Option<Reservation> {
        self.reservations.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.reservations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reservations.read().await.is_empty()
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn create_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err("reservation store unavailable".into());
        }
        let id = reservation.id.to_string();
        self.reservations
            .write()
            .await
            .insert(id.clone(), reservation.clone());
        Ok(id)
    }
}
