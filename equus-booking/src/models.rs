use equus_catalog::{AdditionalBenefit, PriceUnit, PricingEngine, ServiceType};
use equus_shared::{Masked, Reference};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reservation status. Only `Pending` is ever written here; the rest belong to
/// downstream processing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// A submitted reservation as it is written to the store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub user: Reference,
    pub items: Vec<ReservationItem>,
    pub total_price: i64,
    pub currency: String,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    pub created_at: String,
}

impl Reservation {
    /// Recompute the total from the stored line fields
    pub fn rederive_total(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.rederive_total()))
    }

    pub fn service_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.service.id.clone()).collect()
    }
}

/// One booked service, frozen at submission time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationItem {
    pub service: Reference,
    pub service_type: ServiceType,
    pub price_unit: PriceUnit,
    pub unit_price: i64,
    pub duration_units: u32,
    pub quantity: u32,
    pub line_total: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_benefits: Vec<AdditionalBenefit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horse: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub horses: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub housing_details: Option<HousingRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<LocationsRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_details: Option<EventRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_details: Option<TripRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_details: Option<ProjectRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Masked<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provided_address: Option<Masked<String>>,
}

impl ReservationItem {
    pub fn rederive_total(&self) -> i64 {
        PricingEngine::accumulate(
            self.unit_price,
            self.duration_units,
            self.quantity,
            self.additional_benefits.iter().map(|b| b.surcharge),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HousingRecord {
    pub number_of_guests: u32,
    pub accommodation_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocationsRecord {
    pub start_location: String,
    pub end_location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub competition_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    pub journey: Reference,
    pub number_of_participants: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}
