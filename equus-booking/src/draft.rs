use chrono::{DateTime, Utc};
use equus_catalog::{AdditionalBenefit, PriceUnit, PricingInput, ServiceRecord, ServiceType};
use equus_shared::Masked;
use serde::{Deserialize, Serialize};

/// Guests and room type for a housing booking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HousingDetails {
    pub number_of_guests: u32,
    pub accommodation_type: Option<String>,
}

/// Pick-up and drop-off points for horse transport
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportLocations {
    pub start_location: Option<String>,
    pub end_location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDetails {
    pub competition_type: Option<String>,
    pub event_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TripDetails {
    pub journey_ref: Option<String>,
    pub number_of_participants: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDetails {
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

/// The in-progress booking a customer edits step by step.
///
/// `service_ref`, `service_type`, `price_unit` and `unit_price` mirror the
/// catalog record the flow was opened for; everything else is user input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationDraft {
    pub service_ref: String,
    pub service_type: ServiceType,
    pub price_unit: PriceUnit,
    pub unit_price: i64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub horse: Option<String>,
    pub horses: Vec<String>,
    pub additional_benefits: Vec<AdditionalBenefit>,
    pub quantity: u32,
    pub housing_details: Option<HousingDetails>,
    pub locations: Option<TransportLocations>,
    pub event_details: Option<EventDetails>,
    pub trip_details: Option<TripDetails>,
    pub project_details: Option<ProjectDetails>,
    pub location_link: Option<String>,
    pub notes: Option<Masked<String>>,
    pub provided_address: Option<Masked<String>>,
}

impl Default for ReservationDraft {
    fn default() -> Self {
        Self {
            service_ref: String::new(),
            service_type: ServiceType::default(),
            price_unit: PriceUnit::default(),
            unit_price: 0,
            start_date: None,
            end_date: None,
            horse: None,
            horses: Vec::new(),
            additional_benefits: Vec::new(),
            quantity: 1,
            housing_details: None,
            locations: None,
            event_details: None,
            trip_details: None,
            project_details: None,
            location_link: None,
            notes: None,
            provided_address: None,
        }
    }
}

impl ReservationDraft {
    /// Empty draft for a catalog service
    pub fn for_service(service: &ServiceRecord) -> Self {
        let mut draft = Self::default();
        draft.stamp_service(service);
        draft
    }

    /// Overwrite the catalog-owned fields with the record's current values
    pub fn stamp_service(&mut self, service: &ServiceRecord) {
        self.service_ref = service.id.clone();
        self.service_type = service.service_type;
        self.price_unit = service.price_unit;
        self.unit_price = service.price;
    }

    /// Add a benefit unless one with the same name is already selected.
    /// Returns whether the list changed.
    pub fn select_benefit(&mut self, benefit: AdditionalBenefit) -> bool {
        if self.has_benefit(&benefit.name) {
            return false;
        }
        self.additional_benefits.push(benefit);
        true
    }

    pub fn deselect_benefit(&mut self, name: &str) -> bool {
        let before = self.additional_benefits.len();
        self.additional_benefits.retain(|b| b.name != name);
        before != self.additional_benefits.len()
    }

    /// Checkbox behaviour: select if absent, deselect if present.
    /// Returns whether the benefit is selected afterwards.
    pub fn toggle_benefit(&mut self, benefit: AdditionalBenefit) -> bool {
        if self.deselect_benefit(&benefit.name) {
            false
        } else {
            self.additional_benefits.push(benefit);
            true
        }
    }

    pub fn has_benefit(&self, name: &str) -> bool {
        self.additional_benefits.iter().any(|b| b.name == name)
    }

    /// Horses chosen for the booking, blank entries dropped
    pub fn selected_horses(&self) -> impl Iterator<Item = &str> {
        self.horses
            .iter()
            .map(String::as_str)
            .filter(|h| !h.trim().is_empty())
    }

    pub fn pricing_input(&self) -> PricingInput<'_> {
        PricingInput {
            unit_price: self.unit_price,
            price_unit: self.price_unit,
            start: self.start_date,
            end: self.end_date,
            quantity: self.quantity,
            benefits: &self.additional_benefits,
        }
    }
}

/// `Some` non-blank text
pub(crate) fn filled(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}
