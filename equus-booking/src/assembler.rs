use crate::draft::{filled, ReservationDraft};
use crate::models::{
    EventRecord, HousingRecord, LocationsRecord, PaymentStatus, ProjectRecord, Reservation,
    ReservationItem, ReservationStatus, TripRecord,
};
use crate::rules::{Requirement, RuleEngine};
use crate::steps::FlowStep;
use chrono::{DateTime, Utc};
use equus_catalog::{PricingEngine, ServiceType};
use equus_shared::{to_iso_utc, Masked, Reference};
use uuid::Uuid;

/// Turns validated drafts into store-ready reservation records
pub struct Assembler<'a> {
    rules: &'a RuleEngine,
    currency: &'a str,
}

impl<'a> Assembler<'a> {
    pub fn new(rules: &'a RuleEngine, currency: &'a str) -> Self {
        Self { rules, currency }
    }

    /// Build a single-service reservation
    pub fn assemble(
        &self,
        draft: &ReservationDraft,
        user: &Reference,
        now: DateTime<Utc>,
    ) -> Result<Reservation, AssemblyError> {
        self.assemble_all(std::slice::from_ref(draft), user, now)
    }

    /// Build one reservation covering every draft in the cart. Nothing is
    /// returned unless every line assembles.
    pub fn assemble_all(
        &self,
        drafts: &[ReservationDraft],
        user: &Reference,
        now: DateTime<Utc>,
    ) -> Result<Reservation, AssemblyError> {
        if drafts.is_empty() {
            return Err(AssemblyError::EmptyCart);
        }
        if user.id.trim().is_empty() {
            return Err(AssemblyError::MissingField { field: "user".to_string() });
        }

        let items = drafts
            .iter()
            .map(|draft| self.assemble_item(draft, now))
            .collect::<Result<Vec<_>, _>>()?;

        let total_price = items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.line_total));

        Ok(Reservation {
            id: Uuid::new_v4(),
            user: user.clone(),
            items,
            total_price,
            currency: self.currency.to_string(),
            status: ReservationStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: to_iso_utc(&now),
        })
    }

    fn assemble_item(
        &self,
        draft: &ReservationDraft,
        now: DateTime<Utc>,
    ) -> Result<ReservationItem, AssemblyError> {
        if draft.service_ref.trim().is_empty() {
            return Err(AssemblyError::MissingField { field: "serviceRef".to_string() });
        }

        // Whether the start is still in the future was the validator's call
        for requirement in self.rules.applicable(draft, FlowStep::Review) {
            if requirement.is_time_relative() || requirement.is_satisfied(draft, now) {
                continue;
            }
            return Err(match requirement {
                Requirement::EndAfterStart => AssemblyError::InvalidSchedule,
                Requirement::Quantity => AssemblyError::InvalidQuantity(draft.quantity),
                other => AssemblyError::MissingField { field: other.field().to_string() },
            });
        }

        let quote = PricingEngine::quote(&draft.pricing_input());
        let service_type = draft.service_type;

        Ok(ReservationItem {
            service: Reference::new(draft.service_ref.trim()),
            service_type,
            price_unit: draft.price_unit,
            unit_price: quote.unit_price,
            duration_units: quote.units,
            quantity: quote.quantity,
            line_total: quote.total,
            additional_benefits: draft.additional_benefits.clone(),
            start_date: draft.start_date.as_ref().map(to_iso_utc),
            end_date: draft.end_date.as_ref().map(to_iso_utc),
            horse: if service_type.is_single_horse() {
                filled(draft.horse.as_ref()).map(Reference::new)
            } else {
                None
            },
            horses: if service_type == ServiceType::HorseStable {
                draft.selected_horses().map(Reference::new).collect()
            } else {
                Vec::new()
            },
            housing_details: Self::housing(draft),
            locations: Self::locations(draft),
            event_details: Self::event(draft),
            trip_details: Self::trip(draft),
            project_details: Self::project(draft),
            location_link: if service_type == ServiceType::PhotographyServices {
                filled(draft.location_link.as_ref()).map(str::to_string)
            } else {
                None
            },
            notes: Self::text(draft.notes.as_ref()),
            provided_address: Self::text(draft.provided_address.as_ref()),
        })
    }

    fn housing(draft: &ReservationDraft) -> Option<HousingRecord> {
        if draft.service_type != ServiceType::Housing {
            return None;
        }
        let details = draft.housing_details.as_ref()?;
        Some(HousingRecord {
            number_of_guests: details.number_of_guests,
            accommodation_type: filled(details.accommodation_type.as_ref())?.to_string(),
        })
    }

    fn locations(draft: &ReservationDraft) -> Option<LocationsRecord> {
        if draft.service_type != ServiceType::HorseTransport {
            return None;
        }
        let locations = draft.locations.as_ref()?;
        Some(LocationsRecord {
            start_location: filled(locations.start_location.as_ref())?.to_string(),
            end_location: filled(locations.end_location.as_ref())?.to_string(),
        })
    }

    fn event(draft: &ReservationDraft) -> Option<EventRecord> {
        if draft.service_type != ServiceType::Competitions {
            return None;
        }
        let event = draft.event_details.as_ref()?;
        Some(EventRecord {
            competition_type: filled(event.competition_type.as_ref())?.to_string(),
            event_name: filled(event.event_name.as_ref()).map(str::to_string),
        })
    }

    fn trip(draft: &ReservationDraft) -> Option<TripRecord> {
        if draft.service_type != ServiceType::TripCoordinator {
            return None;
        }
        let trip = draft.trip_details.as_ref()?;
        Some(TripRecord {
            journey: Reference::new(filled(trip.journey_ref.as_ref())?),
            number_of_participants: trip.number_of_participants,
        })
    }

    fn project(draft: &ReservationDraft) -> Option<ProjectRecord> {
        if !draft.service_type.is_project_based() {
            return None;
        }
        let project = draft.project_details.as_ref()?;
        Some(ProjectRecord {
            description: filled(project.description.as_ref())?.to_string(),
            deadline: project.deadline.as_ref().map(to_iso_utc),
        })
    }

    fn text(value: Option<&Masked<String>>) -> Option<Masked<String>> {
        value
            .filter(|v| !v.is_blank())
            .map(|v| Masked(v.expose().trim().to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("Cannot assemble reservation, missing required field: {field}")]
    MissingField { field: String },

    #[error("Cannot assemble reservation, end date is not after start date")]
    InvalidSchedule,

    #[error("Cannot assemble reservation, invalid quantity: {0}")]
    InvalidQuantity(u32),

    #[error("Cannot assemble reservation from an empty cart")]
    EmptyCart,
}
