use crate::assembler::{Assembler, AssemblyError};
use crate::draft::ReservationDraft;
use crate::models::Reservation;
use crate::rules::RuleEngine;
use crate::steps::FlowStep;
use crate::validation::ValidationErrors;
use chrono::{DateTime, Utc};
use equus_catalog::{CatalogError, PriceQuote, PricingEngine, ServiceRecord};
use equus_shared::Reference;
use std::sync::Arc;
use tracing::{debug, warn};

/// Rules and settings every booking session shares
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    pub rules: RuleEngine,
    pub currency: String,
}

impl BookingPolicy {
    pub fn new(rules: RuleEngine, currency: impl Into<String>) -> Self {
        Self {
            rules,
            currency: currency.into(),
        }
    }

    pub fn assembler(&self) -> Assembler<'_> {
        Assembler::new(&self.rules, &self.currency)
    }
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self::new(RuleEngine::default(), "SAR")
    }
}

/// Owns one customer's draft for the lifetime of a booking flow
pub struct BookingSession {
    policy: Arc<BookingPolicy>,
    service: ServiceRecord,
    draft: ReservationDraft,
    steps: Vec<FlowStep>,
    position: usize,
}

impl BookingSession {
    /// Start an empty flow for a catalog service
    pub fn open(policy: Arc<BookingPolicy>, service: ServiceRecord) -> Result<Self, SessionError> {
        service.ensure_bookable()?;
        let draft = ReservationDraft::for_service(&service);
        Ok(Self::with_draft(policy, service, draft))
    }

    /// Continue a flow from a draft the client sent back.
    ///
    /// Service tags, unit price and benefit surcharges are re-read from the
    /// catalog record; only the customer's own input is taken from the draft.
    pub fn resume(
        policy: Arc<BookingPolicy>,
        service: ServiceRecord,
        mut draft: ReservationDraft,
    ) -> Result<Self, SessionError> {
        service.ensure_bookable()?;

        if !draft.service_ref.is_empty() && draft.service_ref != service.id {
            return Err(SessionError::ServiceMismatch {
                draft: draft.service_ref,
                service: service.id,
            });
        }
        draft.stamp_service(&service);

        let requested = std::mem::take(&mut draft.additional_benefits);
        for selected in requested {
            let offered = service
                .benefit(&selected.name)
                .ok_or_else(|| SessionError::UnknownBenefit {
                    service_id: service.id.clone(),
                    name: selected.name.clone(),
                })?;
            draft.select_benefit(offered.clone());
        }

        Ok(Self::with_draft(policy, service, draft))
    }

    fn with_draft(policy: Arc<BookingPolicy>, service: ServiceRecord, draft: ReservationDraft) -> Self {
        let steps = policy.rules.steps_for(service.service_type, service.price_unit);
        Self {
            policy,
            service,
            draft,
            steps,
            position: 0,
        }
    }

    pub fn draft(&self) -> &ReservationDraft {
        &self.draft
    }

    pub fn service(&self) -> &ServiceRecord {
        &self.service
    }

    /// Apply a customer edit and return the refreshed price
    pub fn update<F>(&mut self, edit: F) -> PriceQuote
    where
        F: FnOnce(&mut ReservationDraft),
    {
        edit(&mut self.draft);
        // The customer never edits catalog-owned fields
        self.draft.stamp_service(&self.service);
        self.quote()
    }

    /// Tick or untick one of the service's benefits
    pub fn toggle_benefit(&mut self, name: &str) -> Result<PriceQuote, SessionError> {
        let benefit = self
            .service
            .benefit(name)
            .cloned()
            .ok_or_else(|| SessionError::UnknownBenefit {
                service_id: self.service.id.clone(),
                name: name.to_string(),
            })?;
        self.draft.toggle_benefit(benefit);
        Ok(self.quote())
    }

    pub fn quote(&self) -> PriceQuote {
        let quote = PricingEngine::quote(&self.draft.pricing_input());
        debug!(
            "Quoted {} for service {}: {} x {} x {} + {}",
            quote.total, self.service.id, quote.unit_price, quote.units, quote.quantity, quote.benefits_total
        );
        quote
    }

    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    pub fn current_step(&self) -> FlowStep {
        self.steps
            .get(self.position)
            .copied()
            .unwrap_or(FlowStep::Review)
    }

    pub fn validate_current(&self, now: DateTime<Utc>) -> ValidationErrors {
        self.policy.rules.validate(&self.draft, self.current_step(), now)
    }

    pub fn validate_all(&self, now: DateTime<Utc>) -> ValidationErrors {
        self.policy.rules.validate(&self.draft, FlowStep::Review, now)
    }

    /// Move to the next step if the current one is complete. The last step stays put.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<FlowStep, ValidationErrors> {
        let errors = self.validate_current(now);
        if !errors.is_empty() {
            debug!("Step {} blocked for service {}: {}", self.current_step(), self.service.id, errors);
            return Err(errors);
        }
        if self.position + 1 < self.steps.len() {
            self.position += 1;
        }
        debug!("Advanced to step {} for service {}", self.current_step(), self.service.id);
        Ok(self.current_step())
    }

    pub fn back(&mut self) -> FlowStep {
        self.position = self.position.saturating_sub(1);
        self.current_step()
    }

    /// Full validation, consuming the session
    pub fn into_validated(self, now: DateTime<Utc>) -> Result<ReservationDraft, SessionError> {
        let errors = self.validate_all(now);
        if !errors.is_empty() {
            warn!("Rejected reservation draft for service {}: {}", self.service.id, errors);
            return Err(SessionError::Invalid(errors));
        }
        Ok(self.draft)
    }

    /// Validate and assemble the reservation record for this flow
    pub fn finish(self, user: &Reference, now: DateTime<Utc>) -> Result<Reservation, SessionError> {
        let policy = Arc::clone(&self.policy);
        let draft = self.into_validated(now)?;
        Ok(policy.assembler().assemble(&draft, user, now)?)
    }

    /// Validate every session and assemble them into one reservation
    pub fn finish_cart(
        sessions: Vec<BookingSession>,
        user: &Reference,
        now: DateTime<Utc>,
    ) -> Result<Reservation, SessionError> {
        let policy = sessions
            .first()
            .map(|s| Arc::clone(&s.policy))
            .ok_or(SessionError::Assembly(AssemblyError::EmptyCart))?;

        let drafts = sessions
            .into_iter()
            .map(|s| s.into_validated(now))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(policy.assembler().assemble_all(&drafts, user, now)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Draft is for service {draft}, but catalog record is {service}")]
    ServiceMismatch { draft: String, service: String },

    #[error("Benefit not offered by service {service_id}: {name}")]
    UnknownBenefit { service_id: String, name: String },

    #[error("Reservation draft is invalid: {0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}
