use crate::draft::{filled, ReservationDraft};
use crate::steps::FlowStep;
use crate::validation::ValidationErrors;
use chrono::{DateTime, Utc};
use equus_catalog::{PriceUnit, ServiceType};
use serde::{Deserialize, Serialize};

/// One row of the required-field table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRule {
    pub name: String,
    pub step: FlowStep,
    pub condition: RuleCondition,
    pub requirements: Vec<Requirement>,
    pub priority: i32,
    pub is_active: bool,
}

/// When a rule applies to a draft
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCondition {
    Always,
    ServiceTypeIn { service_types: Vec<ServiceType> },
    DurationBilled,
    /// An on-site benefit is selected on one of these services
    OnSiteBenefit { service_types: Vec<ServiceType> },
}

impl RuleCondition {
    pub fn matches(&self, draft: &ReservationDraft, markers: &OnSiteMarkers) -> bool {
        match self {
            RuleCondition::Always => true,
            RuleCondition::ServiceTypeIn { service_types } => {
                service_types.contains(&draft.service_type)
            }
            RuleCondition::DurationBilled => draft.price_unit.is_duration_billed(),
            RuleCondition::OnSiteBenefit { service_types } => {
                service_types.contains(&draft.service_type)
                    && draft
                        .additional_benefits
                        .iter()
                        .any(|b| markers.matches(&b.name))
            }
        }
    }

    /// Whether the rule can ever apply to this service, before any user input
    pub fn may_apply(&self, service_type: ServiceType, price_unit: PriceUnit) -> bool {
        match self {
            RuleCondition::Always => true,
            RuleCondition::ServiceTypeIn { service_types }
            | RuleCondition::OnSiteBenefit { service_types } => {
                service_types.contains(&service_type)
            }
            RuleCondition::DurationBilled => price_unit.is_duration_billed(),
        }
    }
}

/// A single field check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Horses,
    Horse,
    CompetitionType,
    JourneyRef,
    Participants,
    ProjectDescription,
    LocationLink,
    Guests,
    AccommodationType,
    StartLocation,
    EndLocation,
    StartDate,
    EndDate,
    EndAfterStart,
    StartNotPast,
    ProvidedAddress,
    Quantity,
}

impl Requirement {
    pub fn field(self) -> &'static str {
        match self {
            Requirement::Horses => "horses",
            Requirement::Horse => "horse",
            Requirement::CompetitionType => "eventDetails.competitionType",
            Requirement::JourneyRef => "tripDetails.journeyRef",
            Requirement::Participants => "tripDetails.numberOfParticipants",
            Requirement::ProjectDescription => "projectDetails.description",
            Requirement::LocationLink => "locationLink",
            Requirement::Guests => "housingDetails.numberOfGuests",
            Requirement::AccommodationType => "housingDetails.accommodationType",
            Requirement::StartLocation => "locations.startLocation",
            Requirement::EndLocation => "locations.endLocation",
            Requirement::StartDate | Requirement::StartNotPast => "startDate",
            Requirement::EndDate | Requirement::EndAfterStart => "endDate",
            Requirement::ProvidedAddress => "providedAddress",
            Requirement::Quantity => "quantity",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Requirement::Horses => "at least one horse required",
            Requirement::Horse => "horse required",
            Requirement::CompetitionType => "competition type required",
            Requirement::JourneyRef => "journey required",
            Requirement::Participants => "at least one participant required",
            Requirement::ProjectDescription => "description required",
            Requirement::LocationLink => "location link required",
            Requirement::Guests => "at least one guest required",
            Requirement::AccommodationType => "accommodation type required",
            Requirement::StartLocation => "start location required",
            Requirement::EndLocation => "end location required",
            Requirement::StartDate => "start date required",
            Requirement::EndDate => "end date required",
            Requirement::EndAfterStart => "end date must be after start",
            Requirement::StartNotPast => "start date cannot be in the past",
            Requirement::ProvidedAddress => "address required when on-site service selected",
            Requirement::Quantity => "quantity must be at least 1",
        }
    }

    /// Checks whose outcome depends on the clock rather than on the draft alone
    pub fn is_time_relative(self) -> bool {
        matches!(self, Requirement::StartNotPast)
    }

    pub fn is_satisfied(self, draft: &ReservationDraft, now: DateTime<Utc>) -> bool {
        match self {
            Requirement::Horses => draft.selected_horses().next().is_some(),
            Requirement::Horse => filled(draft.horse.as_ref()).is_some(),
            Requirement::CompetitionType => draft
                .event_details
                .as_ref()
                .and_then(|e| filled(e.competition_type.as_ref()))
                .is_some(),
            Requirement::JourneyRef => draft
                .trip_details
                .as_ref()
                .and_then(|t| filled(t.journey_ref.as_ref()))
                .is_some(),
            Requirement::Participants => draft
                .trip_details
                .as_ref()
                .is_some_and(|t| t.number_of_participants >= 1),
            Requirement::ProjectDescription => draft
                .project_details
                .as_ref()
                .and_then(|p| filled(p.description.as_ref()))
                .is_some(),
            Requirement::LocationLink => filled(draft.location_link.as_ref()).is_some(),
            Requirement::Guests => draft
                .housing_details
                .as_ref()
                .is_some_and(|h| h.number_of_guests >= 1),
            Requirement::AccommodationType => draft
                .housing_details
                .as_ref()
                .and_then(|h| filled(h.accommodation_type.as_ref()))
                .is_some(),
            Requirement::StartLocation => draft
                .locations
                .as_ref()
                .and_then(|l| filled(l.start_location.as_ref()))
                .is_some(),
            Requirement::EndLocation => draft
                .locations
                .as_ref()
                .and_then(|l| filled(l.end_location.as_ref()))
                .is_some(),
            Requirement::StartDate => draft.start_date.is_some(),
            Requirement::EndDate => draft.end_date.is_some(),
            // Missing bounds are reported by StartDate/EndDate
            Requirement::EndAfterStart => match (draft.start_date, draft.end_date) {
                (Some(start), Some(end)) => end > start,
                _ => true,
            },
            Requirement::StartNotPast => draft.start_date.map_or(true, |start| start >= now),
            Requirement::ProvidedAddress => draft
                .provided_address
                .as_ref()
                .is_some_and(|a| !a.is_blank()),
            Requirement::Quantity => draft.quantity >= 1,
        }
    }
}

/// Benefit names that mean the provider travels to the horse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnSiteMarkers {
    markers: Vec<String>,
}

impl OnSiteMarkers {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.as_ref().trim().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    /// Case-insensitive substring match against the benefit name
    pub fn matches(&self, benefit_name: &str) -> bool {
        let name = benefit_name.to_lowercase();
        self.markers.iter().any(|m| name.contains(m.as_str()))
    }
}

impl Default for OnSiteMarkers {
    fn default() -> Self {
        Self::new(["go to horse home", "home visit", "on-site", "الذهاب إلى منزل الخيل"])
    }
}

/// Evaluates the required-field table against drafts
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<ValidationRule>,
    markers: OnSiteMarkers,
}

impl RuleEngine {
    pub fn new(rules: Vec<ValidationRule>, markers: OnSiteMarkers) -> Self {
        let mut rules = rules;
        rules.sort_by_key(|r| std::cmp::Reverse(r.priority));
        Self { rules, markers }
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn markers(&self) -> &OnSiteMarkers {
        &self.markers
    }

    /// Requirements that apply to `draft` at `step`, in evaluation order
    pub fn applicable<'a>(
        &'a self,
        draft: &'a ReservationDraft,
        step: FlowStep,
    ) -> impl Iterator<Item = Requirement> + 'a {
        self.rules
            .iter()
            .filter(move |r| r.is_active && step.covers(r.step))
            .filter(move |r| r.condition.matches(draft, &self.markers))
            .flat_map(|r| r.requirements.iter().copied())
    }

    /// Check every applicable rule and collect all problems at once
    pub fn validate(
        &self,
        draft: &ReservationDraft,
        step: FlowStep,
        now: DateTime<Utc>,
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for requirement in self.applicable(draft, step) {
            if !requirement.is_satisfied(draft, now) {
                errors.add(requirement.field(), requirement.message());
            }
        }
        errors
    }

    /// Ordered wizard steps for a service; steps without any rule for it are skipped
    pub fn steps_for(&self, service_type: ServiceType, price_unit: PriceUnit) -> Vec<FlowStep> {
        FlowStep::ORDER
            .into_iter()
            .filter(|step| {
                step.is_always_shown()
                    || self.rules.iter().any(|r| {
                        r.is_active && r.step == *step && r.condition.may_apply(service_type, price_unit)
                    })
            })
            .collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(get_default_rules(), OnSiteMarkers::default())
    }
}

fn rule(
    name: &str,
    step: FlowStep,
    condition: RuleCondition,
    requirements: Vec<Requirement>,
) -> ValidationRule {
    ValidationRule {
        name: name.to_string(),
        step,
        condition,
        requirements,
        priority: 100,
        is_active: true,
    }
}

pub fn get_default_rules() -> Vec<ValidationRule> {
    use Requirement::*;

    vec![
        rule(
            "Stable horses",
            FlowStep::Horses,
            RuleCondition::ServiceTypeIn { service_types: vec![ServiceType::HorseStable] },
            vec![Horses],
        ),
        rule(
            "Single horse services",
            FlowStep::Horses,
            RuleCondition::ServiceTypeIn { service_types: ServiceType::SINGLE_HORSE.to_vec() },
            vec![Horse],
        ),
        rule(
            "Competition details",
            FlowStep::Details,
            RuleCondition::ServiceTypeIn { service_types: vec![ServiceType::Competitions] },
            vec![CompetitionType],
        ),
        rule(
            "Trip details",
            FlowStep::Details,
            RuleCondition::ServiceTypeIn { service_types: vec![ServiceType::TripCoordinator] },
            vec![JourneyRef, Participants],
        ),
        rule(
            "Project brief",
            FlowStep::Details,
            RuleCondition::ServiceTypeIn { service_types: ServiceType::PROJECT_BASED.to_vec() },
            vec![ProjectDescription],
        ),
        rule(
            "Photography location",
            FlowStep::Details,
            RuleCondition::ServiceTypeIn {
                service_types: vec![ServiceType::PhotographyServices],
            },
            vec![LocationLink],
        ),
        rule(
            "Housing details",
            FlowStep::Details,
            RuleCondition::ServiceTypeIn { service_types: vec![ServiceType::Housing] },
            vec![Guests, AccommodationType],
        ),
        rule(
            "Transport route",
            FlowStep::Details,
            RuleCondition::ServiceTypeIn { service_types: vec![ServiceType::HorseTransport] },
            vec![StartLocation, EndLocation],
        ),
        rule(
            "Billed schedule",
            FlowStep::Schedule,
            RuleCondition::DurationBilled,
            vec![StartDate, EndDate, EndAfterStart, StartNotPast],
        ),
        // Dates are optional for project billing but must still be coherent when given
        rule(
            "Supplied dates",
            FlowStep::Extras,
            RuleCondition::Always,
            vec![EndAfterStart, StartNotPast],
        ),
        rule(
            "On-site visit address",
            FlowStep::Extras,
            RuleCondition::OnSiteBenefit { service_types: ServiceType::ON_SITE_CAPABLE.to_vec() },
            vec![ProvidedAddress],
        ),
        rule("Quantity", FlowStep::Extras, RuleCondition::Always, vec![Quantity]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{EventDetails, HousingDetails, ProjectDetails, TransportLocations, TripDetails};
    use chrono::TimeZone;
    use equus_catalog::AdditionalBenefit;
    use equus_shared::Masked;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap()
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn draft(service_type: ServiceType, price_unit: PriceUnit) -> ReservationDraft {
        ReservationDraft {
            service_ref: "svc-1".to_string(),
            service_type,
            price_unit,
            unit_price: 100,
            ..Default::default()
        }
    }

    fn review(d: &ReservationDraft) -> ValidationErrors {
        RuleEngine::default().validate(d, FlowStep::Review, now())
    }

    #[test]
    fn test_stable_scenario_valid() {
        let mut d = draft(ServiceType::HorseStable, PriceUnit::PerDay);
        d.start_date = Some(at(1));
        d.end_date = Some(at(4));
        d.horses = vec!["horse-1".to_string()];
        assert!(review(&d).is_empty(), "{}", review(&d));
    }

    #[test]
    fn test_end_equal_to_start_flags_end_date() {
        let mut d = draft(ServiceType::HorseStable, PriceUnit::PerDay);
        d.start_date = Some(at(1));
        d.end_date = Some(at(1));
        d.horses = vec!["horse-1".to_string()];

        let errors = review(&d);
        assert_eq!(errors.len(), 1);
        assert!(errors.get("endDate").unwrap().contains("after start"));
    }

    #[test]
    fn test_all_problems_reported_at_once() {
        let d = draft(ServiceType::HorseStable, PriceUnit::PerDay);
        let errors = review(&d);
        assert!(errors.contains("horses"));
        assert!(errors.contains("startDate"));
        assert!(errors.contains("endDate"));
        assert_eq!(errors.get("endDate"), Some("end date required"));
    }

    #[test]
    fn test_start_in_past() {
        let mut d = draft(ServiceType::HorseTrainer, PriceUnit::PerHour);
        d.horse = Some("horse-1".to_string());
        d.start_date = Some(now() - chrono::Duration::hours(1));
        d.end_date = Some(now() + chrono::Duration::hours(1));
        assert_eq!(review(&d).get("startDate"), Some("start date cannot be in the past"));
    }

    #[test]
    fn test_photography_project_valid_without_dates() {
        let mut d = draft(ServiceType::PhotographyServices, PriceUnit::PerProject);
        d.project_details = Some(ProjectDetails {
            description: Some("wedding shoot".to_string()),
            deadline: None,
        });
        d.location_link = Some("https://maps.example/x".to_string());
        assert!(review(&d).is_empty());
    }

    #[test]
    fn test_photography_requires_link_and_description() {
        let d = draft(ServiceType::PhotographyServices, PriceUnit::PerProject);
        let errors = review(&d);
        assert_eq!(errors.get("locationLink"), Some("location link required"));
        assert_eq!(errors.get("projectDetails.description"), Some("description required"));
    }

    #[test]
    fn test_on_site_benefit_requires_address() {
        let mut d = draft(ServiceType::Veterinary, PriceUnit::PerProject);
        d.horse = Some("horse-1".to_string());
        d.select_benefit(AdditionalBenefit::new("Go to Horse Home", 150));

        let errors = review(&d);
        assert_eq!(
            errors.get("providedAddress"),
            Some("address required when on-site service selected")
        );

        d.provided_address = Some(Masked::from("  "));
        assert!(review(&d).contains("providedAddress"));

        d.provided_address = Some(Masked::from("Farm 12, Al Khobar"));
        assert!(review(&d).is_empty());
    }

    #[test]
    fn test_on_site_benefit_ignored_for_other_services() {
        let mut d = draft(ServiceType::HorseTrainer, PriceUnit::PerProject);
        d.horse = Some("horse-1".to_string());
        d.select_benefit(AdditionalBenefit::new("Go to Horse Home", 150));
        assert!(review(&d).is_empty());
    }

    #[test]
    fn test_arabic_on_site_marker() {
        let markers = OnSiteMarkers::default();
        assert!(markers.matches("الذهاب إلى منزل الخيل"));
        assert!(markers.matches("Home Visit (weekends)"));
        assert!(!markers.matches("Vaccination pack"));
    }

    #[test]
    fn test_horse_required_exactly_for_single_horse_services() {
        for service_type in ServiceType::ALL {
            let d = draft(service_type, PriceUnit::PerProject);
            let errors = review(&d);
            if service_type.is_single_horse() {
                assert_eq!(errors.get("horse"), Some("horse required"), "{}", service_type);
                assert_eq!(errors.fields().filter(|f| *f == "horse").count(), 1);
            } else {
                assert!(!errors.contains("horse"), "{}", service_type);
            }
        }
    }

    #[test]
    fn test_type_specific_details() {
        let mut comp = draft(ServiceType::Competitions, PriceUnit::PerProject);
        assert!(review(&comp).contains("eventDetails.competitionType"));
        comp.event_details = Some(EventDetails {
            competition_type: Some("show_jumping".to_string()),
            event_name: None,
        });
        assert!(review(&comp).is_empty());

        let mut trip = draft(ServiceType::TripCoordinator, PriceUnit::PerProject);
        trip.trip_details = Some(TripDetails {
            journey_ref: Some("journey-1".to_string()),
            number_of_participants: 0,
        });
        let errors = review(&trip);
        assert!(!errors.contains("tripDetails.journeyRef"));
        assert!(errors.contains("tripDetails.numberOfParticipants"));

        let mut housing = draft(ServiceType::Housing, PriceUnit::PerProject);
        housing.housing_details = Some(HousingDetails {
            number_of_guests: 2,
            accommodation_type: None,
        });
        assert_eq!(review(&housing).fields().collect::<Vec<_>>(), vec!["housingDetails.accommodationType"]);

        let mut transport = draft(ServiceType::HorseTransport, PriceUnit::PerProject);
        transport.horse = Some("horse-1".to_string());
        transport.locations = Some(TransportLocations {
            start_location: Some("Riyadh".to_string()),
            end_location: None,
        });
        assert_eq!(review(&transport).fields().collect::<Vec<_>>(), vec!["locations.endLocation"]);
    }

    #[test]
    fn test_step_scoped_validation() {
        let d = draft(ServiceType::HorseStable, PriceUnit::PerDay);
        let engine = RuleEngine::default();

        let horses = engine.validate(&d, FlowStep::Horses, now());
        assert_eq!(horses.fields().collect::<Vec<_>>(), vec!["horses"]);

        let extras = engine.validate(&d, FlowStep::Extras, now());
        assert!(extras.is_empty());
    }

    #[test]
    fn test_zero_quantity() {
        let mut d = draft(ServiceType::Suppliers, PriceUnit::PerProject);
        d.quantity = 0;
        assert_eq!(review(&d).get("quantity"), Some("quantity must be at least 1"));
    }

    #[test]
    fn test_steps_for_service() {
        let engine = RuleEngine::default();
        assert_eq!(
            engine.steps_for(ServiceType::HorseStable, PriceUnit::PerDay),
            vec![FlowStep::Horses, FlowStep::Schedule, FlowStep::Extras, FlowStep::Review]
        );
        assert_eq!(
            engine.steps_for(ServiceType::PhotographyServices, PriceUnit::PerProject),
            vec![FlowStep::Details, FlowStep::Extras, FlowStep::Review]
        );
        assert_eq!(
            engine.steps_for(ServiceType::HorseTransport, PriceUnit::PerHour),
            FlowStep::ORDER.to_vec()
        );
    }

    #[test]
    fn test_project_billing_rejects_inverted_dates() {
        let mut d = draft(ServiceType::PhotographyServices, PriceUnit::PerProject);
        d.project_details = Some(ProjectDetails {
            description: Some("wedding shoot".to_string()),
            deadline: None,
        });
        d.location_link = Some("https://maps.example/x".to_string());
        d.start_date = Some(at(4));
        d.end_date = Some(at(1));

        let errors = review(&d);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["endDate"]);
        assert_eq!(errors.get("endDate"), Some("end date must be after start"));

        d.start_date = Some(now() - chrono::Duration::days(1));
        d.end_date = None;
        assert_eq!(review(&d).get("startDate"), Some("start date cannot be in the past"));

        d.start_date = None;
        assert!(review(&d).is_empty());
    }

    #[test]
    fn test_extreme_priorities_sort_without_overflow() {
        let mut rules = get_default_rules();
        rules[0].priority = i32::MIN;
        rules[1].priority = i32::MAX;
        let first = rules[1].name.clone();
        let last = rules[0].name.clone();

        let engine = RuleEngine::new(rules, OnSiteMarkers::default());
        assert_eq!(engine.rules().first().map(|r| r.name.as_str()), Some(first.as_str()));
        assert_eq!(engine.rules().last().map(|r| r.name.as_str()), Some(last.as_str()));
    }

    #[test]
    fn test_inactive_rule_skipped() {
        let mut rules = get_default_rules();
        for r in rules.iter_mut().filter(|r| r.name == "Single horse services") {
            r.is_active = false;
        }
        let engine = RuleEngine::new(rules, OnSiteMarkers::default());
        let d = draft(ServiceType::Veterinary, PriceUnit::PerProject);
        assert!(engine.validate(&d, FlowStep::Review, now()).is_empty());
    }
}
