pub mod assembler;
pub mod draft;
pub mod models;
pub mod rules;
pub mod session;
pub mod steps;
pub mod validation;

pub use assembler::{Assembler, AssemblyError};
pub use draft::{EventDetails, HousingDetails, ProjectDetails, ReservationDraft, TransportLocations, TripDetails};
pub use models::{PaymentStatus, Reservation, ReservationItem, ReservationStatus};
pub use rules::{get_default_rules, OnSiteMarkers, Requirement, RuleCondition, RuleEngine, ValidationRule};
pub use session::{BookingPolicy, BookingSession, SessionError};
pub use steps::FlowStep;
pub use validation::ValidationErrors;
