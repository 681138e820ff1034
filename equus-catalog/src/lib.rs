pub mod service;
pub mod pricing;

pub use service::{
    AdditionalBenefit, CatalogError, HorseRecord, JourneyRecord, PriceUnit, ServiceRecord,
    ServiceType,
};
pub use pricing::{DurationCalculator, PriceQuote, PricingEngine, PricingInput};
