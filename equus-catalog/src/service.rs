use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Service categories offered on the marketplace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceType {
    HorseStable,
    Veterinary,
    HorseCatering,
    HorseTransport,
    HoofTrimmer,
    HorseGrooming,
    HorseTrainer,
    Competitions,
    Housing,
    TripCoordinator,
    PhotographyServices,
    ConsultingServices,
    MarketingPromotion,
    EventCommentary,
    EventJudging,
    Contractors,
    Suppliers,
    /// A catalog tag this service does not know about. No type-specific rules apply.
    #[default]
    Other,
}

impl ServiceType {
    pub const ALL: [ServiceType; 18] = [
        ServiceType::HorseStable,
        ServiceType::Veterinary,
        ServiceType::HorseCatering,
        ServiceType::HorseTransport,
        ServiceType::HoofTrimmer,
        ServiceType::HorseGrooming,
        ServiceType::HorseTrainer,
        ServiceType::Competitions,
        ServiceType::Housing,
        ServiceType::TripCoordinator,
        ServiceType::PhotographyServices,
        ServiceType::ConsultingServices,
        ServiceType::MarketingPromotion,
        ServiceType::EventCommentary,
        ServiceType::EventJudging,
        ServiceType::Contractors,
        ServiceType::Suppliers,
        ServiceType::Other,
    ];

    /// Services booked for exactly one horse
    pub const SINGLE_HORSE: [ServiceType; 6] = [
        ServiceType::Veterinary,
        ServiceType::HorseCatering,
        ServiceType::HorseTransport,
        ServiceType::HoofTrimmer,
        ServiceType::HorseGrooming,
        ServiceType::HorseTrainer,
    ];

    /// Services priced and described as a project brief
    pub const PROJECT_BASED: [ServiceType; 6] = [
        ServiceType::PhotographyServices,
        ServiceType::ConsultingServices,
        ServiceType::MarketingPromotion,
        ServiceType::EventCommentary,
        ServiceType::EventJudging,
        ServiceType::Contractors,
    ];

    /// Services whose provider can travel to the horse
    pub const ON_SITE_CAPABLE: [ServiceType; 3] = [
        ServiceType::Veterinary,
        ServiceType::HoofTrimmer,
        ServiceType::HorseGrooming,
    ];

    pub fn is_single_horse(self) -> bool {
        Self::SINGLE_HORSE.contains(&self)
    }

    pub fn is_project_based(self) -> bool {
        Self::PROJECT_BASED.contains(&self)
    }

    pub fn supports_on_site_visit(self) -> bool {
        Self::ON_SITE_CAPABLE.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::HorseStable => "horse_stable",
            ServiceType::Veterinary => "veterinary",
            ServiceType::HorseCatering => "horse_catering",
            ServiceType::HorseTransport => "horse_transport",
            ServiceType::HoofTrimmer => "hoof_trimmer",
            ServiceType::HorseGrooming => "horse_grooming",
            ServiceType::HorseTrainer => "horse_trainer",
            ServiceType::Competitions => "competitions",
            ServiceType::Housing => "housing",
            ServiceType::TripCoordinator => "trip_coordinator",
            ServiceType::PhotographyServices => "photography_services",
            ServiceType::ConsultingServices => "consulting_services",
            ServiceType::MarketingPromotion => "marketing_promotion",
            ServiceType::EventCommentary => "event_commentary",
            ServiceType::EventJudging => "event_judging",
            ServiceType::Contractors => "contractors",
            ServiceType::Suppliers => "suppliers",
            ServiceType::Other => "other",
        }
    }

    /// Lenient parse used for catalog data: unknown tags become `Other`.
    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == tag)
            .unwrap_or(ServiceType::Other)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = CatalogError;

    /// Strict parse used for request paths.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownTag(s.to_string()))
    }
}

/// How a service's base price is billed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PriceUnit {
    PerHour,
    PerHalfHour,
    PerDay,
    #[default]
    PerProject,
    /// Any other catalog unit; billed like a project (one unit).
    Other,
}

impl PriceUnit {
    pub const ALL: [PriceUnit; 5] = [
        PriceUnit::PerHour,
        PriceUnit::PerHalfHour,
        PriceUnit::PerDay,
        PriceUnit::PerProject,
        PriceUnit::Other,
    ];

    /// Length of one billing unit in milliseconds, for duration-billed units.
    pub fn interval_ms(self) -> Option<i64> {
        match self {
            PriceUnit::PerHour => Some(3_600_000),
            PriceUnit::PerHalfHour => Some(1_800_000),
            PriceUnit::PerDay => Some(86_400_000),
            PriceUnit::PerProject | PriceUnit::Other => None,
        }
    }

    pub fn is_duration_billed(self) -> bool {
        self.interval_ms().is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriceUnit::PerHour => "per_hour",
            PriceUnit::PerHalfHour => "per_half_hour",
            PriceUnit::PerDay => "per_day",
            PriceUnit::PerProject => "per_project",
            PriceUnit::Other => "other",
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|u| u.as_str() == tag)
            .unwrap_or(PriceUnit::Other)
    }
}

impl fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! tag_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let tag = String::deserialize(deserializer)?;
                Ok(<$ty>::from_tag(&tag))
            }
        }
    };
}

tag_serde!(ServiceType);
tag_serde!(PriceUnit);

/// Optional add-on a provider sells with a service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdditionalBenefit {
    pub name: String,
    /// Absent when a client sends only the benefit name
    #[serde(default, alias = "price")]
    pub surcharge: i64,
}

impl AdditionalBenefit {
    pub fn new(name: impl Into<String>, surcharge: i64) -> Self {
        Self {
            name: name.into(),
            surcharge,
        }
    }
}

/// A bookable service as published in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: String,
    pub name: String,
    /// Base price per billing unit, in the smallest currency unit the catalog uses
    pub price: i64,
    pub price_unit: PriceUnit,
    pub service_type: ServiceType,
    #[serde(default)]
    pub additional_benefits: Vec<AdditionalBenefit>,
    #[serde(default)]
    pub provider_ref: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ServiceRecord {
    pub fn ensure_bookable(&self) -> Result<(), CatalogError> {
        if !self.is_active {
            return Err(CatalogError::Inactive(self.id.clone()));
        }
        if self.price < 0 {
            return Err(CatalogError::InvalidPrice {
                service_id: self.id.clone(),
                price: self.price,
            });
        }
        Ok(())
    }

    /// Look up one of this service's benefits by name
    pub fn benefit(&self, name: &str) -> Option<&AdditionalBenefit> {
        self.additional_benefits.iter().find(|b| b.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub max_participants: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Service not found: {0}")]
    NotFound(String),

    #[error("Service is not accepting reservations: {0}")]
    Inactive(String),

    #[error("Service {service_id} has a negative price ({price})")]
    InvalidPrice { service_id: String, price: i64 },

    #[error("Unknown catalog tag: {0}")]
    UnknownTag(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_tags() {
        for t in ServiceType::ALL {
            assert_eq!(ServiceType::from_tag(t.as_str()), t);
        }
        assert_eq!(ServiceType::from_tag("falconry"), ServiceType::Other);
        assert!("falconry".parse::<ServiceType>().is_err());
        assert_eq!("horse_stable".parse::<ServiceType>().unwrap(), ServiceType::HorseStable);
    }

    #[test]
    fn test_service_groups() {
        assert!(ServiceType::HorseTransport.is_single_horse());
        assert!(!ServiceType::HorseStable.is_single_horse());
        assert!(ServiceType::EventJudging.is_project_based());
        assert!(ServiceType::HoofTrimmer.supports_on_site_visit());
        assert!(!ServiceType::HorseTrainer.supports_on_site_visit());
    }

    #[test]
    fn test_service_record_from_catalog_json() {
        let record: ServiceRecord = serde_json::from_value(serde_json::json!({
            "id": "svc-1",
            "name": "Desert Stables",
            "price": 100,
            "priceUnit": "per_day",
            "serviceType": "horse_stable",
            "additionalBenefits": [{"name": "Daily turnout", "price": 20}]
        }))
        .unwrap();

        assert_eq!(record.price_unit, PriceUnit::PerDay);
        assert_eq!(record.service_type, ServiceType::HorseStable);
        assert_eq!(record.benefit("Daily turnout").unwrap().surcharge, 20);
        assert!(record.is_active);
        assert!(record.ensure_bookable().is_ok());
    }

    #[test]
    fn test_unknown_price_unit_is_not_duration_billed() {
        let unit: PriceUnit = serde_json::from_str("\"per_session\"").unwrap();
        assert_eq!(unit, PriceUnit::Other);
        assert!(!unit.is_duration_billed());
        assert_eq!(PriceUnit::PerHalfHour.interval_ms(), Some(1_800_000));
    }

    #[test]
    fn test_inactive_service_not_bookable() {
        let record = ServiceRecord {
            id: "svc-2".to_string(),
            name: "Closed".to_string(),
            price: 10,
            price_unit: PriceUnit::PerHour,
            service_type: ServiceType::HorseTrainer,
            additional_benefits: vec![],
            provider_ref: None,
            is_active: false,
        };
        assert!(matches!(record.ensure_bookable(), Err(CatalogError::Inactive(_))));
    }
}
