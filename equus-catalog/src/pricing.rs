use crate::service::{AdditionalBenefit, PriceUnit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Converts a booked time window into a count of billing units
pub struct DurationCalculator;

impl DurationCalculator {
    /// Ceiling-rounded count of `unit` intervals between `start` and `end`.
    ///
    /// Units that are not billed by time count as one. A missing bound or an
    /// empty/inverted window also counts as one so the multiplier is never zero.
    pub fn units(
        unit: PriceUnit,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> u32 {
        let Some(interval) = unit.interval_ms() else {
            return 1;
        };
        let (Some(start), Some(end)) = (start, end) else {
            return 1;
        };

        let elapsed = end.signed_duration_since(start).num_milliseconds();
        if elapsed <= 0 {
            return 1;
        }

        let units = elapsed / interval + i64::from(elapsed % interval != 0);
        u32::try_from(units).unwrap_or(u32::MAX).max(1)
    }
}

/// Everything the price of one service line depends on
#[derive(Debug, Clone)]
pub struct PricingInput<'a> {
    pub unit_price: i64,
    pub price_unit: PriceUnit,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub quantity: u32,
    pub benefits: &'a [AdditionalBenefit],
}

/// Price breakdown shown in the booking preview and frozen into the reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub unit_price: i64,
    pub price_unit: PriceUnit,
    pub units: u32,
    pub quantity: u32,
    pub base_total: i64,
    pub benefits_total: i64,
    pub total: i64,
}

/// Single source of reservation totals, shared by the live preview and submission
pub struct PricingEngine;

impl PricingEngine {
    /// `max(0, unit_price × units × quantity + Σ surcharges)`
    pub fn accumulate<I>(unit_price: i64, units: u32, quantity: u32, surcharges: I) -> i64
    where
        I: IntoIterator<Item = i64>,
    {
        let base = Self::base_total(unit_price, units, quantity);
        let extras = Self::surcharge_total(surcharges);
        base.saturating_add(extras).max(0)
    }

    pub fn quote(input: &PricingInput<'_>) -> PriceQuote {
        let units = DurationCalculator::units(input.price_unit, input.start, input.end);
        let quantity = input.quantity.max(1);
        let base_total = Self::base_total(input.unit_price, units, quantity);
        let benefits_total = Self::surcharge_total(input.benefits.iter().map(|b| b.surcharge));

        PriceQuote {
            unit_price: input.unit_price,
            price_unit: input.price_unit,
            units,
            quantity,
            base_total,
            benefits_total,
            total: base_total.saturating_add(benefits_total).max(0),
        }
    }

    fn base_total(unit_price: i64, units: u32, quantity: u32) -> i64 {
        unit_price
            .max(0)
            .saturating_mul(i64::from(units.max(1)))
            .saturating_mul(i64::from(quantity.max(1)))
    }

    fn surcharge_total<I>(surcharges: I) -> i64
    where
        I: IntoIterator<Item = i64>,
    {
        surcharges.into_iter().fold(0i64, |acc, s| acc.saturating_add(s))
    }
}
