#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Carbon footprint calculator.
//!
//! Maps a [`SurveyResponse`] to an [`EmissionBreakdown`] using static
//! emission-factor tables. The calculation is pure: no I/O, no shared
//! mutable state, and identical input always produces identical output, so
//! it can be called concurrently from any number of threads.
//!
//! There are two calculation paths:
//!
//! 1. **Enhanced** ([`enhanced`]): the comprehensive multi-source factor
//!    table, confidence 0.90.
//! 2. **Legacy** ([`legacy`]): a smaller EU-only factor set, confidence
//!    0.85.
//!
//! [`calculate`] tries the enhanced path first and retries once with the
//! legacy path if it fails. Only when both fail is an error returned.

pub mod comparison;
pub mod enhanced;
pub mod factors;
pub mod legacy;

pub use ecozync_calculator_models::{
    CalculationMethod, EmissionBreakdown, EmissionCategory, ImpactLevel, SurveyResponse,
};

use factors::{FactorCategory, FactorTable};
use thiserror::Error;

/// Assumed average electricity price used to turn a bill into kWh.
pub const PRICE_PER_KWH: f64 = 0.25;
/// Weeks per year used to annualise weekly distance.
pub const WEEKS_PER_YEAR: f64 = 52.0;
/// Share of car emissions attributed to a carpooling respondent.
pub const CARPOOL_MULTIPLIER: f64 = 0.5;
/// Assumed average distance of a short-haul flight, km.
pub const SHORT_HAUL_KM: f64 = 500.0;
/// Assumed average distance of a medium-haul flight, km.
pub const MEDIUM_HAUL_KM: f64 = 1500.0;
/// Assumed average distance of a long-haul flight, km.
pub const LONG_HAUL_KM: f64 = 8000.0;

/// Errors from the emission calculation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    /// The factor table has no entry for a required lookup.
    #[error("No emission factor for {category}/{key}")]
    MissingFactor {
        /// Category searched.
        category: FactorCategory,
        /// Key searched.
        key: &'static str,
    },

    /// A numeric survey field is negative or not finite.
    #[error("Invalid value for {field}: {value}")]
    InvalidInput {
        /// Offending field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A category evaluated to a value that cannot be reported.
    #[error("{category} emissions evaluated to {value}")]
    NonFinite {
        /// Category that failed.
        category: EmissionCategory,
        /// Raw value.
        value: f64,
    },

    /// The category values are too large for their sum to be reported.
    #[error("Total emissions exceed the representable range")]
    Overflow,

    /// Both the enhanced and the legacy calculation failed.
    #[error("Calculation failed (enhanced: {primary}; legacy: {fallback})")]
    BothPathsFailed {
        /// Error from the enhanced path.
        primary: Box<Self>,
        /// Error from the legacy path.
        fallback: Box<Self>,
    },
}

/// Calculator bound to a specific factor table for the enhanced path.
#[derive(Debug, Clone, Copy)]
pub struct Calculator<'a> {
    table: FactorTable<'a>,
}

impl Default for Calculator<'static> {
    fn default() -> Self {
        Self {
            table: FactorTable::COMPREHENSIVE,
        }
    }
}

impl<'a> Calculator<'a> {
    /// Creates a calculator whose enhanced path reads from `table`.
    #[must_use]
    pub const fn with_table(table: FactorTable<'a>) -> Self {
        Self { table }
    }

    /// Enhanced path only.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] if the input is malformed, a factor is
    /// missing from the table, or a category is not representable.
    pub fn calculate_enhanced(
        &self,
        response: &SurveyResponse,
    ) -> Result<EmissionBreakdown, CalculationError> {
        validate(response)?;
        enhanced::calculate(&self.table, response)
    }

    /// Enhanced path with a single retry on the legacy path.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::BothPathsFailed`] if neither path can
    /// produce a breakdown.
    pub fn calculate(
        &self,
        response: &SurveyResponse,
    ) -> Result<EmissionBreakdown, CalculationError> {
        log::debug!("Using enhanced local emission calculation");

        match self.calculate_enhanced(response) {
            Ok(breakdown) => Ok(breakdown),
            Err(primary) => {
                log::warn!("Enhanced calculation failed, falling back to legacy factors: {primary}");
                calculate_legacy(response).map_err(|fallback| {
                    log::error!("Legacy calculation failed: {fallback}");
                    CalculationError::BothPathsFailed {
                        primary: Box::new(primary),
                        fallback: Box::new(fallback),
                    }
                })
            }
        }
    }
}

/// Calculates emissions with the built-in comprehensive table, falling back
/// to the legacy factors on failure.
///
/// # Errors
///
/// Returns [`CalculationError::BothPathsFailed`] if neither path can
/// produce a breakdown, which only happens for malformed numeric input.
pub fn calculate(response: &SurveyResponse) -> Result<EmissionBreakdown, CalculationError> {
    Calculator::default().calculate(response)
}

/// Calculates emissions with the built-in comprehensive table only.
///
/// # Errors
///
/// Returns [`CalculationError`] if the input is malformed.
pub fn calculate_enhanced(response: &SurveyResponse) -> Result<EmissionBreakdown, CalculationError> {
    Calculator::default().calculate_enhanced(response)
}

/// Calculates emissions with the legacy EU factor set only.
///
/// # Errors
///
/// Returns [`CalculationError`] if the input is malformed.
pub fn calculate_legacy(response: &SurveyResponse) -> Result<EmissionBreakdown, CalculationError> {
    validate(response)?;
    legacy::calculate(response)
}

/// Rejects negative or non-finite numeric fields.
///
/// # Errors
///
/// Returns [`CalculationError::InvalidInput`] naming the first bad field.
pub fn validate(response: &SurveyResponse) -> Result<(), CalculationError> {
    for (field, value) in [
        ("monthly_energy_bill", response.monthly_energy_bill),
        ("weekly_km", response.weekly_km),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CalculationError::InvalidInput { field, value });
        }
    }
    Ok(())
}

/// Annual kWh implied by a monthly bill at [`PRICE_PER_KWH`].
#[must_use]
pub fn annual_kwh(monthly_bill: f64) -> f64 {
    (monthly_bill * 12.0) / PRICE_PER_KWH
}

/// Annual kilometres from a weekly distance.
#[must_use]
pub fn annual_km(weekly_km: f64) -> f64 {
    weekly_km * WEEKS_PER_YEAR
}

/// Rounds a raw category value to whole kilograms (half away from zero).
///
/// # Errors
///
/// Returns [`CalculationError::NonFinite`] for negative, NaN or infinite
/// values, or values too large to represent.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn round_kg(category: EmissionCategory, value: f64) -> Result<u64, CalculationError> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded >= u64::MAX as f64 {
        return Err(CalculationError::NonFinite { category, value });
    }
    Ok(rounded as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecozync_calculator_models::{
        DietType, FuelType, HeatingType, ShoppingFrequency, TransportMode, WasteManagement,
    };

    fn low_impact() -> SurveyResponse {
        SurveyResponse {
            heating_type: HeatingType::Renewable,
            monthly_energy_bill: 100.0,
            primary_transport: TransportMode::BikeWalk,
            fuel_type: None,
            weekly_km: 0.0,
            short_flights: 0,
            medium_flights: 0,
            long_flights: 0,
            diet_type: DietType::Vegan,
            shopping_frequency: ShoppingFrequency::Rarely,
            waste_management: WasteManagement::CompostToo,
        }
    }

    fn high_impact() -> SurveyResponse {
        SurveyResponse {
            heating_type: HeatingType::Oil,
            monthly_energy_bill: 250.0,
            primary_transport: TransportMode::CarAlone,
            fuel_type: Some(FuelType::Gasoline),
            weekly_km: 400.0,
            short_flights: 3,
            medium_flights: 3,
            long_flights: 2,
            diet_type: DietType::Omnivore,
            shopping_frequency: ShoppingFrequency::Monthly,
            waste_management: WasteManagement::EverythingTrash,
        }
    }

    #[test]
    fn low_impact_scenario_is_excellent() {
        let b = calculate(&low_impact()).unwrap();
        assert_eq!(b.energy_emissions, 96);
        assert_eq!(b.transport_emissions, 0);
        assert_eq!(b.travel_emissions, 0);
        assert_eq!(b.diet_emissions, 1200);
        assert_eq!(b.lifestyle_emissions, 300);
        assert_eq!(b.other_emissions, 80);
        assert_eq!(b.total_emissions, 1676);
        assert_eq!(b.impact_level(), ImpactLevel::Excellent);
        assert_eq!(b.calculation_method, CalculationMethod::LocalEnhanced);
        assert!((b.confidence_score - 0.90).abs() < f64::EPSILON);
    }

    #[test]
    fn high_impact_scenario_is_very_high() {
        let b = calculate(&high_impact()).unwrap();
        assert_eq!(b.energy_emissions, 2940);
        assert_eq!(b.transport_emissions, 3994);
        assert_eq!(b.travel_emissions, 3660);
        assert_eq!(b.diet_emissions, 3300);
        assert_eq!(b.lifestyle_emissions, 2400);
        assert_eq!(b.other_emissions, 580);
        assert_eq!(b.total_emissions, 16874);
        assert_eq!(b.impact_level(), ImpactLevel::VeryHigh);
    }

    #[test]
    fn calculation_is_deterministic() {
        let r = high_impact();
        let a = calculate(&r).unwrap();
        let b = calculate(&r).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.confidence_score.to_bits(), b.confidence_score.to_bits());
    }

    #[test]
    fn total_is_exact_sum_of_categories() {
        let mut r = high_impact();
        for heating in HeatingType::all() {
            for mode in TransportMode::all() {
                for diet in DietType::all() {
                    r.heating_type = *heating;
                    r.primary_transport = *mode;
                    r.diet_type = *diet;
                    r.monthly_energy_bill = 37.3;
                    r.weekly_km = 91.7;
                    let b = calculate(&r).unwrap();
                    let sum: u64 = b.categories().iter().map(|(_, v)| v).sum();
                    assert_eq!(sum, b.total_emissions);
                }
            }
        }
    }

    #[test]
    fn bike_walk_zeroes_transport_for_any_fuel() {
        let mut r = high_impact();
        r.primary_transport = TransportMode::BikeWalk;
        for fuel in FuelType::all() {
            r.fuel_type = Some(*fuel);
            assert_eq!(calculate(&r).unwrap().transport_emissions, 0);
        }
    }

    #[test]
    fn unknown_fuel_on_car_uses_gasoline() {
        let mut with_unknown = high_impact();
        with_unknown.fuel_type = Some(FuelType::from_answer("hydrogen"));
        let mut absent = high_impact();
        absent.fuel_type = None;

        let expected = calculate(&high_impact()).unwrap().transport_emissions;
        assert_eq!(calculate(&with_unknown).unwrap().transport_emissions, expected);
        assert_eq!(calculate(&absent).unwrap().transport_emissions, expected);
        assert!(expected > 0);
    }

    #[test]
    fn missing_factor_falls_back_to_legacy() {
        let partial: Vec<_> = factors::EMISSION_FACTORS
            .iter()
            .copied()
            .filter(|f| f.key != "waste_compost_recycle")
            .collect();
        let calculator = Calculator::with_table(FactorTable::new(&partial));

        let b = calculator.calculate(&low_impact()).unwrap();
        assert_eq!(b.calculation_method, CalculationMethod::LocalLegacy);
        assert!((b.confidence_score - 0.85).abs() < f64::EPSILON);
        assert_eq!(b.other_emissions, 0);
        // Legacy: 200 kg shopping * 0.4 compost reduction
        assert_eq!(b.lifestyle_emissions, 80);
    }

    #[test]
    fn malformed_input_fails_both_paths() {
        let mut r = low_impact();
        r.weekly_km = f64::NAN;
        let err = calculate(&r).unwrap_err();
        assert!(matches!(err, CalculationError::BothPathsFailed { .. }));

        r.weekly_km = 10.0;
        r.monthly_energy_bill = -5.0;
        let err = calculate(&r).unwrap_err();
        let CalculationError::BothPathsFailed { primary, fallback } = err else {
            panic!("expected both paths to fail");
        };
        assert!(matches!(*primary, CalculationError::InvalidInput { field: "monthly_energy_bill", .. }));
        assert_eq!(primary, fallback);
    }

    #[test]
    fn huge_inputs_report_overflow_instead_of_wrapping() {
        let mut r = low_impact();
        r.heating_type = HeatingType::Oil;
        r.primary_transport = TransportMode::CarAlone;
        r.fuel_type = Some(FuelType::Gasoline);
        r.monthly_energy_bill = 1e18;
        r.weekly_km = 1e18;

        assert_eq!(
            Calculator::default().calculate_enhanced(&r).unwrap_err(),
            CalculationError::Overflow
        );
        let CalculationError::BothPathsFailed { primary, fallback } = calculate(&r).unwrap_err()
        else {
            panic!("expected both paths to fail");
        };
        assert_eq!(*primary, CalculationError::Overflow);
        assert_eq!(*fallback, CalculationError::Overflow);
    }

    #[test]
    fn outputs_are_non_negative_for_all_answers() {
        let mut r = low_impact();
        for waste in WasteManagement::all() {
            for shopping in ShoppingFrequency::all() {
                r.waste_management = *waste;
                r.shopping_frequency = *shopping;
                let enhanced = calculate_enhanced(&r).unwrap();
                let legacy = calculate_legacy(&r).unwrap();
                // u64 fields cannot be negative; check totals are consistent
                assert!(enhanced.total_emissions >= enhanced.lifestyle_emissions);
                assert!(legacy.total_emissions >= legacy.lifestyle_emissions);
            }
        }
    }

    #[test]
    fn round_kg_rounds_half_away_from_zero() {
        assert_eq!(round_kg(EmissionCategory::Energy, 382.5).unwrap(), 383);
        assert_eq!(round_kg(EmissionCategory::Energy, 0.49).unwrap(), 0);
        assert!(round_kg(EmissionCategory::Energy, -1.0).is_err());
        assert!(round_kg(EmissionCategory::Energy, f64::INFINITY).is_err());
    }

    #[test]
    fn breakdown_serializes_to_persistence_shape() {
        let b = calculate(&low_impact()).unwrap();
        let json = serde_json::to_value(b).unwrap();
        for field in [
            "transport_emissions",
            "energy_emissions",
            "diet_emissions",
            "lifestyle_emissions",
            "travel_emissions",
            "other_emissions",
            "confidence_score",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert_eq!(json["calculation_method"], "local_enhanced");
    }
}
