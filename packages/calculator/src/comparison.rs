//! Reference comparisons for an annual total.

use serde::{Deserialize, Serialize};

/// EU per-capita average, kg CO2e/year.
pub const EU_AVERAGE_KG: f64 = 8500.0;
/// Global per-capita average, kg CO2e/year.
pub const GLOBAL_AVERAGE_KG: f64 = 4800.0;
/// Per-capita budget on a 1.5 °C pathway, kg CO2e/year.
pub const PARIS_TARGET_KG: f64 = 2300.0;
/// CO2 absorbed by an average tree, kg/year.
pub const TREE_ABSORPTION_KG: f64 = 22.0;
/// Emissions of an average car, kg/year.
pub const CAR_ANNUAL_KG: f64 = 4600.0;
/// Emissions of an average car, kg/km.
pub const CAR_KG_PER_KM: f64 = 0.21;

/// How a total compares to reference averages and everyday equivalents.
///
/// The [`Default`] value is all zeros and stands for "nothing to compare".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    /// Percent above (positive) or below (negative) the EU average.
    pub vs_eu_average: f64,
    /// Percent relative to the global average.
    pub vs_global_average: f64,
    /// Percent relative to the Paris-aligned target.
    pub vs_paris_target: f64,
    /// Trees needed for a year to absorb the total.
    pub trees_to_offset: u64,
    /// Equivalent number of average cars.
    pub cars_off_road: f64,
    /// Equivalent kilometres driven in an average car.
    pub equivalent_car_kilometers: u64,
    /// Days of average EU per-capita emissions.
    pub household_days: f64,
}

impl ComparisonMetrics {
    /// Computes comparisons for an annual total in kg CO2e.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_total(total_kg: f64) -> Self {
        let total = total_kg.max(0.0);
        Self {
            vs_eu_average: percent_diff(total, EU_AVERAGE_KG),
            vs_global_average: percent_diff(total, GLOBAL_AVERAGE_KG),
            vs_paris_target: percent_diff(total, PARIS_TARGET_KG),
            trees_to_offset: (total / TREE_ABSORPTION_KG).ceil() as u64,
            cars_off_road: total / CAR_ANNUAL_KG,
            equivalent_car_kilometers: (total / CAR_KG_PER_KM).round() as u64,
            household_days: total / (EU_AVERAGE_KG / 365.0),
        }
    }
}

fn percent_diff(value: f64, reference: f64) -> f64 {
    (value - reference) / reference * 100.0
}
