#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey assessments and their conversion to calculator input.
//!
//! An [`Assessment`] is what the survey form collects: one free-form answer
//! string per question, grouped by section, with ranges such as `"50-100"`
//! for the energy bill rather than numbers. [`to_survey_response`] turns it
//! into the bounded [`SurveyResponse`] the calculator consumes using fixed
//! bucket midpoints. Those mappings are part of the stored-result contract
//! and must not drift.

pub mod input;
pub mod survey;

use ecozync_calculator_models::{
    DietType, FuelType, HeatingType, ShoppingFrequency, SurveyResponse, TransportMode,
    WasteManagement,
};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Errors from assessment handling.
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// An answer was given for a field the section does not have.
    #[error("Unknown field {field} in section {section}")]
    UnknownField {
        /// Section name.
        section: Section,
        /// Field name.
        field: String,
    },

    /// An input file had an extension other than `.json` or `.toml`.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Survey sections.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Section {
    /// Home energy.
    Energy,
    /// Ground transport and flights.
    Transport,
    /// Food.
    Diet,
    /// Shopping and waste.
    Lifestyle,
}

/// Energy answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnergyAnswers {
    /// `gas`, `electric`, `renewable` or `oil`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heating_type: Option<String>,
    /// Monthly bill range, e.g. `50-100`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_energy_cost: Option<String>,
}

/// Transport answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransportAnswers {
    /// `car_alone`, `car_carpool`, `public_transport` or `bike_walk`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_transport: Option<String>,
    /// `gasoline`, `diesel`, `electric` or `hybrid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    /// Weekly distance range, e.g. `150-300`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_distance: Option<String>,
    /// Flights-per-year range, e.g. `3-5`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_flights: Option<String>,
}

/// Diet answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DietAnswers {
    /// `vegan`, `vegetarian`, `pescatarian` or `omnivore`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_type: Option<String>,
}

/// Lifestyle answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifestyleAnswers {
    /// `monthly`, `every_few_months`, `yearly` or `rarely`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopping_frequency: Option<String>,
    /// `everything_trash`, `some_recycling`, `mostly_recycle` or `compost_too`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_management: Option<String>,
}

/// Raw survey answers as collected by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Assessment {
    /// Energy section.
    pub energy: EnergyAnswers,
    /// Transport section.
    pub transport: TransportAnswers,
    /// Diet section.
    pub diet: DietAnswers,
    /// Lifestyle section.
    pub lifestyle: LifestyleAnswers,
}

impl Assessment {
    /// Records an answer for `section.field`.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::UnknownField`] if the section has no such
    /// field.
    pub fn set_answer(
        &mut self,
        section: Section,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), AssessmentError> {
        let slot = match (section, field) {
            (Section::Energy, "heating_type") => &mut self.energy.heating_type,
            (Section::Energy, "monthly_energy_cost") => &mut self.energy.monthly_energy_cost,
            (Section::Transport, "primary_transport") => &mut self.transport.primary_transport,
            (Section::Transport, "fuel_type") => &mut self.transport.fuel_type,
            (Section::Transport, "weekly_distance") => &mut self.transport.weekly_distance,
            (Section::Transport, "annual_flights") => &mut self.transport.annual_flights,
            (Section::Diet, "diet_type") => &mut self.diet.diet_type,
            (Section::Lifestyle, "shopping_frequency") => &mut self.lifestyle.shopping_frequency,
            (Section::Lifestyle, "waste_management") => &mut self.lifestyle.waste_management,
            _ => {
                return Err(AssessmentError::UnknownField {
                    section,
                    field: field.to_string(),
                });
            }
        };
        *slot = Some(value.into());
        Ok(())
    }

    /// Returns the answer for `section.field`, if one was given.
    #[must_use]
    pub fn answer(&self, section: Section, field: &str) -> Option<&str> {
        match (section, field) {
            (Section::Energy, "heating_type") => self.energy.heating_type.as_deref(),
            (Section::Energy, "monthly_energy_cost") => self.energy.monthly_energy_cost.as_deref(),
            (Section::Transport, "primary_transport") => {
                self.transport.primary_transport.as_deref()
            }
            (Section::Transport, "fuel_type") => self.transport.fuel_type.as_deref(),
            (Section::Transport, "weekly_distance") => self.transport.weekly_distance.as_deref(),
            (Section::Transport, "annual_flights") => self.transport.annual_flights.as_deref(),
            (Section::Diet, "diet_type") => self.diet.diet_type.as_deref(),
            (Section::Lifestyle, "shopping_frequency") => {
                self.lifestyle.shopping_frequency.as_deref()
            }
            (Section::Lifestyle, "waste_management") => self.lifestyle.waste_management.as_deref(),
            _ => None,
        }
    }
}

/// Bill used when the energy cost range is absent or unrecognized.
pub const DEFAULT_ENERGY_BILL: f64 = 150.0;
/// Weekly distance used when the range is absent or unrecognized.
pub const DEFAULT_WEEKLY_KM: f64 = 100.0;

/// Monthly bill proxy for an energy cost range.
#[must_use]
pub fn energy_bill_proxy(range: Option<&str>) -> f64 {
    match range.map(str::trim) {
        Some("0-50") => 25.0,
        Some("50-100") => 75.0,
        Some("100-200") => 150.0,
        Some("200+") => 250.0,
        _ => DEFAULT_ENERGY_BILL,
    }
}

/// Weekly kilometre proxy for a distance range.
#[must_use]
pub fn weekly_km_proxy(range: Option<&str>) -> f64 {
    match range.map(str::trim) {
        Some("0-50") => 25.0,
        Some("50-150") => 100.0,
        Some("150-300") => 225.0,
        Some("300+") => 400.0,
        _ => DEFAULT_WEEKLY_KM,
    }
}

/// Annual flights split by haul band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightCounts {
    /// Short-haul flights.
    pub short: u32,
    /// Medium-haul flights.
    pub medium: u32,
    /// Long-haul flights.
    pub long: u32,
}

/// Haul-band split for a flights-per-year range. Absent means none.
#[must_use]
pub fn flight_counts(range: Option<&str>) -> FlightCounts {
    let (short, medium, long) = match range.map(str::trim) {
        Some("1-2") => (1, 1, 0),
        Some("3-5") => (2, 2, 1),
        Some("6+") => (3, 3, 2),
        _ => (0, 0, 0),
    };
    FlightCounts {
        short,
        medium,
        long,
    }
}

/// Converts collected answers into calculator input.
///
/// Absent categorical answers take the same named defaults as unrecognized
/// ones, except fuel type which is always filled in (gasoline) so the
/// stored response is explicit.
#[must_use]
pub fn to_survey_response(assessment: &Assessment) -> SurveyResponse {
    let flights = flight_counts(assessment.transport.annual_flights.as_deref());

    let response = SurveyResponse {
        heating_type: assessment
            .energy
            .heating_type
            .as_deref()
            .map_or_else(HeatingType::default, HeatingType::from_answer),
        monthly_energy_bill: energy_bill_proxy(assessment.energy.monthly_energy_cost.as_deref()),
        primary_transport: assessment
            .transport
            .primary_transport
            .as_deref()
            .map_or_else(TransportMode::default, TransportMode::from_answer),
        fuel_type: Some(
            assessment
                .transport
                .fuel_type
                .as_deref()
                .map_or_else(FuelType::default, FuelType::from_answer),
        ),
        weekly_km: weekly_km_proxy(assessment.transport.weekly_distance.as_deref()),
        short_flights: flights.short,
        medium_flights: flights.medium,
        long_flights: flights.long,
        diet_type: assessment
            .diet
            .diet_type
            .as_deref()
            .map_or_else(DietType::default, DietType::from_answer),
        shopping_frequency: assessment
            .lifestyle
            .shopping_frequency
            .as_deref()
            .map_or_else(ShoppingFrequency::default, ShoppingFrequency::from_answer),
        waste_management: assessment
            .lifestyle
            .waste_management
            .as_deref()
            .map_or_else(WasteManagement::default, WasteManagement::from_answer),
    };

    log::trace!("Converted assessment to survey response: {response:?}");

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_bill_buckets() {
        assert!((energy_bill_proxy(Some("0-50")) - 25.0).abs() < f64::EPSILON);
        assert!((energy_bill_proxy(Some("50-100")) - 75.0).abs() < f64::EPSILON);
        assert!((energy_bill_proxy(Some("100-200")) - 150.0).abs() < f64::EPSILON);
        assert!((energy_bill_proxy(Some("200+")) - 250.0).abs() < f64::EPSILON);
        assert!((energy_bill_proxy(None) - 150.0).abs() < f64::EPSILON);
        assert!((energy_bill_proxy(Some("lots")) - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn weekly_distance_buckets() {
        assert!((weekly_km_proxy(Some("0-50")) - 25.0).abs() < f64::EPSILON);
        assert!((weekly_km_proxy(Some("50-150")) - 100.0).abs() < f64::EPSILON);
        assert!((weekly_km_proxy(Some("150-300")) - 225.0).abs() < f64::EPSILON);
        assert!((weekly_km_proxy(Some("300+")) - 400.0).abs() < f64::EPSILON);
        assert!((weekly_km_proxy(None) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn flight_buckets() {
        let counts = |r| {
            let c = flight_counts(r);
            (c.short, c.medium, c.long)
        };
        assert_eq!(counts(Some("none")), (0, 0, 0));
        assert_eq!(counts(Some("1-2")), (1, 1, 0));
        assert_eq!(counts(Some("3-5")), (2, 2, 1));
        assert_eq!(counts(Some("6+")), (3, 3, 2));
        assert_eq!(counts(None), (0, 0, 0));
    }

    #[test]
    fn empty_assessment_uses_defaults() {
        let response = to_survey_response(&Assessment::default());
        assert_eq!(response.heating_type, HeatingType::Electric);
        assert!((response.monthly_energy_bill - 150.0).abs() < f64::EPSILON);
        assert_eq!(response.primary_transport, TransportMode::CarAlone);
        assert_eq!(response.fuel_type, Some(FuelType::Gasoline));
        assert!((response.weekly_km - 100.0).abs() < f64::EPSILON);
        assert_eq!(response.diet_type, DietType::Omnivore);
        assert_eq!(response.shopping_frequency, ShoppingFrequency::Yearly);
        assert_eq!(response.waste_management, WasteManagement::SomeRecycling);
    }

    #[test]
    fn full_assessment_converts() {
        let json = r#"{
            "energy": { "heating_type": "renewable", "monthly_energy_cost": "50-100" },
            "transport": {
                "primary_transport": "public_transport",
                "weekly_distance": "150-300",
                "annual_flights": "3-5"
            },
            "diet": { "diet_type": "vegan" },
            "lifestyle": { "shopping_frequency": "rarely", "waste_management": "compost_too" }
        }"#;
        let assessment: Assessment = serde_json::from_str(json).unwrap();
        let response = to_survey_response(&assessment);

        assert_eq!(response.heating_type, HeatingType::Renewable);
        assert!((response.monthly_energy_bill - 75.0).abs() < f64::EPSILON);
        assert_eq!(response.primary_transport, TransportMode::PublicTransport);
        assert!((response.weekly_km - 225.0).abs() < f64::EPSILON);
        assert_eq!(
            (response.short_flights, response.medium_flights, response.long_flights),
            (2, 2, 1)
        );
        assert_eq!(response.diet_type, DietType::Vegan);
        assert_eq!(response.shopping_frequency, ShoppingFrequency::Rarely);
        assert_eq!(response.waste_management, WasteManagement::CompostToo);
    }

    #[test]
    fn set_answer_rejects_unknown_fields() {
        let mut assessment = Assessment::default();
        assessment
            .set_answer(Section::Diet, "diet_type", "vegetarian")
            .unwrap();
        assert_eq!(
            assessment.answer(Section::Diet, "diet_type"),
            Some("vegetarian")
        );
        assert!(
            assessment
                .set_answer(Section::Diet, "meat_meals_per_week", "3")
                .is_err()
        );
    }
}
