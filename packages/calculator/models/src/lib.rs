#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey answer types and emission breakdown definitions.
//!
//! This crate defines the canonical eight-topic survey response consumed by
//! the emission calculator and the breakdown it produces. Every categorical
//! answer is a closed enum with a named default: an answer string that is
//! not part of the domain resolves to that default instead of failing, both
//! when parsed with `from_answer` and when deserialized.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How the household is primarily heated.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case", from = "String")]
#[strum(serialize_all = "snake_case")]
pub enum HeatingType {
    /// Natural gas boiler or furnace.
    Gas,
    /// Electric heating on the regional grid. Default for unrecognized answers.
    #[default]
    Electric,
    /// Solar, heat pump on a green tariff, etc.
    Renewable,
    /// Heating oil.
    Oil,
}

impl HeatingType {
    /// Parses a survey answer, falling back to [`HeatingType::Electric`].
    #[must_use]
    pub fn from_answer(raw: &str) -> Self {
        raw.trim().to_lowercase().parse().unwrap_or_default()
    }

    /// Human-readable label shown in the survey.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gas => "Natural Gas",
            Self::Electric => "Electricity",
            Self::Renewable => "Renewable",
            Self::Oil => "Oil",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Gas, Self::Electric, Self::Renewable, Self::Oil]
    }
}

impl From<String> for HeatingType {
    fn from(value: String) -> Self {
        Self::from_answer(&value)
    }
}

/// The way the respondent mainly gets around.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case", from = "String")]
#[strum(serialize_all = "snake_case")]
pub enum TransportMode {
    /// Driving alone. Default for unrecognized answers.
    #[default]
    CarAlone,
    /// Sharing rides regularly.
    CarCarpool,
    /// Bus, train, metro.
    PublicTransport,
    /// Cycling or walking.
    BikeWalk,
}

impl TransportMode {
    /// Parses a survey answer, falling back to [`TransportMode::CarAlone`].
    #[must_use]
    pub fn from_answer(raw: &str) -> Self {
        raw.trim().to_lowercase().parse().unwrap_or_default()
    }

    /// Whether emissions for this mode depend on the car fuel type.
    #[must_use]
    pub const fn is_car(self) -> bool {
        matches!(self, Self::CarAlone | Self::CarCarpool)
    }

    /// Human-readable label shown in the survey.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CarAlone => "Car (alone)",
            Self::CarCarpool => "Car (carpool)",
            Self::PublicTransport => "Public transport",
            Self::BikeWalk => "Bike or walk",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CarAlone,
            Self::CarCarpool,
            Self::PublicTransport,
            Self::BikeWalk,
        ]
    }
}

impl From<String> for TransportMode {
    fn from(value: String) -> Self {
        Self::from_answer(&value)
    }
}

/// Car fuel type. Only meaningful for car-based [`TransportMode`]s.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case", from = "String")]
#[strum(serialize_all = "snake_case")]
pub enum FuelType {
    /// Petrol. Default for unrecognized or absent answers.
    #[default]
    Gasoline,
    /// Diesel.
    Diesel,
    /// Battery electric.
    Electric,
    /// Hybrid.
    Hybrid,
}

impl FuelType {
    /// Parses a survey answer, falling back to [`FuelType::Gasoline`].
    #[must_use]
    pub fn from_answer(raw: &str) -> Self {
        raw.trim().to_lowercase().parse().unwrap_or_default()
    }

    /// Human-readable label shown in the survey.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gasoline => "Gasoline",
            Self::Diesel => "Diesel",
            Self::Electric => "Electric",
            Self::Hybrid => "Hybrid",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Gasoline, Self::Diesel, Self::Electric, Self::Hybrid]
    }
}

impl From<String> for FuelType {
    fn from(value: String) -> Self {
        Self::from_answer(&value)
    }
}

/// Dietary pattern.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case", from = "String")]
#[strum(serialize_all = "snake_case")]
pub enum DietType {
    /// Plant-based only.
    Vegan,
    /// Includes dairy and eggs.
    Vegetarian,
    /// Fish but no other meat.
    Pescatarian,
    /// Meat and plants. Default for unrecognized answers.
    #[default]
    Omnivore,
}

impl DietType {
    /// Parses a survey answer, falling back to [`DietType::Omnivore`].
    #[must_use]
    pub fn from_answer(raw: &str) -> Self {
        raw.trim().to_lowercase().parse().unwrap_or_default()
    }

    /// Human-readable label shown in the survey.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vegan => "Vegan",
            Self::Vegetarian => "Vegetarian",
            Self::Pescatarian => "Pescatarian",
            Self::Omnivore => "Omnivore",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Vegan,
            Self::Vegetarian,
            Self::Pescatarian,
            Self::Omnivore,
        ]
    }
}

impl From<String> for DietType {
    fn from(value: String) -> Self {
        Self::from_answer(&value)
    }
}

/// How often new clothes and electronics are bought.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case", from = "String")]
#[strum(serialize_all = "snake_case")]
pub enum ShoppingFrequency {
    /// New items most months.
    Monthly,
    /// Occasional purchases.
    EveryFewMonths,
    /// Only when necessary. Default for unrecognized answers.
    #[default]
    Yearly,
    /// Items are kept for years.
    Rarely,
}

impl ShoppingFrequency {
    /// Parses a survey answer, falling back to [`ShoppingFrequency::Yearly`].
    #[must_use]
    pub fn from_answer(raw: &str) -> Self {
        raw.trim().to_lowercase().parse().unwrap_or_default()
    }

    /// Human-readable label shown in the survey.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::EveryFewMonths => "Every few months",
            Self::Yearly => "Yearly",
            Self::Rarely => "Rarely",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Monthly,
            Self::EveryFewMonths,
            Self::Yearly,
            Self::Rarely,
        ]
    }
}

impl From<String> for ShoppingFrequency {
    fn from(value: String) -> Self {
        Self::from_answer(&value)
    }
}

/// How household waste is handled.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case", from = "String")]
#[strum(serialize_all = "snake_case")]
pub enum WasteManagement {
    /// Most waste goes to the bin.
    EverythingTrash,
    /// Basic recycling. Default for unrecognized answers.
    #[default]
    SomeRecycling,
    /// Careful separation.
    MostlyRecycle,
    /// Recycling plus composting.
    CompostToo,
}

impl WasteManagement {
    /// Parses a survey answer, falling back to [`WasteManagement::SomeRecycling`].
    #[must_use]
    pub fn from_answer(raw: &str) -> Self {
        raw.trim().to_lowercase().parse().unwrap_or_default()
    }

    /// Human-readable label shown in the survey.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EverythingTrash => "Everything in trash",
            Self::SomeRecycling => "Some recycling",
            Self::MostlyRecycle => "Mostly recycle",
            Self::CompostToo => "Compost too",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::EverythingTrash,
            Self::SomeRecycling,
            Self::MostlyRecycle,
            Self::CompostToo,
        ]
    }
}

impl From<String> for WasteManagement {
    fn from(value: String) -> Self {
        Self::from_answer(&value)
    }
}

/// Normalized answers to the eight-question survey.
///
/// Numeric fields are expected to be finite and non-negative; the
/// calculator rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    /// Primary heating source.
    #[serde(default)]
    pub heating_type: HeatingType,
    /// Average monthly energy bill in currency units.
    pub monthly_energy_bill: f64,
    /// Primary mode of transport.
    #[serde(default)]
    pub primary_transport: TransportMode,
    /// Car fuel type; `None` is treated as gasoline for car modes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<FuelType>,
    /// Distance travelled per week in kilometres.
    pub weekly_km: f64,
    /// Short-haul flights per year.
    #[serde(default)]
    pub short_flights: u32,
    /// Medium-haul flights per year.
    #[serde(default)]
    pub medium_flights: u32,
    /// Long-haul flights per year.
    #[serde(default)]
    pub long_flights: u32,
    /// Dietary pattern.
    #[serde(default)]
    pub diet_type: DietType,
    /// Shopping frequency for new goods.
    #[serde(default)]
    pub shopping_frequency: ShoppingFrequency,
    /// Waste handling.
    #[serde(default)]
    pub waste_management: WasteManagement,
}

impl SurveyResponse {
    /// The fuel type actually used for car emissions.
    #[must_use]
    pub fn effective_fuel_type(&self) -> FuelType {
        self.fuel_type.unwrap_or_default()
    }
}

/// Which factor table produced a breakdown.
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
pub enum CalculationMethod {
    /// Comprehensive multi-source factor table.
    LocalEnhanced,
    /// Smaller EU-only legacy factor set.
    LocalLegacy,
}

impl CalculationMethod {
    /// Static confidence tag associated with this factor-table vintage.
    #[must_use]
    pub const fn confidence(self) -> f64 {
        match self {
            Self::LocalEnhanced => 0.90,
            Self::LocalLegacy => 0.85,
        }
    }
}

/// The six reported emission categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmissionCategory {
    /// Everyday ground transport.
    Transport,
    /// Home energy and heating.
    Energy,
    /// Food.
    Diet,
    /// Consumption of new goods.
    Lifestyle,
    /// Aviation.
    Travel,
    /// Household waste.
    Other,
}

impl EmissionCategory {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Transport => "Transport",
            Self::Energy => "Home Energy",
            Self::Diet => "Diet",
            Self::Lifestyle => "Lifestyle",
            Self::Travel => "Air Travel",
            Self::Other => "Waste",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Transport,
            Self::Energy,
            Self::Diet,
            Self::Lifestyle,
            Self::Travel,
            Self::Other,
        ]
    }
}

/// Annual emissions per category in kg CO2e, as produced by the calculator.
///
/// This is also the persistence wire format: six category values, the
/// method tag and the confidence score. `total_emissions` is always the
/// exact sum of the six category values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionBreakdown {
    /// Ground transport.
    pub transport_emissions: u64,
    /// Home energy.
    pub energy_emissions: u64,
    /// Diet.
    pub diet_emissions: u64,
    /// Shopping and consumption.
    pub lifestyle_emissions: u64,
    /// Aviation.
    pub travel_emissions: u64,
    /// Waste.
    pub other_emissions: u64,
    /// Sum of the six categories.
    pub total_emissions: u64,
    /// Confidence tag in `[0, 1]`.
    pub confidence_score: f64,
    /// Factor table that produced this breakdown.
    pub calculation_method: CalculationMethod,
}

impl EmissionBreakdown {
    /// Builds a breakdown from already-rounded category values.
    ///
    /// The total saturates at `u64::MAX`. Use [`Self::checked_new`] when
    /// the category values are not known to be small.
    #[must_use]
    pub const fn new(
        transport: u64,
        energy: u64,
        diet: u64,
        lifestyle: u64,
        travel: u64,
        other: u64,
        method: CalculationMethod,
    ) -> Self {
        Self {
            transport_emissions: transport,
            energy_emissions: energy,
            diet_emissions: diet,
            lifestyle_emissions: lifestyle,
            travel_emissions: travel,
            other_emissions: other,
            total_emissions: transport
                .saturating_add(energy)
                .saturating_add(diet)
                .saturating_add(lifestyle)
                .saturating_add(travel)
                .saturating_add(other),
            confidence_score: method.confidence(),
            calculation_method: method,
        }
    }

    /// Like [`Self::new`], but returns `None` if the total does not fit in
    /// a `u64`.
    #[must_use]
    pub fn checked_new(
        transport: u64,
        energy: u64,
        diet: u64,
        lifestyle: u64,
        travel: u64,
        other: u64,
        method: CalculationMethod,
    ) -> Option<Self> {
        [transport, energy, diet, lifestyle, travel, other]
            .into_iter()
            .try_fold(0_u64, u64::checked_add)?;
        Some(Self::new(
            transport, energy, diet, lifestyle, travel, other, method,
        ))
    }

    /// Returns the value for a single category.
    #[must_use]
    pub const fn get(&self, category: EmissionCategory) -> u64 {
        match category {
            EmissionCategory::Transport => self.transport_emissions,
            EmissionCategory::Energy => self.energy_emissions,
            EmissionCategory::Diet => self.diet_emissions,
            EmissionCategory::Lifestyle => self.lifestyle_emissions,
            EmissionCategory::Travel => self.travel_emissions,
            EmissionCategory::Other => self.other_emissions,
        }
    }

    /// Category values in display order.
    #[must_use]
    pub fn categories(&self) -> Vec<(EmissionCategory, u64)> {
        EmissionCategory::all()
            .iter()
            .map(|c| (*c, self.get(*c)))
            .collect()
    }

    /// Impact band for the total.
    #[must_use]
    pub const fn impact_level(&self) -> ImpactLevel {
        ImpactLevel::for_total(self.total_emissions)
    }
}

/// Impact bands over annual total emissions (kg CO2e).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImpactLevel {
    /// At most 2000 kg.
    Excellent,
    /// At most 4000 kg.
    Good,
    /// At most 8000 kg.
    Average,
    /// At most 12000 kg.
    High,
    /// Above 12000 kg.
    VeryHigh,
}

impl ImpactLevel {
    /// Classifies an annual total.
    #[must_use]
    pub const fn for_total(total_kg: u64) -> Self {
        match total_kg {
            0..=2000 => Self::Excellent,
            2001..=4000 => Self::Good,
            4001..=8000 => Self::Average,
            8001..=12000 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// One-line message shown next to the result.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Excellent => "You have a very low carbon footprint!",
            Self::Good => "Your footprint is below average - well done!",
            Self::Average => "Your footprint is typical for your region.",
            Self::High => "There's significant room for improvement.",
            Self::VeryHigh => "Consider major lifestyle changes for the planet.",
        }
    }
}
