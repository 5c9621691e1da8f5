//! Emission factor tables.
//!
//! The comprehensive table is a process-wide `static` built from public
//! reference datasets (DEFRA, EEA, EPA, IPCC, Poore & Nemecek, ...). It is
//! never mutated or rebuilt at runtime; changing a factor means changing
//! this file and redeploying.
//!
//! All factors are kg CO2e per unit, where the unit is recorded on each
//! entry.

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::CalculationError;

/// Top-level grouping of emission factors.
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
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FactorCategory {
    /// Grid and renewable electricity (per kWh).
    Electricity,
    /// Heating fuels (per kWh).
    Heating,
    /// Ground transport (per km).
    Transport,
    /// Aviation, per passenger-km.
    Aviation,
    /// Annual diet estimates and per-kg food items.
    Diet,
    /// Goods and annual shopping estimates.
    Consumption,
    /// Waste treatment and annual household estimates.
    Waste,
}

impl FactorCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Electricity,
            Self::Heating,
            Self::Transport,
            Self::Aviation,
            Self::Diet,
            Self::Consumption,
            Self::Waste,
        ]
    }
}

/// A single emission factor and its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissionFactor {
    /// Category this factor belongs to.
    pub category: FactorCategory,
    /// Lookup key, unique within the category.
    pub key: &'static str,
    /// Finer classification within the category, e.g. `high_meat` for
    /// `meat_daily` or `electricity` for every national grid.
    pub subcategory: &'static str,
    /// kg CO2e per `unit`.
    pub factor: f64,
    /// Activity unit, e.g. `kg CO2e/kWh`.
    pub unit: &'static str,
    /// Publishing dataset.
    pub source: &'static str,
    /// Region the factor applies to.
    pub region: &'static str,
    /// Publication year of the dataset.
    pub year: u16,
}

const fn ef(
    category: FactorCategory,
    key: &'static str,
    subcategory: &'static str,
    factor: f64,
    unit: &'static str,
    source: &'static str,
    region: &'static str,
    year: u16,
) -> EmissionFactor {
    EmissionFactor {
        category,
        key,
        subcategory,
        factor,
        unit,
        source,
        region,
        year,
    }
}

use FactorCategory::{Aviation, Consumption, Diet, Electricity, Heating, Transport, Waste};

const PER_KWH: &str = "kg CO2e/kWh";
const PER_KM: &str = "kg CO2e/km";
const PER_YEAR: &str = "kg CO2e/year";
const PER_KG: &str = "kg CO2e/kg";
const PER_ITEM: &str = "kg CO2e/item";

/// The comprehensive factor set.
#[rustfmt::skip]
pub static EMISSION_FACTORS: &[EmissionFactor] = &[
    // ── Electricity ─────────────────────────────────────────────────
    ef(Electricity, "eu_average", "electricity", 0.295, PER_KWH, "EEA 2023", "EU", 2023),
    ef(Electricity, "germany", "electricity", 0.420, PER_KWH, "UBA 2023", "DE", 2023),
    ef(Electricity, "france", "electricity", 0.057, PER_KWH, "RTE 2023", "FR", 2023),
    ef(Electricity, "uk", "electricity", 0.193, PER_KWH, "DEFRA 2023", "UK", 2023),
    ef(Electricity, "us_average", "electricity", 0.393, PER_KWH, "EPA 2023", "US", 2023),
    ef(Electricity, "renewable", "renewable", 0.020, PER_KWH, "IPCC 2014", "Global", 2014),
    // ── Heating fuels ───────────────────────────────────────────────
    ef(Heating, "natural_gas", "natural_gas", 0.202, PER_KWH, "DEFRA 2023", "UK", 2023),
    ef(Heating, "heating_oil", "heating_oil", 0.245, PER_KWH, "DEFRA 2023", "UK", 2023),
    ef(Heating, "lpg", "lpg", 0.214, PER_KWH, "DEFRA 2023", "UK", 2023),
    ef(Heating, "coal", "coal", 0.364, PER_KWH, "DEFRA 2023", "UK", 2023),
    // ── Transport ───────────────────────────────────────────────────
    ef(Transport, "car_petrol_small", "car_petrol_small", 0.154, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "car_petrol_medium", "car_petrol_medium", 0.192, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "car_petrol_large", "car_petrol_large", 0.282, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "car_diesel_small", "car_diesel_small", 0.142, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "car_diesel_medium", "car_diesel_medium", 0.171, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "car_diesel_large", "car_diesel_large", 0.209, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "car_hybrid", "car_hybrid", 0.109, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "car_electric", "car_electric", 0.047, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "bus_local", "bus_local", 0.082, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "bus_coach", "bus_coach", 0.028, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "train_local", "train_local", 0.035, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "train_intercity", "train_intercity", 0.028, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "metro_tram", "metro", 0.030, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "bicycle", "bicycle", 0.006, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "walking", "walking", 0.000, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "motorcycle_small", "motorcycle_small", 0.084, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Transport, "motorcycle_large", "motorcycle_large", 0.134, PER_KM, "DEFRA 2023", "UK", 2023),
    // ── Aviation (per passenger-km) ─────────────────────────────────
    ef(Aviation, "flight_short_economy", "short_economy", 0.255, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Aviation, "flight_short_business", "short_business", 0.383, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Aviation, "flight_medium_economy", "medium_economy", 0.195, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Aviation, "flight_medium_business", "medium_business", 0.312, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Aviation, "flight_long_economy", "long_economy", 0.150, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Aviation, "flight_long_premium", "long_premium", 0.240, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Aviation, "flight_long_business", "long_business", 0.435, PER_KM, "DEFRA 2023", "UK", 2023),
    ef(Aviation, "flight_long_first", "long_first", 0.600, PER_KM, "DEFRA 2023", "UK", 2023),
    // ── Diet ────────────────────────────────────────────────────────
    ef(Diet, "meat_daily", "high_meat", 3300.0, PER_YEAR, "Oxford 2023", "Global", 2023),
    ef(Diet, "meat_sometimes", "medium_meat", 2000.0, PER_YEAR, "Oxford 2023", "Global", 2023),
    ef(Diet, "vegetarian", "vegetarian", 1700.0, PER_YEAR, "Oxford 2023", "Global", 2023),
    ef(Diet, "vegan", "vegan", 1200.0, PER_YEAR, "Oxford 2023", "Global", 2023),
    ef(Diet, "beef", "beef", 60.0, PER_KG, "Poore & Nemecek 2018", "Global", 2018),
    ef(Diet, "lamb", "lamb", 24.5, PER_KG, "Poore & Nemecek 2018", "Global", 2018),
    ef(Diet, "pork", "pork", 7.6, PER_KG, "Poore & Nemecek 2018", "Global", 2018),
    ef(Diet, "chicken", "chicken", 6.9, PER_KG, "Poore & Nemecek 2018", "Global", 2018),
    ef(Diet, "fish_farmed", "fish_farmed", 13.6, PER_KG, "Poore & Nemecek 2018", "Global", 2018),
    ef(Diet, "fish_wild", "fish_wild", 5.4, PER_KG, "Poore & Nemecek 2018", "Global", 2018),
    ef(Diet, "dairy_milk", "dairy_milk", 3.2, PER_KG, "Poore & Nemecek 2018", "Global", 2018),
    ef(Diet, "cheese", "cheese", 21.2, PER_KG, "Poore & Nemecek 2018", "Global", 2018),
    ef(Diet, "vegetables", "vegetables", 2.0, PER_KG, "Poore & Nemecek 2018", "Global", 2018),
    ef(Diet, "fruits", "fruits", 1.1, PER_KG, "Poore & Nemecek 2018", "Global", 2018),
    ef(Diet, "grains", "grains", 1.4, PER_KG, "Poore & Nemecek 2018", "Global", 2018),
    // ── Consumption ─────────────────────────────────────────────────
    ef(Consumption, "t_shirt", "t_shirt", 8.5, PER_ITEM, "Ellen MacArthur 2017", "Global", 2017),
    ef(Consumption, "jeans", "jeans", 33.4, PER_ITEM, "Ellen MacArthur 2017", "Global", 2017),
    ef(Consumption, "dress", "dress", 47.0, PER_ITEM, "Ellen MacArthur 2017", "Global", 2017),
    ef(Consumption, "shoes", "shoes", 30.0, PER_ITEM, "Ellen MacArthur 2017", "Global", 2017),
    ef(Consumption, "smartphone", "smartphone", 85.0, PER_ITEM, "Apple 2023", "Global", 2023),
    ef(Consumption, "laptop", "laptop", 300.0, PER_ITEM, "Dell 2023", "Global", 2023),
    ef(Consumption, "tablet", "tablet", 130.0, PER_ITEM, "Apple 2023", "Global", 2023),
    ef(Consumption, "tv_55inch", "tv", 1200.0, PER_ITEM, "Samsung 2023", "Global", 2023),
    ef(Consumption, "shopping_monthly", "high_consumption", 2400.0, PER_YEAR, "C40 Cities 2019", "Global", 2019),
    ef(Consumption, "shopping_quarterly", "medium_consumption", 1200.0, PER_YEAR, "C40 Cities 2019", "Global", 2019),
    ef(Consumption, "shopping_yearly", "low_consumption", 600.0, PER_YEAR, "C40 Cities 2019", "Global", 2019),
    ef(Consumption, "shopping_rarely", "minimal_consumption", 300.0, PER_YEAR, "C40 Cities 2019", "Global", 2019),
    // ── Waste ───────────────────────────────────────────────────────
    ef(Waste, "landfill", "landfill", 1.84, PER_KG, "DEFRA 2023", "UK", 2023),
    ef(Waste, "recycling", "recycling", 0.02, PER_KG, "DEFRA 2023", "UK", 2023),
    ef(Waste, "composting", "composting", 0.15, PER_KG, "DEFRA 2023", "UK", 2023),
    ef(Waste, "incineration", "incineration", 0.21, PER_KG, "DEFRA 2023", "UK", 2023),
    ef(Waste, "waste_everything_trash", "no_recycling", 580.0, PER_YEAR, "EPA 2023", "US", 2023),
    ef(Waste, "waste_some_recycling", "some_recycling", 350.0, PER_YEAR, "EPA 2023", "US", 2023),
    ef(Waste, "waste_mostly_recycle", "high_recycling", 150.0, PER_YEAR, "EPA 2023", "US", 2023),
    ef(Waste, "waste_compost_recycle", "compost_recycle", 80.0, PER_YEAR, "EPA 2023", "US", 2023),
];

/// A reference dataset cited by the factor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataSource {
    /// Short identifier.
    pub id: &'static str,
    /// Publishing organisation or paper.
    pub name: &'static str,
    /// Where the dataset can be found.
    pub url: &'static str,
    /// Dataset year.
    pub year: u16,
}

/// Datasets the comprehensive table draws from.
pub static DATA_SOURCES: &[DataSource] = &[
    DataSource {
        id: "defra",
        name: "UK Department for Environment, Food and Rural Affairs",
        url: "https://www.gov.uk/government/publications/greenhouse-gas-reporting-conversion-factors-2023",
        year: 2023,
    },
    DataSource {
        id: "epa",
        name: "US Environmental Protection Agency",
        url: "https://www.epa.gov/egrid/summary-data",
        year: 2023,
    },
    DataSource {
        id: "ipcc",
        name: "Intergovernmental Panel on Climate Change",
        url: "https://www.ipcc.ch/report/ar5/wg3/",
        year: 2014,
    },
    DataSource {
        id: "oxford",
        name: "University of Oxford - Environmental Research Letters",
        url: "https://iopscience.iop.org/article/10.1088/1748-9326/ac861c",
        year: 2023,
    },
    DataSource {
        id: "poore_nemecek",
        name: "Poore & Nemecek - Science Journal",
        url: "https://science.sciencemag.org/content/360/6392/987",
        year: 2018,
    },
];

/// Read-only view over a slice of emission factors.
#[derive(Debug, Clone, Copy)]
pub struct FactorTable<'a> {
    factors: &'a [EmissionFactor],
}

impl FactorTable<'static> {
    /// The built-in comprehensive table.
    pub const COMPREHENSIVE: Self = Self {
        factors: EMISSION_FACTORS,
    };
}

impl Default for FactorTable<'static> {
    fn default() -> Self {
        Self::COMPREHENSIVE
    }
}

impl<'a> FactorTable<'a> {
    /// Wraps an arbitrary slice of factors.
    #[must_use]
    pub const fn new(factors: &'a [EmissionFactor]) -> Self {
        Self { factors }
    }

    /// All factors in table order.
    #[must_use]
    pub const fn factors(&self) -> &'a [EmissionFactor] {
        self.factors
    }

    /// Looks up a factor by category and key.
    #[must_use]
    pub fn get(&self, category: FactorCategory, key: &str) -> Option<&'a EmissionFactor> {
        self.factors
            .iter()
            .find(|f| f.category == category && f.key == key)
    }

    /// Looks up a factor value, failing if it is absent from the table.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::MissingFactor`] if no factor exists for
    /// the given category and key.
    pub fn require(&self, category: FactorCategory, key: &'static str) -> Result<f64, CalculationError> {
        self.get(category, key)
            .map(|f| f.factor)
            .ok_or(CalculationError::MissingFactor { category, key })
    }

    /// Returns the factors of a single category.
    #[must_use]
    pub fn in_category(&self, category: FactorCategory) -> Vec<&'a EmissionFactor> {
        self.factors
            .iter()
            .filter(|f| f.category == category)
            .collect()
    }
}

/// Maps a free-form region name to a grid electricity key.
///
/// Unknown regions use the EU average.
#[must_use]
pub fn electricity_key_for_region(region: &str) -> &'static str {
    match region.trim().to_lowercase().as_str() {
        "de" | "germany" => "germany",
        "fr" | "france" => "france",
        "uk" | "united kingdom" => "uk",
        "us" | "usa" | "united states" => "us_average",
        _ => "eu_average",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_within_category() {
        for (i, a) in EMISSION_FACTORS.iter().enumerate() {
            for b in &EMISSION_FACTORS[i + 1..] {
                assert!(
                    !(a.category == b.category && a.key == b.key),
                    "duplicate factor {:?}/{}",
                    a.category,
                    a.key
                );
            }
        }
    }

    #[test]
    fn every_category_has_factors() {
        let table = FactorTable::COMPREHENSIVE;
        for category in FactorCategory::all() {
            assert!(
                !table.in_category(*category).is_empty(),
                "{category} has no factors"
            );
        }
    }

    #[test]
    fn factors_are_finite_and_non_negative() {
        for f in EMISSION_FACTORS {
            assert!(f.factor.is_finite() && f.factor >= 0.0, "{} is invalid", f.key);
        }
    }

    #[test]
    fn subcategories_classify_within_category() {
        let table = FactorTable::COMPREHENSIVE;
        let sub = |category, key| table.get(category, key).map(|f| f.subcategory);
        assert_eq!(sub(FactorCategory::Diet, "meat_daily"), Some("high_meat"));
        assert_eq!(sub(FactorCategory::Transport, "metro_tram"), Some("metro"));
        assert_eq!(sub(Electricity, "germany"), Some("electricity"));
        assert!(EMISSION_FACTORS.iter().all(|f| !f.subcategory.is_empty()));
    }

    #[test]
    fn require_reports_missing_factor() {
        let table = FactorTable::new(&[]);
        let err = table
            .require(FactorCategory::Heating, "natural_gas")
            .unwrap_err();
        assert_eq!(
            err,
            CalculationError::MissingFactor {
                category: FactorCategory::Heating,
                key: "natural_gas",
            }
        );
    }

    #[test]
    fn region_mapping_defaults_to_eu() {
        assert_eq!(electricity_key_for_region("Germany"), "germany");
        assert_eq!(electricity_key_for_region("USA"), "us_average");
        assert_eq!(electricity_key_for_region("Atlantis"), "eu_average");
        let grid = FactorTable::COMPREHENSIVE
            .require(Electricity, electricity_key_for_region("eu"))
            .unwrap();
        assert!((grid - 0.295).abs() < f64::EPSILON);
    }
}
