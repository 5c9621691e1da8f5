//! Legacy EU-only factor set, used as the fallback calculation path.
//!
//! Kept for backwards compatibility with results computed before the
//! comprehensive table existed. Waste is not reported as its own category
//! here; instead it scales lifestyle emissions down, and
//! `other_emissions` is always zero.

use ecozync_calculator_models::{
    CalculationMethod, DietType, EmissionBreakdown, EmissionCategory, FuelType, HeatingType,
    ShoppingFrequency, SurveyResponse, TransportMode, WasteManagement,
};

use crate::{
    CARPOOL_MULTIPLIER, CalculationError, LONG_HAUL_KM, MEDIUM_HAUL_KM, SHORT_HAUL_KM,
    annual_kwh, annual_km, round_kg,
};

// Energy, kg CO2e/kWh
const NATURAL_GAS: f64 = 0.202;
const ELECTRICITY: f64 = 0.266;
const RENEWABLE_ELECTRICITY: f64 = 0.02;
const OIL: f64 = 0.267;

// Transport, kg CO2e/km
const CAR_GASOLINE: f64 = 0.21;
const CAR_DIESEL: f64 = 0.169;
const CAR_ELECTRIC: f64 = 0.053;
const CAR_HYBRID: f64 = 0.109;
const PUBLIC_TRANSPORT: f64 = 0.04;

// Aviation, kg CO2e/km
const FLIGHT_SHORT: f64 = 0.255;
const FLIGHT_MEDIUM: f64 = 0.195;
const FLIGHT_LONG: f64 = 0.150;

// Diet, tonnes CO2e/year
const DIET_VEGAN: f64 = 1.0;
const DIET_VEGETARIAN: f64 = 1.5;
const DIET_PESCATARIAN: f64 = 2.0;
const DIET_OMNIVORE: f64 = 3.0;

// Shopping, kg CO2e/year
const SHOPPING_FREQUENT: f64 = 1200.0;
const SHOPPING_MODERATE: f64 = 800.0;
const SHOPPING_LOW: f64 = 400.0;
const SHOPPING_MINIMAL: f64 = 200.0;

const fn heating_factor(heating: HeatingType) -> f64 {
    match heating {
        HeatingType::Gas => NATURAL_GAS,
        HeatingType::Renewable => RENEWABLE_ELECTRICITY,
        HeatingType::Oil => OIL,
        HeatingType::Electric => ELECTRICITY,
    }
}

const fn car_factor(fuel: FuelType) -> f64 {
    match fuel {
        FuelType::Electric => CAR_ELECTRIC,
        FuelType::Hybrid => CAR_HYBRID,
        FuelType::Diesel => CAR_DIESEL,
        FuelType::Gasoline => CAR_GASOLINE,
    }
}

const fn diet_tonnes(diet: DietType) -> f64 {
    match diet {
        DietType::Vegan => DIET_VEGAN,
        DietType::Vegetarian => DIET_VEGETARIAN,
        DietType::Pescatarian => DIET_PESCATARIAN,
        DietType::Omnivore => DIET_OMNIVORE,
    }
}

const fn shopping_kg(frequency: ShoppingFrequency) -> f64 {
    match frequency {
        ShoppingFrequency::Monthly => SHOPPING_FREQUENT,
        ShoppingFrequency::EveryFewMonths => SHOPPING_MODERATE,
        ShoppingFrequency::Yearly => SHOPPING_LOW,
        ShoppingFrequency::Rarely => SHOPPING_MINIMAL,
    }
}

/// Multiplier applied to lifestyle emissions for a waste-handling habit.
#[must_use]
pub const fn waste_reduction(waste: WasteManagement) -> f64 {
    match waste {
        WasteManagement::EverythingTrash => 1.0,
        WasteManagement::SomeRecycling => 0.85,
        WasteManagement::MostlyRecycle => 0.6,
        WasteManagement::CompostToo => 0.4,
    }
}

fn transport(response: &SurveyResponse) -> f64 {
    let km = annual_km(response.weekly_km);
    match response.primary_transport {
        TransportMode::BikeWalk => 0.0,
        TransportMode::PublicTransport => km * PUBLIC_TRANSPORT,
        TransportMode::CarAlone => km * car_factor(response.effective_fuel_type()),
        TransportMode::CarCarpool => {
            km * car_factor(response.effective_fuel_type()) * CARPOOL_MULTIPLIER
        }
    }
}

fn aviation(response: &SurveyResponse) -> f64 {
    f64::from(response.short_flights) * SHORT_HAUL_KM * FLIGHT_SHORT
        + f64::from(response.medium_flights) * MEDIUM_HAUL_KM * FLIGHT_MEDIUM
        + f64::from(response.long_flights) * LONG_HAUL_KM * FLIGHT_LONG
}

/// Computes a breakdown with the legacy factor set.
///
/// # Errors
///
/// Returns [`CalculationError::NonFinite`] if a category evaluates to a
/// non-finite or negative value, or [`CalculationError::Overflow`] if the
/// total does not fit.
pub fn calculate(response: &SurveyResponse) -> Result<EmissionBreakdown, CalculationError> {
    let energy = annual_kwh(response.monthly_energy_bill) * heating_factor(response.heating_type);
    let diet = diet_tonnes(response.diet_type) * 1000.0;
    let lifestyle =
        shopping_kg(response.shopping_frequency) * waste_reduction(response.waste_management);

    EmissionBreakdown::checked_new(
        round_kg(EmissionCategory::Transport, transport(response))?,
        round_kg(EmissionCategory::Energy, energy)?,
        round_kg(EmissionCategory::Diet, diet)?,
        round_kg(EmissionCategory::Lifestyle, lifestyle)?,
        round_kg(EmissionCategory::Travel, aviation(response))?,
        0,
        CalculationMethod::LocalLegacy,
    )
    .ok_or(CalculationError::Overflow)
}
