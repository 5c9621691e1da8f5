//! Primary calculation path over the comprehensive factor table.
//!
//! Every function returns the raw (unrounded) annual kg CO2e for one
//! category. Factor lookups go through [`FactorTable::require`] so a table
//! missing an entry surfaces as [`CalculationError::MissingFactor`] and the
//! caller can fall back to the legacy path.

use ecozync_calculator_models::{
    CalculationMethod, DietType, EmissionBreakdown, EmissionCategory, FuelType, HeatingType,
    ShoppingFrequency, SurveyResponse, TransportMode, WasteManagement,
};

use crate::factors::{FactorCategory, FactorTable, electricity_key_for_region};
use crate::{
    CARPOOL_MULTIPLIER, CalculationError, LONG_HAUL_KM, MEDIUM_HAUL_KM, SHORT_HAUL_KM,
    annual_kwh, annual_km, round_kg,
};

/// Home energy emissions.
///
/// # Errors
///
/// Returns [`CalculationError::MissingFactor`] if the table lacks the
/// heating factor.
pub fn energy(table: &FactorTable<'_>, response: &SurveyResponse) -> Result<f64, CalculationError> {
    let factor = match response.heating_type {
        HeatingType::Gas => table.require(FactorCategory::Heating, "natural_gas")?,
        HeatingType::Renewable => table.require(FactorCategory::Electricity, "renewable")?,
        HeatingType::Oil => table.require(FactorCategory::Heating, "heating_oil")?,
        HeatingType::Electric => {
            table.require(FactorCategory::Electricity, electricity_key_for_region("eu"))?
        }
    };

    Ok(annual_kwh(response.monthly_energy_bill) * factor)
}

/// Ground transport emissions.
///
/// # Errors
///
/// Returns [`CalculationError::MissingFactor`] if the table lacks the
/// transport factor for the selected mode.
pub fn transport(
    table: &FactorTable<'_>,
    response: &SurveyResponse,
) -> Result<f64, CalculationError> {
    let km = annual_km(response.weekly_km);

    match response.primary_transport {
        TransportMode::BikeWalk => Ok(0.0),
        TransportMode::PublicTransport => {
            Ok(km * table.require(FactorCategory::Transport, "bus_local")?)
        }
        mode @ (TransportMode::CarAlone | TransportMode::CarCarpool) => {
            let key = match response.effective_fuel_type() {
                FuelType::Electric => "car_electric",
                FuelType::Hybrid => "car_hybrid",
                FuelType::Diesel => "car_diesel_medium",
                FuelType::Gasoline => "car_petrol_medium",
            };
            let factor = table.require(FactorCategory::Transport, key)?;
            let occupancy = if mode == TransportMode::CarCarpool {
                CARPOOL_MULTIPLIER
            } else {
                1.0
            };
            Ok(km * factor * occupancy)
        }
    }
}

/// Aviation emissions across the three haul bands, economy class.
///
/// # Errors
///
/// Returns [`CalculationError::MissingFactor`] if any economy factor is
/// missing.
pub fn aviation(
    table: &FactorTable<'_>,
    response: &SurveyResponse,
) -> Result<f64, CalculationError> {
    let short = table.require(FactorCategory::Aviation, "flight_short_economy")?;
    let medium = table.require(FactorCategory::Aviation, "flight_medium_economy")?;
    let long = table.require(FactorCategory::Aviation, "flight_long_economy")?;

    Ok(f64::from(response.short_flights) * SHORT_HAUL_KM * short
        + f64::from(response.medium_flights) * MEDIUM_HAUL_KM * medium
        + f64::from(response.long_flights) * LONG_HAUL_KM * long)
}

/// Annual diet emissions. Pescatarian uses the moderate-meat bucket.
///
/// # Errors
///
/// Returns [`CalculationError::MissingFactor`] if the diet factor is missing.
pub fn diet(table: &FactorTable<'_>, response: &SurveyResponse) -> Result<f64, CalculationError> {
    let key = match response.diet_type {
        DietType::Vegan => "vegan",
        DietType::Vegetarian => "vegetarian",
        DietType::Pescatarian => "meat_sometimes",
        DietType::Omnivore => "meat_daily",
    };
    table.require(FactorCategory::Diet, key)
}

/// Annual consumption emissions by shopping frequency.
///
/// # Errors
///
/// Returns [`CalculationError::MissingFactor`] if the shopping factor is
/// missing.
pub fn lifestyle(
    table: &FactorTable<'_>,
    response: &SurveyResponse,
) -> Result<f64, CalculationError> {
    let key = match response.shopping_frequency {
        ShoppingFrequency::Monthly => "shopping_monthly",
        ShoppingFrequency::EveryFewMonths => "shopping_quarterly",
        ShoppingFrequency::Yearly => "shopping_yearly",
        ShoppingFrequency::Rarely => "shopping_rarely",
    };
    table.require(FactorCategory::Consumption, key)
}

/// Annual household waste emissions.
///
/// # Errors
///
/// Returns [`CalculationError::MissingFactor`] if the waste factor is
/// missing.
pub fn waste(table: &FactorTable<'_>, response: &SurveyResponse) -> Result<f64, CalculationError> {
    let key = match response.waste_management {
        WasteManagement::EverythingTrash => "waste_everything_trash",
        WasteManagement::SomeRecycling => "waste_some_recycling",
        WasteManagement::MostlyRecycle => "waste_mostly_recycle",
        WasteManagement::CompostToo => "waste_compost_recycle",
    };
    table.require(FactorCategory::Waste, key)
}

/// Runs every category against `table` and rounds each one.
///
/// # Errors
///
/// Returns [`CalculationError`] if a factor is missing, a category
/// produces a non-finite or negative value, or the total overflows.
pub fn calculate(
    table: &FactorTable<'_>,
    response: &SurveyResponse,
) -> Result<EmissionBreakdown, CalculationError> {
    EmissionBreakdown::checked_new(
        round_kg(EmissionCategory::Transport, transport(table, response)?)?,
        round_kg(EmissionCategory::Energy, energy(table, response)?)?,
        round_kg(EmissionCategory::Diet, diet(table, response)?)?,
        round_kg(EmissionCategory::Lifestyle, lifestyle(table, response)?)?,
        round_kg(EmissionCategory::Travel, aviation(table, response)?)?,
        round_kg(EmissionCategory::Other, waste(table, response)?)?,
        CalculationMethod::LocalEnhanced,
    )
    .ok_or(CalculationError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> SurveyResponse {
        SurveyResponse {
            heating_type: HeatingType::Gas,
            monthly_energy_bill: 100.0,
            primary_transport: TransportMode::CarAlone,
            fuel_type: Some(FuelType::Diesel),
            weekly_km: 200.0,
            short_flights: 1,
            medium_flights: 1,
            long_flights: 1,
            diet_type: DietType::Vegetarian,
            shopping_frequency: ShoppingFrequency::EveryFewMonths,
            waste_management: WasteManagement::MostlyRecycle,
        }
    }

    #[test]
    fn energy_uses_heating_specific_factor() {
        let table = FactorTable::COMPREHENSIVE;
        let mut r = response();
        // 100 * 12 / 0.25 = 4800 kWh
        assert!((energy(&table, &r).unwrap() - 4800.0 * 0.202).abs() < 1e-9);
        r.heating_type = HeatingType::Oil;
        assert!((energy(&table, &r).unwrap() - 4800.0 * 0.245).abs() < 1e-9);
        r.heating_type = HeatingType::Electric;
        assert!((energy(&table, &r).unwrap() - 4800.0 * 0.295).abs() < 1e-9);
    }

    #[test]
    fn bike_walk_is_zero_regardless_of_distance() {
        let table = FactorTable::COMPREHENSIVE;
        let mut r = response();
        r.primary_transport = TransportMode::BikeWalk;
        r.weekly_km = 10_000.0;
        assert!(transport(&table, &r).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn bike_walk_needs_no_factor_lookup() {
        let table = FactorTable::new(&[]);
        let mut r = response();
        r.primary_transport = TransportMode::BikeWalk;
        assert!(transport(&table, &r).is_ok());
    }

    #[test]
    fn carpool_is_exactly_half_of_driving_alone() {
        let table = FactorTable::COMPREHENSIVE;
        for fuel in FuelType::all() {
            let mut alone = response();
            alone.fuel_type = Some(*fuel);
            let mut pool = alone.clone();
            pool.primary_transport = TransportMode::CarCarpool;

            let a = transport(&table, &alone).unwrap();
            let p = transport(&table, &pool).unwrap();
            assert_eq!(p.to_bits(), (a * 0.5).to_bits(), "{fuel}");
        }
    }

    #[test]
    fn absent_fuel_type_uses_petrol_medium_car() {
        let table = FactorTable::COMPREHENSIVE;
        let mut r = response();
        r.fuel_type = None;
        let expected = 200.0 * 52.0 * 0.192;
        assert!((transport(&table, &r).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn public_transport_uses_local_bus() {
        let table = FactorTable::COMPREHENSIVE;
        let mut r = response();
        r.primary_transport = TransportMode::PublicTransport;
        assert!((transport(&table, &r).unwrap() - 200.0 * 52.0 * 0.082).abs() < 1e-9);
    }

    #[test]
    fn aviation_sums_haul_bands() {
        let table = FactorTable::COMPREHENSIVE;
        let expected = 500.0 * 0.255 + 1500.0 * 0.195 + 8000.0 * 0.150;
        assert!((aviation(&table, &response()).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn pescatarian_maps_to_moderate_meat() {
        let table = FactorTable::COMPREHENSIVE;
        let mut r = response();
        r.diet_type = DietType::Pescatarian;
        assert!((diet(&table, &r).unwrap() - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lookup_tables_match_reference_values() {
        let table = FactorTable::COMPREHENSIVE;
        let mut r = response();
        let shopping = [
            (ShoppingFrequency::Monthly, 2400.0),
            (ShoppingFrequency::EveryFewMonths, 1200.0),
            (ShoppingFrequency::Yearly, 600.0),
            (ShoppingFrequency::Rarely, 300.0),
        ];
        for (freq, kg) in shopping {
            r.shopping_frequency = freq;
            assert!((lifestyle(&table, &r).unwrap() - kg).abs() < f64::EPSILON);
        }
        let waste_kg = [
            (WasteManagement::EverythingTrash, 580.0),
            (WasteManagement::SomeRecycling, 350.0),
            (WasteManagement::MostlyRecycle, 150.0),
            (WasteManagement::CompostToo, 80.0),
        ];
        for (handling, kg) in waste_kg {
            r.waste_management = handling;
            assert!((waste(&table, &r).unwrap() - kg).abs() < f64::EPSILON);
        }
    }
}
