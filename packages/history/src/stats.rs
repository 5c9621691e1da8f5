//! Aggregate statistics over a user's stored calculations.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use ecozync_calculator::comparison::ComparisonMetrics;
use ecozync_history_models::{
    CalculationRecord, CalculationStats, CategoryBreakdown, MonthlyTrend, ReductionProgress,
};

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_u64(value: f64) -> u64 {
    value.round().max(0.0) as u64
}

#[allow(clippy::cast_precision_loss)]
fn mean(rows: &[&CalculationRecord], field: fn(&CalculationRecord) -> u64) -> f64 {
    rows.iter().map(|r| field(r)).sum::<u64>() as f64 / rows.len() as f64
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

/// Averages, category shares, monthly trend, and first-to-latest progress
/// for `rows`.
///
/// The monthly trend covers calculations dated on or after `today` minus
/// `months`, grouped by `YYYY-MM` in ascending order. Reduction progress
/// needs at least two calculations. Comparisons use the unrounded average
/// total. An empty history yields all-zero stats.
#[must_use]
pub fn compute_stats(rows: &[CalculationRecord], months: u32, today: NaiveDate) -> CalculationStats {
    if rows.is_empty() {
        return CalculationStats::default();
    }

    let mut sorted: Vec<&CalculationRecord> = rows.iter().collect();
    sorted.sort_by_key(|r| r.calculation_date);

    let avg_total = mean(&sorted, |r| r.total_emissions);
    let avg_transport = mean(&sorted, |r| r.transport_emissions);
    let avg_energy = mean(&sorted, |r| r.energy_emissions);
    let avg_diet = mean(&sorted, |r| r.diet_emissions);
    let avg_lifestyle = mean(&sorted, |r| r.lifestyle_emissions);
    let avg_travel = mean(&sorted, |r| r.travel_emissions);
    let avg_other = mean(&sorted, |r| r.other_emissions);

    let category_sum =
        avg_transport + avg_energy + avg_diet + avg_lifestyle + avg_travel + avg_other;

    let cutoff = today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN);

    let mut by_month: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for row in sorted.iter().filter(|r| r.calculation_date >= cutoff) {
        let entry = by_month
            .entry(row.calculation_date.format("%Y-%m").to_string())
            .or_default();
        entry.0 += row.total_emissions;
        entry.1 += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let monthly_trend = by_month
        .into_iter()
        .map(|(month, (total, count))| MonthlyTrend {
            month,
            avg_emissions: round_u64(total as f64 / count as f64),
            calculation_count: count,
        })
        .collect();

    let reduction_progress = match (sorted.first(), sorted.last()) {
        (Some(first), Some(latest)) if sorted.len() >= 2 => {
            #[allow(clippy::cast_precision_loss)]
            let (from, to) = (first.total_emissions as f64, latest.total_emissions as f64);
            Some(ReductionProgress {
                first_calculation_date: first.calculation_date,
                latest_calculation_date: latest.calculation_date,
                first_emissions: first.total_emissions,
                latest_emissions: latest.total_emissions,
                reduction_percentage: percent(from - to, from),
            })
        }
        _ => None,
    };

    CalculationStats {
        total_calculations: sorted.len() as u64,
        avg_total_emissions: round_u64(avg_total),
        avg_transport_emissions: round_u64(avg_transport),
        avg_energy_emissions: round_u64(avg_energy),
        avg_diet_emissions: round_u64(avg_diet),
        avg_lifestyle_emissions: round_u64(avg_lifestyle),
        avg_travel_emissions: round_u64(avg_travel),
        avg_other_emissions: round_u64(avg_other),
        monthly_trend,
        category_breakdown: CategoryBreakdown {
            transport_percentage: percent(avg_transport, category_sum),
            energy_percentage: percent(avg_energy, category_sum),
            diet_percentage: percent(avg_diet, category_sum),
            lifestyle_percentage: percent(avg_lifestyle, category_sum),
            travel_percentage: percent(avg_travel, category_sum),
            other_percentage: percent(avg_other, category_sum),
        },
        reduction_progress,
        comparison_metrics: ComparisonMetrics::from_total(avg_total),
    }
}
