//! Terminal formatting for calculation results.

use std::fmt::Write as _;

use ecozync_calculator::comparison::ComparisonMetrics;
use ecozync_calculator_models::{EmissionBreakdown, EmissionCategory};
use ecozync_history::anonymous::StoredCalculation;
use ecozync_history_models::{CalculationRecord, CalculationStats, Page};

/// Width of the bar drawn next to each category.
const BAR_WIDTH: u64 = 30;

#[allow(clippy::cast_precision_loss)]
fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("{value:.0}% above")
    } else {
        format!("{:.0}% below", -value)
    }
}

/// Formats a breakdown with per-category bars, impact band, and
/// comparisons.
#[must_use]
pub fn format_breakdown(breakdown: &EmissionBreakdown) -> String {
    let mut out = String::new();
    let total = breakdown.total_emissions;

    writeln!(out, "Your annual carbon footprint").unwrap();
    writeln!(out, "{}", "-".repeat(60)).unwrap();

    for (category, kg) in breakdown.categories() {
        let filled = if total == 0 { 0 } else { kg * BAR_WIDTH / total };
        writeln!(
            out,
            "{:<12} {:>7} kg {:>5.1}%  {}",
            category.label(),
            kg,
            share(kg, total),
            "#".repeat(usize::try_from(filled).unwrap_or(0)),
        )
        .unwrap();
    }

    #[allow(clippy::cast_precision_loss)]
    let tonnes = total as f64 / 1000.0;
    writeln!(out, "{}", "-".repeat(60)).unwrap();
    writeln!(
        out,
        "{:<12} {:>7} kg ({tonnes:.1} t CO2e/year)",
        "Total", total
    )
    .unwrap();

    let level = breakdown.impact_level();
    writeln!(out).unwrap();
    writeln!(out, "Impact: {} - {}", level.label(), level.message()).unwrap();
    writeln!(
        out,
        "Method: {} (confidence {:.0}%)",
        breakdown.calculation_method,
        breakdown.confidence_score * 100.0
    )
    .unwrap();

    #[allow(clippy::cast_precision_loss)]
    let comparison = ComparisonMetrics::from_total(total as f64);
    writeln!(out).unwrap();
    out.push_str(&format_comparison(&comparison));

    out
}

/// Formats comparison metrics.
#[must_use]
pub fn format_comparison(metrics: &ComparisonMetrics) -> String {
    let mut out = String::new();
    writeln!(out, "EU average:     {}", signed_percent(metrics.vs_eu_average)).unwrap();
    writeln!(out, "Global average: {}", signed_percent(metrics.vs_global_average)).unwrap();
    writeln!(out, "Paris target:   {}", signed_percent(metrics.vs_paris_target)).unwrap();
    writeln!(
        out,
        "Equivalent to {} trees absorbing CO2 for a year, or {} km by car.",
        metrics.trees_to_offset, metrics.equivalent_car_kilometers
    )
    .unwrap();
    out
}

/// Formats a page of stored calculations as a table.
#[must_use]
pub fn format_records(page: &Page<CalculationRecord>) -> String {
    let mut out = String::new();

    writeln!(
        out,
        "{:<6} {:<12} {:>9} {:<10} {:<15}",
        "ID", "DATE", "TOTAL KG", "IMPACT", "METHOD"
    )
    .unwrap();
    writeln!(out, "{}", "-".repeat(60)).unwrap();

    for record in &page.data {
        writeln!(
            out,
            "{:<6} {:<12} {:>9} {:<10} {:<15}",
            record.id,
            record.calculation_date,
            record.total_emissions,
            record.breakdown().impact_level().label(),
            record.calculation_method,
        )
        .unwrap();
    }

    writeln!(
        out,
        "\nPage {} of {} ({} calculation(s))",
        page.page,
        page.total_pages.max(1),
        page.count
    )
    .unwrap();
    out
}

/// Formats the anonymous on-device history.
#[must_use]
pub fn format_anonymous_history(history: &[StoredCalculation]) -> String {
    let mut out = String::new();

    writeln!(out, "{:<22} {:>9} {:<10}", "DATE", "TOTAL KG", "IMPACT").unwrap();
    writeln!(out, "{}", "-".repeat(45)).unwrap();

    for entry in history {
        writeln!(
            out,
            "{:<22} {:>9} {:<10}",
            entry.date.format("%Y-%m-%d %H:%M"),
            entry.results.total_emissions,
            entry.results.impact_level().label(),
        )
        .unwrap();
    }

    out
}

/// Formats aggregate statistics.
#[must_use]
pub fn format_stats(stats: &CalculationStats) -> String {
    let mut out = String::new();

    if stats.total_calculations == 0 {
        writeln!(out, "No calculations yet.").unwrap();
        return out;
    }

    writeln!(out, "Calculations:     {}", stats.total_calculations).unwrap();
    writeln!(out, "Average total:    {} kg", stats.avg_total_emissions).unwrap();
    writeln!(out).unwrap();

    let b = &stats.category_breakdown;
    let rows = [
        (EmissionCategory::Transport, stats.avg_transport_emissions, b.transport_percentage),
        (EmissionCategory::Energy, stats.avg_energy_emissions, b.energy_percentage),
        (EmissionCategory::Diet, stats.avg_diet_emissions, b.diet_percentage),
        (EmissionCategory::Lifestyle, stats.avg_lifestyle_emissions, b.lifestyle_percentage),
        (EmissionCategory::Travel, stats.avg_travel_emissions, b.travel_percentage),
        (EmissionCategory::Other, stats.avg_other_emissions, b.other_percentage),
    ];
    for (category, kg, pct) in rows {
        writeln!(out, "{:<12} {kg:>7} kg {pct:>5.1}%", category.label()).unwrap();
    }

    if !stats.monthly_trend.is_empty() {
        writeln!(out, "\nMonthly trend").unwrap();
        for month in &stats.monthly_trend {
            writeln!(
                out,
                "  {}  {:>7} kg  ({} calculation(s))",
                month.month, month.avg_emissions, month.calculation_count
            )
            .unwrap();
        }
    }

    if let Some(progress) = &stats.reduction_progress {
        writeln!(
            out,
            "\nSince {}: {} kg -> {} kg ({:+.1}% reduction)",
            progress.first_calculation_date,
            progress.first_emissions,
            progress.latest_emissions,
            progress.reduction_percentage
        )
        .unwrap();
    }

    writeln!(out).unwrap();
    out.push_str(&format_comparison(&stats.comparison_metrics));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecozync_calculator_models::{CalculationMethod, EmissionCategory};

    #[test]
    fn breakdown_lists_every_category_and_total() {
        let b = EmissionBreakdown::new(1000, 500, 1500, 300, 0, 80, CalculationMethod::LocalLegacy);
        let text = format_breakdown(&b);
        for category in EmissionCategory::all() {
            assert!(text.contains(category.label()), "{category}");
        }
        assert!(text.contains("3380 kg"));
        assert!(text.contains("Impact: Good"));
        assert!(text.contains("confidence 85%"));
    }

    #[test]
    fn zero_total_has_no_bars() {
        let b = EmissionBreakdown::new(0, 0, 0, 0, 0, 0, CalculationMethod::LocalEnhanced);
        assert!(!format_breakdown(&b).contains('#'));
    }

    #[test]
    fn empty_stats_message() {
        assert_eq!(format_stats(&CalculationStats::default()), "No calculations yet.\n");
    }

    #[test]
    fn comparison_direction() {
        assert_eq!(signed_percent(12.4), "12% above");
        assert_eq!(signed_percent(-50.0), "50% below");
    }
}
