#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for stored calculations.
//!
//! These are the wire shapes of the calculation store: one
//! [`CalculationRecord`] per user per calculation date, the filters and
//! pagination used to list them, and the aggregate [`CalculationStats`]
//! derived from a user's full history.

use chrono::NaiveDate;
use ecozync_assessment::Assessment;
use ecozync_calculator::comparison::ComparisonMetrics;
use ecozync_calculator_models::{CalculationMethod, EmissionBreakdown};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default statistics window in months.
pub const DEFAULT_STATS_MONTHS: u32 = 12;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A stored calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    /// Row id.
    pub id: i64,
    /// Owning user.
    pub user_id: String,
    /// Day the calculation applies to. At most one row per user per day.
    pub calculation_date: NaiveDate,
    /// Answers the calculation was computed from.
    pub assessment_data: Assessment,
    pub transport_emissions: u64,
    pub energy_emissions: u64,
    pub diet_emissions: u64,
    pub lifestyle_emissions: u64,
    pub travel_emissions: u64,
    pub other_emissions: u64,
    pub total_emissions: u64,
    pub calculation_method: CalculationMethod,
    pub calculation_confidence: f64,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last upsert.
    pub updated_at: String,
}

impl CalculationRecord {
    /// Reassembles the calculator output stored in this row.
    #[must_use]
    pub const fn breakdown(&self) -> EmissionBreakdown {
        EmissionBreakdown {
            transport_emissions: self.transport_emissions,
            energy_emissions: self.energy_emissions,
            diet_emissions: self.diet_emissions,
            lifestyle_emissions: self.lifestyle_emissions,
            travel_emissions: self.travel_emissions,
            other_emissions: self.other_emissions,
            total_emissions: self.total_emissions,
            confidence_score: self.calculation_confidence,
            calculation_method: self.calculation_method,
        }
    }
}

/// Whether an upsert inserted a new row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// Result of saving a calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedCalculation {
    pub outcome: SaveOutcome,
    pub record: CalculationRecord,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Optional filters for listing calculations. All bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationFilters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_emissions: Option<u64>,
    pub max_emissions: Option<u64>,
}

/// Clamps a requested page number to at least 1.
#[must_use]
pub const fn normalize_page(page: u32) -> u32 {
    if page == 0 { 1 } else { page }
}

/// Clamps a requested page size into `1..=MAX_PAGE_SIZE`.
#[must_use]
pub const fn normalize_page_size(page_size: u32) -> u32 {
    if page_size == 0 {
        1
    } else if page_size > MAX_PAGE_SIZE {
        MAX_PAGE_SIZE
    } else {
        page_size
    }
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Total rows matching the filters across all pages.
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Builds a page, normalizing `page` and `page_size` and deriving the
    /// navigation flags from `count`.
    #[must_use]
    pub fn new(data: Vec<T>, count: u64, page: u32, page_size: u32) -> Self {
        let page = normalize_page(page);
        let page_size = normalize_page_size(page_size);
        let total_pages =
            u32::try_from(count.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX);

        Self {
            data,
            count,
            page,
            page_size,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }

    /// Zero-based row offset of this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Average total for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM`.
    pub month: String,
    pub avg_emissions: u64,
    pub calculation_count: u64,
}

/// Share of the average footprint per category, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub transport_percentage: f64,
    pub energy_percentage: f64,
    pub diet_percentage: f64,
    pub lifestyle_percentage: f64,
    pub travel_percentage: f64,
    pub other_percentage: f64,
}

/// Change between the oldest and newest calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionProgress {
    pub first_calculation_date: NaiveDate,
    pub latest_calculation_date: NaiveDate,
    pub first_emissions: u64,
    pub latest_emissions: u64,
    /// Positive when emissions went down.
    pub reduction_percentage: f64,
}

/// Aggregate statistics over a user's calculations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationStats {
    pub total_calculations: u64,
    pub avg_total_emissions: u64,
    pub avg_transport_emissions: u64,
    pub avg_energy_emissions: u64,
    pub avg_diet_emissions: u64,
    pub avg_lifestyle_emissions: u64,
    pub avg_travel_emissions: u64,
    pub avg_other_emissions: u64,
    pub monthly_trend: Vec<MonthlyTrend>,
    pub category_breakdown: CategoryBreakdown,
    pub reduction_progress: Option<ReductionProgress>,
    pub comparison_metrics: ComparisonMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(normalize_page_size(0), 1);
        assert_eq!(normalize_page_size(20), 20);
        assert_eq!(normalize_page_size(500), MAX_PAGE_SIZE);
        assert_eq!(normalize_page(0), 1);
    }

    #[test]
    fn page_navigation_flags() {
        let first: Page<u8> = Page::new(vec![], 45, 1, 20);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next);
        assert!(!first.has_previous);
        assert_eq!(first.offset(), 0);

        let last: Page<u8> = Page::new(vec![], 45, 3, 20);
        assert!(!last.has_next);
        assert!(last.has_previous);
        assert_eq!(last.offset(), 40);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page: Page<u8> = Page::new(vec![], 0, 1, 20);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn default_stats_are_zeroed() {
        let stats = CalculationStats::default();
        assert_eq!(stats.total_calculations, 0);
        assert!(stats.monthly_trend.is_empty());
        assert!(stats.reduction_progress.is_none());
        assert_eq!(stats.comparison_metrics.trees_to_offset, 0);
        assert!(stats.comparison_metrics.vs_eu_average.abs() < f64::EPSILON);
    }

    #[test]
    fn filters_deserialize_from_partial_json() {
        let filters: CalculationFilters =
            serde_json::from_str(r#"{ "start_date": "2025-01-01", "min_emissions": 1000 }"#)
                .unwrap();
        assert_eq!(
            filters.start_date,
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(filters.min_emissions, Some(1000));
        assert!(filters.end_date.is_none());
    }
}
