#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the Ecozync server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the calculator and history types to allow independent evolution of
//! the API contract.

use chrono::NaiveDate;
use ecozync_assessment::{Assessment, to_survey_response};
use ecozync_assessment::survey::{Question, QuestionOption};
use ecozync_calculator::comparison::ComparisonMetrics;
use ecozync_calculator::factors::{DataSource, EmissionFactor, FactorCategory};
use ecozync_calculator_models::{EmissionBreakdown, ImpactLevel, SurveyResponse};
use ecozync_history_models::{
    CalculationFilters, DEFAULT_PAGE_SIZE, DEFAULT_STATS_MONTHS,
};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// An emission factor as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEmissionFactor {
    pub category: String,
    pub key: String,
    pub subcategory: String,
    /// kg CO2e per `unit`.
    pub factor: f64,
    pub unit: String,
    pub source: String,
    pub region: String,
    pub year: u16,
}

impl From<&EmissionFactor> for ApiEmissionFactor {
    fn from(f: &EmissionFactor) -> Self {
        Self {
            category: f.category.to_string(),
            key: f.key.to_string(),
            subcategory: f.subcategory.to_string(),
            factor: f.factor,
            unit: f.unit.to_string(),
            source: f.source.to_string(),
            region: f.region.to_string(),
            year: f.year,
        }
    }
}

/// A cited dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDataSource {
    pub id: String,
    pub name: String,
    pub url: String,
    pub year: u16,
}

impl From<&DataSource> for ApiDataSource {
    fn from(s: &DataSource) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.to_string(),
            url: s.url.to_string(),
            year: s.year,
        }
    }
}

/// The full factor table with its sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFactorTable {
    /// Category names in display order.
    pub categories: Vec<String>,
    pub factors: Vec<ApiEmissionFactor>,
    pub sources: Vec<ApiDataSource>,
}

impl ApiFactorTable {
    /// Builds the response from a factor slice.
    #[must_use]
    pub fn new(factors: &[EmissionFactor], sources: &[DataSource]) -> Self {
        Self {
            categories: FactorCategory::all()
                .iter()
                .map(ToString::to_string)
                .collect(),
            factors: factors.iter().map(ApiEmissionFactor::from).collect(),
            sources: sources.iter().map(ApiDataSource::from).collect(),
        }
    }
}

/// A survey answer option.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQuestionOption {
    pub value: String,
    pub label: String,
    pub description: String,
    /// Qualitative impact, e.g. `very_low`.
    pub impact: String,
}

impl From<&QuestionOption> for ApiQuestionOption {
    fn from(o: &QuestionOption) -> Self {
        Self {
            value: o.value.to_string(),
            label: o.label.to_string(),
            description: o.description.to_string(),
            impact: o.impact.to_string(),
        }
    }
}

/// A survey question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQuestion {
    pub id: u8,
    pub question: String,
    pub subtitle: String,
    /// Assessment section the answer is stored under.
    pub category: String,
    /// Assessment field the answer is stored in.
    pub field: String,
    pub options: Vec<ApiQuestionOption>,
}

impl From<&Question> for ApiQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            question: q.prompt.to_string(),
            subtitle: q.subtitle.to_string(),
            category: q.section.to_string(),
            field: q.field.to_string(),
            options: q.options.iter().map(ApiQuestionOption::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Assessment wrapped in an object, as sent by the survey form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentBody {
    pub assessment: Assessment,
}

/// Body of `POST /api/calculate`.
///
/// Either `{ "assessment": { ... } }` or a bare survey response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalculateRequest {
    Assessment(AssessmentBody),
    Survey(SurveyResponse),
}

impl CalculateRequest {
    /// Resolves the request to calculator input.
    #[must_use]
    pub fn survey_response(&self) -> SurveyResponse {
        match self {
            Self::Assessment(body) => to_survey_response(&body.assessment),
            Self::Survey(response) => response.clone(),
        }
    }
}

/// A calculation result with its impact band and comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCalculation {
    pub breakdown: EmissionBreakdown,
    pub impact_level: ImpactLevel,
    pub impact_label: String,
    pub impact_message: String,
    pub comparison: ComparisonMetrics,
}

impl From<EmissionBreakdown> for ApiCalculation {
    #[allow(clippy::cast_precision_loss)]
    fn from(breakdown: EmissionBreakdown) -> Self {
        let level = breakdown.impact_level();
        Self {
            breakdown,
            impact_level: level,
            impact_label: level.label().to_string(),
            impact_message: level.message().to_string(),
            comparison: ComparisonMetrics::from_total(breakdown.total_emissions as f64),
        }
    }
}

/// Body of `POST /api/calculations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCalculationRequest {
    /// Defaults to today (UTC).
    #[serde(default)]
    pub calculation_date: Option<NaiveDate>,
    pub assessment: Assessment,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/calculations`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationListParams {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Rows per page (max 100).
    pub page_size: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_emissions: Option<u64>,
    pub max_emissions: Option<u64>,
}

impl CalculationListParams {
    #[must_use]
    pub const fn filters(&self) -> CalculationFilters {
        CalculationFilters {
            start_date: self.start_date,
            end_date: self.end_date,
            min_emissions: self.min_emissions,
            max_emissions: self.max_emissions,
        }
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Query parameters for `GET /api/calculations/stats`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsParams {
    /// Trend window in months.
    pub months: Option<u32>,
}

impl StatsParams {
    #[must_use]
    pub fn months(&self) -> u32 {
        self.months.unwrap_or(DEFAULT_STATS_MONTHS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecozync_calculator_models::{DietType, HeatingType};

    #[test]
    fn calculate_request_accepts_wrapped_assessment() {
        let req: CalculateRequest = serde_json::from_str(
            r#"{ "assessment": { "energy": { "heating_type": "oil" } } }"#,
        )
        .unwrap();
        assert!(matches!(req, CalculateRequest::Assessment(_)));
        assert_eq!(req.survey_response().heating_type, HeatingType::Oil);
    }

    #[test]
    fn calculate_request_accepts_survey_response() {
        let req: CalculateRequest = serde_json::from_str(
            r#"{ "monthly_energy_bill": 100, "weekly_km": 0, "diet_type": "vegan" }"#,
        )
        .unwrap();
        assert!(matches!(req, CalculateRequest::Survey(_)));
        assert_eq!(req.survey_response().diet_type, DietType::Vegan);
    }

    #[test]
    fn save_request_date_is_optional() {
        let req: SaveCalculationRequest =
            serde_json::from_str(r#"{ "assessment": {} }"#).unwrap();
        assert!(req.calculation_date.is_none());

        let req: SaveCalculationRequest = serde_json::from_str(
            r#"{ "calculationDate": "2025-02-03", "assessment": {} }"#,
        )
        .unwrap();
        assert_eq!(req.calculation_date, NaiveDate::from_ymd_opt(2025, 2, 3));
    }

    #[test]
    fn api_calculation_carries_impact_band() {
        let breakdown = EmissionBreakdown::new(
            5000,
            4000,
            3000,
            0,
            0,
            0,
            ecozync_calculator_models::CalculationMethod::LocalEnhanced,
        );
        let api = ApiCalculation::from(breakdown);
        assert_eq!(api.impact_level, ImpactLevel::High);
        assert_eq!(api.impact_label, "High");
    }

    #[test]
    fn list_params_default_paging() {
        let params = CalculationListParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(StatsParams::default().months(), 12);
    }
}
