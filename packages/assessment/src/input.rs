//! Loading calculator input from JSON or TOML files.

use std::path::Path;

use ecozync_calculator_models::SurveyResponse;
use serde::{Deserialize, Serialize};

use crate::{Assessment, AssessmentError, to_survey_response};

/// Either a ready survey response or raw assessment answers.
///
/// A survey response is tried first; it requires the numeric bill and
/// distance fields, which an assessment never has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalculatorInput {
    Survey(SurveyResponse),
    Assessment(Assessment),
}

impl CalculatorInput {
    /// Resolves the input to a survey response.
    #[must_use]
    pub fn into_survey_response(self) -> SurveyResponse {
        match self {
            Self::Survey(response) => response,
            Self::Assessment(assessment) => to_survey_response(&assessment),
        }
    }

    /// The assessment answers, if this input carries them.
    #[must_use]
    pub const fn assessment(&self) -> Option<&Assessment> {
        match self {
            Self::Survey(_) => None,
            Self::Assessment(assessment) => Some(assessment),
        }
    }

    /// Parses JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::Json`] if the text is neither shape.
    pub fn from_json(text: &str) -> Result<Self, AssessmentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::Toml`] if the text is neither shape.
    pub fn from_toml(text: &str) -> Result<Self, AssessmentError> {
        Ok(toml::from_str(text)?)
    }
}

/// Reads calculator input from a `.json` or `.toml` file.
///
/// # Errors
///
/// * [`AssessmentError::UnsupportedFormat`] for any other extension
/// * [`AssessmentError::Io`] if the file cannot be read
/// * a parse error if the content is malformed
pub fn load(path: &Path) -> Result<CalculatorInput, AssessmentError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    log::debug!("Loading calculator input from {}", path.display());

    match ext.as_str() {
        "json" => CalculatorInput::from_json(&std::fs::read_to_string(path)?),
        "toml" => CalculatorInput::from_toml(&std::fs::read_to_string(path)?),
        _ => Err(AssessmentError::UnsupportedFormat(
            path.display().to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecozync_calculator_models::{HeatingType, TransportMode};

    #[test]
    fn json_survey_response_is_detected() {
        let input = CalculatorInput::from_json(
            r#"{
                "heating_type": "gas",
                "monthly_energy_bill": 80,
                "primary_transport": "bike_walk",
                "weekly_km": 10,
                "diet_type": "vegan",
                "shopping_frequency": "rarely",
                "waste_management": "compost_too"
            }"#,
        )
        .unwrap();
        assert!(input.assessment().is_none());
        let response = input.into_survey_response();
        assert_eq!(response.heating_type, HeatingType::Gas);
        assert!((response.monthly_energy_bill - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn json_assessment_is_detected() {
        let input =
            CalculatorInput::from_json(r#"{ "transport": { "primary_transport": "car_carpool" } }"#)
                .unwrap();
        assert!(input.assessment().is_some());
        assert_eq!(
            input.into_survey_response().primary_transport,
            TransportMode::CarCarpool
        );
    }

    #[test]
    fn toml_assessment_parses() {
        let input = CalculatorInput::from_toml(
            "[energy]\nheating_type = \"oil\"\nmonthly_energy_cost = \"200+\"\n",
        )
        .unwrap();
        let response = input.into_survey_response();
        assert_eq!(response.heating_type, HeatingType::Oil);
        assert!((response.monthly_energy_bill - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn misspelled_survey_response_is_rejected() {
        let err = CalculatorInput::from_json(
            r#"{
                "heating_type": "oil",
                "monthly_energy_bill": 250,
                "primary_transport": "car_alone",
                "weekly_kms": 400,
                "diet_type": "vegan"
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, AssessmentError::Json(_)));
    }

    #[test]
    fn unknown_assessment_field_is_rejected() {
        assert!(CalculatorInput::from_json(r#"{ "diet": { "diet": "vegan" } }"#).is_err());
        assert!(CalculatorInput::from_toml("[food]\ndiet_type = \"vegan\"\n").is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load(Path::new("answers.yaml")).unwrap_err();
        assert!(matches!(err, AssessmentError::UnsupportedFormat(_)));
    }

    #[test]
    fn load_reads_json_file() {
        let dir = std::env::temp_dir().join("ecozync_assessment_input_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("answers.json");
        std::fs::write(&path, r#"{ "diet": { "diet_type": "vegan" } }"#).unwrap();

        let input = load(&path).unwrap();
        assert!(input.assessment().is_some());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
