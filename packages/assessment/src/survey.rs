//! The eight-question survey catalogue.

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::{Assessment, AssessmentError, Section};

/// Qualitative impact shown next to an option.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImpactHint {
    /// No emissions, e.g. walking.
    None,
    /// Well below average.
    VeryLow,
    /// Below average.
    Low,
    /// Around average.
    Medium,
    /// Above average.
    High,
    /// Well above average.
    VeryHigh,
}

impl ImpactHint {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

/// One selectable answer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuestionOption {
    /// Value stored in the [`Assessment`].
    pub value: &'static str,
    /// Short name shown in the option list.
    pub label: &'static str,
    /// One-line explanation of the option.
    pub description: &'static str,
    /// Expected impact of choosing this option.
    pub impact: ImpactHint,
}

/// A survey question bound to one assessment field.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    /// 1-based position in the survey.
    pub id: u8,
    /// The question text.
    pub prompt: &'static str,
    /// Context shown under the question.
    pub subtitle: &'static str,
    /// Assessment section the answer is stored under.
    pub section: Section,
    /// Field within `section` the answer is stored in.
    pub field: &'static str,
    /// Selectable answers in display order.
    pub options: &'static [QuestionOption],
}

impl Question {
    /// Finds the option with `value`.
    #[must_use]
    pub fn option(&self, value: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Records the option at `index` into `assessment`.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::UnknownField`] if the question is bound to
    /// a field the assessment does not have. An out-of-range `index` is
    /// ignored.
    pub fn answer(&self, assessment: &mut Assessment, index: usize) -> Result<(), AssessmentError> {
        if let Some(option) = self.options.get(index) {
            assessment.set_answer(self.section, self.field, option.value)?;
        }
        Ok(())
    }
}

const fn opt(
    value: &'static str,
    label: &'static str,
    description: &'static str,
    impact: ImpactHint,
) -> QuestionOption {
    QuestionOption {
        value,
        label,
        description,
        impact,
    }
}

/// All survey questions in the order they are asked.
pub static QUESTIONS: &[Question] = &[
    Question {
        id: 1,
        prompt: "How do you primarily heat your home?",
        subtitle: "Understanding your heating source helps us calculate your energy emissions.",
        section: Section::Energy,
        field: "heating_type",
        options: &[
            opt("gas", "Natural Gas", "Traditional gas heating", ImpactHint::High),
            opt("electric", "Electricity", "Electric heating", ImpactHint::Medium),
            opt("renewable", "Renewable", "Solar, heat pump, etc.", ImpactHint::Low),
            opt("oil", "Oil", "Oil-based heating", ImpactHint::VeryHigh),
        ],
    },
    Question {
        id: 2,
        prompt: "What's your average monthly energy bill?",
        subtitle: "This helps estimate your household energy consumption in kilowatt-hours.",
        section: Section::Energy,
        field: "monthly_energy_cost",
        options: &[
            opt("0-50", "€0-50", "Very efficient usage", ImpactHint::VeryLow),
            opt("50-100", "€50-100", "Average household", ImpactHint::Low),
            opt("100-200", "€100-200", "Higher consumption", ImpactHint::Medium),
            opt("200+", "€200+", "Significant usage", ImpactHint::High),
        ],
    },
    Question {
        id: 3,
        prompt: "How do you mainly get around?",
        subtitle: "Transportation is often the largest source of personal carbon emissions.",
        section: Section::Transport,
        field: "primary_transport",
        options: &[
            opt("car_alone", "Car (alone)", "Alone most of the time", ImpactHint::High),
            opt("car_carpool", "Car (carpool)", "Share rides regularly", ImpactHint::Medium),
            opt("public_transport", "Public transport", "Bus, train, metro", ImpactHint::Low),
            opt("bike_walk", "Bike or walk", "Active transportation", ImpactHint::VeryLow),
        ],
    },
    Question {
        id: 4,
        prompt: "How many kilometers do you travel weekly?",
        subtitle: "Include your regular commute, errands, and typical weekly travel.",
        section: Section::Transport,
        field: "weekly_distance",
        options: &[
            opt("0-50", "0-50 km", "Mostly local travel", ImpactHint::VeryLow),
            opt("50-150", "50-150 km", "Moderate commute", ImpactHint::Low),
            opt("150-300", "150-300 km", "Regular driving", ImpactHint::Medium),
            opt("300+", "300+ km", "Long distance commuter", ImpactHint::High),
        ],
    },
    Question {
        id: 5,
        prompt: "How many flights do you take per year?",
        subtitle: "Air travel has a significant carbon impact, especially long-haul flights.",
        section: Section::Transport,
        field: "annual_flights",
        options: &[
            opt("none", "No flights", "I avoid flying", ImpactHint::None),
            opt("1-2", "1-2 flights", "Occasional travel", ImpactHint::Low),
            opt("3-5", "3-5 flights", "Regular traveler", ImpactHint::Medium),
            opt("6+", "6+ flights", "Frequent flyer", ImpactHint::High),
        ],
    },
    Question {
        id: 6,
        prompt: "What best describes your diet?",
        subtitle: "Food production has a major impact on global emissions, especially livestock farming.",
        section: Section::Diet,
        field: "diet_type",
        options: &[
            opt("vegan", "Vegan", "Plant-based diet only", ImpactHint::VeryLow),
            opt("vegetarian", "Vegetarian", "Includes dairy & eggs", ImpactHint::Low),
            opt("pescatarian", "Pescatarian", "Fish but no other meat", ImpactHint::Medium),
            opt("omnivore", "Omnivore", "Balanced meat & plants", ImpactHint::High),
        ],
    },
    Question {
        id: 7,
        prompt: "How often do you buy new clothes/electronics?",
        subtitle: "Manufacturing consumer goods requires significant energy and resources.",
        section: Section::Lifestyle,
        field: "shopping_frequency",
        options: &[
            opt("rarely", "Rarely", "I have stuff for years", ImpactHint::VeryLow),
            opt("yearly", "Yearly", "Only when necessary", ImpactHint::Low),
            opt("every_few_months", "Every few months", "Occasional purchases", ImpactHint::Medium),
            opt("monthly", "Monthly", "I buy new items often", ImpactHint::High),
        ],
    },
    Question {
        id: 8,
        prompt: "How do you handle waste?",
        subtitle: "Proper waste management reduces landfill emissions and conserves resources.",
        section: Section::Lifestyle,
        field: "waste_management",
        options: &[
            opt("compost_too", "Compost too", "Recycle + compost", ImpactHint::VeryLow),
            opt("mostly_recycle", "Mostly recycle", "Careful separation", ImpactHint::Low),
            opt("some_recycling", "Some recycling", "Basic recycling", ImpactHint::Medium),
            opt("everything_trash", "Everything in trash", "Most waste to the bin", ImpactHint::High),
        ],
    },
];

/// Number of questions in the survey.
#[must_use]
pub const fn total_questions() -> usize {
    QUESTIONS.len()
}

/// Returns `true` once every question has an answer.
#[must_use]
pub fn is_complete(assessment: &Assessment) -> bool {
    QUESTIONS
        .iter()
        .all(|q| assessment.answer(q.section, q.field).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_survey_response;
    use ecozync_calculator_models::{DietType, WasteManagement};

    #[test]
    fn catalogue_has_eight_sequential_questions() {
        assert_eq!(total_questions(), 8);
        for (i, q) in QUESTIONS.iter().enumerate() {
            assert_eq!(usize::from(q.id), i + 1);
            assert_eq!(q.options.len(), 4);
        }
    }

    #[test]
    fn every_question_binds_to_an_assessment_field() {
        let mut assessment = Assessment::default();
        for q in QUESTIONS {
            q.answer(&mut assessment, 0).unwrap();
        }
        assert!(is_complete(&assessment));
    }

    #[test]
    fn answering_last_options_feeds_the_adapter() {
        let mut assessment = Assessment::default();
        assert!(!is_complete(&assessment));
        for q in QUESTIONS {
            q.answer(&mut assessment, q.options.len() - 1).unwrap();
        }
        let response = to_survey_response(&assessment);
        assert_eq!(response.diet_type, DietType::Omnivore);
        assert_eq!(response.waste_management, WasteManagement::EverythingTrash);
        assert_eq!(
            (response.short_flights, response.medium_flights, response.long_flights),
            (3, 3, 2)
        );
    }

    #[test]
    fn impact_hints_have_labels_and_wire_names() {
        assert_eq!(ImpactHint::VeryLow.label(), "Very Low");
        assert_eq!(ImpactHint::None.label(), "None");
        assert_eq!(ImpactHint::VeryHigh.to_string(), "very_high");
        assert_eq!(
            serde_json::to_value(ImpactHint::Medium).unwrap(),
            serde_json::json!("medium")
        );
    }

    #[test]
    fn option_lookup() {
        let q = &QUESTIONS[0];
        assert_eq!(q.option("oil").map(|o| o.impact), Some(ImpactHint::VeryHigh));
        assert!(q.option("coal").is_none());
    }
}
