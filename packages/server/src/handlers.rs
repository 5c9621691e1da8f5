//! HTTP handler functions for the Ecozync API.

use actix_web::{HttpRequest, HttpResponse, web};
use ecozync_assessment::survey::QUESTIONS;
use ecozync_assessment::to_survey_response;
use ecozync_calculator::Calculator;
use ecozync_calculator::factors::{DATA_SOURCES, EMISSION_FACTORS};
use ecozync_calculator_models::{EmissionBreakdown, SurveyResponse};
use ecozync_history_models::SaveOutcome;
use ecozync_server_models::{
    ApiCalculation, ApiFactorTable, ApiHealth, ApiQuestion, CalculateRequest,
    CalculationListParams, SaveCalculationRequest, StatsParams,
};

use crate::{AppState, USER_ID_HEADER};

const CALCULATION_FAILED: &str =
    "We couldn't calculate your footprint right now. Please try again.";

/// Extracts the caller's user id, or a 401 response.
fn require_user(req: &HttpRequest) -> Result<String, HttpResponse> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| {
            HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Unauthorized"
            }))
        })
}

fn run_calculation(response: &SurveyResponse) -> Result<EmissionBreakdown, HttpResponse> {
    Calculator::default().calculate(response).map_err(|e| {
        log::error!("Calculation failed: {e}");
        HttpResponse::InternalServerError().json(serde_json::json!({
            "error": CALCULATION_FAILED
        }))
    })
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/factors`
///
/// Returns the comprehensive emission factor table and its sources.
pub async fn factors() -> HttpResponse {
    HttpResponse::Ok().json(ApiFactorTable::new(EMISSION_FACTORS, DATA_SOURCES))
}

/// `GET /api/survey`
///
/// Returns the survey questions in order.
pub async fn survey() -> HttpResponse {
    let questions: Vec<ApiQuestion> = QUESTIONS.iter().map(ApiQuestion::from).collect();
    HttpResponse::Ok().json(questions)
}

/// `POST /api/calculate`
///
/// Computes a footprint without saving it.
pub async fn calculate(body: web::Json<CalculateRequest>) -> HttpResponse {
    match run_calculation(&body.survey_response()) {
        Ok(breakdown) => HttpResponse::Ok().json(ApiCalculation::from(breakdown)),
        Err(response) => response,
    }
}

/// `GET /api/calculations`
///
/// Lists the caller's saved calculations, newest first.
pub async fn list_calculations(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<CalculationListParams>,
) -> HttpResponse {
    let user_id = match require_user(&req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match ecozync_history::list_calculations(
        state.db.as_ref(),
        &user_id,
        &params.filters(),
        params.page(),
        params.page_size(),
    )
    .await
    {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => {
            log::error!("Failed to list calculations: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch calculations"
            }))
        }
    }
}

/// `POST /api/calculations`
///
/// Computes a footprint from the assessment and saves it for the given day
/// (today by default). Responds `201` for a new day and `200` when an
/// existing calculation for that day was replaced.
pub async fn save_calculation(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SaveCalculationRequest>,
) -> HttpResponse {
    let user_id = match require_user(&req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let breakdown = match run_calculation(&to_survey_response(&body.assessment)) {
        Ok(breakdown) => breakdown,
        Err(response) => return response,
    };

    let date = body
        .calculation_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    match ecozync_history::save_calculation(
        state.db.as_ref(),
        &user_id,
        date,
        &body.assessment,
        &breakdown,
    )
    .await
    {
        Ok(saved) => match saved.outcome {
            SaveOutcome::Created => HttpResponse::Created().json(saved.record),
            SaveOutcome::Updated => HttpResponse::Ok().json(saved.record),
        },
        Err(e) => {
            log::error!("Failed to save calculation: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to save calculation"
            }))
        }
    }
}

/// `GET /api/calculations/{id}`
pub async fn get_calculation(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    let user_id = match require_user(&req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match ecozync_history::get_calculation(state.db.as_ref(), &user_id, path.into_inner()).await {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Calculation not found"
        })),
        Err(e) => {
            log::error!("Failed to fetch calculation: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch calculation"
            }))
        }
    }
}

/// `DELETE /api/calculations/{id}`
pub async fn delete_calculation(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    let user_id = match require_user(&req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match ecozync_history::delete_calculation(state.db.as_ref(), &user_id, path.into_inner())
        .await
    {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Calculation not found"
        })),
        Err(e) => {
            log::error!("Failed to delete calculation: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to delete calculation"
            }))
        }
    }
}

/// `GET /api/calculations/stats`
///
/// Summarizes the caller's history over the last `months` (default 12).
pub async fn calculation_stats(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<StatsParams>,
) -> HttpResponse {
    let user_id = match require_user(&req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match ecozync_history::calculation_stats(
        state.db.as_ref(),
        &user_id,
        params.months(),
        chrono::Utc::now().date_naive(),
    )
    .await
    {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            log::error!("Failed to compute calculation stats: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch calculation statistics"
            }))
        }
    }
}
