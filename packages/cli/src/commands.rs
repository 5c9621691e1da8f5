//! Command implementations shared by the subcommands and the interactive
//! menu.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use dialoguer::{Confirm, Select};
use ecozync_assessment::survey::{QUESTIONS, total_questions};
use ecozync_assessment::{Assessment, input, to_survey_response};
use ecozync_calculator::Calculator;
use ecozync_calculator_models::EmissionBreakdown;
use ecozync_history::anonymous::{AnonymousStore, DEFAULT_CACHE_DIR};
use ecozync_history_models::{CalculationFilters, SaveOutcome};

use crate::report;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Anonymous cache location from `ECOZYNC_CACHE_DIR`.
#[must_use]
pub fn cache_from_env() -> AnonymousStore {
    let dir = std::env::var("ECOZYNC_CACHE_DIR")
        .map_or_else(|_| PathBuf::from(DEFAULT_CACHE_DIR), PathBuf::from);
    AnonymousStore::new(dir)
}

/// Asks every survey question, resuming from saved form state.
///
/// Answers are written to the anonymous cache after each question so an
/// interrupted survey picks up where it left off.
fn ask_questions(store: &AnonymousStore) -> Result<Assessment, Box<dyn std::error::Error>> {
    let mut assessment = store.assessment().unwrap_or_default();
    let total = total_questions();

    for question in QUESTIONS {
        println!();
        println!("[{}/{total}] {}", question.id, question.prompt);
        println!("{}", question.subtitle);

        let labels: Vec<String> = question
            .options
            .iter()
            .map(|o| {
                format!(
                    "{:<20} {} ({} impact)",
                    o.label,
                    o.description,
                    o.impact.label()
                )
            })
            .collect();

        let default = assessment
            .answer(question.section, question.field)
            .and_then(|v| question.options.iter().position(|o| o.value == v))
            .unwrap_or(0);

        let idx = Select::new()
            .items(&labels)
            .default(default)
            .interact()?;

        question.answer(&mut assessment, idx)?;
        store.save_assessment(&assessment);
    }

    Ok(assessment)
}

fn calculate(assessment: &Assessment) -> Result<EmissionBreakdown, Box<dyn std::error::Error>> {
    Calculator::default()
        .calculate(&to_survey_response(assessment))
        .map_err(|e| {
            log::error!("Calculation failed: {e}");
            "We couldn't calculate your footprint right now. Please try again.".into()
        })
}

async fn save_for_user(
    user: &str,
    date: NaiveDate,
    assessment: &Assessment,
    breakdown: &EmissionBreakdown,
) -> CliResult {
    let db = ecozync_history::open_db(&ecozync_server::db_path_from_env()).await?;
    let saved =
        ecozync_history::save_calculation(db.as_ref(), user, date, assessment, breakdown).await?;

    match saved.outcome {
        SaveOutcome::Created => println!("Saved calculation {} for {date}.", saved.record.id),
        SaveOutcome::Updated => println!(
            "Replaced today's calculation {} for {date}.",
            saved.record.id
        ),
    }
    Ok(())
}

/// Saves a still-valid pending calculation to `user`, if there is one.
async fn claim_pending(store: &AnonymousStore, user: &str) -> CliResult {
    let Some(pending) = store.pending() else {
        return Ok(());
    };

    let prompt = format!(
        "Save the calculation from {} ({} kg) to {user}?",
        pending.timestamp.format("%Y-%m-%d %H:%M"),
        pending.results.total_emissions
    );
    if Confirm::new().with_prompt(prompt).default(true).interact()? {
        save_for_user(
            user,
            pending.timestamp.date_naive(),
            &pending.assessment_data,
            &pending.results,
        )
        .await?;
    }
    store.clear_pending();
    Ok(())
}

/// `ecozync survey`
///
/// Runs the survey and prints the result. With a user the result goes to
/// the history database; otherwise it is kept in the anonymous cache.
///
/// # Errors
///
/// Returns an error if a prompt, the calculation, or storage fails.
pub async fn survey(user: Option<&str>) -> CliResult {
    let store = cache_from_env();

    if let Some(user) = user {
        claim_pending(&store, user).await?;
    }

    println!("Ecozync carbon footprint survey");
    let assessment = ask_questions(&store)?;
    let breakdown = calculate(&assessment)?;

    println!();
    print!("{}", report::format_breakdown(&breakdown));
    println!();

    if let Some(user) = user {
        save_for_user(user, Utc::now().date_naive(), &assessment, &breakdown).await?;
    } else {
        store.save_calculation(&breakdown, &assessment);
        if Confirm::new()
            .with_prompt("Keep this result to save to an account within the next hour?")
            .default(false)
            .interact()?
        {
            store.store_pending(&breakdown, &assessment);
            println!("Run `ecozync survey --user <id>` within an hour to save it.");
        }
    }
    store.clear_assessment();

    Ok(())
}

/// `ecozync calculate <file>`
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the calculation fails.
pub fn calculate_file(path: &Path, json: bool) -> CliResult {
    let response = input::load(path)?.into_survey_response();

    let breakdown = Calculator::default()
        .calculate(&response)
        .inspect_err(|e| log::error!("Calculation failed: {e}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        print!("{}", report::format_breakdown(&breakdown));
    }
    Ok(())
}

/// `ecozync history`
///
/// # Errors
///
/// Returns an error if the history database cannot be read.
pub async fn history(user: Option<&str>, limit: u32) -> CliResult {
    if let Some(user) = user {
        let db = ecozync_history::open_db(&ecozync_server::db_path_from_env()).await?;
        let page = ecozync_history::list_calculations(
            db.as_ref(),
            user,
            &CalculationFilters::default(),
            1,
            limit,
        )
        .await?;

        if page.data.is_empty() {
            println!("No calculations found for {user}.");
        } else {
            print!("{}", report::format_records(&page));
        }
        return Ok(());
    }

    let store = cache_from_env();
    let history = store.history();
    if history.is_empty() {
        println!("No calculations stored on this device.");
        return Ok(());
    }

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let shown = &history[..history.len().min(limit)];
    print!("{}", report::format_anonymous_history(shown));

    let stats = store.stats();
    println!(
        "\n{} calculation(s) on this device. Sign in to keep more than {}.",
        stats.calculations,
        ecozync_history::anonymous::MAX_HISTORY
    );
    Ok(())
}

/// `ecozync stats`
///
/// # Errors
///
/// Returns an error if the history database cannot be read.
pub async fn stats(user: &str, months: u32) -> CliResult {
    let db = ecozync_history::open_db(&ecozync_server::db_path_from_env()).await?;
    let stats =
        ecozync_history::calculation_stats(db.as_ref(), user, months, Utc::now().date_naive())
            .await?;
    print!("{}", report::format_stats(&stats));
    Ok(())
}

/// `ecozync clear`
///
/// # Errors
///
/// Returns an error if the confirmation prompt fails.
pub fn clear() -> CliResult {
    let store = cache_from_env();

    if !Confirm::new()
        .with_prompt(format!(
            "Delete all anonymous data in {}?",
            store.dir().display()
        ))
        .default(false)
        .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    store.clear_all();
    store.clear_pending();
    println!("Anonymous data cleared.");
    Ok(())
}

/// `ecozync serve`
///
/// The server uses actix-web's runtime, so it runs in a blocking task to
/// avoid nesting tokio runtimes.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn serve() -> CliResult {
    tokio::task::spawn_blocking(|| {
        actix_web::rt::System::new().block_on(ecozync_server::interactive::run())
    })
    .await??;
    Ok(())
}
