//! Interactive menu shown when `ecozync` runs without a subcommand.

use std::path::PathBuf;

use dialoguer::{Input, Select};

use crate::commands;

/// Top-level actions in the interactive menu.
enum Action {
    Survey,
    CalculateFile,
    History,
    Stats,
    Clear,
    Serve,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Survey,
        Self::CalculateFile,
        Self::History,
        Self::Stats,
        Self::Clear,
        Self::Serve,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Survey => "Take the survey",
            Self::CalculateFile => "Calculate from a file",
            Self::History => "Show saved calculations",
            Self::Stats => "Show statistics",
            Self::Clear => "Clear data on this device",
            Self::Serve => "Start server",
        }
    }
}

/// Prompts for an optional user id. An empty answer means anonymous.
fn prompt_user() -> Result<Option<String>, Box<dyn std::error::Error>> {
    let user: String = Input::new()
        .with_prompt("User id (leave empty to stay anonymous)")
        .allow_empty(true)
        .interact_text()?;
    let user = user.trim();
    Ok((!user.is_empty()).then(|| user.to_string()))
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt or the selected action fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Ecozync");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Survey => {
            let user = prompt_user()?;
            commands::survey(user.as_deref()).await?;
        }
        Action::CalculateFile => {
            let path: String = Input::new()
                .with_prompt("Answers file (JSON or TOML)")
                .interact_text()?;
            commands::calculate_file(&PathBuf::from(path), false)?;
        }
        Action::History => {
            let user = prompt_user()?;
            let limit_str: String = Input::new()
                .with_prompt("Max calculations to show")
                .default("10".to_string())
                .interact_text()?;
            let limit: u32 = limit_str.parse().unwrap_or(10);
            commands::history(user.as_deref(), limit).await?;
        }
        Action::Stats => {
            let user: String = Input::new().with_prompt("User id").interact_text()?;
            let months_str: String = Input::new()
                .with_prompt("Trend window (months)")
                .default("12".to_string())
                .interact_text()?;
            let months: u32 = months_str.parse().unwrap_or(12);
            commands::stats(user.trim(), months).await?;
        }
        Action::Clear => commands::clear()?,
        Action::Serve => commands::serve().await?,
    }

    Ok(())
}
