#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Persistent calculation history backed by `SQLite`.
//!
//! Signed-in users get one row per calculation date in
//! `data/ecozync.db`; saving twice on the same day replaces the earlier
//! result. Users without an account use the JSON file cache in
//! [`anonymous`] instead.
//!
//! Uses `switchy_database` for all database operations.

pub mod anonymous;
pub mod stats;

use std::path::Path;

use chrono::NaiveDate;
use ecozync_assessment::Assessment;
use ecozync_calculator_models::{CalculationMethod, EmissionBreakdown};
use ecozync_history_models::{
    CalculationFilters, CalculationRecord, CalculationStats, Page, SaveOutcome, SavedCalculation,
};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};
use switchy_database_connection::init_sqlite_rusqlite;
use thiserror::Error;

pub use stats::compute_stats;

/// Default path for the calculations database.
pub const DEFAULT_DB_PATH: &str = "data/ecozync.db";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from calculation storage operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A database query or command failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A row that was just written could not be read back.
    #[error("Calculation {0} not found")]
    NotFound(i64),

    /// A stored calculation date is not a valid `YYYY-MM-DD` date.
    #[error("Invalid calculation date: {0:?}")]
    InvalidDate(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Database lifecycle
// ---------------------------------------------------------------------------

/// Opens (or creates) the calculations `SQLite` database and ensures the
/// schema exists.
///
/// # Errors
///
/// Returns [`HistoryError`] if the database cannot be opened or schema
/// creation fails.
pub async fn open_db(path: &Path) -> Result<Box<dyn Database>, HistoryError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| HistoryError::Database(e.to_string()))?;

    ensure_schema(db.as_ref()).await?;

    log::debug!("Opened calculation history at {}", path.display());

    Ok(db)
}

/// Creates the calculations table and its indexes if they don't exist.
async fn ensure_schema(db: &dyn Database) -> Result<(), HistoryError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS carbon_calculations (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id                 TEXT NOT NULL,
            calculation_date        TEXT NOT NULL,
            assessment_data         TEXT NOT NULL,
            transport_emissions     INTEGER NOT NULL,
            energy_emissions        INTEGER NOT NULL,
            diet_emissions          INTEGER NOT NULL,
            lifestyle_emissions     INTEGER NOT NULL,
            travel_emissions        INTEGER NOT NULL,
            other_emissions         INTEGER NOT NULL,
            total_emissions         INTEGER NOT NULL,
            calculation_method      TEXT NOT NULL,
            calculation_confidence  REAL NOT NULL,
            created_at              TEXT NOT NULL,
            updated_at              TEXT NOT NULL,
            UNIQUE(user_id, calculation_date)
        )",
    )
    .await
    .map_err(|e| HistoryError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_calculations_user_date
         ON carbon_calculations (user_id, calculation_date)",
    )
    .await
    .map_err(|e| HistoryError::Database(e.to_string()))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

fn kg(value: u64) -> DatabaseValue {
    DatabaseValue::Int64(i64::try_from(value).unwrap_or(i64::MAX))
}

fn date(value: NaiveDate) -> DatabaseValue {
    DatabaseValue::String(value.format("%Y-%m-%d").to_string())
}

fn row_kg(row: &switchy_database::Row, col: &str) -> u64 {
    u64::try_from(row.to_value::<i64>(col).unwrap_or(0)).unwrap_or(0)
}

/// Converts a database row into a [`CalculationRecord`].
fn row_to_record(row: &switchy_database::Row) -> Result<CalculationRecord, HistoryError> {
    let assessment_json: String = row.to_value("assessment_data").unwrap_or_default();
    let raw_date: String = row.to_value("calculation_date").unwrap_or_default();
    let calculation_date = raw_date
        .parse::<NaiveDate>()
        .map_err(|_| HistoryError::InvalidDate(raw_date.clone()))?;

    Ok(CalculationRecord {
        id: row.to_value("id").unwrap_or(0),
        user_id: row.to_value("user_id").unwrap_or_default(),
        calculation_date,
        assessment_data: serde_json::from_str(&assessment_json)?,
        transport_emissions: row_kg(row, "transport_emissions"),
        energy_emissions: row_kg(row, "energy_emissions"),
        diet_emissions: row_kg(row, "diet_emissions"),
        lifestyle_emissions: row_kg(row, "lifestyle_emissions"),
        travel_emissions: row_kg(row, "travel_emissions"),
        other_emissions: row_kg(row, "other_emissions"),
        total_emissions: row_kg(row, "total_emissions"),
        calculation_method: row
            .to_value::<String>("calculation_method")
            .unwrap_or_default()
            .parse()
            .unwrap_or(CalculationMethod::LocalEnhanced),
        calculation_confidence: row.to_value("calculation_confidence").unwrap_or(0.0),
        created_at: row.to_value("created_at").unwrap_or_default(),
        updated_at: row.to_value("updated_at").unwrap_or_default(),
    })
}

fn rows_to_records(rows: &[switchy_database::Row]) -> Result<Vec<CalculationRecord>, HistoryError> {
    rows.iter().map(row_to_record).collect()
}

// ---------------------------------------------------------------------------
// CRUD operations
// ---------------------------------------------------------------------------

/// Saves a calculation for `user_id` on `calculation_date`.
///
/// A user has at most one calculation per day: if a row already exists for
/// that date it is overwritten (keeping its id and `created_at`), otherwise
/// a new row is inserted.
///
/// # Errors
///
/// Returns [`HistoryError`] if any database operation fails.
pub async fn save_calculation(
    db: &dyn Database,
    user_id: &str,
    calculation_date: NaiveDate,
    assessment: &Assessment,
    breakdown: &EmissionBreakdown,
) -> Result<SavedCalculation, HistoryError> {
    let now = chrono::Utc::now().to_rfc3339();
    let assessment_json = serde_json::to_string(assessment)?;

    // One statement: concurrent saves for the same day must resolve to a
    // single row.
    let rows = db
        .query_raw_params(
            "INSERT INTO carbon_calculations (user_id, calculation_date, assessment_data,
                 transport_emissions, energy_emissions, diet_emissions,
                 lifestyle_emissions, travel_emissions, other_emissions,
                 total_emissions, calculation_method, calculation_confidence,
                 created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (user_id, calculation_date) DO UPDATE SET
                 assessment_data = excluded.assessment_data,
                 transport_emissions = excluded.transport_emissions,
                 energy_emissions = excluded.energy_emissions,
                 diet_emissions = excluded.diet_emissions,
                 lifestyle_emissions = excluded.lifestyle_emissions,
                 travel_emissions = excluded.travel_emissions,
                 other_emissions = excluded.other_emissions,
                 total_emissions = excluded.total_emissions,
                 calculation_method = excluded.calculation_method,
                 calculation_confidence = excluded.calculation_confidence,
                 updated_at = excluded.updated_at
             RETURNING id, created_at",
            &[
                DatabaseValue::String(user_id.to_string()),
                date(calculation_date),
                DatabaseValue::String(assessment_json),
                kg(breakdown.transport_emissions),
                kg(breakdown.energy_emissions),
                kg(breakdown.diet_emissions),
                kg(breakdown.lifestyle_emissions),
                kg(breakdown.travel_emissions),
                kg(breakdown.other_emissions),
                kg(breakdown.total_emissions),
                DatabaseValue::String(breakdown.calculation_method.to_string()),
                DatabaseValue::Real64(breakdown.confidence_score),
                DatabaseValue::String(now.clone()),
                DatabaseValue::String(now.clone()),
            ],
        )
        .await
        .map_err(|e| HistoryError::Database(e.to_string()))?;

    let row = rows
        .first()
        .ok_or_else(|| HistoryError::Database("Upsert returned no row".to_string()))?;
    let id: i64 = row.to_value("id").unwrap_or(0);
    let created_at: String = row.to_value("created_at").unwrap_or_default();

    // An existing row keeps its original `created_at`.
    let outcome = if created_at == now {
        SaveOutcome::Created
    } else {
        SaveOutcome::Updated
    };

    log::info!("Calculation {id} for {user_id} on {calculation_date}: {outcome}");

    let record = get_calculation(db, user_id, id)
        .await?
        .ok_or(HistoryError::NotFound(id))?;

    Ok(SavedCalculation { outcome, record })
}

/// Lists a user's calculations, newest first.
///
/// `page` is 1-based; `page_size` is clamped to `1..=100`.
///
/// # Errors
///
/// Returns [`HistoryError`] if the database operation fails.
pub async fn list_calculations(
    db: &dyn Database,
    user_id: &str,
    filters: &CalculationFilters,
    page: u32,
    page_size: u32,
) -> Result<Page<CalculationRecord>, HistoryError> {
    let mut clause = String::from("user_id = ?");
    let mut params = vec![DatabaseValue::String(user_id.to_string())];

    if let Some(start) = filters.start_date {
        clause.push_str(" AND calculation_date >= ?");
        params.push(date(start));
    }
    if let Some(end) = filters.end_date {
        clause.push_str(" AND calculation_date <= ?");
        params.push(date(end));
    }
    if let Some(min) = filters.min_emissions {
        clause.push_str(" AND total_emissions >= ?");
        params.push(kg(min));
    }
    if let Some(max) = filters.max_emissions {
        clause.push_str(" AND total_emissions <= ?");
        params.push(kg(max));
    }

    let count_rows = db
        .query_raw_params(
            &format!("SELECT COUNT(*) as cnt FROM carbon_calculations WHERE {clause}"),
            &params,
        )
        .await
        .map_err(|e| HistoryError::Database(e.to_string()))?;

    let count: i64 = count_rows
        .first()
        .map_or(0, |r| r.to_value("cnt").unwrap_or(0));

    let mut result = Page::new(
        Vec::new(),
        u64::try_from(count).unwrap_or(0),
        page,
        page_size,
    );

    params.push(DatabaseValue::Int64(i64::from(result.page_size)));
    params.push(DatabaseValue::Int64(
        i64::try_from(result.offset()).unwrap_or(i64::MAX),
    ));

    let rows = db
        .query_raw_params(
            &format!(
                "SELECT * FROM carbon_calculations WHERE {clause}
                 ORDER BY calculation_date DESC
                 LIMIT ? OFFSET ?"
            ),
            &params,
        )
        .await
        .map_err(|e| HistoryError::Database(e.to_string()))?;

    result.data = rows_to_records(&rows)?;

    Ok(result)
}

/// Fetches one of a user's calculations.
///
/// Returns `None` if no calculation with that id belongs to the user.
///
/// # Errors
///
/// Returns [`HistoryError`] if the database operation fails.
pub async fn get_calculation(
    db: &dyn Database,
    user_id: &str,
    id: i64,
) -> Result<Option<CalculationRecord>, HistoryError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM carbon_calculations WHERE id = ? AND user_id = ?",
            &[
                DatabaseValue::Int64(id),
                DatabaseValue::String(user_id.to_string()),
            ],
        )
        .await
        .map_err(|e| HistoryError::Database(e.to_string()))?;

    rows.first().map(row_to_record).transpose()
}

/// Deletes one of a user's calculations.
///
/// Returns `false` if nothing was deleted.
///
/// # Errors
///
/// Returns [`HistoryError`] if the database operation fails.
pub async fn delete_calculation(
    db: &dyn Database,
    user_id: &str,
    id: i64,
) -> Result<bool, HistoryError> {
    let deleted = db
        .exec_raw_params(
            "DELETE FROM carbon_calculations WHERE id = ? AND user_id = ?",
            &[
                DatabaseValue::Int64(id),
                DatabaseValue::String(user_id.to_string()),
            ],
        )
        .await
        .map_err(|e| HistoryError::Database(e.to_string()))?;

    Ok(deleted > 0)
}

/// Loads every calculation for a user, oldest first.
///
/// # Errors
///
/// Returns [`HistoryError`] if the database operation fails.
pub async fn all_calculations(
    db: &dyn Database,
    user_id: &str,
) -> Result<Vec<CalculationRecord>, HistoryError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM carbon_calculations WHERE user_id = ?
             ORDER BY calculation_date ASC",
            &[DatabaseValue::String(user_id.to_string())],
        )
        .await
        .map_err(|e| HistoryError::Database(e.to_string()))?;

    rows_to_records(&rows)
}

/// Loads a user's history and summarizes it over the last `months`.
///
/// # Errors
///
/// Returns [`HistoryError`] if the database operation fails.
pub async fn calculation_stats(
    db: &dyn Database,
    user_id: &str,
    months: u32,
    today: NaiveDate,
) -> Result<CalculationStats, HistoryError> {
    let rows = all_calculations(db, user_id).await?;
    Ok(compute_stats(&rows, months, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecozync_assessment::Section;
    use ecozync_history_models::MAX_PAGE_SIZE;

    fn breakdown(total_hint: u64) -> EmissionBreakdown {
        EmissionBreakdown::new(
            total_hint,
            1000,
            2000,
            500,
            0,
            100,
            CalculationMethod::LocalEnhanced,
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    async fn temp_db(name: &str) -> (std::path::PathBuf, Box<dyn Database>) {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        let db = open_db(&dir.join("ecozync.db")).await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn save_upserts_per_user_per_day() {
        let (dir, db) = temp_db("ecozync_history_upsert_test").await;
        let mut assessment = Assessment::default();
        assessment
            .set_answer(Section::Diet, "diet_type", "vegan")
            .unwrap();

        let first = save_calculation(db.as_ref(), "alice", day(1), &assessment, &breakdown(400))
            .await
            .unwrap();
        assert_eq!(first.outcome, SaveOutcome::Created);
        assert_eq!(first.record.total_emissions, 4000);
        assert_eq!(first.record.assessment_data, assessment);

        let second = save_calculation(db.as_ref(), "alice", day(1), &assessment, &breakdown(900))
            .await
            .unwrap();
        assert_eq!(second.outcome, SaveOutcome::Updated);
        assert_eq!(second.record.id, first.record.id);
        assert_eq!(second.record.transport_emissions, 900);
        assert_eq!(second.record.created_at, first.record.created_at);

        let other = save_calculation(db.as_ref(), "bob", day(1), &assessment, &breakdown(0))
            .await
            .unwrap();
        assert_eq!(other.outcome, SaveOutcome::Created);
        assert_ne!(other.record.id, first.record.id);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn concurrent_saves_for_one_day_share_a_row() {
        let (dir, db) = temp_db("ecozync_history_concurrent_test").await;
        let assessment = Assessment::default();

        let (a, b) = tokio::join!(
            save_calculation(db.as_ref(), "alice", day(7), &assessment, &breakdown(100)),
            save_calculation(db.as_ref(), "alice", day(7), &assessment, &breakdown(200)),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.record.id, b.record.id);
        assert!(a.outcome == SaveOutcome::Created || b.outcome == SaveOutcome::Created);

        let page = list_calculations(db.as_ref(), "alice", &CalculationFilters::default(), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.count, 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn unparseable_stored_date_is_an_error() {
        let (dir, db) = temp_db("ecozync_history_bad_date_test").await;
        let saved = save_calculation(
            db.as_ref(),
            "alice",
            day(1),
            &Assessment::default(),
            &breakdown(100),
        )
        .await
        .unwrap();

        db.exec_raw("UPDATE carbon_calculations SET calculation_date = 'not-a-date'")
            .await
            .unwrap();

        let err = get_calculation(db.as_ref(), "alice", saved.record.id)
            .await
            .unwrap_err();
        assert!(matches!(err, HistoryError::InvalidDate(ref d) if d == "not-a-date"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn list_filters_and_paginates_newest_first() {
        let (dir, db) = temp_db("ecozync_history_list_test").await;
        let assessment = Assessment::default();
        for d in 1..=5 {
            save_calculation(
                db.as_ref(),
                "alice",
                day(d),
                &assessment,
                &breakdown(u64::from(d) * 1000),
            )
            .await
            .unwrap();
        }

        let page = list_calculations(db.as_ref(), "alice", &CalculationFilters::default(), 1, 2)
            .await
            .unwrap();
        assert_eq!(page.count, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        let dates: Vec<_> = page.data.iter().map(|r| r.calculation_date).collect();
        assert_eq!(dates, vec![day(5), day(4)]);

        let filters = CalculationFilters {
            start_date: Some(day(2)),
            end_date: Some(day(4)),
            min_emissions: Some(3600 + 3000),
            max_emissions: None,
        };
        let filtered = list_calculations(db.as_ref(), "alice", &filters, 1, 1000)
            .await
            .unwrap();
        assert_eq!(filtered.page_size, MAX_PAGE_SIZE);
        let dates: Vec<_> = filtered.data.iter().map(|r| r.calculation_date).collect();
        assert_eq!(dates, vec![day(4), day(3)]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn get_and_delete_are_scoped_to_the_owner() {
        let (dir, db) = temp_db("ecozync_history_owner_test").await;
        let saved = save_calculation(
            db.as_ref(),
            "alice",
            day(10),
            &Assessment::default(),
            &breakdown(100),
        )
        .await
        .unwrap();
        let id = saved.record.id;

        assert!(get_calculation(db.as_ref(), "bob", id).await.unwrap().is_none());
        assert!(!delete_calculation(db.as_ref(), "bob", id).await.unwrap());

        let found = get_calculation(db.as_ref(), "alice", id).await.unwrap().unwrap();
        assert_eq!(found.breakdown(), saved.record.breakdown());

        assert!(delete_calculation(db.as_ref(), "alice", id).await.unwrap());
        assert!(get_calculation(db.as_ref(), "alice", id).await.unwrap().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn all_calculations_are_oldest_first() {
        let (dir, db) = temp_db("ecozync_history_all_test").await;
        for d in [3, 1, 2] {
            save_calculation(
                db.as_ref(),
                "alice",
                day(d),
                &Assessment::default(),
                &breakdown(0),
            )
            .await
            .unwrap();
        }

        let rows = all_calculations(db.as_ref(), "alice").await.unwrap();
        let dates: Vec<_> = rows.iter().map(|r| r.calculation_date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);

        let stats = calculation_stats(db.as_ref(), "alice", 12, day(31))
            .await
            .unwrap();
        assert_eq!(stats.total_calculations, 3);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
