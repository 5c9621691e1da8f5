//! On-device storage for users without an account.
//!
//! Everything lives as small JSON files under one directory. Reads and
//! writes never fail from the caller's point of view: problems are logged
//! and a missing or unreadable file behaves like an empty one.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use ecozync_assessment::Assessment;
use ecozync_calculator_models::EmissionBreakdown;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Default cache directory.
pub const DEFAULT_CACHE_DIR: &str = "data/anonymous";

/// Most recent calculations kept in the anonymous history.
pub const MAX_HISTORY: usize = 5;

/// How long a pending calculation stays claimable.
pub const PENDING_TTL_MINUTES: i64 = 60;

const ASSESSMENT_FILE: &str = "assessment_data.json";
const LAST_CALCULATION_FILE: &str = "last_calculation.json";
const HISTORY_FILE: &str = "calculation_history.json";
const PENDING_FILE: &str = "pending_calculation.json";

/// A calculation kept on device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCalculation {
    pub date: DateTime<Utc>,
    pub results: EmissionBreakdown,
    pub assessment_data: Assessment,
}

/// A calculation waiting to be saved once the user signs in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCalculation {
    pub results: EmissionBreakdown,
    pub assessment_data: Assessment,
    pub timestamp: DateTime<Utc>,
}

impl PendingCalculation {
    /// Whether this calculation is older than the claim window at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.timestamp < now - Duration::minutes(PENDING_TTL_MINUTES)
    }
}

/// What the anonymous cache currently holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    /// Entries in the history.
    pub calculations: usize,
    /// Date of the last calculation, if any.
    pub last_calculation_date: Option<DateTime<Utc>>,
}

/// JSON file store for anonymous users.
#[derive(Debug, Clone)]
pub struct AnonymousStore {
    dir: PathBuf,
}

impl Default for AnonymousStore {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR)
    }
}

impl AnonymousStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Option<T> {
        let path = self.dir.join(file);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("Failed to read {}: {e}", path.display());
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Failed to parse {}: {e}", path.display());
                None
            }
        }
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) {
        let path = self.dir.join(file);
        let result = std::fs::create_dir_all(&self.dir)
            .map_err(|e| e.to_string())
            .and_then(|()| serde_json::to_string_pretty(value).map_err(|e| e.to_string()))
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));

        if let Err(e) = result {
            log::warn!("Failed to write {}: {e}", path.display());
        }
    }

    fn remove(&self, file: &str) {
        let path = self.dir.join(file);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {e}", path.display()),
        }
    }

    // -- Form state --------------------------------------------------------

    /// Saves in-progress survey answers.
    pub fn save_assessment(&self, assessment: &Assessment) {
        self.write(ASSESSMENT_FILE, assessment);
    }

    #[must_use]
    pub fn assessment(&self) -> Option<Assessment> {
        self.read(ASSESSMENT_FILE)
    }

    pub fn clear_assessment(&self) {
        self.remove(ASSESSMENT_FILE);
    }

    // -- Calculations ------------------------------------------------------

    /// Records a finished calculation as both the last result and the
    /// newest history entry.
    pub fn save_calculation(&self, results: &EmissionBreakdown, assessment: &Assessment) {
        self.save_calculation_at(results, assessment, Utc::now());
    }

    /// [`Self::save_calculation`] with an explicit timestamp.
    pub fn save_calculation_at(
        &self,
        results: &EmissionBreakdown,
        assessment: &Assessment,
        date: DateTime<Utc>,
    ) {
        let calculation = StoredCalculation {
            date,
            results: *results,
            assessment_data: assessment.clone(),
        };

        self.write(LAST_CALCULATION_FILE, &calculation);

        let mut history = self.history();
        history.insert(0, calculation);
        history.truncate(MAX_HISTORY);
        self.write(HISTORY_FILE, &history);
    }

    #[must_use]
    pub fn last_calculation(&self) -> Option<StoredCalculation> {
        self.read(LAST_CALCULATION_FILE)
    }

    /// Up to [`MAX_HISTORY`] calculations, newest first.
    #[must_use]
    pub fn history(&self) -> Vec<StoredCalculation> {
        self.read(HISTORY_FILE).unwrap_or_default()
    }

    #[must_use]
    pub fn has_stored_data(&self) -> bool {
        self.last_calculation().is_some() || !self.history().is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            calculations: self.history().len(),
            last_calculation_date: self.last_calculation().map(|c| c.date),
        }
    }

    /// Removes form state, last result, and history.
    pub fn clear_all(&self) {
        self.remove(ASSESSMENT_FILE);
        self.remove(LAST_CALCULATION_FILE);
        self.remove(HISTORY_FILE);
        log::info!("Cleared anonymous data in {}", self.dir.display());
    }

    // -- Pending calculation -----------------------------------------------

    /// Parks a calculation to be saved after sign-in.
    pub fn store_pending(&self, results: &EmissionBreakdown, assessment: &Assessment) {
        self.store_pending_at(results, assessment, Utc::now());
    }

    /// [`Self::store_pending`] with an explicit timestamp.
    pub fn store_pending_at(
        &self,
        results: &EmissionBreakdown,
        assessment: &Assessment,
        timestamp: DateTime<Utc>,
    ) {
        self.write(
            PENDING_FILE,
            &PendingCalculation {
                results: *results,
                assessment_data: assessment.clone(),
                timestamp,
            },
        );
        log::debug!("Stored pending calculation");
    }

    /// The pending calculation, if one exists and has not expired.
    #[must_use]
    pub fn pending(&self) -> Option<PendingCalculation> {
        self.pending_at(Utc::now())
    }

    /// [`Self::pending`] evaluated at `now`. An expired entry is removed.
    #[must_use]
    pub fn pending_at(&self, now: DateTime<Utc>) -> Option<PendingCalculation> {
        let pending: PendingCalculation = self.read(PENDING_FILE)?;
        if pending.is_expired(now) {
            log::debug!("Discarding expired pending calculation from {}", pending.timestamp);
            self.clear_pending();
            return None;
        }
        Some(pending)
    }

    pub fn clear_pending(&self) {
        self.remove(PENDING_FILE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecozync_calculator_models::CalculationMethod;

    fn store(name: &str) -> AnonymousStore {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        AnonymousStore::new(dir)
    }

    fn results(transport: u64) -> EmissionBreakdown {
        EmissionBreakdown::new(transport, 0, 0, 0, 0, 0, CalculationMethod::LocalEnhanced)
    }

    #[test]
    fn empty_store_reads_as_empty() {
        let store = store("ecozync_anon_empty_test");
        assert!(store.last_calculation().is_none());
        assert!(store.history().is_empty());
        assert!(!store.has_stored_data());
        assert_eq!(store.stats(), StorageStats::default());
    }

    #[test]
    fn history_keeps_five_newest_first() {
        let store = store("ecozync_anon_history_test");
        let assessment = Assessment::default();
        for i in 0..7 {
            store.save_calculation(&results(i), &assessment);
        }

        let history = store.history();
        assert_eq!(history.len(), MAX_HISTORY);
        let totals: Vec<u64> = history.iter().map(|c| c.results.total_emissions).collect();
        assert_eq!(totals, vec![6, 5, 4, 3, 2]);
        assert_eq!(
            store.last_calculation().map(|c| c.results.total_emissions),
            Some(6)
        );
        assert_eq!(store.stats().calculations, 5);

        store.clear_all();
        assert!(!store.has_stored_data());
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let store = store("ecozync_anon_corrupt_test");
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.dir().join(HISTORY_FILE), "not json").unwrap();
        assert!(store.history().is_empty());

        store.save_calculation(&results(1), &Assessment::default());
        assert_eq!(store.history().len(), 1);
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn assessment_form_state_roundtrips() {
        let store = store("ecozync_anon_form_test");
        let mut assessment = Assessment::default();
        assessment.diet.diet_type = Some("vegan".to_string());
        store.save_assessment(&assessment);
        assert_eq!(store.assessment(), Some(assessment));
        store.clear_assessment();
        assert!(store.assessment().is_none());
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn pending_calculation_expires_after_an_hour() {
        let store = store("ecozync_anon_pending_test");
        let stored_at = Utc::now();
        store.store_pending_at(&results(10), &Assessment::default(), stored_at);

        let soon = stored_at + Duration::minutes(59);
        assert!(store.pending_at(soon).is_some());

        let later = stored_at + Duration::minutes(61);
        assert!(store.pending_at(later).is_none());
        // Expired entries are removed on read.
        assert!(store.pending_at(stored_at).is_none());
        let _ = std::fs::remove_dir_all(store.dir());
    }
}
