//! Snapshot persistence contract
//!
//! The planner never touches storage. Outer layers load a snapshot, hand
//! it to the planner, and may save it back. A failed save must never stop
//! the caller from showing a plan.

use tracing::warn;

use crate::error::Result;
use crate::models::FinancialSnapshot;

/// Save and load snapshots keyed by user identity
pub trait SnapshotStore: Send + Sync {
    /// `None` means nothing is stored; callers fall back to defaults
    fn load_snapshot(&self, user_id: &str) -> Result<Option<FinancialSnapshot>>;

    fn save_snapshot(&self, user_id: &str, snapshot: &FinancialSnapshot) -> Result<()>;
}

/// Store that keeps nothing: loads find no data, saves always succeed
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl SnapshotStore for NullStore {
    fn load_snapshot(&self, _user_id: &str) -> Result<Option<FinancialSnapshot>> {
        Ok(None)
    }

    fn save_snapshot(&self, _user_id: &str, _snapshot: &FinancialSnapshot) -> Result<()> {
        Ok(())
    }
}

/// Load a snapshot, treating missing data and load failures as defaults
pub fn load_or_default(store: &dyn SnapshotStore, user_id: &str) -> FinancialSnapshot {
    match store.load_snapshot(user_id) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => FinancialSnapshot::default(),
        Err(e) => {
            warn!(user = %user_id, error = %e, "Failed to load snapshot, using defaults");
            FinancialSnapshot::default()
        }
    }
}

/// Save a snapshot, logging instead of failing. Returns whether it was saved.
pub fn save_best_effort(
    store: &dyn SnapshotStore,
    user_id: &str,
    snapshot: &FinancialSnapshot,
) -> bool {
    match store.save_snapshot(user_id, snapshot) {
        Ok(()) => true,
        Err(e) => {
            warn!(user = %user_id, error = %e, "Failed to save snapshot");
            false
        }
    }
}
