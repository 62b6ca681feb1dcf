use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Email suffix that selects a user for forwarding.
pub const BIZ_SUFFIX: &str = ".biz";

/// A user record as returned by the source API.
///
/// Only `id`, `name` and `email` are read; any other fields in the source
/// JSON (address, phone, company, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl User {
    /// Whether this user's email ends with `.biz` (exact, case-sensitive).
    pub fn is_biz(&self) -> bool {
        self.email.ends_with(BIZ_SUFFIX)
    }
}

/// Body POSTed to the destination API for a matching user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}

impl From<&User> for UserPayload {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Outcome counters for one processing pass.
///
/// `delivered + failed + skipped == fetched` once the run has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub fetched: usize,
    pub delivered: usize,
    pub failed: usize,
    pub skipped: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn new(run_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            fetched: 0,
            delivered: 0,
            failed: 0,
            skipped: 0,
            started_at: now,
            finished_at: now,
        }
    }

    /// Records visited so far.
    pub fn visited(&self) -> usize {
        self.delivered + self.failed + self.skipped
    }
}
