//! User dispatch pipeline.
//!
//! One pass:
//! 1. Fetch all users from the source API (any failure aborts the pass)
//! 2. Skip users whose email does not end in `.biz`
//! 3. Send each remaining user to the destination API, one at a time
//!
//! A failed delivery is logged and counted; it never stops the pass.

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use relay_client::UserApi;
use relay_common::error::RelayError;
use relay_common::types::{RunSummary, User, UserPayload};

/// Fetches users and forwards the `.biz` ones.
pub struct Dispatcher<A> {
    api: A,
    destination_url: String,
}

impl<A: UserApi> Dispatcher<A> {
    pub fn new(api: A, destination_url: impl Into<String>) -> Self {
        Self {
            api,
            destination_url: destination_url.into(),
        }
    }

    /// Run one fetch-filter-deliver pass.
    ///
    /// Returns an error only when the fetch fails, in which case no delivery
    /// is attempted. Per-user delivery failures are reflected in the summary.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<RunSummary, RelayError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", run_id = %run_id);
        self.process(cancel, run_id).instrument(span).await
    }

    async fn process(
        &self,
        cancel: &CancellationToken,
        run_id: Uuid,
    ) -> Result<RunSummary, RelayError> {
        let mut summary = RunSummary::new(run_id);

        let users = self.api.fetch_users(cancel).await.map_err(|e| {
            tracing::error!(error = %e, "Fetch users error");
            e
        })?;

        summary.fetched = users.len();
        tracing::info!(count = users.len(), "Fetched users");

        for user in &users {
            if !user.is_biz() {
                tracing::debug!(email = %user.email, "User not .biz: skipping");
                summary.skipped += 1;
                continue;
            }

            if self.deliver(cancel, user).await {
                summary.delivered += 1;
            } else {
                summary.failed += 1;
            }
        }

        summary.finished_at = Utc::now();
        tracing::info!(
            fetched = summary.fetched,
            delivered = summary.delivered,
            failed = summary.failed,
            skipped = summary.skipped,
            "User processing finished"
        );

        Ok(summary)
    }

    /// Send one matching user. Returns whether it was delivered.
    async fn deliver(&self, cancel: &CancellationToken, user: &User) -> bool {
        tracing::info!(user_id = user.id, email = %user.email, "User .biz: sending to API B");

        let payload = UserPayload::from(user);
        match self
            .api
            .send_user(cancel, &payload, &self.destination_url)
            .await
        {
            Ok(()) => {
                tracing::info!(name = %user.name, email = %user.email, "User sent to API B");
                true
            }
            Err(e) => {
                tracing::warn!(
                    name = %user.name,
                    email = %user.email,
                    cancelled = e.is_cancelled(),
                    error = %e,
                    "Send to API B error"
                );
                false
            }
        }
    }
}
