//! Periodic distribution runs.
//!
//! The loop sleeps until the next monthly trigger, runs the distributor on a
//! blocking thread, logs the outcome, and repeats. A failed run is logged and
//! retried on the following trigger, never sooner.
//!
//! Sleeps are capped at [`MAX_SLEEP`] and re-measured against the wall clock,
//! so host suspends and clock changes shift a run by at most one chunk.

use std::time::Duration;

use chrono::{DateTime, Utc};
use telesales_core::schedule::MonthlySchedule;
use tokio::task::JoinHandle;

const MAX_SLEEP: Duration = Duration::from_secs(60 * 60);

use crate::state::AppState;

/// Spawn the monthly distribution loop, or `None` when scheduling is disabled.
pub fn spawn_monthly_distribution(state: AppState) -> Option<JoinHandle<()>> {
    if !state.config.schedule.enabled {
        tracing::info!("scheduled lead distribution disabled");
        return None;
    }
    let schedule = state.config.schedule.monthly();
    Some(tokio::spawn(run_loop(state, schedule)))
}

async fn run_loop(state: AppState, schedule: MonthlySchedule) {
    loop {
        let Some(next) = schedule.next_run_after(Utc::now()) else {
            tracing::warn!(?schedule, "schedule can never fire; scheduled distribution stopped");
            return;
        };
        tracing::info!(next_run = %next, "next scheduled lead distribution");
        sleep_until(next).await;

        match state.distribute().await {
            Ok(summary) => tracing::info!(
                total_leads = summary.total_leads,
                total_agents = summary.total_agents,
                assigned = summary.assigned,
                "scheduled distribution complete"
            ),
            Err(e) => tracing::error!(error = %format!("{e:#}"), "scheduled distribution failed"),
        }
    }
}

async fn sleep_until(deadline: DateTime<Utc>) {
    while let Some(chunk) = next_chunk(deadline, Utc::now()) {
        tokio::time::sleep(chunk).await;
    }
}

/// How long to sleep before checking the clock again, or `None` once
/// `deadline` has been reached.
fn next_chunk(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Option<Duration> {
    let remaining = (deadline - now).to_std().ok()?;
    if remaining.is_zero() {
        return None;
    }
    Some(remaining.min(MAX_SLEEP))
}
