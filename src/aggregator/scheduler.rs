//! Background refresh scheduling
//!
//! Drives the refresh pipeline on a cron schedule. The loop ticks once a
//! second, compares the schedule against the time of the last completed
//! run, and fires when a scheduled instant has passed. A small random
//! jitter spreads fetches so restarts do not hammer the upstream APIs at
//! exactly the same instant.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use cron::Schedule;
use tokio::time::{interval, Duration};
use tracing::{debug, info, trace};

use crate::config::RefreshConfig;
use crate::errors::{AppError, AppResult};
use crate::services::RefreshService;

pub struct RefreshScheduler {
    refresher: RefreshService,
    schedule: Schedule,
    refresh_on_startup: bool,
    jitter_seconds: u64,
    last_run: Option<DateTime<Utc>>,
}

impl RefreshScheduler {
    pub fn new(refresher: RefreshService, config: &RefreshConfig) -> AppResult<Self> {
        let schedule = Schedule::from_str(&config.cron).map_err(|e| {
            AppError::configuration(format!("Invalid refresh cron '{}': {}", config.cron, e))
        })?;

        Ok(Self {
            refresher,
            schedule,
            refresh_on_startup: config.on_startup,
            jitter_seconds: config.jitter_seconds,
            last_run: None,
        })
    }

    /// Run the scheduler loop. Never returns under normal operation.
    pub async fn start(mut self) {
        info!("Starting refresh scheduler");

        if self.refresh_on_startup {
            self.run_once().await;
        } else {
            // No startup run: the first fire is the first cron instant
            // after boot.
            self.last_run = Some(Utc::now());
            if let Some(next) = self.schedule.after(&Utc::now()).next() {
                info!(
                    "First scheduled refresh: {}",
                    next.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
        }

        let mut tick = interval(Duration::from_secs(1));
        loop {
            tick.tick().await;
            trace!("Refresh scheduler tick");

            if next_fire_due(&self.schedule, self.last_run, Utc::now()) {
                self.apply_jitter().await;
                self.run_once().await;
            }
        }
    }

    async fn apply_jitter(&self) {
        if self.jitter_seconds == 0 {
            return;
        }
        let delay = fastrand::u64(0..=self.jitter_seconds);
        if delay > 0 {
            debug!("Delaying scheduled refresh by {delay}s of jitter");
            tokio::time::sleep(Duration::from_secs(delay)).await;
        }
    }

    async fn run_once(&mut self) {
        self.refresher.refresh().await;

        let completed_at = Utc::now();
        self.last_run = Some(completed_at);
        if let Some(next) = self.schedule.after(&completed_at).next() {
            info!(
                "Scheduled refresh complete - next update: {}",
                next.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
    }
}

/// A run is due once the first scheduled instant after the last completed
/// run has passed. A scheduler that never ran is immediately due.
fn next_fire_due(
    schedule: &Schedule,
    last_run: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    match last_run {
        Some(last) => schedule
            .after(&last)
            .next()
            .map(|next| now >= next)
            .unwrap_or(false),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn every_fifteen_minutes() -> Schedule {
        Schedule::from_str("0 */15 * * * *").unwrap()
    }

    #[test]
    fn due_once_the_next_cron_instant_passes() {
        let schedule = every_fifteen_minutes();
        let last_run = Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 30).unwrap());

        // next fire after 12:00:30 is 12:15:00
        let before = Utc.with_ymd_and_hms(2025, 6, 1, 12, 14, 59).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 15, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 6, 1, 12, 16, 0).unwrap();

        assert!(!next_fire_due(&schedule, last_run, before));
        assert!(next_fire_due(&schedule, last_run, at));
        assert!(next_fire_due(&schedule, last_run, after));
    }

    #[test]
    fn never_run_is_immediately_due() {
        let schedule = every_fifteen_minutes();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        assert!(next_fire_due(&schedule, None, now));
    }
}
