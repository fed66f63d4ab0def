//! In-memory contest snapshot store
//!
//! Holds the result of the most recent refresh cycle plus the manual
//! solution overrides that must survive it. Every refresh replaces the
//! contest list wholesale (last writer wins); overrides live across
//! replacements keyed by contest id. Statuses are derived from the clock
//! at read time, never served stale from the snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use url::Url;

use crate::errors::{AppError, AppResult};
use crate::models::Contest;

#[derive(Default)]
struct StoreState {
    /// Merged snapshot from the last refresh, overrides already applied.
    contests: Vec<Contest>,
    /// Automated match per contest id from the last refresh. Kept so
    /// clearing an override can fall back to the matched URL immediately
    /// instead of waiting for the next cycle.
    matched: HashMap<String, String>,
    /// Manual solution URL per contest id.
    overrides: HashMap<String, String>,
    last_refreshed: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct ContestStore {
    state: Arc<RwLock<StoreState>>,
}

impl ContestStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    /// Replace the served snapshot with the output of a refresh cycle.
    ///
    /// `matched` is the automated match map the merge was built from.
    /// Overrides are re-applied under the write lock, so an override set
    /// while the refresh was in flight still lands in the new snapshot.
    pub async fn replace(&self, contests: Vec<Contest>, matched: HashMap<String, String>) {
        let mut state = self.state.write().await;
        state.contests = contests;
        state.matched = matched;
        state.last_refreshed = Some(Utc::now());

        let state = &mut *state;
        for contest in &mut state.contests {
            if let Some(url) = state.overrides.get(&contest.id) {
                contest.solution_url = Some(url.clone());
            }
        }
    }

    /// Current contest list with statuses derived against `now`, plus the
    /// completion time of the last refresh.
    pub async fn snapshot(
        &self,
        now: DateTime<Utc>,
    ) -> (Vec<Contest>, Option<DateTime<Utc>>) {
        let state = self.state.read().await;
        let contests = state
            .contests
            .iter()
            .cloned()
            .map(|mut contest| {
                contest.status = contest.status_at(now);
                contest
            })
            .collect();
        (contests, state.last_refreshed)
    }

    pub async fn get(&self, id: &str, now: DateTime<Utc>) -> Option<Contest> {
        let state = self.state.read().await;
        state.contests.iter().find(|c| c.id == id).map(|contest| {
            let mut contest = contest.clone();
            contest.status = contest.status_at(now);
            contest
        })
    }

    /// Record a manual override and patch the live snapshot.
    ///
    /// The id must name a contest in the current snapshot and the URL must
    /// be an absolute http(s) URL. Returns the updated contest.
    pub async fn set_override(
        &self,
        id: &str,
        url: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Contest> {
        let parsed = Url::parse(url)
            .map_err(|_| AppError::validation(format!("Invalid solution URL '{url}'")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "Solution URL must be http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let mut state = self.state.write().await;
        let state = &mut *state;
        let contest = state
            .contests
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("contest", id))?;

        state.overrides.insert(id.to_string(), url.to_string());
        contest.solution_url = Some(url.to_string());

        let mut updated = contest.clone();
        updated.status = updated.status_at(now);
        Ok(updated)
    }

    /// Drop the manual override for a contest, falling back to the
    /// automated match from the last refresh if one exists. Idempotent:
    /// clearing a contest that has no override is not an error.
    pub async fn clear_override(&self, id: &str, now: DateTime<Utc>) -> AppResult<Contest> {
        let mut state = self.state.write().await;
        let state = &mut *state;
        let contest = state
            .contests
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("contest", id))?;

        state.overrides.remove(id);
        contest.solution_url = state.matched.get(id).cloned();

        let mut updated = contest.clone();
        updated.status = updated.status_at(now);
        Ok(updated)
    }

    /// Clone of the override map, injected into the merge step of each
    /// refresh cycle.
    pub async fn overrides(&self) -> HashMap<String, String> {
        let state = self.state.read().await;
        state.overrides.clone()
    }

    pub async fn contest_count(&self) -> usize {
        let state = self.state.read().await;
        state.contests.len()
    }
}

impl Default for ContestStore {
    fn default() -> Self {
        Self::new()
    }
}
