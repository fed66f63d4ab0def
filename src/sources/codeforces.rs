//! Codeforces contest source
//!
//! Talks to the public `contest.list` API. Timestamps arrive as epoch
//! seconds plus a duration; the contest window is start + duration. The
//! payload wraps the listing in `{status, result}` and signals rejection
//! with `status != "OK"` and a comment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::ContestSource;
use crate::errors::{SourceError, SourceResult};
use crate::models::{Contest, ContestStatus, Platform};
use crate::utils::datetime::DateTimeParser;

const SOURCE: &str = "codeforces";

#[derive(Debug, Deserialize)]
struct ContestListPayload {
    status: String,
    comment: Option<String>,
    #[serde(default)]
    result: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContest {
    id: Option<i64>,
    name: Option<String>,
    start_time_seconds: Option<i64>,
    duration_seconds: Option<i64>,
}

pub struct CodeforcesSource {
    client: Client,
    endpoint: String,
}

impl CodeforcesSource {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    /// Map the decoded payload into contests, dropping malformed records.
    fn map_payload(records: Vec<Value>, now: DateTime<Utc>) -> Vec<Contest> {
        let total = records.len();
        let contests: Vec<Contest> = records
            .into_iter()
            .filter_map(|value| Self::map_record(value, now))
            .collect();
        debug!("Mapped {}/{} {} records", contests.len(), total, SOURCE);
        contests
    }

    fn map_record(value: Value, now: DateTime<Utc>) -> Option<Contest> {
        let raw: RawContest = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Dropping undecodable {SOURCE} record: {e}");
                return None;
            }
        };

        let (Some(id), Some(name), Some(start_secs), Some(duration_secs)) = (
            raw.id,
            raw.name,
            raw.start_time_seconds,
            raw.duration_seconds,
        ) else {
            warn!("Dropping {SOURCE} record with missing fields");
            return None;
        };

        let start_time = match DateTimeParser::parse_epoch_seconds(start_secs) {
            Ok(t) => t,
            Err(e) => {
                warn!("Dropping {SOURCE} contest {id}: {e}");
                return None;
            }
        };
        let end_secs = match start_secs.checked_add(duration_secs) {
            Some(s) => s,
            None => {
                warn!("Dropping {SOURCE} contest {id}: duration overflows");
                return None;
            }
        };
        let end_time = match DateTimeParser::parse_epoch_seconds(end_secs) {
            Ok(t) => t,
            Err(e) => {
                warn!("Dropping {SOURCE} contest {id}: {e}");
                return None;
            }
        };
        if end_time < start_time {
            warn!("Dropping {SOURCE} contest {id}: ends before it starts");
            return None;
        }

        Some(Contest {
            id: format!("cf-{id}"),
            name,
            platform: Platform::Codeforces,
            start_time,
            end_time,
            url: format!("https://codeforces.com/contest/{id}"),
            status: ContestStatus::classify(Some(start_time), Some(end_time), now),
            solution_url: None,
        })
    }
}

#[async_trait]
impl ContestSource for CodeforcesSource {
    fn platform(&self) -> Platform {
        Platform::Codeforces
    }

    async fn fetch(&self) -> SourceResult<Vec<Contest>> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| SourceError::from_request(&self.endpoint, e))?;

        if !response.status().is_success() {
            return Err(SourceError::Http {
                status: response.status().as_u16(),
                message: format!("unexpected status from {SOURCE} listing"),
            });
        }

        let payload: ContestListPayload = response
            .json()
            .await
            .map_err(|e| SourceError::parse_error(SOURCE, e.to_string()))?;

        if payload.status != "OK" {
            return Err(SourceError::upstream_rejected(
                SOURCE,
                payload.comment.unwrap_or(payload.status),
            ));
        }

        Ok(Self::map_payload(payload.result, Utc::now()))
    }
}
