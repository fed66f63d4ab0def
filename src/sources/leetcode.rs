//! Leetcode contest source
//!
//! The listing lives behind a GraphQL endpoint; one query returns every
//! contest with its slug, start time (epoch seconds) and duration. Numeric
//! fields have been observed both as JSON numbers and as numeric strings,
//! so decoding accepts either.

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

const SOURCE: &str = "leetcode";
const CONTESTS_QUERY: &str = "{ allContests { title titleSlug startTime duration } }";

#[derive(Debug, Deserialize)]
struct GraphqlPayload {
    data: Option<ContestData>,
}

#[derive(Debug, Deserialize)]
struct ContestData {
    #[serde(rename = "allContests", default)]
    all_contests: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContest {
    title: Option<String>,
    title_slug: Option<String>,
    start_time: Option<EpochField>,
    duration: Option<EpochField>,
}

/// Epoch value that may arrive as a number or a numeric string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EpochField {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl EpochField {
    fn as_seconds(&self) -> Option<i64> {
        match self {
            EpochField::Integer(n) => Some(*n),
            EpochField::Float(f) if f.is_finite() => Some(*f as i64),
            EpochField::Float(_) => None,
            EpochField::Text(s) => s.trim().parse().ok(),
        }
    }
}

pub struct LeetcodeSource {
    client: Client,
    endpoint: String,
}

impl LeetcodeSource {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

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

        let (Some(title), Some(slug), Some(start_field), Some(duration_field)) =
            (raw.title, raw.title_slug, raw.start_time, raw.duration)
        else {
            warn!("Dropping {SOURCE} record with missing fields");
            return None;
        };

        let (Some(start_secs), Some(duration_secs)) =
            (start_field.as_seconds(), duration_field.as_seconds())
        else {
            warn!("Dropping {SOURCE} contest {slug}: non-numeric timestamps");
            return None;
        };

        let start_time = match DateTimeParser::parse_epoch_seconds(start_secs) {
            Ok(t) => t,
            Err(e) => {
                warn!("Dropping {SOURCE} contest {slug}: {e}");
                return None;
            }
        };
        let end_secs = match start_secs.checked_add(duration_secs) {
            Some(s) => s,
            None => {
                warn!("Dropping {SOURCE} contest {slug}: duration overflows");
                return None;
            }
        };
        let end_time = match DateTimeParser::parse_epoch_seconds(end_secs) {
            Ok(t) => t,
            Err(e) => {
                warn!("Dropping {SOURCE} contest {slug}: {e}");
                return None;
            }
        };
        if end_time < start_time {
            warn!("Dropping {SOURCE} contest {slug}: ends before it starts");
            return None;
        }

        Some(Contest {
            id: format!("lc-{slug}"),
            name: title,
            platform: Platform::Leetcode,
            start_time,
            end_time,
            url: format!("https://leetcode.com/contest/{slug}"),
            status: ContestStatus::classify(Some(start_time), Some(end_time), now),
            solution_url: None,
        })
    }
}

#[async_trait]
impl ContestSource for LeetcodeSource {
    fn platform(&self) -> Platform {
        Platform::Leetcode
    }

    async fn fetch(&self) -> SourceResult<Vec<Contest>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "query": CONTESTS_QUERY }))
            .send()
            .await
            .map_err(|e| SourceError::from_request(&self.endpoint, e))?;

        if !response.status().is_success() {
            return Err(SourceError::Http {
                status: response.status().as_u16(),
                message: format!("unexpected status from {SOURCE} listing"),
            });
        }

        let payload: GraphqlPayload = response
            .json()
            .await
            .map_err(|e| SourceError::parse_error(SOURCE, e.to_string()))?;

        let data = payload.data.ok_or_else(|| {
            SourceError::upstream_rejected(SOURCE, "GraphQL response carried no data")
        })?;

        Ok(Self::map_payload(data.all_contests, Utc::now()))
    }
}
