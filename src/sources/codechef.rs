//! Codechef contest source
//!
//! The listing endpoint splits contests across three bucket arrays
//! (`future_contests`, `present_contests`, `past_contests`) which are
//! unioned in that order. Records carry naive datetime strings plus optional
//! `_iso` variants with an explicit offset; the `_iso` field is preferred
//! whenever present. A contest code repeated across buckets is kept once,
//! first seen wins.

use std::collections::HashSet;

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

const SOURCE: &str = "codechef";

#[derive(Debug, Deserialize)]
struct ContestListPayload {
    #[serde(default)]
    future_contests: Vec<Value>,
    #[serde(default)]
    present_contests: Vec<Value>,
    #[serde(default)]
    past_contests: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawContest {
    contest_code: Option<String>,
    contest_name: Option<String>,
    contest_start_date: Option<String>,
    contest_end_date: Option<String>,
    contest_start_date_iso: Option<String>,
    contest_end_date_iso: Option<String>,
}

pub struct CodechefSource {
    client: Client,
    endpoint: String,
}

impl CodechefSource {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    /// Union the buckets, map records, and deduplicate by contest id.
    fn map_payload(payload: ContestListPayload, now: DateTime<Utc>) -> Vec<Contest> {
        let records: Vec<Value> = payload
            .future_contests
            .into_iter()
            .chain(payload.present_contests)
            .chain(payload.past_contests)
            .collect();
        let total = records.len();

        let mut seen = HashSet::new();
        let mut contests = Vec::new();
        for value in records {
            let Some(contest) = Self::map_record(value, now) else {
                continue;
            };
            if seen.insert(contest.id.clone()) {
                contests.push(contest);
            } else {
                debug!("Skipping duplicate {SOURCE} contest {}", contest.id);
            }
        }
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

        let (Some(code), Some(name), Some(start_plain), Some(end_plain)) = (
            raw.contest_code,
            raw.contest_name,
            raw.contest_start_date,
            raw.contest_end_date,
        ) else {
            warn!("Dropping {SOURCE} record with missing fields");
            return None;
        };

        // the iso fields carry an offset, the plain ones do not
        let start_input = raw.contest_start_date_iso.unwrap_or(start_plain);
        let end_input = raw.contest_end_date_iso.unwrap_or(end_plain);

        let start_time = match DateTimeParser::parse_flexible(&start_input) {
            Ok(t) => t,
            Err(_) => {
                warn!("Dropping {SOURCE} contest {code}: invalid start date '{start_input}'");
                return None;
            }
        };
        let end_time = match DateTimeParser::parse_flexible(&end_input) {
            Ok(t) => t,
            Err(_) => {
                warn!("Dropping {SOURCE} contest {code}: invalid end date '{end_input}'");
                return None;
            }
        };
        if end_time < start_time {
            warn!("Dropping {SOURCE} contest {code}: ends before it starts");
            return None;
        }

        Some(Contest {
            id: format!("cc-{code}"),
            name,
            platform: Platform::Codechef,
            start_time,
            end_time,
            url: format!("https://www.codechef.com/{code}"),
            status: ContestStatus::classify(Some(start_time), Some(end_time), now),
            solution_url: None,
        })
    }
}

#[async_trait]
impl ContestSource for CodechefSource {
    fn platform(&self) -> Platform {
        Platform::Codechef
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

        Ok(Self::map_payload(payload, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn payload(future: Vec<Value>, present: Vec<Value>, past: Vec<Value>) -> ContestListPayload {
        ContestListPayload {
            future_contests: future,
            present_contests: present,
            past_contests: past,
        }
    }

    #[test]
    fn prefers_iso_fields_when_present() {
        let records = vec![json!({
            "contest_code": "START182",
            "contest_name": "Starters 182",
            "contest_start_date": "14 Jun 2025 20:00:00",
            "contest_end_date": "14 Jun 2025 22:00:00",
            "contest_start_date_iso": "2025-06-14T20:00:00+05:30",
            "contest_end_date_iso": "2025-06-14T22:00:00+05:30"
        })];

        let contests = CodechefSource::map_payload(payload(records, vec![], vec![]), now());
        assert_eq!(contests.len(), 1);

        let contest = &contests[0];
        assert_eq!(contest.id, "cc-START182");
        assert_eq!(contest.url, "https://www.codechef.com/START182");
        // +05:30 offset applied, not the naive 20:00
        assert_eq!(
            contest.start_time,
            Utc.with_ymd_and_hms(2025, 6, 14, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn falls_back_to_plain_dates_without_iso_fields() {
        let records = vec![json!({
            "contest_code": "COOK150",
            "contest_name": "Cook-Off 150",
            "contest_start_date": "14 Jun 2025 20:00:00",
            "contest_end_date": "14 Jun 2025 22:30:00"
        })];

        let contests = CodechefSource::map_payload(payload(records, vec![], vec![]), now());
        assert_eq!(contests.len(), 1);
        assert_eq!(
            contests[0].start_time,
            Utc.with_ymd_and_hms(2025, 6, 14, 20, 0, 0).unwrap()
        );
    }

    #[test]
    fn unions_buckets_in_order_and_deduplicates_first_seen() {
        let future = vec![json!({
            "contest_code": "START183",
            "contest_name": "Starters 183",
            "contest_start_date": "21 Jun 2025 20:00:00",
            "contest_end_date": "21 Jun 2025 22:00:00"
        })];
        let present = vec![json!({
            "contest_code": "START182",
            "contest_name": "Starters 182",
            "contest_start_date": "14 Jun 2025 20:00:00",
            "contest_end_date": "14 Jun 2025 22:00:00"
        })];
        // stale copy of the present contest lingering in the past bucket
        let past = vec![json!({
            "contest_code": "START182",
            "contest_name": "Starters 182 (stale)",
            "contest_start_date": "14 Jun 2025 19:00:00",
            "contest_end_date": "14 Jun 2025 21:00:00"
        })];

        let contests = CodechefSource::map_payload(payload(future, present, past), now());
        let ids: Vec<&str> = contests.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cc-START183", "cc-START182"]);
        // the first-seen (present bucket) copy won
        assert_eq!(contests[1].name, "Starters 182");
    }

    #[test]
    fn drops_records_with_missing_fields_or_bad_dates() {
        let records = vec![
            json!({"contest_name": "No code"}),
            json!({
                "contest_code": "BAD1",
                "contest_name": "Bad dates",
                "contest_start_date": "not a date",
                "contest_end_date": "also not a date"
            }),
            json!({
                "contest_code": "GOOD1",
                "contest_name": "Good contest",
                "contest_start_date": "14 Jun 2025 20:00:00",
                "contest_end_date": "14 Jun 2025 22:00:00"
            }),
        ];

        let contests = CodechefSource::map_payload(payload(vec![], vec![], records), now());
        assert_eq!(contests.len(), 1);
        assert_eq!(contests[0].id, "cc-GOOD1");
    }

    #[test]
    fn rejects_windows_that_end_before_they_start() {
        let records = vec![json!({
            "contest_code": "REV1",
            "contest_name": "Reversed window",
            "contest_start_date": "14 Jun 2025 22:00:00",
            "contest_end_date": "14 Jun 2025 20:00:00"
        })];

        assert!(CodechefSource::map_payload(payload(records, vec![], vec![]), now()).is_empty());
    }
}
