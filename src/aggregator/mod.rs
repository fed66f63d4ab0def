//! Contest aggregation
//!
//! Fans out one fetch per registered source adapter, isolates per-source
//! failures as empty contributions, and concatenates the results. One
//! source going down must never blank the sources that answered.

pub mod scheduler;

use futures::future::join_all;
use tracing::{info, warn};

use crate::models::Contest;
use crate::sources::ContestSource;

pub struct ContestAggregator {
    sources: Vec<Box<dyn ContestSource>>,
}

impl ContestAggregator {
    pub fn new(sources: Vec<Box<dyn ContestSource>>) -> Self {
        Self { sources }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Fetch every registered source concurrently and concatenate the
    /// results. A failed source is logged and contributes nothing. Record
    /// order within a source is preserved; sources land in registration
    /// order.
    pub async fn aggregate(&self) -> Vec<Contest> {
        let fetches = self.sources.iter().map(|source| async move {
            match source.fetch().await {
                Ok(contests) => {
                    info!(
                        "Fetched {} contests from {}",
                        contests.len(),
                        source.platform().key()
                    );
                    contests
                }
                Err(e) => {
                    warn!(
                        "Contest fetch failed for {}, contributing no contests: {}",
                        source.platform().key(),
                        e
                    );
                    Vec::new()
                }
            }
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{SourceError, SourceResult};
    use crate::models::{ContestStatus, Platform};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    struct StubSource {
        platform: Platform,
        contests: Vec<Contest>,
        fail: bool,
    }

    #[async_trait]
    impl ContestSource for StubSource {
        fn platform(&self) -> Platform {
            self.platform
        }

        async fn fetch(&self) -> SourceResult<Vec<Contest>> {
            if self.fail {
                Err(SourceError::timeout("https://example.com"))
            } else {
                Ok(self.contests.clone())
            }
        }
    }

    fn contest(id: &str, platform: Platform) -> Contest {
        Contest {
            id: id.to_string(),
            name: id.to_string(),
            platform,
            start_time: Utc.timestamp_opt(1_000, 0).unwrap(),
            end_time: Utc.timestamp_opt(2_000, 0).unwrap(),
            url: "https://example.com".to_string(),
            status: ContestStatus::Past,
            solution_url: None,
        }
    }

    #[tokio::test]
    async fn concatenates_all_sources() {
        let aggregator = ContestAggregator::new(vec![
            Box::new(StubSource {
                platform: Platform::Codeforces,
                contests: vec![contest("cf-1", Platform::Codeforces), contest("cf-2", Platform::Codeforces)],
                fail: false,
            }),
            Box::new(StubSource {
                platform: Platform::Leetcode,
                contests: vec![contest("lc-a", Platform::Leetcode)],
                fail: false,
            }),
        ]);

        let contests = aggregator.aggregate().await;
        let ids: Vec<&str> = contests.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cf-1", "cf-2", "lc-a"]);
    }

    #[tokio::test]
    async fn failed_source_contributes_nothing() {
        let aggregator = ContestAggregator::new(vec![
            Box::new(StubSource {
                platform: Platform::Codeforces,
                contests: vec![contest("cf-1", Platform::Codeforces)],
                fail: true,
            }),
            Box::new(StubSource {
                platform: Platform::Codechef,
                contests: vec![contest("cc-1", Platform::Codechef), contest("cc-2", Platform::Codechef)],
                fail: false,
            }),
        ]);

        let contests = aggregator.aggregate().await;
        let ids: Vec<&str> = contests.iter().map(|c| c.id.as_str()).collect();
        // order within the surviving source preserved
        assert_eq!(ids, vec!["cc-1", "cc-2"]);
    }

    #[tokio::test]
    async fn all_sources_failing_yields_an_empty_list() {
        let aggregator = ContestAggregator::new(vec![Box::new(StubSource {
            platform: Platform::Codeforces,
            contests: vec![],
            fail: true,
        })]);

        assert!(aggregator.aggregate().await.is_empty());
    }
}
