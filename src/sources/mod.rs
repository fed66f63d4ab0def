//! Contest source adapters
//!
//! One adapter per upstream platform, all implementing the same
//! fetch-and-normalize contract. Adapters drop malformed records one at a
//! time with a logged warning and surface whole-fetch failures as
//! `SourceError`; the aggregator turns those into empty contributions so no
//! upstream problem propagates past the pipeline boundary.

pub mod codechef;
pub mod codeforces;
pub mod leetcode;

use async_trait::async_trait;

use crate::config::SourcesConfig;
use crate::errors::SourceResult;
use crate::models::{Contest, Platform};

/// Common contract for one upstream contest listing
#[async_trait]
pub trait ContestSource: Send + Sync {
    /// Platform this adapter feeds
    fn platform(&self) -> Platform;

    /// Fetch the upstream listing and map it into normalized contests.
    ///
    /// Individual malformed records are dropped inside the adapter; an `Err`
    /// means the fetch as a whole failed (network, HTTP status, undecodable
    /// payload, payload-level rejection).
    async fn fetch(&self) -> SourceResult<Vec<Contest>>;
}

/// Build the adapter registry from configuration, skipping disabled sources.
pub fn build_sources(
    config: &SourcesConfig,
    client: &reqwest::Client,
) -> Vec<Box<dyn ContestSource>> {
    let mut sources: Vec<Box<dyn ContestSource>> = Vec::new();
    if config.codeforces.enabled {
        sources.push(Box::new(codeforces::CodeforcesSource::new(
            client.clone(),
            config.codeforces.endpoint.clone(),
        )));
    }
    if config.codechef.enabled {
        sources.push(Box::new(codechef::CodechefSource::new(
            client.clone(),
            config.codechef.endpoint.clone(),
        )));
    }
    if config.leetcode.enabled {
        sources.push(Box::new(leetcode::LeetcodeSource::new(
            client.clone(),
            config.leetcode.endpoint.clone(),
        )));
    }
    sources
}
