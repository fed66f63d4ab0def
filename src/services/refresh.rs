//! Refresh pipeline
//!
//! One invocation runs the full cycle: fetch every contest source and every
//! solution playlist concurrently, match videos to contests, merge the
//! results with the manual overrides, and swap the served snapshot. Each
//! cycle is self-contained; the only state carried across cycles is the
//! override map and the snapshot it replaces.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};
use uuid::Uuid;

use crate::aggregator::ContestAggregator;
use crate::config::Config;
use crate::matcher::SolutionMatcher;
use crate::models::{Platform, RefreshSummary, VideoCandidate};
use crate::sources::build_sources;
use crate::store::ContestStore;
use crate::videos::{self, youtube::YoutubeClient};

#[derive(Clone)]
pub struct RefreshService {
    aggregator: Arc<ContestAggregator>,
    youtube: Option<YoutubeClient>,
    playlists: Vec<(Platform, String)>,
    store: ContestStore,
}

impl RefreshService {
    pub fn new(config: &Config, client: reqwest::Client, store: ContestStore) -> Self {
        let aggregator = Arc::new(ContestAggregator::new(build_sources(
            &config.sources,
            &client,
        )));

        let youtube = if config.videos.api_key.is_empty() {
            None
        } else {
            Some(YoutubeClient::new(
                client,
                config.videos.endpoint.clone(),
                config.videos.api_key.clone(),
                config.videos.max_results,
            ))
        };

        Self {
            aggregator,
            youtube,
            playlists: config.videos.playlist_pairs(),
            store,
        }
    }

    /// Run one refresh cycle and return its summary.
    ///
    /// Upstream failures degrade to partial results inside the pipeline, so
    /// the cycle itself always completes. Losing every source produces an
    /// empty snapshot, not an error.
    pub async fn refresh(&self) -> RefreshSummary {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            "Refresh {} started ({} sources, {} playlists)",
            run_id,
            self.aggregator.source_count(),
            self.playlists.len()
        );

        let (contests, candidates) = tokio::join!(
            self.aggregator.aggregate(),
            self.collect_candidates(),
        );

        let matches = SolutionMatcher::match_candidates(&contests, &candidates);

        // First match per contest id, mirroring the merge precedence.
        let mut matched = HashMap::new();
        for m in &matches {
            matched
                .entry(m.contest_id.clone())
                .or_insert_with(|| m.video_url.clone());
        }

        let overrides = self.store.overrides().await;
        let merged = SolutionMatcher::attach_solutions(contests, &matches, &overrides);

        let summary = RefreshSummary {
            run_id,
            contest_count: merged.len(),
            candidate_count: candidates.len(),
            matched_count: matches.len(),
            duration_ms: started.elapsed().as_millis() as u64,
        };

        self.store.replace(merged, matched).await;

        info!(
            "Refresh {} complete: {} contests, {}/{} videos matched in {}ms",
            summary.run_id,
            summary.contest_count,
            summary.matched_count,
            summary.candidate_count,
            summary.duration_ms
        );
        summary
    }

    async fn collect_candidates(&self) -> Vec<VideoCandidate> {
        match &self.youtube {
            Some(youtube) => videos::collect_candidates(youtube, &self.playlists).await,
            None => {
                debug!("No video API key configured, skipping solution playlists");
                Vec::new()
            }
        }
    }
}
