//! Video source adapters
//!
//! One playlist per platform, fetched concurrently. Platforms without a
//! configured playlist contribute nothing, and a failed playlist fetch is
//! isolated to its platform the same way contest source failures are.

pub mod youtube;

use futures::future::join_all;
use tracing::warn;

use crate::models::{Platform, VideoCandidate};
use youtube::YoutubeClient;

/// Fetch candidates from every configured playlist concurrently and
/// concatenate the results. Failures degrade to zero candidates for the
/// affected platform only.
pub async fn collect_candidates(
    youtube: &YoutubeClient,
    playlists: &[(Platform, String)],
) -> Vec<VideoCandidate> {
    let fetches = playlists.iter().map(|(platform, playlist_id)| async move {
        match youtube.fetch_playlist(*platform, playlist_id).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    "Video playlist fetch failed for {}, contributing no candidates: {}",
                    platform.key(),
                    e
                );
                Vec::new()
            }
        }
    });

    join_all(fetches).await.into_iter().flatten().collect()
}
