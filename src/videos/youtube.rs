//! YouTube playlist client
//!
//! Fetches one bounded page of a solution playlist via the Data API's
//! `playlistItems` endpoint and maps the entries into video candidates.
//! Entries without a usable title or video id (deleted or private videos
//! still listed in the playlist) are dropped.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{SourceError, SourceResult};
use crate::models::{Platform, VideoCandidate};

const SOURCE: &str = "youtube";

#[derive(Debug, Deserialize)]
struct PlaylistPayload {
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    snippet: Option<RawSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnippet {
    title: Option<String>,
    resource_id: Option<RawResourceId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResourceId {
    video_id: Option<String>,
}

#[derive(Clone)]
pub struct YoutubeClient {
    client: Client,
    endpoint: String,
    api_key: String,
    max_results: u32,
}

impl YoutubeClient {
    pub fn new(client: Client, endpoint: String, api_key: String, max_results: u32) -> Self {
        Self {
            client,
            endpoint,
            api_key,
            max_results,
        }
    }

    /// Fetch up to `max_results` entries of one playlist and tag them with
    /// the platform the playlist belongs to.
    pub async fn fetch_playlist(
        &self,
        platform: Platform,
        playlist_id: &str,
    ) -> SourceResult<Vec<VideoCandidate>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("part", "snippet"),
                ("playlistId", playlist_id),
            ])
            .query(&[("maxResults", self.max_results)])
            .send()
            .await
            .map_err(|e| SourceError::from_request(&self.endpoint, e))?;

        if !response.status().is_success() {
            return Err(SourceError::Http {
                status: response.status().as_u16(),
                message: format!("unexpected status fetching playlist {playlist_id}"),
            });
        }

        let payload: PlaylistPayload = response
            .json()
            .await
            .map_err(|e| SourceError::parse_error(SOURCE, e.to_string()))?;

        Ok(Self::map_payload(payload.items, platform))
    }

    fn map_payload(items: Vec<Value>, platform: Platform) -> Vec<VideoCandidate> {
        let total = items.len();
        let candidates: Vec<VideoCandidate> = items
            .into_iter()
            .filter_map(|value| Self::map_item(value, platform))
            .collect();
        debug!(
            "Mapped {}/{} playlist items for {}",
            candidates.len(),
            total,
            platform.key()
        );
        candidates
    }

    fn map_item(value: Value, platform: Platform) -> Option<VideoCandidate> {
        let item: RawItem = match serde_json::from_value(value) {
            Ok(item) => item,
            Err(e) => {
                warn!("Dropping undecodable {SOURCE} playlist item: {e}");
                return None;
            }
        };

        let snippet = item.snippet?;
        let title = snippet.title?;
        let video_id = snippet.resource_id.and_then(|r| r.video_id)?;

        Some(VideoCandidate {
            platform,
            title,
            video_url: format!("https://youtube.com/watch?v={video_id}"),
        })
    }
}
