use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::Platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub web: WebConfig,
    pub refresh: RefreshConfig,
    pub sources: SourcesConfig,
    pub videos: VideosConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Six-field cron expression (seconds first) driving the refresh cycle.
    pub cron: String,
    pub on_startup: bool,
    pub jitter_seconds: u64,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub codeforces: SourceConfig,
    pub codechef: SourceConfig,
    pub leetcode: SourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub enabled: bool,
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideosConfig {
    /// Empty string disables playlist fetching entirely.
    pub api_key: String,
    pub endpoint: String,
    pub max_results: u32,
    pub playlists: PlaylistsConfig,
}

/// Playlist id per platform. An absent entry means that platform has no
/// solution playlist and is skipped during the video fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistsConfig {
    pub codeforces: Option<String>,
    pub codechef: Option<String>,
    pub leetcode: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            refresh: RefreshConfig {
                cron: "0 */15 * * * *".to_string(),
                on_startup: true,
                jitter_seconds: 10,
                request_timeout_seconds: 15,
            },
            sources: SourcesConfig {
                codeforces: SourceConfig {
                    enabled: true,
                    endpoint: "https://codeforces.com/api/contest.list".to_string(),
                },
                codechef: SourceConfig {
                    enabled: true,
                    endpoint: "https://www.codechef.com/api/list/contests/all?sort_by=START&sorting_order=asc&offset=0&mode=all".to_string(),
                },
                leetcode: SourceConfig {
                    enabled: true,
                    endpoint: "https://leetcode.com/graphql".to_string(),
                },
            },
            videos: VideosConfig {
                api_key: String::new(),
                endpoint: "https://www.googleapis.com/youtube/v3/playlistItems".to_string(),
                max_results: 50,
                playlists: PlaylistsConfig {
                    codeforces: Some("PLcXpkI9A-RZLUfBSNp-YQBCOezZKbDSgB".to_string()),
                    codechef: Some("PLcXpkI9A-RZIZ6lsE0KCcLWeKNoG45fYr".to_string()),
                    leetcode: Some("PLcXpkI9A-RZI6FhydNz3JBt_-p_i25Cbr".to_string()),
                },
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_file, contents)?;
            Ok(default_config)
        }
    }
}

impl VideosConfig {
    /// Playlist fan-out list in platform aggregation order, skipping
    /// platforms with no configured playlist.
    pub fn playlist_pairs(&self) -> Vec<(Platform, String)> {
        let entries = [
            (Platform::Codeforces, &self.playlists.codeforces),
            (Platform::Codechef, &self.playlists.codechef),
            (Platform::Leetcode, &self.playlists.leetcode),
        ];
        entries
            .into_iter()
            .filter_map(|(platform, playlist)| {
                playlist.as_ref().map(|id| (platform, id.clone()))
            })
            .collect()
    }
}
