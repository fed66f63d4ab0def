use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

/// The closed set of supported contest platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Codeforces,
    Codechef,
    Leetcode,
}

impl Platform {
    pub fn all() -> [Platform; 3] {
        [Platform::Codeforces, Platform::Codechef, Platform::Leetcode]
    }

    /// Short tag used to prefix contest ids so they cannot collide across platforms
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::Codeforces => "cf",
            Platform::Codechef => "cc",
            Platform::Leetcode => "lc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Codeforces => "Codeforces",
            Platform::Codechef => "CodeChef",
            Platform::Leetcode => "LeetCode",
        }
    }

    /// Lowercase name as used in configuration keys and query parameters
    pub fn key(&self) -> &'static str {
        match self {
            Platform::Codeforces => "codeforces",
            Platform::Codechef => "codechef",
            Platform::Leetcode => "leetcode",
        }
    }

    /// Platforms whose contest names are primarily numeric ("Starters 182").
    /// These get a digit-run fallback during solution matching because the
    /// video titles rarely contain the full contest name verbatim.
    pub fn uses_numeric_codes(&self) -> bool {
        matches!(self, Platform::Codechef)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "codeforces" => Ok(Platform::Codeforces),
            "codechef" => Ok(Platform::Codechef),
            "leetcode" => Ok(Platform::Leetcode),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Temporal status of a contest relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    Upcoming,
    Ongoing,
    Past,
}

impl ContestStatus {
    /// Classify a contest window against `now`.
    ///
    /// A missing instant means the upstream value failed to parse; such
    /// contests are classified `Past` so they are never shown as actionable.
    /// Boundary instants (`now == start`, `now == end`) count as `Ongoing`.
    pub fn classify(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> ContestStatus {
        let (start, end) = match (start, end) {
            (Some(s), Some(e)) => (s, e),
            _ => return ContestStatus::Past,
        };
        if now < start {
            ContestStatus::Upcoming
        } else if now > end {
            ContestStatus::Past
        } else {
            ContestStatus::Ongoing
        }
    }
}

/// One contest in the normalized schema shared by every platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contest {
    pub id: String, // platform tag + native id, e.g. "cf-1998"
    pub name: String,
    pub platform: Platform,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub url: String,
    pub status: ContestStatus,
    pub solution_url: Option<String>,
}

impl Contest {
    /// Recompute status from the stored window. The stored `status` reflects
    /// the instant the contest was fetched; reads go through this so a window
    /// that elapsed since the last refresh is reported as past.
    pub fn status_at(&self, now: DateTime<Utc>) -> ContestStatus {
        ContestStatus::classify(Some(self.start_time), Some(self.end_time), now)
    }
}

/// A playlist entry before matching. Lives only within one refresh cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoCandidate {
    pub platform: Platform,
    pub title: String,
    pub video_url: String,
}

/// A matched solution video. Candidates that match no contest are discarded
/// by the matcher, so every record here carries a real contest id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMatch {
    pub contest_id: String,
    pub video_url: String,
    pub title: String, // kept for diagnostics
}

/// Status selector used by callers when filtering the contest list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    All,
    Upcoming,
    Ongoing,
    Past,
}

impl StatusFilter {
    pub fn matches(&self, status: ContestStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Upcoming => status == ContestStatus::Upcoming,
            StatusFilter::Ongoing => status == ContestStatus::Ongoing,
            StatusFilter::Past => status == ContestStatus::Past,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "upcoming" => Ok(StatusFilter::Upcoming),
            "ongoing" => Ok(StatusFilter::Ongoing),
            "past" => Ok(StatusFilter::Past),
            other => Err(format!("unknown status filter: {other}")),
        }
    }
}

/// Filter contract for consumers of the contest list: a platform enable set
/// plus a status selector. `platforms: None` means every platform is enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestFilters {
    pub platforms: Option<HashSet<Platform>>,
    pub status: StatusFilter,
}

impl ContestFilters {
    pub fn matches(&self, contest: &Contest) -> bool {
        let platform_enabled = self
            .platforms
            .as_ref()
            .map(|set| set.contains(&contest.platform))
            .unwrap_or(true);
        platform_enabled && self.status.matches(contest.status)
    }
}

impl Default for ContestFilters {
    fn default() -> Self {
        Self {
            platforms: None,
            status: StatusFilter::All,
        }
    }
}

/// Outcome of one refresh cycle, used for logging and the refresh endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub run_id: Uuid,
    pub contest_count: usize,
    pub candidate_count: usize,
    pub matched_count: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestListResponse {
    pub contests: Vec<Contest>,
    pub total: usize,
    pub last_refreshed: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
    pub contest_count: usize,
    pub matched_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub platform: Platform,
    pub name: String,
    pub numeric_codes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionOverrideRequest {
    pub url: String,
}
