//! Solution video matching
//!
//! Correlates playlist videos with contests of the same platform by comparing
//! normalized titles. Matching is first-match-wins over the contests in
//! aggregation order, with a digit-run fallback for platforms whose contest
//! names are primarily numeric. The merge step attaches the resulting URLs
//! onto contests, giving manual overrides precedence over automated matches.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{Contest, SolutionMatch, VideoCandidate};

// Static regex patterns compiled once (title normalization runs per video x contest)
static RE_NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]").unwrap());
static RE_BOILERPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:solutions?|editorial|explanation|video)\b").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static RE_DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Canonicalize a title for comparison.
///
/// Lowercases, strips every character outside letters/digits/whitespace,
/// removes the boilerplate tokens video titles append to contest names
/// ("solution(s)", "editorial", "explanation", "video") as whole words, then
/// collapses whitespace. Idempotent: normalizing an already-normalized string
/// returns it unchanged.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = RE_NON_ALNUM.replace_all(&lowered, "");
    let cleaned = RE_BOILERPLATE.replace_all(&stripped, "");
    RE_WHITESPACE.replace_all(&cleaned, " ").trim().to_string()
}

/// First run of digits in a raw contest name ("Starters 182 (Rated)" -> "182")
fn first_digit_run(name: &str) -> Option<&str> {
    RE_DIGIT_RUN.find(name).map(|m| m.as_str())
}

/// Matches video candidates to contests and merges the results
pub struct SolutionMatcher;

impl SolutionMatcher {
    /// Match one candidate against the contests of its platform.
    ///
    /// Contests are scanned in aggregation order and the first hit wins.
    /// Per contest, two rules apply in order: normalized containment in
    /// either direction, then (only for numeric-code platforms) whether the
    /// normalized video title contains the first digit run of the contest's
    /// raw name. Candidates that match nothing yield `None` and are dropped
    /// by the caller.
    pub fn match_candidate(
        contests: &[Contest],
        candidate: &VideoCandidate,
    ) -> Option<SolutionMatch> {
        let norm_video = normalize_title(&candidate.title);

        for contest in contests
            .iter()
            .filter(|c| c.platform == candidate.platform)
        {
            let norm_contest = normalize_title(&contest.name);
            if norm_video.contains(&norm_contest) || norm_contest.contains(&norm_video) {
                return Some(SolutionMatch {
                    contest_id: contest.id.clone(),
                    video_url: candidate.video_url.clone(),
                    title: candidate.title.clone(),
                });
            }

            if candidate.platform.uses_numeric_codes() {
                if let Some(run) = first_digit_run(&contest.name) {
                    if norm_video.contains(run) {
                        return Some(SolutionMatch {
                            contest_id: contest.id.clone(),
                            video_url: candidate.video_url.clone(),
                            title: candidate.title.clone(),
                        });
                    }
                }
            }
        }

        None
    }

    /// Match every candidate against the contest set, discarding candidates
    /// with no match. Pure per candidate; no inter-candidate dependency.
    pub fn match_candidates(
        contests: &[Contest],
        candidates: &[VideoCandidate],
    ) -> Vec<SolutionMatch> {
        candidates
            .iter()
            .filter_map(|candidate| {
                let matched = Self::match_candidate(contests, candidate);
                if matched.is_none() {
                    debug!(
                        "No contest matched video '{}' on {}",
                        candidate.title,
                        candidate.platform.key()
                    );
                }
                matched
            })
            .collect()
    }

    /// Merge step: set each contest's solution URL from a manual override if
    /// one exists for its id, else from the first match carrying its id, else
    /// leave it unset.
    pub fn attach_solutions(
        contests: Vec<Contest>,
        matches: &[SolutionMatch],
        overrides: &HashMap<String, String>,
    ) -> Vec<Contest> {
        contests
            .into_iter()
            .map(|mut contest| {
                contest.solution_url = overrides.get(&contest.id).cloned().or_else(|| {
                    matches
                        .iter()
                        .find(|m| m.contest_id == contest.id)
                        .map(|m| m.video_url.clone())
                });
                contest
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContestStatus, Platform};
    use chrono::{TimeZone, Utc};

    fn contest(id: &str, name: &str, platform: Platform) -> Contest {
        Contest {
            id: id.to_string(),
            name: name.to_string(),
            platform,
            start_time: Utc.timestamp_opt(1_000, 0).unwrap(),
            end_time: Utc.timestamp_opt(2_000, 0).unwrap(),
            url: "https://example.com".to_string(),
            status: ContestStatus::Past,
            solution_url: None,
        }
    }

    fn candidate(title: &str, platform: Platform) -> VideoCandidate {
        VideoCandidate {
            platform,
            title: title.to_string(),
            video_url: format!("https://youtube.com/watch?v={}", title.len()),
        }
    }

    #[test]
    fn normalize_strips_boilerplate_and_punctuation() {
        assert_eq!(
            normalize_title("Codeforces Round 999 Editorial"),
            "codeforces round 999"
        );
        assert_eq!(
            normalize_title("Weekly Contest 431 | Video Solutions!"),
            "weekly contest 431"
        );
        assert_eq!(normalize_title("  A -- B  "), "a b");
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "Codeforces Round 999 Editorial",
            "Starters 182 (Rated till 5 star) SOLUTIONS",
            "résumé—driven development",
            "",
            "   ",
        ];
        for input in inputs {
            let once = normalize_title(input);
            assert_eq!(normalize_title(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn normalize_keeps_boilerplate_embedded_in_words() {
        // whole-word removal only; "resolution" must survive
        assert_eq!(normalize_title("High Resolution"), "high resolution");
    }

    #[test]
    fn containment_match_returns_contest_id() {
        let contests = vec![contest("cf-999", "Codeforces Round 999", Platform::Codeforces)];
        let video = candidate("Codeforces Round 999 Editorial", Platform::Codeforces);

        let matched = SolutionMatcher::match_candidate(&contests, &video).unwrap();
        assert_eq!(matched.contest_id, "cf-999");
        assert_eq!(matched.title, "Codeforces Round 999 Editorial");
    }

    #[test]
    fn containment_works_in_both_directions() {
        // video title shorter than the contest name
        let contests = vec![contest(
            "cf-1000",
            "Codeforces Round 1000 (Div. 2)",
            Platform::Codeforces,
        )];
        let video = candidate("Round 1000 (Div. 2)", Platform::Codeforces);
        // contest normalizes to "codeforces round 1000 div 2", video to
        // "round 1000 div 2"; the former contains the latter
        assert!(SolutionMatcher::match_candidate(&contests, &video).is_some());
    }

    #[test]
    fn unmatched_candidate_is_discarded() {
        let contests = vec![contest("cf-999", "Codeforces Round 999", Platform::Codeforces)];
        let video = candidate("Graph Theory Lecture 3", Platform::Codeforces);

        let matches = SolutionMatcher::match_candidates(&contests, &[video]);
        assert!(matches.is_empty());
    }

    #[test]
    fn platform_mismatch_never_matches() {
        let contests = vec![contest("cf-999", "Round 999", Platform::Codeforces)];
        let video = candidate("Round 999 Editorial", Platform::Leetcode);

        assert!(SolutionMatcher::match_candidate(&contests, &video).is_none());
    }

    #[test]
    fn digit_run_fallback_for_numeric_platform() {
        // containment fails (extra words on both sides), the digit run hits
        let contests = vec![contest(
            "cc-START182",
            "Starters 182 (Rated till 5 star)",
            Platform::Codechef,
        )];
        let video = candidate("CodeChef Starters 182 Full Solutions", Platform::Codechef);

        let matched = SolutionMatcher::match_candidate(&contests, &video).unwrap();
        assert_eq!(matched.contest_id, "cc-START182");
    }

    #[test]
    fn digit_run_fallback_is_not_applied_to_other_platforms() {
        let contests = vec![contest("lc-wc-431", "Weekly Contest 431", Platform::Leetcode)];
        // shares the digit run but has no title overlap once normalized
        let video = candidate("431 MHz antenna build", Platform::Leetcode);

        assert!(SolutionMatcher::match_candidate(&contests, &video).is_none());
    }

    #[test]
    fn first_match_wins_in_aggregation_order() {
        // the known ambiguity: "round 1000" contains "round 100", and the
        // earlier-listed contest takes the match
        let contests = vec![
            contest("cf-100", "Round 100", Platform::Codeforces),
            contest("cf-1000", "Round 1000", Platform::Codeforces),
        ];
        let video = candidate("Round 1000 Editorial", Platform::Codeforces);

        let matched = SolutionMatcher::match_candidate(&contests, &video).unwrap();
        assert_eq!(matched.contest_id, "cf-100");
    }

    #[test]
    fn starters_solutions_example_matches() {
        let contests = vec![contest("cc-START182", "Starters 182", Platform::Codechef)];
        let video = candidate("Starters 182 Solutions", Platform::Codechef);

        let matched = SolutionMatcher::match_candidate(&contests, &video).unwrap();
        assert_eq!(matched.contest_id, "cc-START182");
    }

    #[test]
    fn attach_prefers_override_then_first_match() {
        let contests = vec![
            contest("cf-1", "Round 1", Platform::Codeforces),
            contest("cf-2", "Round 2", Platform::Codeforces),
            contest("cf-3", "Round 3", Platform::Codeforces),
        ];
        let matches = vec![
            SolutionMatch {
                contest_id: "cf-1".to_string(),
                video_url: "https://youtube.com/watch?v=auto1".to_string(),
                title: "Round 1 Editorial".to_string(),
            },
            SolutionMatch {
                contest_id: "cf-1".to_string(),
                video_url: "https://youtube.com/watch?v=auto1b".to_string(),
                title: "Round 1 Editorial (re-upload)".to_string(),
            },
            SolutionMatch {
                contest_id: "cf-2".to_string(),
                video_url: "https://youtube.com/watch?v=auto2".to_string(),
                title: "Round 2 Editorial".to_string(),
            },
        ];
        let mut overrides = HashMap::new();
        overrides.insert(
            "cf-1".to_string(),
            "https://example.com/manual".to_string(),
        );

        let merged = SolutionMatcher::attach_solutions(contests, &matches, &overrides);

        // override beats the automated match for cf-1
        assert_eq!(
            merged[0].solution_url.as_deref(),
            Some("https://example.com/manual")
        );
        // first automated match wins for cf-2
        assert_eq!(
            merged[1].solution_url.as_deref(),
            Some("https://youtube.com/watch?v=auto2")
        );
        // nothing for cf-3
        assert_eq!(merged[2].solution_url, None);
    }
}
