use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{error, info};

use super::AppState;
use crate::errors::AppError;
use crate::models::*;

#[derive(Debug, Deserialize)]
pub struct ContestQueryParams {
    /// Comma-separated platform keys, e.g. `codeforces,leetcode`
    pub platforms: Option<String>,
    /// One of `all`, `upcoming`, `ongoing`, `past`
    pub status: Option<String>,
}

impl ContestQueryParams {
    fn into_filters(self) -> Result<ContestFilters, String> {
        let platforms = match self.platforms {
            Some(raw) => {
                let mut set = HashSet::new();
                for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    set.insert(Platform::from_str(token)?);
                }
                // `platforms=` with no usable tokens means no restriction
                if set.is_empty() {
                    None
                } else {
                    Some(set)
                }
            }
            None => None,
        };

        let status = match self.status {
            Some(raw) => StatusFilter::from_str(&raw)?,
            None => StatusFilter::All,
        };

        Ok(ContestFilters { platforms, status })
    }
}

fn error_status(err: &AppError) -> StatusCode {
    match err {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// Contests API
pub async fn list_contests(
    Query(params): Query<ContestQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<ContestListResponse>, StatusCode> {
    let filters = match params.into_filters() {
        Ok(filters) => filters,
        Err(e) => {
            error!("Rejected contest list query: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let (contests, last_refreshed) = state.store.snapshot(Utc::now()).await;
    let contests: Vec<Contest> = contests
        .into_iter()
        .filter(|c| filters.matches(c))
        .collect();

    Ok(Json(ContestListResponse {
        total: contests.len(),
        contests,
        last_refreshed,
    }))
}

pub async fn get_contest(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Contest>, StatusCode> {
    match state.store.get(&id, Utc::now()).await {
        Some(contest) => Ok(Json(contest)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

pub async fn list_platforms() -> Json<Vec<PlatformInfo>> {
    let platforms = Platform::all()
        .into_iter()
        .map(|platform| PlatformInfo {
            platform,
            name: platform.display_name().to_string(),
            numeric_codes: platform.uses_numeric_codes(),
        })
        .collect();
    Json(platforms)
}

pub async fn trigger_refresh(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, StatusCode> {
    info!("Manual refresh requested");
    let summary = state.refresher.refresh().await;

    Ok(Json(RefreshResponse {
        success: true,
        message: format!(
            "Refreshed {} contests, matched {} solution videos",
            summary.contest_count, summary.matched_count
        ),
        contest_count: summary.contest_count,
        matched_count: summary.matched_count,
    }))
}

// Solution overrides API
pub async fn set_solution_override(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<SolutionOverrideRequest>,
) -> Result<Json<Contest>, StatusCode> {
    match state.store.set_override(&id, &payload.url, Utc::now()).await {
        Ok(contest) => {
            info!("Solution override set for {}", id);
            Ok(Json(contest))
        }
        Err(e) => {
            error!("Failed to set solution override for {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}

pub async fn clear_solution_override(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Contest>, StatusCode> {
    match state.store.clear_override(&id, Utc::now()).await {
        Ok(contest) => {
            info!("Solution override cleared for {}", id);
            Ok(Json(contest))
        }
        Err(e) => {
            error!("Failed to clear solution override for {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}
