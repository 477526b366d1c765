use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::warn;

use orgatlas_domains::ActivityTree;
use orgatlas_store::{ActivityPatch, NewActivity};

use crate::auth::ApiKey;
use crate::rest::organizations::{to_out, OrganizationOut};
use crate::rest::{bad_request, not_found};
use crate::AppState;

/// Depth bound for the subtree lookup. The taxonomy is a 3-tier affair, so
/// the boundary accepts 1..=3 and defaults to the full depth.
const DEFAULT_LEVEL: i64 = 3;
const MAX_LEVEL: i64 = 3;

#[derive(Deserialize)]
pub struct SubtreeQuery {
    level: Option<i64>,
}

pub async fn list(State(state): State<Arc<AppState>>, _auth: ApiKey) -> impl IntoResponse {
    match state.activities.list().await {
        Ok(activities) => Json(activities).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to list activities");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Json(payload): Json<NewActivity>,
) -> impl IntoResponse {
    match state.activities.create(payload).await {
        Ok(activity) => (StatusCode::CREATED, Json(activity)).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to create activity");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.activities.get(id).await {
        Ok(Some(activity)) => Json(activity).into_response(),
        Ok(None) => not_found("Activity not found"),
        Err(e) => {
            warn!(error = %e, "Failed to load activity");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i32>,
    Json(payload): Json<ActivityPatch>,
) -> impl IntoResponse {
    match state.activities.update(id, payload).await {
        Ok(Some(activity)) => Json(activity).into_response(),
        Ok(None) => not_found("Activity not found"),
        Err(e) => {
            warn!(error = %e, "Failed to update activity");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.activities.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("Activity not found"),
        Err(e) => {
            warn!(error = %e, "Failed to delete activity");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Organizations tagged with any activity inside the subtree rooted at
/// `id`, bounded to `level` hierarchy levels. An unknown root yields an
/// empty list, not a 404: "nothing matched" is not an error here.
pub async fn organizations_by_subtree(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i32>,
    Query(params): Query<SubtreeQuery>,
) -> impl IntoResponse {
    let level = params.level.unwrap_or(DEFAULT_LEVEL);
    if !(1..=MAX_LEVEL).contains(&level) {
        return bad_request("level must be between 1 and 3");
    }

    let snapshot = match state.activities.list().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(error = %e, "Failed to load activity snapshot");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let ids = ActivityTree::new(&snapshot).gather_descendant_ids(id, level as u32);
    if ids.is_empty() {
        return Json(Vec::<OrganizationOut>::new()).into_response();
    }

    match state.organizations.by_activity_ids(&ids).await {
        Ok(orgs) => Json(to_out(orgs)).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to list organizations by activity subtree");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
