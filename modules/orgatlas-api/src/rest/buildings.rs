use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::warn;

use orgatlas_store::{BuildingPatch, NewBuilding};

use crate::auth::ApiKey;
use crate::rest::{not_found, organizations::to_out};
use crate::AppState;

pub async fn list(State(state): State<Arc<AppState>>, _auth: ApiKey) -> impl IntoResponse {
    match state.buildings.list().await {
        Ok(buildings) => Json(buildings).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to list buildings");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Json(payload): Json<NewBuilding>,
) -> impl IntoResponse {
    match state.buildings.create(payload).await {
        Ok(building) => (StatusCode::CREATED, Json(building)).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to create building");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.buildings.get(id).await {
        Ok(Some(building)) => Json(building).into_response(),
        Ok(None) => not_found("Building not found"),
        Err(e) => {
            warn!(error = %e, "Failed to load building");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i32>,
    Json(payload): Json<BuildingPatch>,
) -> impl IntoResponse {
    match state.buildings.update(id, payload).await {
        Ok(Some(building)) => Json(building).into_response(),
        Ok(None) => not_found("Building not found"),
        Err(e) => {
            warn!(error = %e, "Failed to update building");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.buildings.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("Building not found"),
        Err(e) => {
            warn!(error = %e, "Failed to delete building");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Organizations located in a building. 404 when the building itself is
/// absent, distinct from an existing building with no tenants (200, []).
pub async fn organizations(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.buildings.get(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Building not found"),
        Err(e) => {
            warn!(error = %e, "Failed to load building");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    match state.organizations.by_building(id).await {
        Ok(orgs) => Json(to_out(orgs)).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to list organizations in building");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
