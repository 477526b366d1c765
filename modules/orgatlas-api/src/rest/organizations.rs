use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use orgatlas_common::{GeoPoint, OrgAtlasError, Organization, Result};
use orgatlas_domains::{filter_by_bbox, filter_by_radius};
use orgatlas_store::{NewOrganization, OrganizationPatch};

use crate::auth::ApiKey;
use crate::rest::not_found;
use crate::AppState;

// --- Query and response shapes ---

/// Query parameters for the organization list. The populated subset picks
/// the search mode: name substring, then radius, then bounding box, then a
/// plain list.
#[derive(Deserialize)]
pub struct OrganizationsQuery {
    name: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    radius: Option<f64>,
    sw_lat: Option<f64>,
    sw_lon: Option<f64>,
    ne_lat: Option<f64>,
    ne_lon: Option<f64>,
}

#[derive(Serialize)]
pub struct OrganizationOut {
    pub id: i32,
    pub name: String,
    pub phone_numbers: Vec<String>,
    pub building_id: i32,
    pub activity_ids: Vec<i32>,
}

impl From<Organization> for OrganizationOut {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            name: org.name,
            phone_numbers: org.phone_numbers,
            building_id: org.building_id,
            activity_ids: org.activity_ids,
        }
    }
}

pub(crate) fn to_out(orgs: Vec<Organization>) -> Vec<OrganizationOut> {
    orgs.into_iter().map(Into::into).collect()
}

// --- Handlers ---

pub async fn list(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Query(params): Query<OrganizationsQuery>,
) -> impl IntoResponse {
    match fetch_filtered(&state, &params).await {
        Ok(orgs) => Json(to_out(orgs)).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to list organizations");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Resolve the search mode from the populated query parameters. Geo modes
/// fetch the full pre-joined snapshot and filter it in memory; a partial
/// geo parameter set falls through to the next mode.
async fn fetch_filtered(
    state: &AppState,
    params: &OrganizationsQuery,
) -> Result<Vec<Organization>> {
    if let Some(name) = params.name.as_deref().filter(|n| !n.is_empty()) {
        return state.organizations.search_by_name(name).await;
    }

    if let (Some(lat), Some(lon), Some(radius)) = (params.lat, params.lon, params.radius) {
        let orgs = state.organizations.list().await?;
        return Ok(filter_by_radius(orgs, GeoPoint { lat, lon }, radius));
    }

    if let (Some(sw_lat), Some(sw_lon), Some(ne_lat), Some(ne_lon)) =
        (params.sw_lat, params.sw_lon, params.ne_lat, params.ne_lon)
    {
        let orgs = state.organizations.list().await?;
        return Ok(filter_by_bbox(
            orgs,
            GeoPoint { lat: sw_lat, lon: sw_lon },
            GeoPoint { lat: ne_lat, lon: ne_lon },
        ));
    }

    state.organizations.list().await
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Json(payload): Json<NewOrganization>,
) -> impl IntoResponse {
    match state.organizations.create(payload).await {
        Ok(org) => (StatusCode::CREATED, Json(OrganizationOut::from(org))).into_response(),
        Err(OrgAtlasError::UnknownActivity(id)) => not_found(&format!("Activity {id} not found")),
        Err(e) => {
            warn!(error = %e, "Failed to create organization");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.organizations.get(id).await {
        Ok(Some(org)) => Json(OrganizationOut::from(org)).into_response(),
        Ok(None) => not_found("Organization not found"),
        Err(e) => {
            warn!(error = %e, "Failed to load organization");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i32>,
    Json(payload): Json<OrganizationPatch>,
) -> impl IntoResponse {
    match state.organizations.update(id, payload).await {
        Ok(Some(org)) => Json(OrganizationOut::from(org)).into_response(),
        Ok(None) => not_found("Organization not found"),
        Err(OrgAtlasError::UnknownActivity(id)) => not_found(&format!("Activity {id} not found")),
        Err(e) => {
            warn!(error = %e, "Failed to update organization");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.organizations.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("Organization not found"),
        Err(e) => {
            warn!(error = %e, "Failed to delete organization");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
