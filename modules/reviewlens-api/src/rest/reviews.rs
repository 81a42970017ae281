use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::warn;

use google_places_client::PlacesError;
use reviewlens_analytics::{normalize, slugify};
use reviewlens_common::{Review, ReviewLensError};

use super::error_response;
use crate::sources::slug_to_name;
use crate::state::AppState;

const DEFAULT_PLACE_NAME: &str = "Google Place";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePlaceQuery {
    place_id: Option<String>,
    slug: Option<String>,
}

#[derive(Deserialize)]
pub struct ApprovedQuery {
    property: Option<String>,
}

pub async fn api_hostaway_reviews(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (reviews, origin) = state.hostaway_reviews().await;
    Json(serde_json::json!({
        "reviews": reviews,
        "source": origin,
    }))
}

pub async fn api_google_reviews(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GooglePlaceQuery>,
) -> impl IntoResponse {
    let Some(google) = &state.google else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Google reviews are not configured (GOOGLE_MAPS_API_KEY)",
        );
    };

    let place_id = params.place_id.filter(|p| !p.trim().is_empty());
    let (place_id, fallback_name) = match (place_id, params.slug.as_deref()) {
        (Some(id), _) => (id, DEFAULT_PLACE_NAME.to_string()),
        (None, Some(slug)) => match google.place_id_for_slug(slug) {
            Some(id) => (id.to_string(), slug_to_name(slug)),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "Provide a placeId or a slug that maps to a Place ID",
                )
            }
        },
        (None, None) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Provide a placeId or a slug that maps to a Place ID",
            )
        }
    };

    match google.fetch_place(&place_id, &fallback_name).await {
        Ok(place) => Json(serde_json::json!({
            "reviews": normalize(&place.records),
            "aggregate": place.aggregate,
            "source": "google",
        }))
        .into_response(),
        Err(PlacesError::Status { status, message }) => {
            warn!(place_id = %place_id, status = %status, "Google returned a non-OK status");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "error": format!("Google status: {status}"),
                    "details": message,
                })),
            )
                .into_response()
        }
        Err(e) => {
            let err = ReviewLensError::Upstream {
                source_name: "google".to_string(),
                message: e.to_string(),
            };
            warn!(place_id = %place_id, error = %err, "Failed to fetch Google reviews");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

pub async fn api_google_all_reviews(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let reviews = state.google_reviews().await;
    Json(serde_json::json!({
        "reviews": reviews,
        "source": "google",
    }))
}

/// Approved reviews across every source, optionally narrowed to one property slug.
pub async fn api_approved_reviews(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApprovedQuery>,
) -> impl IntoResponse {
    let approvals = match state.approval_snapshot().await {
        Ok(approvals) => approvals,
        Err(e) => {
            warn!(error = %e, "Failed to load approvals");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let property = params.property.filter(|p| !p.trim().is_empty());
    let reviews: Vec<Review> = state
        .all_reviews()
        .await
        .into_iter()
        .filter(|r| approvals.get(&r.id).copied().unwrap_or(false))
        .filter(|r| match &property {
            Some(slug) => r.listing_name.as_deref().map(slugify).as_deref() == Some(slug.as_str()),
            None => true,
        })
        .collect();

    Json(serde_json::json!({ "reviews": reviews })).into_response()
}
