use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use reviewlens_analytics::{
    channel_distribution, channel_options, filter_reviews, property_options, resolve_status,
    sort_reviews, timeseries_average, DashboardMetrics,
};
use reviewlens_common::{
    Filters, FiltersPatch, ModerationStatus, Review, SortDirection, SortKey, SortState,
};

use super::error_response;
use crate::state::AppState;

/// Query string of `GET /api/dashboard`. Every value arrives as text and is
/// validated here, so a bad value is a 400 rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    property: Option<String>,
    channel: Option<String>,
    category: Option<String>,
    status: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
    min_rating: Option<String>,
    sort: Option<String>,
    dir: Option<String>,
}

/// A review plus its resolved moderation status.
#[derive(Serialize)]
struct DashboardRow {
    #[serde(flatten)]
    review: Review,
    moderation: ModerationStatus,
}

impl DashboardQuery {
    fn filters_patch(&self) -> Result<FiltersPatch, String> {
        let min_rating = match self.min_rating.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<f64>()
                    .map_err(|_| format!("minRating must be a number, got {raw:?}"))?,
            ),
        };
        Ok(FiltersPatch {
            property: self.property.clone(),
            channel: self.channel.clone(),
            category: self.category.clone(),
            status: self.status.clone(),
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            min_rating,
        })
    }

    fn sort_state(&self) -> Result<SortState, String> {
        let key = match self.sort.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<SortKey>()?,
            None => SortKey::default(),
        };
        let direction = match self.dir.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<SortDirection>()?,
            None => SortDirection::default(),
        };
        Ok(SortState { key, direction })
    }
}

/// Everything the manager dashboard renders, computed from one approval snapshot.
pub async fn api_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardQuery>,
) -> impl IntoResponse {
    let filters = match params
        .filters_patch()
        .and_then(|patch| Filters::default().apply(&patch).map_err(|e| e.to_string()))
    {
        Ok(filters) => filters,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };
    let sort = match params.sort_state() {
        Ok(sort) => sort,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    let approvals = match state.approval_snapshot().await {
        Ok(approvals) => approvals,
        Err(e) => {
            warn!(error = %e, "Failed to load approvals for dashboard");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let all = state.all_reviews().await;
    let filtered = filter_reviews(&all, &filters, &approvals);
    let sorted = sort_reviews(&filtered, sort.key, sort.direction, &approvals);

    let metrics = DashboardMetrics::compute(&filtered, &approvals);
    let timeseries = timeseries_average(&filtered);
    let mut channels = channel_distribution(&filtered);
    channels.sort_by(|a, b| b.count.cmp(&a.count));

    let rows: Vec<DashboardRow> = sorted
        .into_iter()
        .map(|review| DashboardRow {
            moderation: resolve_status(&review.id, &approvals),
            review,
        })
        .collect();

    Json(serde_json::json!({
        "reviews": rows,
        "metrics": metrics,
        "timeseries": timeseries,
        "channels": channels,
        "options": {
            "properties": property_options(&all),
            "channels": channel_options(&all),
        },
        "filters": filters,
        "sort": sort,
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::app;
    use crate::rest::test_support::{offline_state, request};

    #[tokio::test]
    async fn test_dashboard_defaults() {
        let app = app(offline_state());
        let (status, body) = request(&app, Method::GET, "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);

        let reviews = body["reviews"].as_array().unwrap();
        assert_eq!(body["metrics"]["total"].as_u64().unwrap() as usize, reviews.len());
        assert_eq!(body["metrics"]["approvalRate"], json!(0));
        assert!(reviews.iter().all(|r| r["moderation"] == "pending"));
        assert_eq!(body["options"]["properties"][0], "all");
        assert_eq!(body["sort"], json!({"key": "date", "direction": "desc"}));

        let dates: Vec<&str> = reviews
            .iter()
            .map(|r| r["submittedAt"].as_str().unwrap())
            .collect();
        let mut expected = dates.clone();
        expected.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, expected);
    }

    #[tokio::test]
    async fn test_dashboard_filters_and_status() {
        let app = app(offline_state());
        request(
            &app,
            Method::POST,
            "/api/reviews/approve",
            Some(json!({"reviewId": "hostaway-7463", "approved": true})),
        )
        .await;

        let (status, body) = request(
            &app,
            Method::GET,
            "/api/dashboard?property=1B%20Camden%20Lock%20Studio&status=approved",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let reviews = body["reviews"].as_array().unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0]["id"], "hostaway-7463");
        assert_eq!(reviews[0]["moderation"], "approved");
        assert_eq!(body["metrics"]["approvalRate"], json!(100));
    }

    #[tokio::test]
    async fn test_dashboard_rejects_bad_params() {
        let app = app(offline_state());
        for uri in [
            "/api/dashboard?status=maybe",
            "/api/dashboard?dateFrom=yesterday",
            "/api/dashboard?sort=popularity",
            "/api/dashboard?dir=sideways",
            "/api/dashboard?minRating=high",
            "/api/dashboard?minRating=-1",
        ] {
            let (status, body) = request(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_dashboard_sort_by_rating_ascending() {
        let app = app(offline_state());
        let (_, body) =
            request(&app, Method::GET, "/api/dashboard?sort=rating&dir=asc", None).await;
        let reviews = body["reviews"].as_array().unwrap();
        // the unrated hidden review sorts first
        assert_eq!(reviews[0]["id"], "hostaway-7467");
    }
}
