use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{info, warn};

use reviewlens_approvals::ApprovalError;

use super::error_response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    review_id: String,
    approved: bool,
    approved_by: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearQuery {
    review_id: Option<String>,
}

/// Upsert a decision. The body is parsed by hand so any malformed payload is a
/// plain 400 with the same error shape as the other handlers.
pub async fn api_approve(
    State(state): State<Arc<AppState>>,
    body: axum::body::Bytes,
) -> impl IntoResponse {
    let request: ApproveRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid body"),
    };
    if request.review_id.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Invalid body");
    }

    let result = state
        .approvals
        .set(&request.review_id, request.approved, request.approved_by.as_deref())
        .await;
    state.invalidate_approvals().await;

    match result {
        Ok(()) => {
            info!(review_id = %request.review_id, approved = request.approved, "Recorded approval");
            Json(serde_json::json!({ "ok": true })).into_response()
        }
        Err(ApprovalError::InvalidReviewId(_)) => {
            error_response(StatusCode::BAD_REQUEST, "Invalid body")
        }
        Err(e) => {
            warn!(review_id = %request.review_id, error = %e, "Failed to record approval");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Delete the decision so the review reads as pending again.
pub async fn api_clear_approval(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClearQuery>,
) -> impl IntoResponse {
    let Some(review_id) = params.review_id.filter(|id| !id.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing reviewId");
    };

    let result = state.approvals.clear(&review_id).await;
    state.invalidate_approvals().await;

    match result {
        Ok(existed) => {
            info!(review_id = %review_id, existed, "Cleared approval");
            Json(serde_json::json!({ "ok": true })).into_response()
        }
        Err(e) => {
            warn!(review_id = %review_id, error = %e, "Failed to clear approval");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub async fn api_approve_usage() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Use POST to approve/deny and DELETE to set pending",
        "examples": {
            "POST": { "reviewId": "id", "approved": true },
            "DELETE": "/api/reviews/approve?reviewId=id",
        }
    }))
}

pub async fn api_approvals(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.approvals.get_all().await {
        Ok(approvals) => Json(serde_json::json!({ "approvals": approvals })).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to list approvals");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::app;
    use crate::rest::test_support::{offline_state, request};

    #[tokio::test]
    async fn test_approve_then_list_then_clear() {
        let app = app(offline_state());

        let (status, body) = request(
            &app,
            Method::POST,
            "/api/reviews/approve",
            Some(json!({"reviewId": "hostaway-7453", "approved": false, "approvedBy": "sam"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));

        let (_, body) = request(&app, Method::GET, "/api/reviews/approvals", None).await;
        let rows = body["approvals"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["review_id"], "hostaway-7453");
        assert_eq!(rows[0]["approved"], false);
        assert_eq!(rows[0]["approved_by"], "sam");

        let (status, _) = request(
            &app,
            Method::DELETE,
            "/api/reviews/approve?reviewId=hostaway-7453",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = request(&app, Method::GET, "/api/reviews/approvals", None).await;
        assert_eq!(body["approvals"], json!([]));
    }

    #[tokio::test]
    async fn test_invalid_bodies_are_rejected() {
        let app = app(offline_state());
        for body in [
            json!({"reviewId": "hostaway-1"}),
            json!({"reviewId": "hostaway-1", "approved": "yes"}),
            json!({"approved": true}),
            json!({"reviewId": "  ", "approved": true}),
            json!([]),
        ] {
            let (status, resp) =
                request(&app, Method::POST, "/api/reviews/approve", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp["error"], "Invalid body");
        }
    }

    #[tokio::test]
    async fn test_clear_requires_review_id() {
        let app = app(offline_state());
        let (status, body) = request(&app, Method::DELETE, "/api/reviews/approve", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing reviewId");
    }

    #[tokio::test]
    async fn test_usage_message() {
        let app = app(offline_state());
        let (status, body) = request(&app, Method::GET, "/api/reviews/approve", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("POST"));
    }
}
