use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{info, warn};

use reviewlens_analytics::{
    IssueAnalyzer, KeywordMatch, LexiconScorer, SummaryPayload, DEFAULT_MAX_EXAMPLES,
};

use crate::state::AppState;

const MAX_EXAMPLES_CAP: usize = 20;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuesQuery {
    max_examples: Option<usize>,
    word_boundary: Option<bool>,
}

/// Issue report over every source, plus an AI summary when a provider is configured.
pub async fn api_issues(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IssuesQuery>,
) -> impl IntoResponse {
    let reviews = state.all_reviews().await;

    let keyword_match = if params.word_boundary.unwrap_or(false) {
        KeywordMatch::WordBoundary
    } else {
        KeywordMatch::Substring
    };
    let scorer = LexiconScorer::new();
    let report = IssueAnalyzer::new(&scorer)
        .max_examples(
            params
                .max_examples
                .unwrap_or(DEFAULT_MAX_EXAMPLES)
                .min(MAX_EXAMPLES_CAP),
        )
        .keyword_match(keyword_match)
        .analyze(&reviews);

    let payload = SummaryPayload::from_report(&report);
    let ai_summary = state.summarizer.summarize(&payload).await;
    info!(
        reviews = reviews.len(),
        top = ?report.top_categories,
        ai_summary = ai_summary.is_some(),
        "Computed issue insights"
    );

    Json(serde_json::json!({
        "report": report,
        "aiSummary": ai_summary,
    }))
}

/// Summarize a client-supplied aggregate. Always 200; `aiSummary` is null on any failure.
pub async fn api_summary(
    State(state): State<Arc<AppState>>,
    body: axum::body::Bytes,
) -> impl IntoResponse {
    match serde_json::from_slice::<SummaryPayload>(&body) {
        Ok(payload) => {
            let summary = state.summarizer.summarize(&payload).await;
            Json(serde_json::json!({ "aiSummary": summary }))
        }
        Err(e) => {
            warn!(error = %e, "Invalid summary payload");
            Json(serde_json::json!({ "aiSummary": null, "error": e.to_string() }))
        }
    }
}
