use serde::Deserialize;
use serde_json::Value;

/// Fields requested from the legacy Place Details endpoint.
pub const DETAIL_FIELDS: &str = "name,rating,user_ratings_total,reviews,url";

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetailsResponse {
    #[serde(default)]
    pub result: Option<PlaceDetails>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Place summary plus up to five public reviews. Review entries stay raw JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    #[serde(default)]
    pub reviews: Vec<Value>,
    pub url: Option<String>,
}

impl PlaceDetailsResponse {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("OK")
    }
}
