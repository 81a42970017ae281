pub mod error;
pub mod types;

pub use error::{PlacesError, Result};
pub use types::{PlaceDetails, PlaceDetailsResponse, DETAIL_FIELDS};

const BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

pub struct PlacesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PlacesClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Place Details for one place. A body status other than `OK` is an error.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
        if self.api_key.is_empty() {
            return Err(PlacesError::MissingApiKey);
        }

        let url = format!("{}/details/json", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("place_id", place_id),
                ("fields", DETAIL_FIELDS),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PlacesError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let details: PlaceDetailsResponse = resp.json().await?;
        if !details.is_ok() {
            return Err(PlacesError::Status {
                status: details.status.unwrap_or_else(|| "UNKNOWN".to_string()),
                message: details.error_message.unwrap_or_default(),
            });
        }

        let place = details.result.unwrap_or_default();
        tracing::info!(
            place_id,
            name = place.name.as_deref().unwrap_or(""),
            reviews = place.reviews.len(),
            "Fetched Google place details"
        );
        Ok(place)
    }
}
