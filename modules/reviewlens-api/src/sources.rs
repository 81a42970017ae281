use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use google_places_client::{PlacesClient, PlacesError};
use hostaway_client::HostawayClient;
use reviewlens_analytics::{extract_rows, RawRecord, SourceAdapter};
use reviewlens_common::{Config, PlaceRef};

const HOSTAWAY_MOCK: &str = include_str!("../data/hostaway-mock.json");

/// Upstream review feed. Providers never fail: problems are logged and the
/// provider returns whatever it could read (possibly nothing).
#[async_trait]
pub trait ReviewProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self) -> Vec<RawRecord>;
}

/// Where a Hostaway batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedOrigin {
    Hostaway,
    Mock,
}

// --- Hostaway ---

pub struct HostawayProvider {
    client: Option<HostawayClient>,
    mock_rows: Vec<Value>,
}

impl HostawayProvider {
    pub fn new(client: Option<HostawayClient>) -> Self {
        Self {
            client,
            mock_rows: bundled_mock_rows(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = config
            .hostaway_credentials()
            .map(|(id, key)| HostawayClient::new(id.to_string(), key.to_string()));
        Self::new(client)
    }

    /// Live rows when credentials work and the account has reviews; the bundled
    /// mock dataset otherwise.
    pub async fn fetch_rows(&self) -> (Vec<Value>, FeedOrigin) {
        let Some(client) = &self.client else {
            return (self.mock_rows.clone(), FeedOrigin::Mock);
        };

        match client.fetch_reviews().await {
            Ok(rows) if !rows.is_empty() => (rows, FeedOrigin::Hostaway),
            Ok(_) => {
                info!("Hostaway returned no reviews, using mock data");
                (self.mock_rows.clone(), FeedOrigin::Mock)
            }
            Err(e) => {
                warn!(error = %e, "Hostaway fetch failed, using mock data");
                (self.mock_rows.clone(), FeedOrigin::Mock)
            }
        }
    }
}

#[async_trait]
impl ReviewProvider for HostawayProvider {
    fn name(&self) -> &str {
        "hostaway"
    }

    async fn fetch(&self) -> Vec<RawRecord> {
        let (rows, _) = self.fetch_rows().await;
        rows.into_iter().map(RawRecord::hostaway).collect()
    }
}

fn bundled_mock_rows() -> Vec<Value> {
    match serde_json::from_str::<Value>(HOSTAWAY_MOCK) {
        Ok(dump) => extract_rows(&dump),
        Err(e) => {
            warn!(error = %e, "Bundled Hostaway mock data is not valid JSON");
            Vec::new()
        }
    }
}

// --- Google ---

/// Place-level numbers returned next to a single place's reviews.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceAggregate {
    pub name: String,
    pub rating: Option<f64>,
    pub total: Option<u64>,
    pub url: Option<String>,
}

pub struct PlaceReviews {
    pub records: Vec<RawRecord>,
    pub aggregate: PlaceAggregate,
}

pub struct GoogleProvider {
    client: PlacesClient,
    places: Vec<PlaceRef>,
}

impl GoogleProvider {
    pub fn new(client: PlacesClient, places: Vec<PlaceRef>) -> Self {
        Self { client, places }
    }

    /// `None` when no Maps key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let key = config.google_maps_api_key.as_ref()?;
        Some(Self::new(
            PlacesClient::new(key.clone()),
            config.google_places.clone(),
        ))
    }

    pub fn place_id_for_slug(&self, slug: &str) -> Option<&str> {
        self.places
            .iter()
            .find(|p| p.slug == slug)
            .map(|p| p.place_id.as_str())
    }

    /// Reviews of one place. Google's own place name wins over `fallback_name`.
    pub async fn fetch_place(
        &self,
        place_id: &str,
        fallback_name: &str,
    ) -> Result<PlaceReviews, PlacesError> {
        let details = self.client.place_details(place_id).await?;
        let name = details
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_string());

        let adapter = SourceAdapter::google(place_id, name.clone());
        let records = details
            .reviews
            .into_iter()
            .map(|payload| RawRecord::new(adapter.clone(), payload))
            .collect();

        Ok(PlaceReviews {
            records,
            aggregate: PlaceAggregate {
                name,
                rating: details.rating,
                total: details.user_ratings_total,
                url: details.url,
            },
        })
    }
}

#[async_trait]
impl ReviewProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    /// Places are fetched one after another to stay within quota; a failing
    /// place is skipped.
    async fn fetch(&self) -> Vec<RawRecord> {
        let mut records = Vec::new();
        for place in &self.places {
            match self.fetch_place(&place.place_id, &slug_to_name(&place.slug)).await {
                Ok(found) => records.extend(found.records),
                Err(e) => {
                    warn!(slug = %place.slug, error = %e, "Skipping Google place");
                }
            }
        }
        records
    }
}

/// `camden-flat` -> `camden flat`, used when Google does not return a name.
pub fn slug_to_name(slug: &str) -> String {
    slug.replace('-', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_mock_is_readable() {
        let rows = bundled_mock_rows();
        assert!(rows.len() >= 5);
        assert!(rows.iter().all(|r| r.get("id").is_some()));
    }

    #[tokio::test]
    async fn test_without_credentials_serves_mock() {
        let provider = HostawayProvider::new(None);
        let (rows, origin) = provider.fetch_rows().await;
        assert_eq!(origin, FeedOrigin::Mock);
        assert_eq!(rows.len(), bundled_mock_rows().len());

        let records = provider.fetch().await;
        assert_eq!(records.len(), rows.len());
        assert_eq!(provider.name(), "hostaway");
    }

    #[tokio::test]
    async fn test_google_without_key_skips_every_place() {
        let provider = GoogleProvider::new(
            PlacesClient::new(String::new()),
            vec![PlaceRef {
                slug: "camden-flat".into(),
                place_id: "ChIJ123".into(),
            }],
        );
        assert!(provider.fetch().await.is_empty());
        assert_eq!(provider.place_id_for_slug("camden-flat"), Some("ChIJ123"));
    }

    #[test]
    fn test_slug_to_name() {
        assert_eq!(slug_to_name("camden-lock-studio"), "camden lock studio");
    }
}
