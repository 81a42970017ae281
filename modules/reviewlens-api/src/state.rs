use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use reviewlens_analytics::{normalize, RawRecord};
use reviewlens_approvals::{ApprovalStore, MemoryApprovalStore, PgApprovalStore};
use reviewlens_common::{ApprovalMap, Config, Review};

use crate::cache::SnapshotCache;
use crate::sources::{FeedOrigin, GoogleProvider, HostawayProvider, ReviewProvider};
use crate::summary::{summarizer_from_config, IssueSummarizer};

pub struct AppState {
    pub hostaway: HostawayProvider,
    pub google: Option<GoogleProvider>,
    pub approvals: Arc<dyn ApprovalStore>,
    pub summarizer: Arc<dyn IssueSummarizer>,
    reviews_cache: SnapshotCache<Vec<Review>>,
    approvals_cache: SnapshotCache<ApprovalMap>,
}

impl AppState {
    pub fn new(
        hostaway: HostawayProvider,
        google: Option<GoogleProvider>,
        approvals: Arc<dyn ApprovalStore>,
        summarizer: Arc<dyn IssueSummarizer>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            hostaway,
            google,
            approvals,
            summarizer,
            reviews_cache: SnapshotCache::new(cache_ttl),
            approvals_cache: SnapshotCache::new(cache_ttl),
        }
    }

    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let approvals: Arc<dyn ApprovalStore> = match &config.database_url {
            Some(url) => Arc::new(PgApprovalStore::connect(url).await?),
            None => {
                info!("DATABASE_URL not set, approvals are kept in memory");
                Arc::new(MemoryApprovalStore::new())
            }
        };

        Ok(Self::new(
            HostawayProvider::from_config(config),
            GoogleProvider::from_config(config),
            approvals,
            summarizer_from_config(config),
            Duration::from_secs(config.cache_ttl_secs),
        ))
    }

    pub async fn hostaway_reviews(&self) -> (Vec<Review>, FeedOrigin) {
        let (rows, origin) = self.hostaway.fetch_rows().await;
        let records: Vec<RawRecord> = rows.into_iter().map(RawRecord::hostaway).collect();
        (normalize(&records), origin)
    }

    pub async fn google_reviews(&self) -> Vec<Review> {
        match &self.google {
            Some(google) => {
                let records = google.fetch().await;
                info!(provider = google.name(), count = records.len(), "Fetched reviews");
                normalize(&records)
            }
            None => Vec::new(),
        }
    }

    /// Hostaway and Google reviews merged, Hostaway first. Cached for the TTL.
    pub async fn all_reviews(&self) -> Vec<Review> {
        if let Some(reviews) = self.reviews_cache.get().await {
            return reviews;
        }

        let ((hostaway, _), google) =
            futures::join!(self.hostaway_reviews(), self.google_reviews());
        let mut merged = hostaway;
        merged.extend(google);
        info!(count = merged.len(), "Loaded reviews from all sources");

        self.reviews_cache.put(merged.clone()).await;
        merged
    }

    pub async fn approval_snapshot(&self) -> reviewlens_approvals::Result<ApprovalMap> {
        self.approvals_cache
            .get_or_try_load(|| self.approvals.snapshot())
            .await
    }

    /// Call after every approval mutation.
    pub async fn invalidate_approvals(&self) {
        self.approvals_cache.invalidate().await;
    }
}
