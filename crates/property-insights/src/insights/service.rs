use std::sync::Arc;

use tracing::info;

use super::advisory::{AdvisoryComposer, CoachRequest, CoachResponse};
use super::domain::{EnrichedProperty, PropertyFilter};
use super::listings::{listings_source_from_config, ListingsError, ListingsSource};
use super::summary::{summarize, SummaryStats};
use crate::config::AppConfig;

/// Entry point used by the HTTP and CLI layers. Holds only immutable
/// collaborators, so one instance is shared across all requests.
#[derive(Clone)]
pub struct PropertyInsightsService {
    listings: Arc<dyn ListingsSource>,
    advisory: AdvisoryComposer,
}

impl PropertyInsightsService {
    pub fn new(listings: Arc<dyn ListingsSource>, advisory: AdvisoryComposer) -> Self {
        Self { listings, advisory }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let listings = listings_source_from_config(&config.listings);
        let advisory = AdvisoryComposer::from_config(&config.advisory);
        info!(
            listings = listings.describe(),
            text_generation = advisory.has_generator(),
            "property insights collaborators selected"
        );
        Self::new(listings, advisory)
    }

    pub fn listings_mode(&self) -> &'static str {
        self.listings.describe()
    }

    pub async fn list_properties(
        &self,
        filter: &PropertyFilter,
    ) -> Result<Vec<EnrichedProperty>, ListingsError> {
        let records = self.listings.list_properties(filter).await?;
        Ok(records.into_iter().map(|record| record.enrich()).collect())
    }

    pub async fn summary(&self, filter: &PropertyFilter) -> Result<SummaryStats, ListingsError> {
        let records = self.listings.list_properties(filter).await?;
        Ok(summarize(&records))
    }

    /// Enriched listings and their summary from a single fetch, so both views
    /// describe the same snapshot.
    pub async fn listings_with_summary(
        &self,
        filter: &PropertyFilter,
    ) -> Result<(Vec<EnrichedProperty>, SummaryStats), ListingsError> {
        let records = self.listings.list_properties(filter).await?;
        let summary = summarize(&records);
        let properties = records.into_iter().map(|record| record.enrich()).collect();
        Ok((properties, summary))
    }

    pub async fn coach(&self, request: &CoachRequest) -> CoachResponse {
        self.advisory.coach(request).await
    }
}

impl std::fmt::Debug for PropertyInsightsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyInsightsService")
            .field("listings", &self.listings.describe())
            .field("advisory", &self.advisory)
            .finish()
    }
}
