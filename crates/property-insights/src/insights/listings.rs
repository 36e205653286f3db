use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::domain::{PropertyFilter, PropertyRecord};
use crate::config::ListingsConfig;

/// Error raised when the upstream listings source cannot serve a request.
#[derive(Debug, thiserror::Error)]
pub enum ListingsError {
    #[error("listings source unavailable at {url}: {reason}")]
    SourceUnavailable { url: String, reason: String },
}

/// Supplier of raw listings. Implementations hold no mutable state and may be
/// shared across concurrent requests.
#[async_trait]
pub trait ListingsSource: Send + Sync {
    async fn list_properties(
        &self,
        filter: &PropertyFilter,
    ) -> Result<Vec<PropertyRecord>, ListingsError>;

    fn describe(&self) -> &'static str;
}

/// Reads listings from `{base_url}/properties`, forwarding the filter as query
/// parameters. Each call builds its own client so no connection state is kept.
#[derive(Debug, Clone)]
pub struct HttpListingsSource {
    base_url: String,
    timeout: Duration,
}

impl HttpListingsSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, timeout }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/properties", self.base_url)
    }

    fn unavailable(&self, reason: impl ToString) -> ListingsError {
        ListingsError::SourceUnavailable {
            url: self.endpoint(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl ListingsSource for HttpListingsSource {
    async fn list_properties(
        &self,
        filter: &PropertyFilter,
    ) -> Result<Vec<PropertyRecord>, ListingsError> {
        let url = self.endpoint();
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| self.unavailable(err))?;

        debug!(%url, ?filter, "fetching listings");
        let response = client
            .get(&url)
            .query(filter)
            .send()
            .await
            .map_err(|err| {
                warn!(%url, error = %err, "listings request failed");
                self.unavailable(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "listings source returned an error status");
            return Err(self.unavailable(format!("upstream responded with {status}")));
        }

        let records: Vec<PropertyRecord> = response.json().await.map_err(|err| {
            warn!(%url, error = %err, "listings payload could not be decoded");
            self.unavailable(err)
        })?;

        debug!(%url, count = records.len(), "listings fetched");
        Ok(records)
    }

    fn describe(&self) -> &'static str {
        "http"
    }
}

/// Bundled demo listings used when no upstream is configured. Filters are not
/// applied to this data set.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleListingsSource;

impl SampleListingsSource {
    pub fn records() -> Vec<PropertyRecord> {
        vec![
            sample(
                "prop_001",
                "12 Smith St, Richmond VIC 3121",
                (3, 2, 1),
                1_250_000.0,
                850.0,
                ("Richmond", "VIC"),
                21,
            ),
            sample(
                "prop_002",
                "8 George St, Parramatta NSW 2150",
                (2, 2, 1),
                780_000.0,
                650.0,
                ("Parramatta", "NSW"),
                55,
            ),
            sample(
                "prop_003",
                "5 Jones Ave, Carindale QLD 4152",
                (4, 2, 2),
                985_000.0,
                780.0,
                ("Carindale", "QLD"),
                33,
            ),
        ]
    }
}

fn sample(
    id: &str,
    address: &str,
    (bedrooms, bathrooms, car_spaces): (u32, u32, u32),
    listed_price: f64,
    weekly_rent_estimate: f64,
    (suburb, state): (&str, &str),
    days_on_market: u32,
) -> PropertyRecord {
    PropertyRecord {
        id: id.to_string(),
        address: address.to_string(),
        bedrooms,
        bathrooms,
        car_spaces,
        listed_price,
        weekly_rent_estimate,
        suburb: suburb.to_string(),
        state: state.to_string(),
        days_on_market: Some(days_on_market),
    }
}

#[async_trait]
impl ListingsSource for SampleListingsSource {
    async fn list_properties(
        &self,
        filter: &PropertyFilter,
    ) -> Result<Vec<PropertyRecord>, ListingsError> {
        if !filter.is_empty() {
            debug!(?filter, "sample listings ignore filters");
        }
        Ok(Self::records())
    }

    fn describe(&self) -> &'static str {
        "sample"
    }
}

/// Picks the listings implementation once at startup.
pub fn listings_source_from_config(config: &ListingsConfig) -> Arc<dyn ListingsSource> {
    match &config.base_url {
        Some(base_url) => Arc::new(HttpListingsSource::new(base_url.clone(), config.timeout)),
        None => Arc::new(SampleListingsSource),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn filter(suburb: &str, state: &str) -> PropertyFilter {
        PropertyFilter::new(Some(suburb.to_string()), Some(state.to_string()))
    }

    #[tokio::test]
    async fn sample_source_ignores_filters() {
        let records = SampleListingsSource
            .list_properties(&filter("Nowhere", "WA"))
            .await
            .expect("sample data always loads");

        let ids: Vec<_> = records.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, ["prop_001", "prop_002", "prop_003"]);
    }

    #[tokio::test]
    async fn http_source_forwards_filters_as_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/properties")
                    .query_param("suburb", "Richmond")
                    .query_param("state", "VIC");
                then.status(200).json_body(json!([{
                    "id": "up_1",
                    "address": "1 Swan St, Richmond VIC 3121",
                    "bedrooms": 2,
                    "bathrooms": 1,
                    "car_spaces": 1,
                    "listed_price": 900000,
                    "weekly_rent_estimate": 700,
                    "suburb": "Richmond",
                    "state": "VIC",
                    "days_on_market": 12
                }]));
            })
            .await;

        let source = HttpListingsSource::new(server.base_url(), Duration::from_secs(5));
        let records = source
            .list_properties(&filter("Richmond", "VIC"))
            .await
            .expect("upstream responds");

        mock.assert_async().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "up_1");
        assert_eq!(records[0].days_on_market, Some(12));
    }

    #[tokio::test]
    async fn http_source_reports_error_status_as_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/properties");
                then.status(503);
            })
            .await;

        let source = HttpListingsSource::new(format!("{}/", server.base_url()), Duration::from_secs(5));
        let err = source
            .list_properties(&PropertyFilter::default())
            .await
            .expect_err("503 is a failure");

        let ListingsError::SourceUnavailable { url, reason } = err;
        assert!(url.ends_with("/properties"));
        assert!(!url.contains("//properties"));
        assert!(reason.contains("503"));
    }

    #[tokio::test]
    async fn http_source_rejects_undecodable_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/properties");
                then.status(200).body("not json");
            })
            .await;

        let source = HttpListingsSource::new(server.base_url(), Duration::from_secs(5));
        let result = source.list_properties(&PropertyFilter::default()).await;
        assert!(matches!(result, Err(ListingsError::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn http_source_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/properties");
                then.status(200)
                    .delay(Duration::from_millis(1500))
                    .json_body(json!([]));
            })
            .await;

        let source = HttpListingsSource::new(server.base_url(), Duration::from_millis(200));
        let result = source.list_properties(&PropertyFilter::default()).await;
        assert!(matches!(result, Err(ListingsError::SourceUnavailable { .. })));
    }

    #[test]
    fn config_selects_implementation() {
        let sample = listings_source_from_config(&ListingsConfig {
            base_url: None,
            timeout: Duration::from_secs(15),
        });
        assert_eq!(sample.describe(), "sample");

        let http = listings_source_from_config(&ListingsConfig {
            base_url: Some("http://127.0.0.1:9".to_string()),
            timeout: Duration::from_secs(15),
        });
        assert_eq!(http.describe(), "http");
    }
}
