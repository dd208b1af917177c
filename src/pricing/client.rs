//! HTTP client for the pricing service

use super::types::{
    EstimateDetails, EstimateRequest, EstimateResult, HistoryEntry, ResourceType,
};
use super::PricingApi;
use crate::config::ApiConfig;
use crate::error::{ApiCall, ConfigError, CostctlError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const NAMES_PATH: &str = "/api/pricing/names";
const REGIONS_PATH: &str = "/api/pricing/regions";
const ESTIMATE_PATH: &str = "/api/estimate";
const HISTORY_PATH: &str = "/api/estimate/history";
const DETAILS_PATH: &str = "/api/estimate/details";

/// reqwest-backed `PricingApi`
#[derive(Debug, Clone)]
pub struct PricingClient {
    client: Client,
    base_url: String,
}

impl PricingClient {
    /// Create a client for `base_url` (e.g. "http://localhost:8080")
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            CostctlError::Config(ConfigError::InvalidValue {
                field: "api".to_string(),
                reason: format!("could not build HTTP client: {}", e),
            })
        })?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        call: ApiCall,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| CostctlError::Http { call, source })?;
        decode(call, response).await
    }
}

/// Check the status and parse the body of a pricing service response
async fn decode<T: DeserializeOwned>(call: ApiCall, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        debug!("{} request returned HTTP {}", call, status);
        return Err(CostctlError::Status {
            call,
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| CostctlError::Http { call, source })?;
    serde_json::from_slice(&body).map_err(|e| CostctlError::Decode {
        call,
        message: e.to_string(),
    })
}

#[async_trait]
impl PricingApi for PricingClient {
    async fn resource_names(&self, resource_type: ResourceType) -> Result<Vec<String>> {
        self.get_json(
            ApiCall::Names,
            NAMES_PATH,
            &[("type", resource_type.as_str())],
        )
        .await
    }

    async fn regions(&self, resource_type: ResourceType, name: &str) -> Result<Vec<String>> {
        self.get_json(
            ApiCall::Regions,
            REGIONS_PATH,
            &[("type", resource_type.as_str()), ("name", name)],
        )
        .await
    }

    async fn estimate(&self, request: &EstimateRequest) -> Result<EstimateResult> {
        let url = self.url(ESTIMATE_PATH);
        debug!("POST {} ({} resources)", url, request.resources.len());
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|source| CostctlError::Http {
                call: ApiCall::Estimate,
                source,
            })?;
        decode(ApiCall::Estimate, response).await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.get_json(ApiCall::History, HISTORY_PATH, &[]).await
    }

    async fn details(&self, id: &str) -> Result<EstimateDetails> {
        self.get_json(ApiCall::Details, DETAILS_PATH, &[("id", id)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_trailing_slash() {
        let client = PricingClient::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url(NAMES_PATH), "http://localhost:8080/api/pricing/names");
    }

    #[test]
    fn test_from_config() {
        let client = PricingClient::from_config(&ApiConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
