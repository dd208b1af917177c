//! Pricing service access
//!
//! `PricingApi` is the seam between the form logic and the network: the
//! form controller only ever talks to `Arc<dyn PricingApi>`, and
//! `PricingClient` is the HTTP implementation used by the CLI.

mod client;
pub mod types;

pub use client::PricingClient;
pub use types::{
    BreakdownItem, DetailItem, EstimateDetails, EstimateId, EstimateRequest, EstimateResult,
    HistoryEntry, ResourceRequest, ResourceType,
};

use crate::error::Result;
use async_trait::async_trait;

/// Operations offered by the remote pricing / estimate service
#[async_trait]
pub trait PricingApi: Send + Sync {
    /// Valid resource names for a type, in service order
    async fn resource_names(&self, resource_type: ResourceType) -> Result<Vec<String>>;

    /// Valid regions for a (type, name) pair, in service order
    async fn regions(&self, resource_type: ResourceType, name: &str) -> Result<Vec<String>>;

    /// Price a set of resources
    async fn estimate(&self, request: &EstimateRequest) -> Result<EstimateResult>;

    /// Previously submitted estimates
    async fn history(&self) -> Result<Vec<HistoryEntry>>;

    /// One stored estimate with its items
    async fn details(&self, id: &str) -> Result<EstimateDetails>;
}
