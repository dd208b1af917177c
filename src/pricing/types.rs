//! Wire types for the pricing service
//!
//! Request bodies are built locally; everything else is produced by the
//! service and treated as read-only. Field names are camelCase on the wire.

use crate::error::CostctlError;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource categories offered by the pricing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Compute,
    Storage,
    Database,
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [
        ResourceType::Compute,
        ResourceType::Storage,
        ResourceType::Database,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Compute => "Compute",
            ResourceType::Storage => "Storage",
            ResourceType::Database => "Database",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = CostctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CostctlError::validation(
                    "type",
                    format!("'{}' is not one of Compute, Storage, Database", s),
                )
            })
    }
}

/// One resource line of an estimate request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequest {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub name: String,
    pub region: String,
    pub units: u32,
}

/// Body of `POST /api/estimate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub resources: Vec<ResourceRequest>,
}

/// Response of `POST /api/estimate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub total_cost: f64,
    pub breakdown: Vec<BreakdownItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownItem {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub region: String,
    pub units: u32,
    pub unit_cost: f64,
    pub cost: f64,
}

/// Estimate identifier; the service may send numbers or strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EstimateId {
    Number(u64),
    Text(String),
}

impl fmt::Display for EstimateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateId::Number(n) => write!(f, "{}", n),
            EstimateId::Text(s) => f.write_str(s),
        }
    }
}

/// Entry of `GET /api/estimate/history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: EstimateId,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub total_cost: f64,
}

/// Response of `GET /api/estimate/details`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateDetails {
    pub id: EstimateId,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub total_cost: f64,
    #[serde(default)]
    pub items: Vec<DetailItem>,
}

/// Stored estimate line; carries `totalCost` where the live breakdown has `cost`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailItem {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub region: String,
    pub units: u32,
    pub unit_cost: f64,
    pub total_cost: f64,
}

impl EstimateDetails {
    /// Percentage of the estimate total taken by `item`, 0 when the total is 0
    pub fn share_of_total(&self, item: &DetailItem) -> f64 {
        if self.total_cost > 0.0 {
            item.total_cost / self.total_cost * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    EpochMillis(i64),
}

/// Accepts RFC 3339 strings, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as
/// local time) and epoch milliseconds
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(s) => parse_timestamp(&s).ok_or_else(|| {
            D::Error::custom(format!("unrecognized timestamp '{}'", s))
        }),
        RawTimestamp::EpochMillis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| D::Error::custom(format!("timestamp {} out of range", ms))),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
}
