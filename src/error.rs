//! Error types for costctl
//!
//! There are two error types: `CostctlError` (main error enum) and
//! `ConfigError` (configuration-specific).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `CostctlError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling. The
//! conversion happens at the CLI boundary so error chains are preserved.
//!
//! ## Pricing API Failures
//!
//! Transport failures, non-2xx statuses and undecodable bodies are kept apart
//! for logging, but every one of them is reported to the user with the same
//! generic message for the call that failed (see [`ApiCall::failure_message`]).
//! Nothing is retried: a failed call stays failed until the user triggers it
//! again.

use std::fmt;
use thiserror::Error;

/// The pricing service calls this client makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiCall {
    Names,
    Regions,
    Estimate,
    History,
    Details,
}

impl ApiCall {
    /// Generic user-facing message for a failed call
    pub fn failure_message(self) -> &'static str {
        match self {
            ApiCall::Names => "Failed to load resource names",
            ApiCall::Regions => "Failed to load regions",
            ApiCall::Estimate => "Failed to get estimate",
            ApiCall::History => "Failed to fetch estimate history",
            ApiCall::Details => "Failed to load estimate details",
        }
    }
}

impl fmt::Display for ApiCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiCall::Names => "names",
            ApiCall::Regions => "regions",
            ApiCall::Estimate => "estimate",
            ApiCall::History => "history",
            ApiCall::Details => "details",
        };
        f.write_str(name)
    }
}

/// Main error type for costctl
#[derive(Error, Debug)]
pub enum CostctlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{} ({call} request failed: {source})", .call.failure_message())]
    Http {
        call: ApiCall,
        #[source]
        source: reqwest::Error,
    },

    #[error("{} ({call} returned HTTP {status})", .call.failure_message())]
    Status {
        call: ApiCall,
        status: u16,
    },

    #[error("{} (invalid {call} response: {message})", .call.failure_message())]
    Decode { call: ApiCall, message: String },

    /// A call whose original error was already consumed, e.g. recorded on a
    /// form row or lost with a crashed fetch task
    #[error("{} ({detail})", .call.failure_message())]
    Unavailable { call: ApiCall, detail: String },

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CostctlError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CostctlError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The pricing call this error came from, if any
    pub fn api_call(&self) -> Option<ApiCall> {
        match self {
            CostctlError::Http { call, .. }
            | CostctlError::Status { call, .. }
            | CostctlError::Decode { call, .. }
            | CostctlError::Unavailable { call, .. } => Some(*call),
            _ => None,
        }
    }

    /// Message suitable for showing in place of a result
    ///
    /// API failures collapse to the call's generic message; everything else
    /// uses the full display text.
    pub fn user_message(&self) -> String {
        match self.api_call() {
            Some(call) => call.failure_message().to_string(),
            None => self.to_string(),
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CostctlError>;
