//! costctl library
//!
//! Client for a cloud pricing / estimate service: typed access to the
//! service, the cascading resource selection form, and terminal rendering.

pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod exit_codes;
pub mod form;
pub mod pricing;

// Re-export commonly used types
pub use form::{Field, FormController, FormState, ResourceRow};
pub use pricing::{PricingApi, PricingClient, ResourceType};
