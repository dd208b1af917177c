//! Exit code standardization for costctl
//!
//! ## Exit Code Convention
//!
//! - `0` = Success
//! - `1` = User error (invalid input, unsubmittable form)
//! - `2` = System error (pricing service unreachable, bad status, bad body)
//! - `3` = Configuration error (config parse error, invalid values)

use crate::error::CostctlError;

/// Standard exit codes for costctl
pub mod codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// User error (invalid input, validation failure)
    pub const USER_ERROR: i32 = 1;
    /// System error (network error, pricing service failure)
    pub const SYSTEM_ERROR: i32 = 2;
    /// Configuration error
    pub const CONFIG_ERROR: i32 = 3;
}

/// Map a CostctlError to an appropriate exit code
pub fn exit_code_for_error(error: &CostctlError) -> i32 {
    use CostctlError::*;
    match error {
        Config(_) => codes::CONFIG_ERROR,

        Validation { .. } => codes::USER_ERROR,

        Http { .. } => codes::SYSTEM_ERROR,
        Status { .. } => codes::SYSTEM_ERROR,
        Decode { .. } => codes::SYSTEM_ERROR,
        Unavailable { .. } => codes::SYSTEM_ERROR,
        Io(_) => codes::SYSTEM_ERROR,
        Json(_) => codes::SYSTEM_ERROR,
    }
}

/// Exit code for a top-level `anyhow` error
///
/// Falls back to `SYSTEM_ERROR` when the chain holds no `CostctlError`.
pub fn exit_code_for_anyhow(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CostctlError>())
        .map(exit_code_for_error)
        .unwrap_or(codes::SYSTEM_ERROR)
}
