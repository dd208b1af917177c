//! CLI command handlers
//!
//! Each handler takes the shared pricing client and the configured output
//! format; "json" prints the raw service payload, anything else prints
//! tables.

mod catalog;
mod estimate;
mod history;

pub use catalog::{list_names, list_regions};
pub use estimate::{estimate, fill_form, run_estimate, ResourceSpec};
pub use history::{show_details, show_history};

use crate::config::Config;
use crate::display;
use crate::pricing::PricingApi;
use std::future::Future;
use std::sync::Arc;

/// Everything a command needs
pub struct CommandContext {
    pub api: Arc<dyn PricingApi>,
    pub config: Config,
    pub output: String,
}

impl CommandContext {
    pub fn json(&self) -> bool {
        self.output == "json"
    }

    pub fn currency(&self) -> &str {
        &self.config.display.currency_symbol
    }

    /// Await `fut` behind a spinner in text mode
    pub(crate) async fn with_spinner<T>(&self, message: &str, fut: impl Future<Output = T>) -> T {
        if self.json() {
            return fut.await;
        }
        let pb = display::spinner(message);
        let value = fut.await;
        pb.finish_and_clear();
        value
    }
}
