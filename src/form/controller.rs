//! Async driver for the form state
//!
//! Each options fetch runs as its own tokio task and reports back over a
//! channel. Starting a fetch for a (row, field) pair aborts whatever task was
//! still running for that pair; the generation check in `FormState` catches
//! anything that slipped through before the abort landed. A task that ends
//! without an answer (its API call panicked) still reports a failure, so
//! `settle` never waits on it forever.

use super::row::{FetchKey, Field, OptionsField, RowId};
use super::state::{FetchOutcome, FetchRequest, FormState};
use crate::error::{ApiCall, CostctlError, Result};
use crate::pricing::{EstimateResult, PricingApi};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

struct InFlight {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Sends exactly one outcome for a fetch task
///
/// Dropped without `send` (panic or abort), it reports the fetch as failed.
/// After an abort that report is stale and `FormState` drops it.
struct OutcomeSender {
    tx: Option<mpsc::UnboundedSender<FetchOutcome>>,
    key: FetchKey,
    generation: u64,
}

impl OutcomeSender {
    fn send(mut self, result: Result<Vec<String>>) {
        if let Some(tx) = self.tx.take() {
            // receiver gone means the controller was dropped
            let _ = tx.send(FetchOutcome {
                key: self.key,
                generation: self.generation,
                result,
            });
        }
    }
}

impl Drop for OutcomeSender {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let call = match self.key.field {
                OptionsField::Names => ApiCall::Names,
                OptionsField::Regions => ApiCall::Regions,
            };
            let _ = tx.send(FetchOutcome {
                key: self.key,
                generation: self.generation,
                result: Err(CostctlError::Unavailable {
                    call,
                    detail: "fetch task ended without a response".to_string(),
                }),
            });
        }
    }
}

/// Owns a `FormState` and performs the fetches its edits ask for
pub struct FormController {
    api: Arc<dyn PricingApi>,
    state: FormState,
    in_flight: HashMap<FetchKey, InFlight>,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl FormController {
    pub fn new(api: Arc<dyn PricingApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            state: FormState::new(),
            in_flight: HashMap::new(),
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Number of fetch tasks that have not reported back yet
    pub fn pending_fetches(&self) -> usize {
        self.in_flight.len()
    }

    pub fn add_row(&mut self) -> RowId {
        self.state.add_row()
    }

    /// Remove a row and cancel its fetches; false if the removal was refused
    pub fn remove_row(&mut self, index: usize) -> bool {
        match self.state.remove_row(index) {
            Some(row) => {
                self.in_flight.retain(|key, task| {
                    if key.row == row {
                        task.handle.abort();
                        false
                    } else {
                        true
                    }
                });
                true
            }
            None => false,
        }
    }

    /// Edit a field, cancelling fetches it invalidates and starting the one it needs
    pub fn set_field(&mut self, index: usize, field: Field) -> Result<()> {
        let invalidated = field.invalidates();
        let request = self.state.set_field(index, field)?;

        if let Some(row) = self.state.row(index).map(|r| r.id()) {
            for &field in invalidated {
                self.cancel(FetchKey { row, field });
            }
        }
        if let Some(request) = request {
            self.spawn_fetch(request);
        }
        Ok(())
    }

    /// Wait for the next fetch to report and apply it
    ///
    /// Returns `None` once nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<FetchKey> {
        if self.in_flight.is_empty() {
            return None;
        }
        let outcome = self.rx.recv().await?;
        let key = outcome.key;
        if self
            .in_flight
            .get(&key)
            .is_some_and(|task| task.generation == outcome.generation)
        {
            self.in_flight.remove(&key);
        }
        self.state.apply_fetch(outcome);
        Some(key)
    }

    /// Wait until every started fetch has been applied
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    /// Submit the form for an estimate
    ///
    /// Refuses (without calling the service) unless every row is complete.
    pub async fn submit(&mut self) -> Result<EstimateResult> {
        let request = self.state.begin_submission()?;
        info!("Submitting estimate for {} resources", request.resources.len());
        let result = self.api.estimate(&request).await;
        self.state.finish_submission(result)
    }

    fn cancel(&mut self, key: FetchKey) {
        if let Some(task) = self.in_flight.remove(&key) {
            debug!(
                "Cancelling {:?} fetch for row {} (generation {})",
                key.field, key.row, task.generation
            );
            task.handle.abort();
        }
    }

    fn spawn_fetch(&mut self, request: FetchRequest) {
        let key = request.key();
        let generation = request.generation();
        let api = Arc::clone(&self.api);
        let sender = OutcomeSender {
            tx: Some(self.tx.clone()),
            key,
            generation,
        };

        debug!("Fetching {:?} for row {} (generation {})", key.field, key.row, generation);
        let handle = tokio::spawn(async move {
            let result = match &request {
                FetchRequest::Names { resource_type, .. } => {
                    api.resource_names(*resource_type).await
                }
                FetchRequest::Regions {
                    resource_type,
                    name,
                    ..
                } => api.regions(*resource_type, name).await,
            };
            sender.send(result);
        });

        if let Some(previous) = self.in_flight.insert(key, InFlight { generation, handle }) {
            previous.handle.abort();
        }
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        for task in self.in_flight.values() {
            task.handle.abort();
        }
    }
}
