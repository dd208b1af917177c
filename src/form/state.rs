//! Cascading selection form state
//!
//! `FormState` is plain data plus the transition rules. It never performs
//! I/O: editing a field that needs new options returns a [`FetchRequest`],
//! and the caller feeds the answer back through [`FormState::apply_fetch`].
//! Every request is stamped with the row's current generation for that
//! option list, and answers from older generations (or for rows that have
//! since been removed) are dropped, so the most recent edit always wins no
//! matter in which order responses arrive.

use super::row::{FetchKey, Field, OptionsField, ResourceRow, RowId};
use crate::error::{CostctlError, Result};
use crate::pricing::{EstimateRequest, EstimateResult, ResourceRequest, ResourceType};
use tracing::{debug, warn};

/// Options fetch the caller must perform after an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Names {
        row: RowId,
        generation: u64,
        resource_type: ResourceType,
    },
    Regions {
        row: RowId,
        generation: u64,
        resource_type: ResourceType,
        name: String,
    },
}

impl FetchRequest {
    pub fn key(&self) -> FetchKey {
        match self {
            FetchRequest::Names { row, .. } => FetchKey {
                row: *row,
                field: OptionsField::Names,
            },
            FetchRequest::Regions { row, .. } => FetchKey {
                row: *row,
                field: OptionsField::Regions,
            },
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            FetchRequest::Names { generation, .. } | FetchRequest::Regions { generation, .. } => {
                *generation
            }
        }
    }
}

/// Answer to a [`FetchRequest`]
#[derive(Debug)]
pub struct FetchOutcome {
    pub key: FetchKey,
    pub generation: u64,
    pub result: Result<Vec<String>>,
}

/// Where the last estimate submission stands
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded(EstimateResult),
    Failed(String),
}

/// Ordered resource rows; never fewer than one
#[derive(Debug, Clone)]
pub struct FormState {
    rows: Vec<ResourceRow>,
    next_row_id: RowId,
    submission: SubmissionStatus,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// A form with a single empty row
    pub fn new() -> Self {
        Self {
            rows: vec![ResourceRow::new(0)],
            next_row_id: 1,
            submission: SubmissionStatus::Idle,
        }
    }

    pub fn rows(&self) -> &[ResourceRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&ResourceRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn submission(&self) -> &SubmissionStatus {
        &self.submission
    }

    /// True while any row waits for options
    pub fn is_loading(&self) -> bool {
        self.rows.iter().any(ResourceRow::is_loading)
    }

    /// Append an empty row and return its id
    pub fn add_row(&mut self) -> RowId {
        let id = self.next_row_id;
        self.next_row_id += 1;
        self.rows.push(ResourceRow::new(id));
        self.clear_submission();
        id
    }

    /// Remove the row at `index`
    ///
    /// The last remaining row is never removed; out-of-range indices are
    /// ignored. Returns the id of the removed row.
    pub fn remove_row(&mut self, index: usize) -> Option<RowId> {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            debug!("Ignoring remove_row({}) with {} rows", index, self.rows.len());
            return None;
        }
        let row = self.rows.remove(index);
        self.clear_submission();
        Some(row.id())
    }

    /// Apply an edit to the row at `index`
    ///
    /// Changing the type resets name, region and both option lists; changing
    /// the name resets region and the region list. When the new value needs
    /// options from the pricing service the matching request is returned.
    pub fn set_field(&mut self, index: usize, field: Field) -> Result<Option<FetchRequest>> {
        let len = self.rows.len();
        let row = self.rows.get_mut(index).ok_or_else(|| {
            CostctlError::validation("row", format!("index {} out of range ({} rows)", index, len))
        })?;

        let request = match field {
            Field::Type(resource_type) => {
                let generation = row.reset_for_type(resource_type);
                resource_type.map(|resource_type| FetchRequest::Names {
                    row: row.id(),
                    generation,
                    resource_type,
                })
            }
            Field::Name(name) => {
                let generation = row.reset_for_name(name);
                match row.resource_type() {
                    Some(resource_type) if !row.name().is_empty() => {
                        Some(FetchRequest::Regions {
                            row: row.id(),
                            generation,
                            resource_type,
                            name: row.name().to_string(),
                        })
                    }
                    _ => None,
                }
            }
            Field::Region(region) => {
                row.set_region(region);
                None
            }
            Field::Units(units) => {
                row.set_units(units);
                None
            }
        };

        self.clear_submission();
        Ok(request)
    }

    /// Store a fetch answer if it is still current
    ///
    /// Returns false when the answer was dropped as stale.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) -> bool {
        let FetchOutcome {
            key,
            generation,
            result,
        } = outcome;

        let Some(row) = self.rows.iter_mut().find(|r| r.id() == key.row) else {
            debug!("Dropping {:?} answer for removed row {}", key.field, key.row);
            return false;
        };
        if row.generation(key.field) != generation || !row.is_loading_field(key.field) {
            debug!(
                "Dropping stale {:?} answer for row {} (generation {}, current {})",
                key.field,
                key.row,
                generation,
                row.generation(key.field)
            );
            return false;
        }

        let result = result.map_err(|e| {
            warn!("Row {} {:?} fetch failed: {}", key.row, key.field, e);
            e.user_message()
        });
        row.resolve(key.field, result);
        true
    }

    /// Every row has type, name, region and a positive unit count
    pub fn is_submittable(&self) -> bool {
        self.rows.iter().all(ResourceRow::is_complete)
    }

    /// Map rows, in order, to the estimate request body
    ///
    /// Presence is not checked here (see [`FormState::is_submittable`]); rows
    /// without a type or with non-integer units cannot be represented and are
    /// reported as validation errors.
    pub fn build_submission_payload(&self) -> Result<EstimateRequest> {
        let resources = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| -> Result<ResourceRequest> {
                let resource_type = row.resource_type().ok_or_else(|| {
                    CostctlError::validation(format!("rows[{}].type", index), "no type selected")
                })?;
                let units = row.units().ok_or_else(|| {
                    CostctlError::validation(
                        format!("rows[{}].units", index),
                        format!("'{}' is not an integer", row.units_input()),
                    )
                })?;
                Ok(ResourceRequest {
                    resource_type,
                    name: row.name().to_string(),
                    region: row.region().to_string(),
                    units,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(EstimateRequest { resources })
    }

    /// Move to `Submitting` and return the payload to send
    pub fn begin_submission(&mut self) -> Result<EstimateRequest> {
        if !self.is_submittable() {
            return Err(CostctlError::validation(
                "form",
                "every resource needs a type, name, region and a positive unit count",
            ));
        }
        let request = self.build_submission_payload()?;
        self.submission = SubmissionStatus::Submitting;
        Ok(request)
    }

    /// Record the estimate outcome
    ///
    /// Failures are stored as the generic estimate message and handed back
    /// to the caller unchanged.
    pub fn finish_submission(&mut self, result: Result<EstimateResult>) -> Result<EstimateResult> {
        match result {
            Ok(estimate) => {
                self.submission = SubmissionStatus::Succeeded(estimate.clone());
                Ok(estimate)
            }
            Err(e) => {
                warn!("Estimate submission failed: {}", e);
                self.submission = SubmissionStatus::Failed(e.user_message());
                Err(e)
            }
        }
    }

    fn clear_submission(&mut self) {
        if self.submission != SubmissionStatus::Idle {
            debug!("Form edited, clearing previous estimate");
            self.submission = SubmissionStatus::Idle;
        }
    }
}
