//! Resource configuration form
//!
//! A form is an ordered list of resource rows. Within a row the name options
//! depend on the chosen type and the region options depend on the chosen
//! name, so upstream edits reset everything downstream and trigger a new
//! fetch. [`FormState`] holds the rules, [`FormController`] runs the fetches.

mod controller;
mod row;
mod state;

pub use controller::FormController;
pub use row::{FetchKey, Field, OptionsField, ResourceRow, RowId};
pub use state::{FetchOutcome, FetchRequest, FormState, SubmissionStatus};
