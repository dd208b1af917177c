//! A single resource row and the field edits it accepts

use crate::pricing::ResourceType;
use serde::Serialize;

/// Stable row identifier; indices shift on removal, ids do not
pub type RowId = u64;

/// The two option lists a row fills in asynchronously
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionsField {
    Names,
    Regions,
}

/// Identifies the in-flight fetch for one option list of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub row: RowId,
    pub field: OptionsField,
}

/// A user edit to one field of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// `None` is the "-- Select Type --" choice
    Type(Option<ResourceType>),
    Name(String),
    Region(String),
    /// Raw unit input, parsed when the payload is built
    Units(String),
}

impl Field {
    /// Option lists whose contents become invalid when this field changes
    pub fn invalidates(&self) -> &'static [OptionsField] {
        match self {
            Field::Type(_) => &[OptionsField::Names, OptionsField::Regions],
            Field::Name(_) => &[OptionsField::Regions],
            Field::Region(_) | Field::Units(_) => &[],
        }
    }
}

/// One unit of configuration in the form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRow {
    id: RowId,
    #[serde(rename = "type")]
    resource_type: Option<ResourceType>,
    name: String,
    region: String,
    units: String,
    names: Vec<String>,
    regions: Vec<String>,
    names_loading: bool,
    regions_loading: bool,
    names_error: Option<String>,
    regions_error: Option<String>,
    #[serde(skip)]
    names_generation: u64,
    #[serde(skip)]
    regions_generation: u64,
}

impl ResourceRow {
    pub(crate) fn new(id: RowId) -> Self {
        Self {
            id,
            resource_type: None,
            name: String::new(),
            region: String::new(),
            units: String::new(),
            names: Vec::new(),
            regions: Vec::new(),
            names_loading: false,
            regions_loading: false,
            names_error: None,
            regions_error: None,
            names_generation: 0,
            regions_generation: 0,
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn resource_type(&self) -> Option<ResourceType> {
        self.resource_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Units exactly as entered
    pub fn units_input(&self) -> &str {
        &self.units
    }

    /// Units as an integer, if the input parses as one
    pub fn units(&self) -> Option<u32> {
        self.units.trim().parse().ok()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn names_loading(&self) -> bool {
        self.names_loading
    }

    pub fn regions_loading(&self) -> bool {
        self.regions_loading
    }

    /// Set when the last names fetch failed; distinguishes failure from "no names"
    pub fn names_error(&self) -> Option<&str> {
        self.names_error.as_deref()
    }

    pub fn regions_error(&self) -> Option<&str> {
        self.regions_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.names_loading || self.regions_loading
    }

    /// Type, name and region chosen, units a positive integer
    pub fn is_complete(&self) -> bool {
        self.resource_type.is_some()
            && !self.name.is_empty()
            && !self.region.is_empty()
            && self.units().is_some_and(|u| u > 0)
    }

    pub(crate) fn generation(&self, field: OptionsField) -> u64 {
        match field {
            OptionsField::Names => self.names_generation,
            OptionsField::Regions => self.regions_generation,
        }
    }

    pub(crate) fn is_loading_field(&self, field: OptionsField) -> bool {
        match field {
            OptionsField::Names => self.names_loading,
            OptionsField::Regions => self.regions_loading,
        }
    }

    /// Clear name and region state and start a new names generation
    pub(crate) fn reset_for_type(&mut self, resource_type: Option<ResourceType>) -> u64 {
        self.resource_type = resource_type;
        self.name.clear();
        self.names.clear();
        self.names_error = None;
        self.names_generation += 1;
        self.names_loading = resource_type.is_some();
        self.reset_for_name(String::new());
        self.names_generation
    }

    /// Clear region state and start a new regions generation
    pub(crate) fn reset_for_name(&mut self, name: String) -> u64 {
        self.regions_loading = self.resource_type.is_some() && !name.is_empty();
        self.name = name;
        self.region.clear();
        self.regions.clear();
        self.regions_error = None;
        self.regions_generation += 1;
        self.regions_generation
    }

    pub(crate) fn set_region(&mut self, region: String) {
        self.region = region;
    }

    pub(crate) fn set_units(&mut self, units: String) {
        self.units = units;
    }

    /// Store the result of a fetch for `field`
    pub(crate) fn resolve(&mut self, field: OptionsField, result: Result<Vec<String>, String>) {
        let (options, loading, error) = match field {
            OptionsField::Names => (
                &mut self.names,
                &mut self.names_loading,
                &mut self.names_error,
            ),
            OptionsField::Regions => (
                &mut self.regions,
                &mut self.regions_loading,
                &mut self.regions_error,
            ),
        };
        *loading = false;
        match result {
            Ok(values) => {
                *options = values;
                *error = None;
            }
            Err(message) => {
                options.clear();
                *error = Some(message);
            }
        }
    }
}
