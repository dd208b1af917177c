//! `estimate`: fill the form from command-line resource specs and submit it

use super::CommandContext;
use crate::display;
use crate::error::{ApiCall, CostctlError, Result};
use crate::form::{Field, FormController};
use crate::pricing::{EstimateResult, ResourceType};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// One `--resource TYPE:NAME:REGION:UNITS` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    pub resource_type: ResourceType,
    pub name: String,
    pub region: String,
    pub units: String,
}

impl FromStr for ResourceSpec {
    type Err = CostctlError;

    /// Type comes first and units last; region is the second-to-last part,
    /// everything in between is the name.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 4 || parts.iter().any(|p| p.trim().is_empty()) {
            return Err(CostctlError::validation(
                "resource",
                format!("'{}' is not TYPE:NAME:REGION:UNITS (e.g. Compute:db.t3.micro:us-east-1:2)", s),
            ));
        }
        let last = parts.len() - 1;
        Ok(Self {
            resource_type: parts[0].parse()?,
            name: parts[1..last - 1].join(":"),
            region: parts[last - 1].to_string(),
            units: parts[last].trim().to_string(),
        })
    }
}

/// Enter every spec into the form, one row each, checking choices against
/// the options the pricing service offers
pub async fn fill_form(form: &mut FormController, specs: &[ResourceSpec]) -> Result<()> {
    for (index, spec) in specs.iter().enumerate() {
        if index >= form.state().len() {
            form.add_row();
        }
        debug!("Row {}: {:?}", index, spec);

        form.set_field(index, Field::Type(Some(spec.resource_type)))?;
        form.settle().await;
        check_option(form, index, spec, Choice::Name)?;

        form.set_field(index, Field::Name(spec.name.clone()))?;
        form.settle().await;
        check_option(form, index, spec, Choice::Region)?;

        form.set_field(index, Field::Region(spec.region.clone()))?;
        form.set_field(index, Field::Units(spec.units.clone()))?;
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Choice {
    Name,
    Region,
}

fn check_option(
    form: &FormController,
    index: usize,
    spec: &ResourceSpec,
    choice: Choice,
) -> Result<()> {
    let row = form
        .state()
        .row(index)
        .ok_or_else(|| CostctlError::validation("row", format!("row {} missing", index)))?;

    let (options, error, call, wanted, field, empty_message) = match choice {
        Choice::Name => (
            row.names(),
            row.names_error(),
            ApiCall::Names,
            &spec.name,
            "name",
            format!("No resources available for type {}", spec.resource_type),
        ),
        Choice::Region => (
            row.regions(),
            row.regions_error(),
            ApiCall::Regions,
            &spec.region,
            "region",
            format!("No regions available for {}", spec.name),
        ),
    };

    if error.is_some() {
        return Err(CostctlError::Unavailable {
            call,
            detail: format!("row {}", index),
        });
    }
    if options.is_empty() {
        return Err(CostctlError::validation(field, empty_message));
    }
    if !options.iter().any(|o| o == wanted) {
        return Err(CostctlError::validation(
            field,
            format!("'{}' is not offered; choose one of: {}", wanted, options.join(", ")),
        ));
    }
    Ok(())
}

/// Build and submit the form, returning the service's estimate
pub async fn estimate(ctx: &CommandContext, specs: &[ResourceSpec]) -> Result<EstimateResult> {
    let mut form = FormController::new(Arc::clone(&ctx.api));
    ctx.with_spinner("Loading options...", fill_form(&mut form, specs))
        .await?;
    ctx.with_spinner("Getting estimate...", form.submit()).await
}

pub async fn run_estimate(ctx: &CommandContext, specs: &[ResourceSpec]) -> Result<()> {
    if specs.is_empty() {
        return Err(CostctlError::validation(
            "resource",
            "at least one --resource is required",
        ));
    }
    let result = estimate(ctx, specs).await?;

    if ctx.json() {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", display::render_estimate(&result, ctx.currency()));
    }
    Ok(())
}
