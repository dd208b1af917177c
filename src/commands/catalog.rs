//! `names` and `regions`: browse the options the form would offer

use super::CommandContext;
use crate::error::Result;
use crate::pricing::ResourceType;

pub async fn list_names(ctx: &CommandContext, resource_type: ResourceType) -> Result<()> {
    let names = ctx
        .with_spinner(
            "Loading resource names...",
            ctx.api.resource_names(resource_type),
        )
        .await?;

    if ctx.json() {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else if names.is_empty() {
        println!("No resources available for selected type.");
    } else {
        for name in &names {
            println!("{}", name);
        }
    }
    Ok(())
}

pub async fn list_regions(
    ctx: &CommandContext,
    resource_type: ResourceType,
    name: &str,
) -> Result<()> {
    let regions = ctx
        .with_spinner("Loading regions...", ctx.api.regions(resource_type, name))
        .await?;

    if ctx.json() {
        println!("{}", serde_json::to_string_pretty(&regions)?);
    } else if regions.is_empty() {
        println!("No regions available for selected resource.");
    } else {
        for region in &regions {
            println!("{}", region);
        }
    }
    Ok(())
}
