//! `history` and `details`: past estimates

use super::CommandContext;
use crate::display;
use crate::error::Result;

pub async fn show_history(ctx: &CommandContext) -> Result<()> {
    let entries = ctx
        .with_spinner("Loading history...", ctx.api.history())
        .await?;

    if ctx.json() {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", display::render_history(&entries, ctx.currency()));
    }
    Ok(())
}

pub async fn show_details(ctx: &CommandContext, id: &str) -> Result<()> {
    let details = ctx
        .with_spinner("Loading estimate details...", ctx.api.details(id))
        .await?;

    if ctx.json() {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        print!("{}", display::render_details(&details, ctx.currency()));
    }
    Ok(())
}
