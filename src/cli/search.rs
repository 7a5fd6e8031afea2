use crate::analysis::search_assets;
use crate::cli::commands::SearchArgs;
use crate::cli::CommandContext;
use crate::errors::AssetIntelError;
use crate::reporting::formatter::to_pretty_json;
use crate::reporting::renderer::{render_asset_table, render_origin};

pub async fn handle_search(args: SearchArgs, ctx: &CommandContext) -> Result<(), AssetIntelError> {
    let client = ctx.client()?;
    let store = ctx.store(args.input.clone())?;

    let outcome = search_assets(&args.query, Some(&store), &client).await?;
    if args.json {
        println!("{}", to_pretty_json(&outcome)?);
    } else {
        let title = format!("Assets matching '{}' ({}):", outcome.query, outcome.matches.len());
        print!("{}", render_asset_table(&title, &outcome.matches));
        ctx.status(&render_origin(&outcome.origin));
    }
    Ok(())
}
