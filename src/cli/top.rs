use tracing::debug;

use crate::analysis::top;
use crate::cli::commands::TopArgs;
use crate::cli::CommandContext;
use crate::errors::AssetIntelError;
use crate::models::{AssetRow, Limit};
use crate::reporting::formatter::to_pretty_json;
use crate::reporting::renderer::render_asset_table;
use crate::store::AssetStore;

pub async fn handle_top(args: TopArgs, ctx: &CommandContext) -> Result<(), AssetIntelError> {
    let limit = if args.all_rows { Limit::Unbounded } else { Limit::from_count(args.top)? };
    let store = ctx.store(args.input.clone())?;

    let ranked = ranked_rows(&store, limit)?;
    if args.json {
        println!("{}", to_pretty_json(&ranked)?);
    } else {
        let title = format!("Top {} assets by exposure score ({}):", limit, store.path().display());
        print!("{}", render_asset_table(&title, &ranked));
    }
    Ok(())
}

/// Load the store and rank it. Ranking never reaches the platform.
pub fn ranked_rows(store: &AssetStore, limit: Limit) -> Result<Vec<AssetRow>, AssetIntelError> {
    let rows = store.load()?;
    debug!(rows = rows.len(), limit = %limit, "Ranking stored assets");
    top(&rows, limit)
}
