use tracing::info;

use crate::analysis::completed_scans;
use crate::cli::commands::AllArgs;
use crate::cli::export::run_export;
use crate::cli::top::ranked_rows;
use crate::cli::CommandContext;
use crate::errors::AssetIntelError;
use crate::models::Limit;
use crate::reporting::renderer::{render_asset_table, render_scans};

/// Scans, then a tag export, then a ranking of what was exported.
pub async fn handle_all(args: AllArgs, ctx: &CommandContext) -> Result<(), AssetIntelError> {
    let limit = Limit::from_count(args.top)?;
    let client = ctx.client()?;
    let store = ctx.store(args.output.clone())?;

    let scans = completed_scans(&client).await?;
    print!("{}", render_scans(&scans));

    let summary = run_export(&client, &args.tag.filter(), &store, ctx).await?;
    if !summary.written {
        info!("Nothing exported, skipping ranking");
        return Ok(());
    }

    let ranked = ranked_rows(&store, limit)?;
    let title = format!("Top {} assets by exposure score ({}):", limit, store.path().display());
    print!("{}", render_asset_table(&title, &ranked));
    Ok(())
}
