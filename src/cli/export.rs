use tracing::info;

use crate::client::{AssetSource, ExportFilter};
use crate::cli::commands::ExportArgs;
use crate::cli::CommandContext;
use crate::errors::AssetIntelError;
use crate::pipeline::{export_assets, ExportSummary};
use crate::reporting::renderer::render_export_summary;
use crate::reporting::ExportSpinner;
use crate::store::AssetStore;

pub async fn handle_export(args: ExportArgs, ctx: &CommandContext) -> Result<(), AssetIntelError> {
    let client = ctx.client()?;
    let store = ctx.store(args.output.clone())?;
    run_export(&client, &args.filter(), &store, ctx).await?;
    Ok(())
}

/// Export with a spinner and a printed summary; shared with `all`.
pub async fn run_export(
    source: &dyn AssetSource,
    filter: &ExportFilter,
    store: &AssetStore,
    ctx: &CommandContext,
) -> Result<ExportSummary, AssetIntelError> {
    info!(filter = %filter, path = %store.path().display(), format = ?store.format(), "Starting asset export");
    let options = ctx.config.export_options();
    let spinner = ExportSpinner::new(filter, !ctx.quiet);

    match export_assets(source, filter, store, &options, &ctx.cancel).await {
        Ok(summary) => {
            spinner.finish(summary.exported);
            ctx.status(&render_export_summary(&summary));
            Ok(summary)
        }
        Err(e) => {
            spinner.fail();
            Err(e)
        }
    }
}
