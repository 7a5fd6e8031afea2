use crate::analysis::plugin_impact;
use crate::cli::commands::PluginInfoArgs;
use crate::cli::CommandContext;
use crate::errors::AssetIntelError;
use crate::models::Limit;
use crate::reporting::formatter::to_pretty_json;
use crate::reporting::renderer::render_plugin_headline;

pub async fn handle_plugin_info(args: PluginInfoArgs, ctx: &CommandContext) -> Result<(), AssetIntelError> {
    let limit = if args.all_assets { Limit::Unbounded } else { Limit::from_count(args.max_assets)? };
    let client = ctx.client()?;

    let detail = plugin_impact(args.plugin_id, limit, &client).await?;
    ctx.status(&render_plugin_headline(&detail));
    println!("{}", to_pretty_json(&detail)?);
    Ok(())
}
