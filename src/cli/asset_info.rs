use crate::analysis::detail;
use crate::analysis::resolver::optional_local_rows;
use crate::cli::commands::AssetInfoArgs;
use crate::cli::CommandContext;
use crate::errors::AssetIntelError;
use crate::models::Limit;
use crate::reporting::formatter::to_pretty_json;
use crate::reporting::renderer::render_detail_headline;

pub async fn handle_asset_info(args: AssetInfoArgs, ctx: &CommandContext) -> Result<(), AssetIntelError> {
    let limit = if args.all_vulns { Limit::Unbounded } else { Limit::from_count(args.max_vulns)? };
    let client = ctx.client()?;
    let store = ctx.store(args.input.clone())?;
    let local = optional_local_rows(Some(&store));

    let asset = detail(&args.hostname, local.as_ref(), limit, &client).await?;
    ctx.status(&render_detail_headline(&asset));
    println!("{}", to_pretty_json(&asset)?);
    Ok(())
}
