use crate::analysis::completed_scans;
use crate::cli::commands::ScansArgs;
use crate::cli::CommandContext;
use crate::errors::AssetIntelError;
use crate::reporting::formatter::to_pretty_json;
use crate::reporting::renderer::render_scans;

pub async fn handle_scans(args: ScansArgs, ctx: &CommandContext) -> Result<(), AssetIntelError> {
    let client = ctx.client()?;
    let scans = completed_scans(&client).await?;

    if args.json {
        println!("{}", to_pretty_json(&scans)?);
    } else {
        print!("{}", render_scans(&scans));
    }
    Ok(())
}
