use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use asset_intel::cli::{self, CommandContext};
use asset_intel::config;
use asset_intel::errors::AssetIntelError;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // .env is optional; real environment variables take precedence
    dotenvy::dotenv().ok();

    // Initialize logging
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let result = run(cli, cancel).await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: cli::Cli, cancel: CancellationToken) -> Result<(), AssetIntelError> {
    if let cli::Commands::Validate(args) = &cli.command {
        config::parse_config(&args.config).await?;
        println!("Configuration is valid: {}", args.config.display());
        return Ok(());
    }

    let ctx = CommandContext {
        config: config::load_config(cli.config.as_deref()).await?,
        quiet: cli.quiet,
        cancel,
    };

    match cli.command {
        cli::Commands::Scans(args) => cli::scans::handle_scans(args, &ctx).await,
        cli::Commands::Export(args) => cli::export::handle_export(args, &ctx).await,
        cli::Commands::AssetInfo(args) => cli::asset_info::handle_asset_info(args, &ctx).await,
        cli::Commands::PluginInfo(args) => cli::plugin_info::handle_plugin_info(args, &ctx).await,
        cli::Commands::Search(args) => cli::search::handle_search(args, &ctx).await,
        cli::Commands::Top(args) => cli::top::handle_top(args, &ctx).await,
        cli::Commands::All(args) => cli::all::handle_all(args, &ctx).await,
        cli::Commands::Validate(_) => Ok(()),
    }
}

fn exit_code(error: &AssetIntelError) -> i32 {
    match error {
        AssetIntelError::Config(_) => 2,
        AssetIntelError::Authentication(_) | AssetIntelError::Permission(_) => 4,
        AssetIntelError::StoreUnavailable { .. } => 5,
        AssetIntelError::AssetNotFound { .. } | AssetIntelError::PluginNotFound { .. } => 6,
        AssetIntelError::ExportFailed(_) => 7,
        AssetIntelError::InvalidArgument(_) => 8,
        _ => 1,
    }
}
