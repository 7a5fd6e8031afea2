use std::path::PathBuf;
use clap::{Parser, Subcommand, Args};

use crate::client::ExportFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(name = "asset-intel", version, long_version = LONG_VERSION, about = "Asset export and exposure analysis for Tenable Vulnerability Management")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List completed scans
    Scans(ScansArgs),
    /// Export assets into the local asset store
    Export(ExportArgs),
    /// Show an asset and its vulnerabilities
    AssetInfo(AssetInfoArgs),
    /// Show a plugin and the assets it affects
    PluginInfo(PluginInfoArgs),
    /// Search assets by hostname, IPv4 address or id
    Search(SearchArgs),
    /// Rank stored assets by exposure score
    Top(TopArgs),
    /// List scans, export the tagged assets, then rank them
    All(AllArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct TagArgs {
    /// Tag category to export
    #[arg(long, default_value = "Location")]
    pub tag_category: String,

    /// Tag value to export
    #[arg(long, default_value = "London")]
    pub tag_value: String,
}

impl TagArgs {
    pub fn filter(&self) -> ExportFilter {
        ExportFilter::Tag {
            category: self.tag_category.clone(),
            value: self.tag_value.clone(),
        }
    }
}

#[derive(Args, Clone)]
pub struct ScansArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub tag: TagArgs,

    /// Export every asset instead of one tag
    #[arg(long)]
    pub all_assets: bool,

    /// Asset store to write (.csv, .json, .jsonl, .db)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn filter(&self) -> ExportFilter {
        if self.all_assets { ExportFilter::All } else { self.tag.filter() }
    }
}

#[derive(Args, Clone)]
pub struct AssetInfoArgs {
    /// Hostname, IPv4 address or asset id
    pub hostname: String,

    /// Asset store to resolve the hostname from
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Maximum vulnerabilities to list
    #[arg(long, default_value = "10", allow_negative_numbers = true)]
    pub max_vulns: i64,

    /// List every vulnerability
    #[arg(long, conflicts_with = "max_vulns")]
    pub all_vulns: bool,
}

#[derive(Args, Clone)]
pub struct PluginInfoArgs {
    /// Plugin id
    pub plugin_id: u32,

    /// Maximum affected assets to list
    #[arg(long, default_value = "10", allow_negative_numbers = true)]
    pub max_assets: i64,

    /// List every affected asset
    #[arg(long, conflicts_with = "max_assets")]
    pub all_assets: bool,
}

#[derive(Args, Clone)]
pub struct SearchArgs {
    /// Case-insensitive substring to match
    pub query: String,

    /// Asset store to search before falling back to the live API
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct TopArgs {
    /// Asset store to rank
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Number of assets to show
    #[arg(long, default_value = "5", allow_negative_numbers = true)]
    pub top: i64,

    /// Show every asset
    #[arg(long, conflicts_with = "top")]
    pub all_rows: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct AllArgs {
    #[command(flatten)]
    pub tag: TagArgs,

    /// Asset store to write and rank
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of assets to show
    #[arg(long, default_value = "5", allow_negative_numbers = true)]
    pub top: i64,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: PathBuf,
}
