pub mod commands;
pub mod scans;
pub mod export;
pub mod asset_info;
pub mod plugin_info;
pub mod search;
pub mod top;
pub mod all;

pub use commands::{Cli, Commands};

use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::client::TenableClient;
use crate::config::{platform_credentials, AppConfig};
use crate::errors::AssetIntelError;
use crate::store::AssetStore;

/// State shared by every command handler.
pub struct CommandContext {
    pub config: AppConfig,
    pub quiet: bool,
    pub cancel: CancellationToken,
}

impl CommandContext {
    pub fn client(&self) -> Result<TenableClient, AssetIntelError> {
        TenableClient::new(&platform_credentials(&self.config)?)
    }

    pub fn store(&self, path: Option<PathBuf>) -> Result<AssetStore, AssetIntelError> {
        AssetStore::new(self.config.store_path(path))
    }

    /// Human-oriented status line on stderr, silenced by `--quiet`.
    pub fn status(&self, line: &str) {
        if !self.quiet {
            eprintln!("{}", line);
        }
    }
}
