//! Shared utilities for CLI commands

use miette::Result;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::helpers::print_notices;
use crate::cli::GlobalOpts;
use crate::core::{Config, Hub};
use crate::source::GithubFetcher;

/// Where a command's schemas come from
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Schema files to load, in order
    pub files: Vec<PathBuf>,

    /// Fetch every .json file from the repository listing first
    #[arg(long, short = 'r')]
    pub remote: bool,

    /// Repository listing URL (overrides config)
    #[arg(long, value_name = "URL")]
    pub listing_url: Option<String>,
}

impl SourceArgs {
    /// Effective config with this command's overrides applied
    pub fn config(&self) -> Config {
        let mut config = Config::load();
        config.merge(Config {
            listing_url: self.listing_url.clone(),
            ..Default::default()
        });
        config
    }
}

/// Build a hub from the requested sources
///
/// The remote listing is applied first, then local files are appended, the
/// same order an interactive session sees. Local parse failures are reported
/// and skipped; a failed remote fetch is returned to the caller when
/// `remote_is_fatal` is set.
pub fn load_hub(
    sources: &SourceArgs,
    config: &Config,
    global: &GlobalOpts,
    remote_is_fatal: bool,
) -> Result<Hub> {
    let mut hub = Hub::new();

    if sources.remote {
        let fetcher = GithubFetcher::new(config).map_err(crate::error::HubError::from)?;
        debug!(url = fetcher.listing_url(), "loading remote schemas");
        let result = hub.load_remote(&fetcher);
        print_notices(&hub.take_notices(), global.quiet);
        if let Err(e) = result {
            if remote_is_fatal {
                return Err(e.into());
            }
        }
    }

    for path in &sources.files {
        let _ = hub.upload_file(path);
    }
    print_notices(&hub.take_notices(), global.quiet);

    Ok(hub)
}
