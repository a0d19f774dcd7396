//! `sqlkv serve` - HTTP query endpoint.

use anyhow::Result;
use tracing::warn;

use crate::cli::ServeArgs;
use crate::config::{ConfigFile, ServerConfig, ServerSettings};
use crate::server;

/// Merge flags over the optional config file.
pub fn resolve_config(args: &ServeArgs) -> Result<ServerConfig> {
    let file = match &args.config {
        Some(path) => ConfigFile::load_from(path)?.server,
        None => ServerSettings::default(),
    };

    let flags = ServerSettings {
        database: args.file.clone(),
        host: args.host.clone(),
        port: args.port,
        readonly: args.no_readonly.then_some(false),
        max_body_bytes: None,
    };

    flags.or(file).resolve()
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let validation = config.validate()?;
    for warning in &validation.warnings {
        warn!("{warning}");
    }
    server::serve(config).await
}
