pub use clap::Parser;

use std::path::PathBuf;

use strata_client::Deployment;

#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(about = "Manage files and directories in Strata storage")]
pub struct Args {
    /// Composite API key (overrides the config file)
    #[arg(long, global = true, env = "STRATA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Target deployment (overrides the config file)
    #[arg(long, global = true, value_enum)]
    pub deployment: Option<Deployment>,

    /// Explicit API host, e.g. https://storage.example.com/api
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Path to the strata config directory (defaults to ~/.strata)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Default log level; RUST_LOG still applies on top
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: crate::Command,
}
