use clap::Args;

use strata_client::{ApiError, BridgeError, ChangeBridge, SocketChannel};

use super::format_listing;
use crate::cli::op::ContextError;

/// Print a directory listing every time the server reports a change
#[derive(Args, Debug, Clone)]
pub struct Watch {
    /// Directory to watch by id
    #[arg(long, group = "directory")]
    pub id: Option<String>,

    /// Directory to watch by `/`-delimited path
    #[arg(long, group = "directory")]
    pub path: Option<String>,

    /// Also print the total stored size on each change
    #[arg(long)]
    pub size: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("invalid socket URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("{0}")]
    Bridge(#[from] BridgeError),
    #[error("failed to wait for Ctrl-C: {0}")]
    Signal(#[from] std::io::Error),
    #[error("nothing to watch: pass --id, --path or --size")]
    NothingToWatch,
}

fn print_refresh<T>(label: &str, result: Result<T, ApiError>, render: impl Fn(&T) -> String) {
    match result {
        Ok(value) => println!("--- {} ---\n{}", label, render(&value)),
        Err(e) => eprintln!("--- {} ---\nrefresh failed: {}", label, e),
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Watch {
    type Error = WatchError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if self.id.is_none() && self.path.is_none() && !self.size {
            return Err(WatchError::NothingToWatch);
        }

        let client = ctx.client()?.clone();
        let channel = SocketChannel::new(ctx.client_config.socket_url()?);
        let bridge = ChangeBridge::new(client, channel)?;
        bridge.connect().await?;

        if let Some(id) = &self.id {
            let label = format!("directory {}", id);
            bridge
                .on_read_directory_event(id, move |result| {
                    print_refresh(&label, result, format_listing)
                })
                .await?;
        }
        if let Some(path) = &self.path {
            let label = format!("/{}", path.trim_start_matches('/'));
            bridge.on_read_directory_segment_change(path, move |result| {
                print_refresh(&label, result, format_listing)
            })?;
        }
        if self.size {
            bridge.on_total_size_change(|result| {
                print_refresh("total size", result, |size| format!("{} bytes", size))
            });
        }

        eprintln!("Watching for changes, Ctrl-C to stop");
        tokio::signal::ctrl_c().await?;

        let removed = bridge.disconnect_read_directory_event();
        bridge.disconnect().await?;
        Ok(format!("Stopped watching ({} subscriptions)", removed))
    }
}
