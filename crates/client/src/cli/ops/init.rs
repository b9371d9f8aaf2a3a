use clap::Args;

use strata_client::{AppConfig, AppState, StateError};

/// Write `config.toml` from the global `--api-key`, `--deployment` and
/// `--host` flags
#[derive(Args, Debug, Clone)]
pub struct Init;

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // the key was already parsed when the context was built
        let client = ctx.client().ok();
        let config = AppConfig {
            api_key: client.map(|client| client.api_key().as_str().to_string()),
            deployment: ctx.client_config.deployment,
            host: ctx.client_config.host.clone(),
        };
        let state = AppState::init(ctx.config_path.clone(), config)?;

        let scope = match client {
            Some(client) => client.scope().to_string(),
            None => "no key stored".to_string(),
        };
        let host = match &state.config.host {
            Some(host) => host.as_str(),
            None => state.config.deployment.default_host(),
        };

        Ok(format!(
            "Initialized strata directory at: {}\n\
             - Config: {}\n\
             - Deployment: {:?}\n\
             - Host: {}\n\
             - Key scope: {}",
            state.strata_dir.display(),
            state.config_path.display(),
            state.config.deployment,
            host,
            scope
        ))
    }
}
