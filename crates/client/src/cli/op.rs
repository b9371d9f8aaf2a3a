use std::error::Error;
use std::path::PathBuf;

use anyhow::Context;
use strata_client::{ApiClient, AppState, ClientConfig, Deployment, StateError};

use super::args::Args;

/// Settings resolved from flags, environment and the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub api_key: Option<String>,
    pub client_config: ClientConfig,
}

/// Resolve the API key and target host.
///
/// Priority: explicit flag (or `STRATA_API_KEY`) > config file > defaults.
/// A missing config file is not an error; an unreadable one is.
pub fn resolve(
    api_key: Option<String>,
    deployment: Option<Deployment>,
    host: Option<String>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<Resolved> {
    let stored = match AppState::load(config_path) {
        Ok(state) => state.config,
        Err(StateError::NotInitialized) | Err(StateError::NoHomeDirectory) => Default::default(),
        Err(e) => return Err(e).context("failed to read strata config"),
    };

    let stored_client = stored.client_config();
    Ok(Resolved {
        api_key: api_key.or(stored.api_key),
        client_config: ClientConfig {
            deployment: deployment.unwrap_or(stored_client.deployment),
            host: host.or(stored_client.host),
        },
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("no API key: pass --api-key, set STRATA_API_KEY, or run 'strata init --api-key <key>'")]
    MissingApiKey,
}

#[derive(Clone)]
pub struct OpContext {
    /// Only present when an API key was found
    client: Option<ApiClient>,
    pub client_config: ClientConfig,
    /// Optional custom config path (defaults to ~/.strata)
    pub config_path: Option<PathBuf>,
}

impl OpContext {
    pub fn new(args: &Args) -> anyhow::Result<Self> {
        let resolved = resolve(
            args.api_key.clone(),
            args.deployment,
            args.host.clone(),
            args.config_path.clone(),
        )?;

        let client = resolved
            .api_key
            .as_deref()
            .map(|key| ApiClient::new(key, &resolved.client_config))
            .transpose()
            .context("failed to create API client")?;

        Ok(Self {
            client,
            client_config: resolved.client_config,
            config_path: args.config_path.clone(),
        })
    }

    pub fn client(&self) -> Result<&ApiClient, ContextError> {
        self.client.as_ref().ok_or(ContextError::MissingApiKey)
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolve_without_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve(None, None, None, Some(dir.path().join("none"))).unwrap();
        assert_eq!(resolved, Resolved::default());
    }

    #[test]
    fn test_resolve_flags_win_over_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "api_key = \"k.0.u.h.stored\"\ndeployment = \"production\"\nhost = \"https://stored\"\n",
        )
        .unwrap();
        let path = Some(dir.path().to_path_buf());

        let stored = resolve(None, None, None, path.clone()).unwrap();
        assert_eq!(stored.api_key.as_deref(), Some("k.0.u.h.stored"));
        assert_eq!(stored.client_config.deployment, Deployment::Production);
        assert_eq!(stored.client_config.host.as_deref(), Some("https://stored"));

        let explicit = resolve(
            Some("k.0.u.h.flag".into()),
            Some(Deployment::Local),
            Some("http://flag".into()),
            path,
        )
        .unwrap();
        assert_eq!(explicit.api_key.as_deref(), Some("k.0.u.h.flag"));
        assert_eq!(explicit.client_config.deployment, Deployment::Local);
        assert_eq!(explicit.client_config.host.as_deref(), Some("http://flag"));
    }

    #[test]
    fn test_resolve_reports_broken_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "deployment = [").unwrap();
        assert!(resolve(None, None, None, Some(dir.path().to_path_buf())).is_err());
    }
}
