use serde::{Deserialize, Serialize};
use url::Url;

/// Default host when running against a local API server
pub const LOCAL_HOST: &str = "http://localhost:3000";
/// Default host for the hosted API
pub const PRODUCTION_HOST: &str = "https://api.strata.storage";

/// Which API deployment the client targets when no explicit host is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Deployment {
    #[default]
    Local,
    Production,
}

impl Deployment {
    pub fn default_host(&self) -> &'static str {
        match self {
            Deployment::Local => LOCAL_HOST,
            Deployment::Production => PRODUCTION_HOST,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub deployment: Deployment,
    /// Explicit host override, wins over the deployment default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl ClientConfig {
    pub fn local() -> Self {
        Self::default()
    }

    pub fn production() -> Self {
        Self {
            deployment: Deployment::Production,
            host: None,
        }
    }

    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            deployment: Deployment::default(),
            host: Some(host.into()),
        }
    }

    /// Base URL every API path is joined onto.
    ///
    /// Always ends in exactly one `/`, so relative joins keep any path
    /// prefix the host carries (`https://h/api` + `files` -> `https://h/api/files`).
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let host = self
            .host
            .as_deref()
            .unwrap_or_else(|| self.deployment.default_host());
        normalize_host(host)
    }

    /// Socket.IO endpoint for the change-notification channel.
    ///
    /// Always `/socket.io/` at the host's origin. A path prefix on the host
    /// (`https://h/api`) addresses HTTP routes only, never the socket path.
    pub fn socket_url(&self) -> Result<Url, url::ParseError> {
        let mut url = self.base_url()?;
        url.set_path("/socket.io/");
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        // http <-> ws and https <-> wss are both "special" schemes, so this cannot fail
        let _ = url.set_scheme(scheme);
        url.set_query(Some("EIO=4&transport=websocket"));
        Ok(url)
    }
}

fn normalize_host(host: &str) -> Result<Url, url::ParseError> {
    let trimmed = host.trim().trim_end_matches('/');
    Url::parse(&format!("{}/", trimmed))
}
