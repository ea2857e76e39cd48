//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    /// Directory backing the document and logo storage.
    pub upload_dir: String,
    pub secret: String,
    pub auth_service_url: String,
    /// ZeroMQ PUB endpoint for the change feed. Publishing is disabled when unset.
    #[serde(default)]
    pub zmq_changes_pub: Option<String>,
}

/// Subset of the configuration handed to extractors and templates.
#[derive(Clone, Debug)]
pub struct CommonServerConfig {
    pub auth_service_url: String,
    pub secret: String,
}

impl From<&ServerConfig> for CommonServerConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            auth_service_url: config.auth_service_url.clone(),
            secret: config.secret.clone(),
        }
    }
}
