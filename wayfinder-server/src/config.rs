use std::{
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use serde::Deserialize;
use wayfinder_core::RoutingConfig;

use crate::error::ServerError;

/// Server settings, read from a TOML file.
///
/// ```toml
/// listen = "0.0.0.0:8080"
/// network_path = "venue/walkways.geojson"
///
/// [routing.limits]
/// max_connector_m = 40.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// GeoJSON file with the walkway lines
    pub network_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    /// Route computations allowed to run at once
    pub concurrency_limit: usize,
    pub routing: RoutingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            network_path: None,
            request_timeout_secs: 10,
            concurrency_limit: 64,
            routing: RoutingConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ServerError> {
        let config: ServerConfig = toml::from_str(source)?;
        config.routing.validate()?;
        Ok(config)
    }
}
