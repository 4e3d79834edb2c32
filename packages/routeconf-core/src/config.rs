//! Analyzer configuration.
//!
//! Supports TOML config files, environment variable overrides, and defaults.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::addr::{AddrResolver, Network, ServiceRegistry};
use crate::error::ConfigError;

/// Configuration for request analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Network type for service-name port lookups (default: tcp)
    pub network: Network,
    /// Platform services file (default: "/etc/services"); `None` uses the built-in table only
    pub services_path: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            network: Network::Tcp,
            services_path: Some(PathBuf::from("/etc/services")),
        }
    }
}

impl AnalyzerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    /// Applies environment variable overrides.
    ///
    /// `ROUTECONF_NETWORK` sets the network; `ROUTECONF_SERVICES_PATH` sets
    /// the services file, with an empty value meaning none.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = env::var("ROUTECONF_NETWORK") {
            self.network = val.parse().map_err(|_| ConfigError::InvalidOverride {
                var: "ROUTECONF_NETWORK",
                value: val.clone(),
            })?;
        }
        if let Ok(val) = env::var("ROUTECONF_SERVICES_PATH") {
            self.services_path = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
        Ok(())
    }

    /// Builds the address resolver this configuration describes.
    ///
    /// A services file that cannot be read is logged and skipped; the
    /// built-in service table is always available.
    pub fn build_resolver(&self) -> AddrResolver {
        let services = match &self.services_path {
            Some(path) => match ServiceRegistry::load(path) {
                Ok(registry) => {
                    tracing::debug!(
                        "Loaded {} service entries from {}",
                        registry.len(),
                        path.display()
                    );
                    registry
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not read services file {}: {}; using built-in table",
                        path.display(),
                        e
                    );
                    ServiceRegistry::builtin()
                }
            },
            None => ServiceRegistry::builtin(),
        };
        AddrResolver::new(self.network, services)
    }
}
