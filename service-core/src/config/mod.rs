use crate::error::AppError;
use config::{Config as Layers, Environment, File};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

/// HTTP listener settings shared by every service binary.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load from an optional `configuration.*` file, overridden by `APP__HOST` / `APP__PORT`.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let layers = Layers::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let config: Self = layers.try_deserialize()?;
        config.listen_addr()?;
        Ok(config)
    }

    /// Socket address the HTTP listener binds to. Port 0 asks the OS for a free port.
    pub fn listen_addr(&self) -> Result<SocketAddr, AppError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            AppError::ConfigError(anyhow::anyhow!(
                "APP__HOST must be an IP address, got '{}'",
                self.host
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
