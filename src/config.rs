//! Process configuration read from the environment. The binary seeds it from `.env` first.

use crate::error::ConfigError;
use std::net::IpAddr;

pub const DEFAULT_DATABASE: &str = "rastros_da_mata_db";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_LOG_FILTER: &str = "harvest_api=info,harvest_server=info,tower_http=info";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// MongoDB connection string (`MONGO_URI`).
    pub mongo_uri: String,
    /// Database holding the three collections (`MONGO_DATABASE`).
    pub database_name: String,
    /// Listen address (`BIND_HOST`).
    pub host: IpAddr,
    /// Listen port (`PORT`).
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let present = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());

        let mongo_uri = present("MONGO_URI").ok_or(ConfigError::Missing("MONGO_URI"))?;
        let port_raw = present("PORT").ok_or(ConfigError::Missing("PORT"))?;
        let port: u16 = port_raw
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                name: "PORT",
                value: port_raw.clone(),
                reason: e.to_string(),
            })?;
        if port == 0 {
            return Err(ConfigError::Invalid {
                name: "PORT",
                value: port_raw,
                reason: "port must be non-zero".into(),
            });
        }

        let host_raw = present("BIND_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let host: IpAddr = host_raw
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "BIND_HOST",
                value: host_raw.clone(),
                reason: e.to_string(),
            })?;

        Ok(Settings {
            mongo_uri,
            database_name: present("MONGO_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.into()),
            host,
            port,
        })
    }

    pub fn bind_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::new(self.host, self.port)
    }
}
