// src/config.rs
// key = value configuration files for the operator client and the stub server.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{ClientError, Result};
use crate::logging::{log_info, log_warning};

pub const DEFAULT_API_URL: &str = "https://corebingoapi.onrender.com";
pub const CLIENT_CONFIG_PATH: &str = "conf/client.conf";
pub const SERVER_CONFIG_PATH: &str = "conf/server.conf";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub balance: f64,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: u64,
    pub shop_id: Option<String>,
    pub catalog: Option<String>,
    pub catalog_seed: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            balance: 100_000.0,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: 30,
            shop_id: None,
            catalog: None,
            catalog_seed: 2024,
        }
    }
}

impl ClientConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| ClientError::FileRead { path: path.to_path_buf(), source })?;
        Self::from_map(&parse_config(&content))
    }

    fn from_map(config_map: &HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();

        let api_url = config_map.get("api_url").cloned().unwrap_or(defaults.api_url);
        let timeout = parse_value(config_map, "timeout")?.unwrap_or(defaults.timeout);
        let shop_id = config_map.get("shop_id").filter(|v| !v.is_empty()).cloned();
        let catalog = config_map.get("catalog").filter(|v| !v.is_empty()).cloned();
        let catalog_seed = parse_value(config_map, "catalog_seed")?.unwrap_or(defaults.catalog_seed);

        Ok(ClientConfig { api_url, timeout, shop_id, catalog, catalog_seed })
    }

    pub fn load_or_default() -> Self {
        Self::load_from_or_default(CLIENT_CONFIG_PATH)
    }

    pub fn load_from_or_default<P: AsRef<Path>>(config_path: P) -> Self {
        let config_path = config_path.as_ref();
        match Self::from_file(config_path) {
            Ok(config) => {
                log_info(&format!("Loaded client configuration from {}", config_path.display()));
                config
            }
            Err(e) => {
                log_warning(&format!("Could not load client config: {e}. Using defaults."));
                Self::default()
            }
        }
    }
}

impl ServerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| ClientError::FileRead { path: path.to_path_buf(), source })?;
        let config_map = parse_config(&content);
        let defaults = Self::default();

        let host = config_map.get("host").cloned().unwrap_or(defaults.host);
        let port = parse_value(&config_map, "port")?.unwrap_or(defaults.port);
        let balance = parse_value(&config_map, "balance")?.unwrap_or(defaults.balance);

        Ok(ServerConfig { host, port, balance })
    }

    pub fn load_or_default() -> Self {
        match Self::from_file(SERVER_CONFIG_PATH) {
            Ok(config) => {
                log_info(&format!("Loaded configuration from {SERVER_CONFIG_PATH}"));
                config
            }
            Err(e) => {
                log_warning(&format!("Could not load server config: {e}. Using defaults."));
                Self::default()
            }
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(config_map: &HashMap<String, String>, key: &'static str) -> Result<Option<T>> {
    match config_map.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ClientError::InvalidSetting { key, value: raw.clone() }),
    }
}

fn parse_config(content: &str) -> HashMap<String, String> {
    let mut config = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            config.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    config
}
