// src/config.rs
use anyhow::{Context, Result};
use log::{info, warn};
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_PRODUCTS_URL: &str = "https://labdados.com/produtos";
const DEFAULT_PORT: u16 = 3030;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub products_url: String,
    /// Keep the last fetched dataset until the fetch parameters change.
    pub dataset_cache: bool,
}

impl AppConfig {
    /// Reads `PORT`, `PRODUCTS_URL` and `DATASET_CACHE`, after loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got {:?}", raw))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let products_url = lookup("PRODUCTS_URL").unwrap_or_else(|| DEFAULT_PRODUCTS_URL.to_string());

        let dataset_cache = match lookup("DATASET_CACHE") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("DATASET_CACHE must be true or false, got {:?}", raw))?,
            None => true,
        };

        info!(
            "Config: port={}, products_url={}, dataset_cache={}",
            port, products_url, dataset_cache
        );

        Ok(AppConfig {
            port,
            products_url,
            dataset_cache,
        })
    }

    /// Bind to 0.0.0.0 so the server is reachable inside containers.
    pub fn socket_addr(&self) -> SocketAddr {
        ([0, 0, 0, 0], self.port).into()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
