//! # Configuration
//!
//! Each process reads its settings from environment variables (a `.env` file is loaded
//! first by the binaries). Parsing lives in small pure functions so it can be tested
//! without touching the process environment.

use crate::gateway::routes::Route;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PUBLIC_PATHS: &str = "/actuator/health";
pub const DEFAULT_ROUTES: &str = "/products/**=products-catalog,/orders/**=order-simulator";
pub const DEFAULT_REGISTRY: &str =
    "products-catalog=http://127.0.0.1:8081,order-simulator=http://127.0.0.1:8082";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CATALOG_SERVICE: &str = "products-catalog";
pub const DEFAULT_EVENT_EXCHANGE: &str = "order.events";
pub const DEFAULT_EVENT_ROUTING_KEY: &str = "order.created";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Settings of the `api-gateway` process.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub auth_token: String,
    pub public_paths: Vec<String>,
    pub routes: Vec<Route>,
    pub registry: Vec<(String, Vec<String>)>,
    pub upstream_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let auth_token = env::var("AUTH_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::Missing("AUTH_TOKEN"))?;

        Ok(Self {
            bind_addr: parse_addr("GATEWAY_BIND_ADDR", &var_or("GATEWAY_BIND_ADDR", "0.0.0.0:8080"))?,
            auth_token,
            public_paths: parse_list(&var_or("PUBLIC_PATHS", DEFAULT_PUBLIC_PATHS)),
            routes: parse_routes(&var_or("GATEWAY_ROUTES", DEFAULT_ROUTES))?,
            registry: parse_registry(&var_or("SERVICE_REGISTRY", DEFAULT_REGISTRY))?,
            upstream_timeout: timeout_from_env()?,
        })
    }
}

/// Settings of the `order-simulator` process.
#[derive(Debug, Clone)]
pub struct OrderServiceConfig {
    pub bind_addr: SocketAddr,
    pub registry: Vec<(String, Vec<String>)>,
    pub catalog_service: String,
    pub upstream_timeout: Duration,
    pub event_exchange: String,
    pub event_routing_key: String,
    /// Only honoured with the `kafka` feature.
    pub kafka_brokers: Option<String>,
}

impl OrderServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: parse_addr("ORDER_BIND_ADDR", &var_or("ORDER_BIND_ADDR", "0.0.0.0:8082"))?,
            registry: parse_registry(&var_or("SERVICE_REGISTRY", DEFAULT_REGISTRY))?,
            catalog_service: var_or("CATALOG_SERVICE", DEFAULT_CATALOG_SERVICE),
            upstream_timeout: timeout_from_env()?,
            event_exchange: var_or("EVENT_EXCHANGE", DEFAULT_EVENT_EXCHANGE),
            event_routing_key: var_or("EVENT_ROUTING_KEY", DEFAULT_EVENT_ROUTING_KEY),
            kafka_brokers: env::var("KAFKA_BROKERS").ok().filter(|b| !b.is_empty()),
        })
    }
}

/// Settings of the `product-catalog` process.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub bind_addr: SocketAddr,
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: parse_addr("CATALOG_BIND_ADDR", &var_or("CATALOG_BIND_ADDR", "0.0.0.0:8081"))?,
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn timeout_from_env() -> Result<Duration, ConfigError> {
    let raw = var_or("UPSTREAM_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string());
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::Invalid {
            name: "UPSTREAM_TIMEOUT_SECS",
            reason: e.to_string(),
        })
}

pub fn parse_addr(name: &'static str, raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim().parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

/// Comma separated, blanks dropped.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `pattern=service` pairs, comma separated. Order is kept.
pub fn parse_routes(raw: &str) -> Result<Vec<Route>, ConfigError> {
    parse_list(raw)
        .into_iter()
        .map(|entry| match entry.split_once('=') {
            Some((pattern, service)) if !pattern.trim().is_empty() && !service.trim().is_empty() => {
                Ok(Route::new(pattern.trim(), service.trim()))
            }
            _ => Err(ConfigError::Invalid {
                name: "GATEWAY_ROUTES",
                reason: format!("expected pattern=service, got {entry:?}"),
            }),
        })
        .collect()
}

/// `service=url|url` pairs, comma separated.
pub fn parse_registry(raw: &str) -> Result<Vec<(String, Vec<String>)>, ConfigError> {
    parse_list(raw)
        .into_iter()
        .map(|entry| {
            let invalid = || ConfigError::Invalid {
                name: "SERVICE_REGISTRY",
                reason: format!("expected service=url[|url...], got {entry:?}"),
            };
            let (service, urls) = entry.split_once('=').ok_or_else(invalid)?;
            let urls: Vec<String> = urls
                .split('|')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string)
                .collect();
            if service.trim().is_empty() || urls.is_empty() {
                return Err(invalid());
            }
            Ok((service.trim().to_string(), urls))
        })
        .collect()
}
