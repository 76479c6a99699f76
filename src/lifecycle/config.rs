//! # Configuration
//!
//! Command-line flags with environment fallbacks, parsed by `clap`, then checked into
//! an [`AppConfig`]. A missing storage URI is fatal: the process must not start
//! serving without one.

use clap::Parser;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_HTTP_BIND: &str = "0.0.0.0:3000";
const DEFAULT_API_PREFIX: &str = "/api";
const DEFAULT_BUFFER_SIZE: usize = 32;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "address-book", about = "REST CRUD service for users and their addresses")]
pub struct CliArgs {
    #[arg(
        long,
        env = "STORAGE_URI",
        value_name = "URI",
        help = "Document store connection string, e.g. memory://address-book"
    )]
    pub storage_uri: Option<String>,

    #[arg(long = "bind", env = "HTTP_BIND", value_name = "ADDR", help = "HTTP listen address")]
    pub bind: Option<String>,

    #[arg(long, env = "API_PREFIX", value_name = "PATH", help = "Path prefix for resource routes")]
    pub api_prefix: Option<String>,

    #[arg(
        long,
        env = "ACTOR_BUFFER_SIZE",
        value_name = "N",
        help = "Channel capacity of each actor",
        value_parser = clap::value_parser!(usize)
    )]
    pub buffer_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("STORAGE_URI is not set; refusing to start without a storage connection string")]
    MissingStorageUri,

    #[error("Unsupported storage URI '{0}' (expected memory://<name>)")]
    UnsupportedStorage(String),

    #[error("Invalid bind address '{value}': {reason}")]
    InvalidBind { value: String, reason: String },

    #[error("Buffer size must be at least 1")]
    InvalidBufferSize,
}

/// Where documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageUri {
    /// Actor-backed in-memory collections, labelled with `name`.
    Memory { name: String },
}

impl FromStr for StorageUri {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once("://") {
            Some(("memory", name)) if !name.is_empty() => Ok(StorageUri::Memory {
                name: name.to_string(),
            }),
            _ => Err(ConfigError::UnsupportedStorage(s.to_string())),
        }
    }
}

impl std::fmt::Display for StorageUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageUri::Memory { name } => write!(f, "memory://{name}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageUri,
    pub bind: SocketAddr,
    pub api_prefix: String,
    pub buffer_size: usize,
}

impl AppConfig {
    /// A config for tests and embedding: in-memory storage, default everything else.
    pub fn in_memory(name: &str) -> Self {
        Self {
            storage: StorageUri::Memory {
                name: name.to_string(),
            },
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let CliArgs {
            storage_uri,
            bind,
            api_prefix,
            buffer_size,
        } = args;

        let storage: StorageUri = storage_uri
            .filter(|uri| !uri.trim().is_empty())
            .ok_or(ConfigError::MissingStorageUri)?
            .parse()?;

        let bind_value = bind.unwrap_or_else(|| DEFAULT_HTTP_BIND.to_string());
        let bind: SocketAddr =
            bind_value
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBind {
                    value: bind_value.clone(),
                    reason: e.to_string(),
                })?;

        let buffer_size = buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        if buffer_size == 0 {
            return Err(ConfigError::InvalidBufferSize);
        }

        let api_prefix = normalize_prefix(api_prefix.as_deref().unwrap_or(DEFAULT_API_PREFIX));

        Ok(Self {
            storage,
            bind,
            api_prefix,
            buffer_size,
        })
    }
}

/// `api/`, `/api/` and `/api` all become `/api`; an empty prefix stays empty.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
