//! Configuration management for Polizas Server

use serde::Deserialize;
use std::env;

use crate::batch::{
    DEFAULT_MAX_BATCH_FILES, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SESSION_EXPIRY_MINUTES,
};
use crate::matcher::DEFAULT_PATTERN;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Regex source used to find the policy number in extracted text
    pub pattern: String,
    /// Maximum number of files accepted per batch
    pub max_files: usize,
    /// Maximum multipart request size in bytes
    pub max_upload_bytes: usize,
    /// Minutes before an unretrieved batch session is swept
    pub session_expiry_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            batch: BatchConfig {
                pattern: DEFAULT_PATTERN.to_string(),
                max_files: DEFAULT_MAX_BATCH_FILES,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
                session_expiry_minutes: DEFAULT_SESSION_EXPIRY_MINUTES,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
            },
            batch: BatchConfig {
                pattern: env::var("POLIZA_PATTERN").unwrap_or_else(|_| DEFAULT_PATTERN.to_string()),
                max_files: env::var("MAX_BATCH_FILES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_BATCH_FILES),
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
                session_expiry_minutes: env::var("SESSION_EXPIRY_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_SESSION_EXPIRY_MINUTES),
            },
        }
    }
}
