//! Environment configuration.
//!
//! The terminal is configured entirely through environment variables with
//! development-friendly defaults. No config files, no framework.

use std::env;
use std::path::PathBuf;

/// Default backend for local development.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Base URL of the catalog/cash/sales backend (`POS_BACKEND_URL`).
pub fn backend_base_url() -> String {
    env::var("POS_BACKEND_URL")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
}

/// Directory for rolling log files (`POS_LOG_DIR`).
pub fn log_dir() -> PathBuf {
    env::var("POS_LOG_DIR")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logs"))
}
