//! Service configuration

use std::env;

/// Default upload size ceiling: 10 MiB
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Path of the SQLite database file backing the document store
    pub database_path: String,

    /// Shared secret gating admin registration and admin-only review access
    pub admin_secret: String,

    /// Directory uploaded assets are stored in (and served from)
    pub upload_dir: String,

    /// Upload size ceiling in bytes
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    /// suitable for local development.
    pub fn from_env() -> Self {
        Self {
            port: env_or("PORT", 5000),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "dlcms.db".to_string()),
            admin_secret: env::var("ADMIN_SECRET")
                .unwrap_or_else(|_| "dlcms-admin-2026".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            database_path: "dlcms.db".to_string(),
            admin_secret: "dlcms-admin-2026".to_string(),
            upload_dir: "uploads".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %value, "ignoring unparseable environment variable");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_path, "dlcms.db");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }
}
