//! Command-line and environment configuration.

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// DİLMER student-records backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "dilmer-server")]
#[command(version, about, long_about = None)]
pub struct ServerArgs {
    /// SQLite database URL or file path
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://dilmer.sqlite3")]
    pub database_url: String,

    /// Address to bind
    #[arg(long, env = "DILMER_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Hide raw store errors from the teacher dashboard
    #[arg(
        long,
        env = "DILMER_REDACT_STORE_ERRORS",
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new(),
        default_value_t = false,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub redact_store_errors: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid database url: {raw:?}")]
    InvalidDbUrl { raw: String },

    #[error("unsupported database url {raw:?}: only sqlite is supported")]
    UnsupportedDatabase { raw: String },

    #[error("failed to prepare database file: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerArgs {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Normalize the database URL and make sure an on-disk database file exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for empty or non-sqlite URLs, or if the file cannot
    /// be created.
    pub fn prepared_database_url(&self) -> Result<String, ConfigError> {
        let url = normalize_sqlite_url(&self.database_url)?;
        prepare_sqlite_file(&url)?;
        Ok(url)
    }
}

fn is_memory_url(url: &str) -> bool {
    url == "sqlite::memory:" || url.contains("mode=memory")
}

/// Turn `sqlite:relative.db`, bare paths and `sqlite://` URLs into an absolute
/// `sqlite://` URL. In-memory URLs pass through untouched.
pub fn normalize_sqlite_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: raw.to_string(),
        });
    }
    if is_memory_url(trimmed) || trimmed.starts_with("sqlite://") {
        return Ok(trimmed.to_string());
    }
    if trimmed.contains("://") {
        return Err(ConfigError::UnsupportedDatabase {
            raw: raw.to_string(),
        });
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    if path_str.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: raw.to_string(),
        });
    }
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    Ok(format!("sqlite://{}", absolute.display()))
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), ConfigError> {
    if is_memory_url(db_url) {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        });
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
