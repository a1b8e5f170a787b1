//! Command-line configuration for the server binary.
//!
//! Logging is configured separately through `RUST_LOG` (default `warn`).

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{AppError, Result};

/// Cloud export server - browse a folder tree and export files into it
#[derive(Parser, Debug)]
#[command(name = "dropbox-export")]
#[command(about = "Browse a cloud folder tree and export files into it", long_about = None)]
pub struct Cli {
    /// Directory served as the cloud root
    #[arg(value_name = "CLOUD_ROOT")]
    pub cloud_root: PathBuf,

    /// Local mirror used for duplicate-name checks [default: CLOUD_ROOT]
    #[arg(long, value_name = "DIR")]
    pub local_root: Option<PathBuf>,

    /// Port to run the server on
    #[arg(short, long, default_value = "3001")]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Start with no linked cloud account
    #[arg(long)]
    pub unlinked: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub cloud_root: PathBuf,
    pub local_root: PathBuf,
    pub addr: SocketAddr,
    pub linked: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<ServerConfig> {
        if !self.cloud_root.is_dir() {
            return Err(AppError::InvalidPath(format!(
                "{} is not a directory",
                self.cloud_root.display()
            )));
        }

        let local_root = self.local_root.unwrap_or_else(|| self.cloud_root.clone());
        if !local_root.is_dir() {
            return Err(AppError::InvalidPath(format!(
                "{} is not a directory",
                local_root.display()
            )));
        }

        let addr = format!("{}:{}", self.host, self.port)
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Internal(format!("Invalid bind address {}: {}", self.host, e)))?;

        Ok(ServerConfig {
            cloud_root: self.cloud_root,
            local_root,
            addr,
            linked: !self.unlinked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let dir = tempdir().unwrap();
        let cli = Cli::parse_from(["dropbox-export", dir.path().to_str().unwrap()]);
        let config = cli.into_config().unwrap();

        assert_eq!(config.local_root, dir.path());
        assert_eq!(config.addr.port(), 3001);
        assert!(config.linked);
    }

    #[test]
    fn test_overrides() {
        let cloud = tempdir().unwrap();
        let local = tempdir().unwrap();
        let cli = Cli::parse_from([
            "dropbox-export",
            cloud.path().to_str().unwrap(),
            "--local-root",
            local.path().to_str().unwrap(),
            "--port",
            "8080",
            "--unlinked",
        ]);
        let config = cli.into_config().unwrap();

        assert_eq!(config.local_root, local.path());
        assert_eq!(config.addr.to_string(), "127.0.0.1:8080");
        assert!(!config.linked);
    }

    #[test]
    fn test_missing_root_rejected() {
        let cli = Cli::parse_from(["dropbox-export", "/definitely/not/here"]);
        assert!(matches!(cli.into_config(), Err(AppError::InvalidPath(_))));
    }

    #[test]
    fn test_bad_host_rejected() {
        let dir = tempdir().unwrap();
        let cli = Cli::parse_from([
            "dropbox-export",
            dir.path().to_str().unwrap(),
            "--host",
            "not a host",
        ]);
        assert!(cli.into_config().is_err());
    }
}
