//! Server configuration.
//!
//! The engine itself takes no configuration beyond its compiled-in table
//! constants; the server only needs a bind address and the directory the
//! static lobby assets are served from. The single supported environment
//! variable is an optional `PORT`.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Validated server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Socket the HTTP/WebSocket listener binds to.
    pub bind: SocketAddr,
    /// Directory holding the static lobby assets.
    pub assets_dir: PathBuf,
}

impl ServerConfig {
    /// Build the configuration from CLI overrides with a `PORT`
    /// environment fallback for the bind address.
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        assets_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => match std::env::var("PORT") {
                Ok(raw) => {
                    let port: u16 = raw.parse().map_err(|_| ConfigError::Invalid {
                        var: "PORT".to_string(),
                        reason: format!("{raw:?} is not a port number"),
                    })?;
                    SocketAddr::from(([127, 0, 0, 1], port))
                }
                Err(_) => SocketAddr::from(([127, 0, 0, 1], 8080)),
            },
        };

        let assets_dir = assets_override.unwrap_or_else(|| PathBuf::from("assets"));

        Ok(Self { bind, assets_dir })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assets_dir.exists() && !self.assets_dir.is_dir() {
            return Err(ConfigError::Invalid {
                var: "--assets".to_string(),
                reason: format!("{} is not a directory", self.assets_dir.display()),
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_override_wins() {
        let bind: SocketAddr = "0.0.0.0:9000".parse().unwrap();
        let config = ServerConfig::from_env(Some(bind), None).unwrap();
        assert_eq!(config.bind, bind);
    }

    #[test]
    fn test_defaults() {
        // Scoped to overrides so a PORT in the ambient environment does
        // not leak in.
        let config =
            ServerConfig::from_env(Some("127.0.0.1:8080".parse().unwrap()), None).unwrap();
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_file_as_assets_dir() {
        let file = std::env::temp_dir().join("sp_server_assets_probe");
        std::fs::write(&file, b"x").unwrap();
        let config = ServerConfig::from_env(
            Some("127.0.0.1:8080".parse().unwrap()),
            Some(file.clone()),
        )
        .unwrap();
        assert!(config.validate().is_err());
        let _ = std::fs::remove_file(file);
    }
}
