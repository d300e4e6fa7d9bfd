//! Configuration management for Submission Box

use std::env;
use std::path::PathBuf;

/// Maximum accepted request body: 16 MiB
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub uploads: UploadConfig,
    pub secret_key: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Base directory for `<date>/<student id>/<file>` trees
    pub root: PathBuf,
    /// Append-only submission log
    pub log_path: PathBuf,
    pub max_content_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 80,
            },
            uploads: UploadConfig {
                root: PathBuf::from("./uploads"),
                log_path: PathBuf::from("./submission.log"),
                max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            },
            secret_key: random_secret(),
        }
    }
}

/// Per-process key: flash cookies do not survive a restart.
fn random_secret() -> String {
    format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple())
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Only `SECRET_KEY` is
    /// required; without it a random key is used and the rest of the
    /// settings are still honored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secret_key = lookup("SECRET_KEY").unwrap_or_else(|| {
            tracing::warn!("SECRET_KEY not set, using a random key; flash messages will not survive a restart");
            random_secret()
        });

        Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: lookup("SERVER_PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(80),
            },
            uploads: UploadConfig {
                root: lookup("UPLOAD_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("./uploads")),
                log_path: lookup("SUBMISSION_LOG")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("./submission.log")),
                max_content_length: lookup("MAX_CONTENT_LENGTH")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_CONTENT_LENGTH),
            },
            secret_key,
        }
    }

    /// Configuration rooted in a scratch directory, used by tests.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Config {
            uploads: UploadConfig {
                log_path: root.join("submission.log"),
                root: root.join("uploads"),
                max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            },
            secret_key: "test-secret-key".to_string(),
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_limits() {
        let config = Config::default();
        assert_eq!(config.uploads.max_content_length, 16 * 1024 * 1024);
        assert_eq!(config.server.port, 80);
        assert_eq!(config.secret_key.len(), 64);
    }

    #[test]
    fn test_default_secret_is_random() {
        assert_ne!(Config::default().secret_key, Config::default().secret_key);
    }

    #[test]
    fn test_for_root() {
        let config = Config::for_root("/tmp/box");
        assert_eq!(config.uploads.root, PathBuf::from("/tmp/box/uploads"));
        assert_eq!(config.uploads.log_path, PathBuf::from("/tmp/box/submission.log"));
    }

    #[test]
    fn test_missing_secret_keeps_other_settings() {
        let config = Config::from_lookup(lookup(&[
            ("UPLOAD_ROOT", "/srv/submissions"),
            ("SUBMISSION_LOG", "/var/log/submissions.log"),
            ("SERVER_PORT", "8080"),
            ("MAX_CONTENT_LENGTH", "1048576"),
        ]));
        assert_eq!(config.uploads.root, PathBuf::from("/srv/submissions"));
        assert_eq!(config.uploads.log_path, PathBuf::from("/var/log/submissions.log"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.uploads.max_content_length, 1024 * 1024);
        assert_eq!(config.secret_key.len(), 64);
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            ("SECRET_KEY", "s3cret"),
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "not-a-port"),
        ]));
        assert_eq!(config.secret_key, "s3cret");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 80);
        assert_eq!(config.uploads.root, PathBuf::from("./uploads"));
    }
}
