//! NoteChat configuration management
//!
//! Configuration is read from a TOML file (every section optional) and then
//! overridden from the environment:
//!
//! | Variable                | Field                   |
//! |-------------------------|-------------------------|
//! | `ADMIN_PASSWORD`        | `auth.admin_password`   |
//! | `GEMINI_API_KEY`        | `upstream.api_key`      |
//! | `NOTECHAT_NOTES_FILE`   | `storage.notes_file`    |
//! | `NOTECHAT_TOKEN_SECRET` | `auth.token_secret`     |

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main NoteChat configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteChatConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Admin authentication configuration
    pub auth: AuthConfig,

    /// Upstream generation API configuration
    pub upstream: UpstreamConfig,

    /// Storage configuration
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any origin)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
        }
    }
}

/// Longest accepted bearer token lifetime (one year)
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Admin authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared admin password
    pub admin_password: String,

    /// Bearer token lifetime in seconds
    pub token_ttl_secs: u64,

    /// Token signing secret. When unset a random key is generated at startup
    /// and tokens do not survive a restart.
    pub token_secret: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_password: "admin123".to_string(),
            token_ttl_secs: 12 * 60 * 60,
            token_secret: None,
        }
    }
}

/// Upstream generation API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// API base URL (scheme + host, no trailing path)
    pub base_url: String,

    /// Model name used in the `generateContent` path
    pub model: String,

    /// API key; chat fails with a configuration error while unset
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the note list
    pub notes_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            notes_file: default_base_dir().join("notes.json"),
        }
    }
}

/// Base directory for NoteChat state (~/.notechat/)
pub fn default_base_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".notechat")
}

/// Default config file location (~/.notechat/config.toml)
pub fn default_config_path() -> PathBuf {
    default_base_dir().join("config.toml")
}

impl NoteChatConfig {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration: explicit path, else the default path when it
    /// exists, else defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            self.auth.admin_password = password;
        }
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.is_empty()) {
            self.upstream.api_key = Some(key);
        }
        if let Some(file) = lookup("NOTECHAT_NOTES_FILE").filter(|f| !f.is_empty()) {
            self.storage.notes_file = PathBuf::from(file);
        }
        if let Some(secret) = lookup("NOTECHAT_TOKEN_SECRET").filter(|s| !s.is_empty()) {
            self.auth.token_secret = Some(secret);
        }
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.auth.admin_password.is_empty() {
            return Err(Error::Config("auth.admin_password must not be empty".to_string()));
        }
        if self.server.port == 0 {
            return Err(Error::Config("server.port must be non-zero".to_string()));
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(Error::Config("auth.token_ttl_secs must be non-zero".to_string()));
        }
        if self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(Error::Config(format!(
                "auth.token_ttl_secs must be at most {}",
                MAX_TOKEN_TTL_SECS
            )));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(Error::Config("upstream.timeout_secs must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Whether an upstream API key is present
    pub fn upstream_configured(&self) -> bool {
        self.upstream.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Copy of this config with secrets masked, for display
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        config.auth.admin_password = mask_secret(&config.auth.admin_password);
        config.auth.token_secret = config.auth.token_secret.as_deref().map(mask_secret);
        config.upstream.api_key = config.upstream.api_key.as_deref().map(mask_secret);
        config
    }
}

/// Mask a secret for display: show first 8 + last 4 chars
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = NoteChatConfig::default();
        assert_eq!(config.auth.admin_password, "admin123");
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(config.server.port, 5000);
        assert!(!config.upstream_configured());
        assert!(config.storage.notes_file.ends_with("notes.json"));
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = NoteChatConfig::from_toml(
            r#"
            [server]
            port = 8080

            [upstream]
            model = "gemini-2.0-flash-lite"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.upstream.model, "gemini-2.0-flash-lite");
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(config.auth.admin_password, "admin123");
    }

    #[test]
    fn test_invalid_toml() {
        let result = NoteChatConfig::from_toml("[server\nport = ");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("ADMIN_PASSWORD", "hunter2"),
            ("GEMINI_API_KEY", "AIza-test-key"),
            ("NOTECHAT_NOTES_FILE", "/tmp/notes.json"),
        ]
        .into_iter()
        .collect();

        let mut config = NoteChatConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.auth.admin_password, "hunter2");
        assert_eq!(config.upstream.api_key.as_deref(), Some("AIza-test-key"));
        assert_eq!(config.storage.notes_file, PathBuf::from("/tmp/notes.json"));
        assert!(config.upstream_configured());
        assert!(config.auth.token_secret.is_none());
    }

    #[test]
    fn test_empty_api_key_env_ignored() {
        let mut config = NoteChatConfig::default();
        config.apply_env(|k| (k == "GEMINI_API_KEY").then(String::new));
        assert!(!config.upstream_configured());
    }

    #[test]
    fn test_validate_rejects_empty_password() {
        let mut config = NoteChatConfig::default();
        config.auth.admin_password.clear();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_bounds_token_ttl() {
        let mut config = NoteChatConfig::default();
        config.auth.token_ttl_secs = MAX_TOKEN_TTL_SECS;
        assert!(config.validate().is_ok());

        for ttl in [0, MAX_TOKEN_TTL_SECS + 1, i64::MAX as u64, u64::MAX] {
            config.auth.token_ttl_secs = ttl;
            assert!(matches!(config.validate(), Err(Error::Config(_))), "ttl {}", ttl);
        }
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = NoteChatConfig::default();
        config.upstream.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[auth]\nadmin_password = \"s3cret\"\n").unwrap();

        let config = NoteChatConfig::from_file(&path).unwrap();
        assert_eq!(config.auth.admin_password, "s3cret");
    }

    #[test]
    fn test_masked_hides_secrets() {
        let mut config = NoteChatConfig::default();
        config.upstream.api_key = Some("AIzaSyA-1234567890abcdef".to_string());

        let masked = config.masked();
        assert_eq!(masked.auth.admin_password, "****");
        assert_eq!(masked.upstream.api_key.as_deref(), Some("AIzaSyA-****cdef"));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("exactly12ch"), "****");
        assert_eq!(mask_secret("1234567890abc"), "12345678****0abc");
        assert_eq!(mask_secret("ünïcödé-sécrèt-kéy"), "ünïcödé-****-kéy");
    }
}
