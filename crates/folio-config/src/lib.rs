//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `vault.source_dir`
//! - `cors.origins`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override vault source directory.
    pub source_dir: Option<PathBuf>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Vault configuration (paths are relative strings from TOML).
    vault: VaultConfigRaw,
    /// Snapshot cache configuration.
    pub cache: CacheConfig,
    /// Cross-origin configuration.
    pub cors: CorsConfig,
    /// Root detection overrides.
    pub roots: RootsConfig,

    /// Resolved vault configuration (set after loading).
    #[serde(skip)]
    pub vault_resolved: VaultConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
        }
    }
}

/// Raw vault configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct VaultConfigRaw {
    source_dir: Option<String>,
    exclude: Option<Vec<String>>,
}

/// Resolved vault configuration with absolute paths.
#[derive(Debug, Default)]
pub struct VaultConfig {
    /// Root directory of the markdown vault.
    pub source_dir: PathBuf,
    /// Path fragments to exclude from scanning (`None` uses storage defaults).
    pub exclude: Option<Vec<String>>,
}

/// Snapshot cache configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether parsed notes are cached between requests.
    pub enabled: bool,
    /// Time-to-live of a cached snapshot in seconds.
    pub ttl_secs: u64,
}

impl CacheConfig {
    /// Snapshot time-to-live, or `None` when caching is disabled.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.enabled.then(|| Duration::from_secs(self.ttl_secs))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 300,
        }
    }
}

/// Cross-origin resource sharing configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins (`*` allows any origin).
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: vec!["http://localhost:3000".to_owned()],
        }
    }
}

/// Root detection overrides.
///
/// Unset fields keep the built-in heuristic defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RootsConfig {
    /// Substring a root's file name must contain.
    pub marker: Option<String>,
    /// Parent folder names that never hold roots.
    pub excluded_dirs: Option<Vec<String>>,
    /// Minimum number of distinct links for a short index page.
    pub min_links: Option<usize>,
    /// Body length (in characters) below which a page counts as short.
    pub max_body_chars: Option<usize>,
    /// File name prefixes that always mark a root.
    pub prefixes: Option<Vec<String>>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`vault.source_dir`").
        field: String,
        /// Error message (e.g., "${`VAULT_PATH`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require an origin to be `*` or use http:// or https:// scheme.
fn require_origin(origin: &str, field: &str) -> Result<(), ConfigError> {
    if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} entries must be \"*\" or start with http:// or https:// (got \"{origin}\")"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.vault_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache.enabled = cache_enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            vault: VaultConfigRaw::default(),
            cache: CacheConfig::default(),
            cors: CorsConfig::default(),
            roots: RootsConfig::default(),
            vault_resolved: VaultConfig {
                source_dir: base.join("vault"),
                exclude: None,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_cache()?;
        self.validate_cors()?;
        self.validate_roots()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 lets the OS pick, which is never what a config file means
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_cache(&self) -> Result<(), ConfigError> {
        if self.cache.enabled && self.cache.ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "cache.ttl_secs must be greater than 0 when caching is enabled".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_cors(&self) -> Result<(), ConfigError> {
        for origin in &self.cors.origins {
            require_non_empty(origin, "cors.origins")?;
            require_origin(origin, "cors.origins")?;
        }
        Ok(())
    }

    fn validate_roots(&self) -> Result<(), ConfigError> {
        if let Some(marker) = &self.roots.marker {
            require_non_empty(marker, "roots.marker")?;
        }
        if self.roots.max_body_chars == Some(0) {
            return Err(ConfigError::Validation(
                "roots.max_body_chars must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref source_dir) = self.vault.source_dir {
            self.vault.source_dir = Some(expand::expand_env(source_dir, "vault.source_dir")?);
        }

        self.cors.origins = self
            .cors
            .origins
            .iter()
            .map(|origin| expand::expand_env(origin, "cors.origins"))
            .collect::<Result<_, _>>()?;

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.vault_resolved = VaultConfig {
            source_dir: config_dir.join(self.vault.source_dir.as_deref().unwrap_or("vault")),
            exclude: self.vault.exclude.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.vault_resolved.source_dir, PathBuf::from("/test/vault"));
        assert!(config.vault_resolved.exclude.is_none());
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl(), Some(Duration::from_secs(300)));
        assert_eq!(config.cors.origins, vec!["http://localhost:3000".to_owned()]);
        assert!(config.roots.marker.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000

[vault]
source_dir = "notes"
exclude = ["drafts", ".obsidian"]

[cache]
enabled = false
ttl_secs = 60

[cors]
origins = ["https://example.com"]

[roots]
marker = "index"
min_links = 3
max_body_chars = 1500
prefixes = ["index "]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.vault_resolved.source_dir, PathBuf::from("/project/notes"));
        assert_eq!(
            config.vault_resolved.exclude,
            Some(vec!["drafts".to_owned(), ".obsidian".to_owned()])
        );
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl(), None);
        assert_eq!(config.cors.origins, vec!["https://example.com".to_owned()]);
        assert_eq!(config.roots.marker.as_deref(), Some("index"));
        assert_eq!(config.roots.min_links, Some(3));
        assert_eq!(config.roots.max_body_chars, Some(1500));
        assert!(config.roots.excluded_dirs.is_none());
    }

    #[test]
    fn test_resolve_paths_default_source_dir() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.vault_resolved.source_dir, PathBuf::from("/project/vault"));
    }

    #[test]
    fn test_resolve_paths_keeps_absolute_source_dir() {
        let toml = r#"
[vault]
source_dir = "/srv/vault"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.vault_resolved.source_dir, PathBuf::from("/srv/vault"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nport = 8123\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 8123);
        assert_eq!(config.vault_resolved.source_dir, dir.path().join("vault"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/folio.toml")), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nport = 0\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_applies_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nport = 8123\n").unwrap();
        let settings = CliSettings {
            port: Some(9999),
            cache_enabled: Some(false),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.server.port, 9999);
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            source_dir: Some(PathBuf::from("/custom/vault")),
            cache_enabled: None,
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.vault_resolved.source_dir,
            PathBuf::from("/custom/vault")
        );
        assert!(config.cache.enabled); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.vault_resolved.source_dir, PathBuf::from("/test/vault"));
    }

    #[test]
    fn test_expand_env_vars_source_dir_and_origins() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("FOLIO_TEST_VAULT", "/data/vault");
            std::env::set_var("FOLIO_TEST_ORIGIN", "https://folio.example.com");
        }

        let toml = r#"
[vault]
source_dir = "${FOLIO_TEST_VAULT}"

[cors]
origins = ["${FOLIO_TEST_ORIGIN}", "http://localhost:3000"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.vault_resolved.source_dir, PathBuf::from("/data/vault"));
        assert_eq!(
            config.cors.origins,
            vec![
                "https://folio.example.com".to_owned(),
                "http://localhost:3000".to_owned()
            ]
        );

        unsafe {
            std::env::remove_var("FOLIO_TEST_VAULT");
            std::env::remove_var("FOLIO_TEST_ORIGIN");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FOLIO_MISSING_HOST_TEST");
        }

        let toml = r#"
[server]
host = "${FOLIO_MISSING_HOST_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("server.host"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn test_validate_cache_ttl_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.cache.ttl_secs = 0;
        assert_validation_error(&config, &["cache.ttl_secs"]);
    }

    #[test]
    fn test_validate_cache_ttl_zero_allowed_when_disabled() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.cache.enabled = false;
        config.cache.ttl_secs = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_cors_origin_invalid_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.cors.origins = vec!["ftp://example.com".to_owned()];
        assert_validation_error(&config, &["cors.origins", "http"]);
    }

    #[test]
    fn test_validate_cors_wildcard_allowed() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.cors.origins = vec!["*".to_owned()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_roots_max_body_chars_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.roots.max_body_chars = Some(0);
        assert_validation_error(&config, &["roots.max_body_chars"]);
    }

    #[test]
    fn test_validate_roots_empty_marker() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.roots.marker = Some(String::new());
        assert_validation_error(&config, &["roots.marker", "empty"]);
    }
}
