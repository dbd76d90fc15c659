//! Configuration management for debweb
//!
//! This module handles loading, validation, and management of
//! debweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

/// Environment variable that overrides `backend.base_url`
pub const BACKEND_URL_ENV: &str = "DEBWEB_BACKEND_URL";

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Remote record-keeping backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL every `/api/...` path is joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Business identity printed on PDF reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    #[serde(default = "default_business_name")]
    pub name: String,
    #[serde(default = "default_business_address")]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: default_business_name(),
            address: default_business_address(),
            phone: String::new(),
        }
    }
}

fn default_business_name() -> String {
    "Deb Telecom".to_string()
}

fn default_business_address() -> String {
    "Main Road, Bazar".to_string()
}

/// PDF rendering options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// TrueType font embedded in every report. Blank uses the builtin
    /// Helvetica, which only draws Latin text.
    #[serde(default)]
    pub font_path: String,
}

impl ReportConfig {
    pub fn font_file(&self) -> Option<PathBuf> {
        match self.font_path.trim() {
            "" => None,
            path => Some(PathBuf::from(path)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// `limit` sent to unpaginated endpoints (balance search, exports)
    #[serde(default = "default_export_limit")]
    pub export_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            export_limit: default_export_limit(),
        }
    }
}

fn default_export_limit() -> usize {
    10000
}

/// Initial date filter for list pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatePreset {
    /// No date filter
    #[default]
    All,
    /// Today only
    Today,
    /// Current month
    Month,
    /// Current year
    Year,
}

impl std::str::FromStr for DatePreset {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(DatePreset::All),
            "today" => Ok(DatePreset::Today),
            "month" => Ok(DatePreset::Month),
            "year" => Ok(DatePreset::Year),
            _ => Err(format!("Invalid date preset: {}", s)),
        }
    }
}

impl std::fmt::Display for DatePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatePreset::All => write!(f, "all"),
            DatePreset::Today => write!(f, "today"),
            DatePreset::Month => write!(f, "month"),
            DatePreset::Year => write!(f, "year"),
        }
    }
}

/// Form and page defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Staff member preselected in the "Entry By" field
    #[serde(default = "default_entry_by")]
    pub default_entry_by: String,
    /// Staff members offered in "Entry By" selectors and filters
    #[serde(default = "default_entry_by_options")]
    pub entry_by_options: Vec<String>,
    /// Initial date filter for the transaction list
    #[serde(default)]
    pub default_range: DatePreset,
    /// Initial date filter for the daily log
    #[serde(default = "default_log_range")]
    pub daily_log_range: DatePreset,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_entry_by: default_entry_by(),
            entry_by_options: default_entry_by_options(),
            default_range: DatePreset::All,
            daily_log_range: default_log_range(),
        }
    }
}

fn default_entry_by() -> String {
    "aditto".to_string()
}

fn default_entry_by_options() -> Vec<String> {
    vec!["aditto".to_string(), "deb".to_string(), "staff".to_string()]
}

fn default_log_range() -> DatePreset {
    DatePreset::Today
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Symbol shown in tables
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,
    /// Symbol written into PDF reports (builtin PDF fonts lack "৳")
    #[serde(default = "default_report_symbol")]
    pub report_symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_currency_symbol(),
            report_symbol: default_report_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
        }
    }
}

fn default_currency_symbol() -> String {
    "৳".to_string()
}

fn default_report_symbol() -> String {
    "Tk".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Backend settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Report header settings
    #[serde(default)]
    pub business: BusinessConfig,
    /// PDF rendering settings
    #[serde(default)]
    pub report: ReportConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Form and page defaults
    #[serde(default)]
    pub ui: UiConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            },
            _ => ConfigError::IoError,
        })?;

        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from YAML text without validating it
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|_| ConfigError::InvalidYaml)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                self.backend.base_url = url.trim().to_string();
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        let url = self.backend.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "backend.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        if self.pagination.export_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.export_limit".to_string(),
                reason: "Export limit must be greater than 0".to_string(),
            });
        }

        if let Some(font) = self.report.font_file() {
            if !font.is_file() {
                return Err(ConfigError::InvalidValue {
                    field: "report.font_path".to_string(),
                    reason: format!("Font file {} does not exist", font.display()),
                });
            }
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if !self.ui.entry_by_options.iter().any(|o| o == &self.ui.default_entry_by) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "ui.default_entry_by '{}' is not listed in ui.entry_by_options",
                    self.ui.default_entry_by
                ),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Backend base URL without a trailing slash
    pub fn backend_base(&self) -> &str {
        self.backend.base_url.trim_end_matches('/')
    }

    /// Address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigErrorCode;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ui.default_entry_by, "aditto");
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.ui.daily_log_range, DatePreset::Today);
    }

    #[test]
    fn test_bundled_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.business.name, "Deb Telecom");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("backend:\n  base_url: https://api.example.com/\n").unwrap();
        assert_eq!(config.backend_base(), "https://api.example.com");
        assert_eq!(config.pagination.export_limit, 10000);
        assert_eq!(config.backend.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [unterminated").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidYaml);
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let mut config = Config::default();
        config.backend.base_url = "localhost:5000".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidValue);
        assert!(err.to_string().contains("backend.base_url"));
    }

    #[test]
    fn test_rejects_zero_export_limit() {
        let mut config = Config::default();
        config.pagination.export_limit = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pagination.export_limit"));
    }

    #[test]
    fn test_page_size_key_is_not_configurable() {
        assert!(!Config::generate_default().contains("records_per_page"));
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(!yaml.contains("records_per_page"));
    }

    #[test]
    fn test_report_font_must_exist() {
        let mut config = Config::default();
        assert!(config.report.font_file().is_none());
        config.report.font_path = "/nonexistent/NotoSansBengali.ttf".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("report.font_path"));

        let config = Config::from_yaml("report:\n  font_path: \"  \"\n").unwrap();
        assert!(config.report.font_file().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_default_entry_by() {
        let mut config = Config::default();
        config.ui.default_entry_by = "nobody".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::ValidationError);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(PathBuf::from("/nonexistent/debweb.yaml")).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::FileNotFound);
    }

    #[test]
    fn test_date_preset_parse() {
        assert_eq!("Today".parse::<DatePreset>().unwrap(), DatePreset::Today);
        assert_eq!(DatePreset::Month.to_string(), "month");
        assert!("week".parse::<DatePreset>().is_err());
    }
}
