use brk_core::error::AppError;
use brk_core::settings::DashboardSettings;
use brk_report::source::http::DEFAULT_TIMEOUT_MS;
use serde::Deserialize;

/// Host configuration.
///
/// Sources, later ones winning:
/// 1. `config/default` (optional)
/// 2. `config/local` (optional)
/// 3. Environment variables with the `BREAKBOARD__` prefix, e.g. `BREAKBOARD__DASHBOARD__PAGE_SIZE`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `pretty`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Remote report service. Reports are computed locally from demo data when unset.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_report_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_report_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: default_report_timeout_ms(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("BREAKBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Build from inline TOML plus `key = value` overrides, without touching the filesystem or
    /// the environment.
    pub fn load_from_str(toml: &str, overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.dashboard.validate()?;
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(AppError::new(
                "CONFIG_LOG_FORMAT_INVALID",
                "logging.format must be json or pretty",
            )
            .with_details(format!("format={}", self.logging.format)));
        }
        if self.report.timeout_ms == 0 {
            return Err(AppError::new(
                "CONFIG_REPORT_TIMEOUT_INVALID",
                "report.timeout_ms must be at least 1",
            ));
        }
        Ok(())
    }
}
