use std::env;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat, Source};
use serde::Deserialize;

use crate::engine::EngineConfig;
use crate::report::{Currency, DisplayConversion, Locale, ReportOptions, DEFAULT_EXCHANGE_RATE};
use crate::scoring::ScoringConfig;

const DEFAULT_CONFIG: &str = include_str!("../config/config.yaml");

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogSettings {
    /// Directory holding one JSON document per category.
    pub data_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineSettings {
    pub min_spend_ratio: f64,
    pub min_spend_budget: f64,
    /// Upper bound on one build, solver included.
    pub solve_timeout_ms: u64,
    /// Granularity of the solver's price axis, in currency units.
    #[serde(default = "default_price_resolution")]
    pub price_resolution: f64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScoringSettings {
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    #[serde(default)]
    pub locale: Locale,
    /// Secondary currency shown next to USD prices; `null` disables it.
    #[serde(default)]
    pub display_currency: Option<Currency>,
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: f64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            locale: Locale::default(),
            display_currency: None,
            exchange_rate: default_exchange_rate(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub log_level: Option<String>,
    pub catalog: CatalogSettings,
    pub engine: EngineSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default, skip)]
    pub load_errors: Vec<LogMsg>,
}

impl Settings {
    pub fn new(custom_config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut load_errors = vec![];
        let config_exists = |path| File::with_name(path).collect().is_ok();

        // Check if custom config file exists, report error if not
        if let Some(ref path) = custom_config_path {
            if !config_exists(path) {
                load_errors.push(LogMsg::Error(format!(
                    "Config file via --config-path is not found: {path}"
                )));
            }
        }

        let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let config_path_env = format!("config/{env}");

        let mut config = Config::builder()
            // Start with compile-time base config
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Yaml))
            .add_source(File::with_name("config/config").required(false))
            .add_source(File::with_name(&config_path_env).required(false))
            // Local config, not tracked in git
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = custom_config_path {
            config = config.add_source(File::with_name(&path).required(false));
        }

        // E.g.: `PC_ASSEMBLER__ENGINE__SOLVE_TIMEOUT_MS=5000 ./pc-assembler ...`
        config = config.add_source(Environment::with_prefix("PC_ASSEMBLER").separator("__"));

        let mut settings: Settings = config.build()?.try_deserialize()?;
        settings.load_errors.extend(load_errors);
        Ok(settings)
    }

    /// Prints any load error messages collected while reading files.
    pub fn validate_and_warn(&self) {
        self.load_errors.iter().for_each(LogMsg::log);
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_min_spend_ratio(self.engine.min_spend_ratio)
            .with_min_spend_budget(self.engine.min_spend_budget)
            .with_time_limit_ms(self.engine.solve_timeout_ms)
            .with_price_resolution(self.engine.price_resolution)
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig::default().with_parallel(self.scoring.parallel)
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            locale: self.report.locale,
            display_currency: self
                .report
                .display_currency
                .map(|currency| DisplayConversion::new(currency, self.report.exchange_rate)),
        }
    }

    pub fn solve_timeout(&self) -> Duration {
        Duration::from_millis(self.engine.solve_timeout_ms)
    }
}

#[derive(Clone, Debug)]
pub enum LogMsg {
    Warn(String),
    Error(String),
}

impl LogMsg {
    fn log(&self) {
        match self {
            Self::Warn(msg) => log::warn!("{msg}"),
            Self::Error(msg) => log::error!("{msg}"),
        }
    }
}

const fn default_price_resolution() -> f64 {
    0.01
}

const fn default_exchange_rate() -> f64 {
    DEFAULT_EXCHANGE_RATE
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let settings = Settings::new(None).unwrap();
        assert_eq!(settings.engine.min_spend_ratio, 0.8);
        assert_eq!(settings.engine.min_spend_budget, 1500.0);
        assert_eq!(settings.report.locale, Locale::Russian);
        assert!(settings.report.display_currency.is_none());

        let engine = settings.engine_config();
        assert!(engine.validate().is_ok());
        assert_eq!(engine.solver.time_limit_ms, settings.engine.solve_timeout_ms);
    }

    #[test]
    fn test_custom_config_overrides() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "engine:\n  min_spend_ratio: 0.9\nreport:\n  locale: en\n  display_currency: RUB\n  exchange_rate: 90.0"
        )
        .unwrap();

        let path = file.path().to_string_lossy().into_owned();
        let settings = Settings::new(Some(path)).unwrap();

        assert_eq!(settings.engine.min_spend_ratio, 0.9);
        // untouched keys keep their defaults
        assert_eq!(settings.engine.min_spend_budget, 1500.0);

        let options = settings.report_options();
        assert_eq!(options.locale, Locale::English);
        assert_eq!(
            options.display_currency,
            Some(DisplayConversion::new(Currency::Rub, 90.0))
        );
    }

    #[test]
    fn test_missing_custom_config_is_reported() {
        let settings = Settings::new(Some("does/not/exist.yaml".into())).unwrap();
        assert!(settings
            .load_errors
            .iter()
            .any(|msg| matches!(msg, LogMsg::Error(_))));
    }
}
