use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cpq::catalog::{stock_services, Catalog};
use crate::domain::service::{Location, ServiceDefinition};
use crate::input::DEFAULT_SURCHARGE_PERCENT;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub pricing: PricingConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub services: Vec<ServiceDefinition>,
}

#[derive(Clone, Debug)]
pub struct PricingConfig {
    pub default_location: Location,
    pub default_surcharge_percent: f64,
    pub feedback_revert_secs: u64,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub currency_symbol: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub default_location: Option<Location>,
    pub currency_symbol: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig { services: stock_services() },
            pricing: PricingConfig {
                default_location: Location::OnSite,
                default_surcharge_percent: DEFAULT_SURCHARGE_PERCENT,
                feedback_revert_secs: 3,
            },
            display: DisplayConfig { currency_symbol: "R$".to_string() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("shopquote.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Builds the catalog the calculator starts from.
    pub fn build_catalog(&self) -> Result<Catalog, ConfigError> {
        Catalog::new(self.catalog.services.clone())
            .map_err(|error| ConfigError::Validation(format!("catalog.services: {error}")))
    }

    pub fn feedback_revert_after(&self) -> Duration {
        Duration::from_secs(self.pricing.feedback_revert_secs)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(services) = catalog.services {
                self.catalog.services =
                    services.into_iter().map(ServicePatch::into_definition).collect();
            }
        }

        if let Some(pricing) = patch.pricing {
            if let Some(default_location) = pricing.default_location {
                self.pricing.default_location = default_location;
            }
            if let Some(default_surcharge_percent) = pricing.default_surcharge_percent {
                self.pricing.default_surcharge_percent = default_surcharge_percent;
            }
            if let Some(feedback_revert_secs) = pricing.feedback_revert_secs {
                self.pricing.feedback_revert_secs = feedback_revert_secs;
            }
        }

        if let Some(display) = patch.display {
            if let Some(currency_symbol) = display.currency_symbol {
                self.display.currency_symbol = currency_symbol;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHOPQUOTE_PRICING_DEFAULT_LOCATION") {
            self.pricing.default_location =
                parse_location("SHOPQUOTE_PRICING_DEFAULT_LOCATION", &value)?;
        }
        if let Some(value) = read_env("SHOPQUOTE_PRICING_DEFAULT_SURCHARGE_PERCENT") {
            self.pricing.default_surcharge_percent =
                parse_f64("SHOPQUOTE_PRICING_DEFAULT_SURCHARGE_PERCENT", &value)?;
        }
        if let Some(value) = read_env("SHOPQUOTE_PRICING_FEEDBACK_REVERT_SECS") {
            self.pricing.feedback_revert_secs =
                parse_u64("SHOPQUOTE_PRICING_FEEDBACK_REVERT_SECS", &value)?;
        }

        if let Some(value) = read_env("SHOPQUOTE_DISPLAY_CURRENCY_SYMBOL") {
            self.display.currency_symbol = value;
        }

        let log_level =
            read_env("SHOPQUOTE_LOGGING_LEVEL").or_else(|| read_env("SHOPQUOTE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SHOPQUOTE_LOGGING_FORMAT").or_else(|| read_env("SHOPQUOTE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(default_location) = overrides.default_location {
            self.pricing.default_location = default_location;
        }
        if let Some(currency_symbol) = overrides.currency_symbol {
            self.display.currency_symbol = currency_symbol;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_pricing(&self.pricing)?;
        validate_display(&self.display)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("shopquote.toml"), PathBuf::from("config/shopquote.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.services.is_empty() {
        return Err(ConfigError::Validation(
            "catalog.services must define at least one service".to_string(),
        ));
    }

    for service in &catalog.services {
        if service.id.as_str().trim().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.services entries require a non-empty id".to_string(),
            ));
        }
        if service.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "catalog.services `{}` requires a display name",
                service.id
            )));
        }
    }

    Catalog::new(catalog.services.clone())
        .map(|_| ())
        .map_err(|error| ConfigError::Validation(format!("catalog.services: {error}")))
}

fn validate_pricing(pricing: &PricingConfig) -> Result<(), ConfigError> {
    let percent = pricing.default_surcharge_percent;
    if !percent.is_finite() || percent < 0.0 {
        return Err(ConfigError::Validation(
            "pricing.default_surcharge_percent must be a non-negative number".to_string(),
        ));
    }

    if pricing.feedback_revert_secs == 0 || pricing.feedback_revert_secs > 60 {
        return Err(ConfigError::Validation(
            "pricing.feedback_revert_secs must be in range 1..=60".to_string(),
        ));
    }

    Ok(())
}

fn validate_display(display: &DisplayConfig) -> Result<(), ConfigError> {
    if display.currency_symbol.trim().is_empty() {
        return Err(ConfigError::Validation(
            "display.currency_symbol must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_location(key: &str, value: &str) -> Result<Location, ConfigError> {
    value.parse::<Location>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    pricing: Option<PricingPatch>,
    display: Option<DisplayPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    services: Option<Vec<ServicePatch>>,
}

#[derive(Debug, Deserialize)]
struct ServicePatch {
    id: String,
    name: String,
    price_on_site: Option<f64>,
    price_in_shop: f64,
}

impl ServicePatch {
    fn into_definition(self) -> ServiceDefinition {
        ServiceDefinition::new(self.id, self.name, self.price_on_site, self.price_in_shop)
    }
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    default_location: Option<Location>,
    default_surcharge_percent: Option<f64>,
    feedback_revert_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct DisplayPatch {
    currency_symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
