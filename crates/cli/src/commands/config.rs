use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use shopquote_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let service_ids = config
        .catalog
        .services
        .iter()
        .map(|service| service.id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(render_line(
        "catalog.services",
        &format!("[{service_ids}]"),
        source("catalog.services", &[]),
    ));

    lines.push(render_line(
        "pricing.default_location",
        &config.pricing.default_location.to_string(),
        source("pricing.default_location", &["SHOPQUOTE_PRICING_DEFAULT_LOCATION"]),
    ));
    lines.push(render_line(
        "pricing.default_surcharge_percent",
        &config.pricing.default_surcharge_percent.to_string(),
        source(
            "pricing.default_surcharge_percent",
            &["SHOPQUOTE_PRICING_DEFAULT_SURCHARGE_PERCENT"],
        ),
    ));
    lines.push(render_line(
        "pricing.feedback_revert_secs",
        &config.pricing.feedback_revert_secs.to_string(),
        source("pricing.feedback_revert_secs", &["SHOPQUOTE_PRICING_FEEDBACK_REVERT_SECS"]),
    ));

    lines.push(render_line(
        "display.currency_symbol",
        &config.display.currency_symbol,
        source("display.currency_symbol", &["SHOPQUOTE_DISPLAY_CURRENCY_SYMBOL"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["SHOPQUOTE_LOGGING_LEVEL", "SHOPQUOTE_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["SHOPQUOTE_LOGGING_FORMAT", "SHOPQUOTE_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("shopquote.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/shopquote.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    // The loader skips blank values.
    if let Some(env_key) = env_keys.iter().find(|key| {
        env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
    }) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn nested_keys_are_attributed_to_the_file() {
        let doc = "[pricing]\ndefault_location = \"in-shop\"\n"
            .parse::<Value>()
            .expect("valid toml");

        assert!(contains_path(&doc, "pricing.default_location"));
        assert!(!contains_path(&doc, "pricing.feedback_revert_secs"));
        assert_eq!(
            field_source("pricing.default_location", &[], Some(&doc), None),
            "file (config file)"
        );
        assert_eq!(field_source("display.currency_symbol", &[], Some(&doc), None), "default");
    }
}
