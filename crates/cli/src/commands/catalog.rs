use serde::Serialize;
use shopquote_core::config::{AppConfig, LoadOptions};
use shopquote_core::format::format_currency;
use shopquote_core::ApplicationError;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct CatalogEntry {
    id: String,
    name: String,
    price_on_site: Option<f64>,
    price_in_shop: f64,
}

pub fn run() -> CommandResult {
    let correlation_id = format!("catalog-{}", chrono::Utc::now().timestamp_millis());

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            let error = ApplicationError::Configuration(format!("configuration issue: {error}"));
            return config_failure(error, &correlation_id);
        }
    };

    let catalog = match config.build_catalog() {
        Ok(catalog) => catalog,
        Err(error) => {
            return config_failure(
                ApplicationError::Configuration(error.to_string()),
                &correlation_id,
            );
        }
    };

    let symbol = &config.display.currency_symbol;
    let lines = catalog
        .services()
        .map(|service| {
            let on_site = service
                .price_on_site
                .map(|price| format_currency(symbol, price))
                .unwrap_or_else(|| "N/A".to_string());
            format!(
                "- {} ({}): on-site {on_site}, in-shop {}",
                service.name,
                service.id,
                format_currency(symbol, service.price_in_shop)
            )
        })
        .collect::<Vec<_>>();

    let entries = catalog
        .services()
        .map(|service| CatalogEntry {
            id: service.id.to_string(),
            name: service.name.clone(),
            price_on_site: service.price_on_site,
            price_in_shop: service.price_in_shop,
        })
        .collect::<Vec<_>>();

    CommandResult::success_with_payload(
        "catalog",
        format!("{} services:\n{}", catalog.len(), lines.join("\n")),
        &entries,
    )
}

fn config_failure(error: ApplicationError, correlation_id: &str) -> CommandResult {
    let interface = error.into_interface(correlation_id);
    CommandResult::rejected("catalog", "config_validation", &interface, 2, None)
}
