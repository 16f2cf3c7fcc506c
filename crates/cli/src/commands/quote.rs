use anyhow::{anyhow, bail, Context};
use chrono::Local;
use clap::Args;
use serde::Serialize;
use serde_json::{json, Value};
use shopquote_core::config::{AppConfig, LoadOptions};
use shopquote_core::format::format_currency;
use shopquote_core::input::parse_price_input;
use shopquote_core::{
    ApplicationError, CatalogError, Location, QuoteForm, QuoteResult, QuoteSession, ServiceId,
    SummaryBreakdown,
};
use tracing::info;

use crate::commands::CommandResult;

#[derive(Debug, Clone, Default, Args)]
pub struct QuoteArgs {
    #[arg(
        long = "select",
        value_name = "ID[=QTY]",
        help = "Select a service, optionally with a quantity"
    )]
    pub select: Vec<String>,
    #[arg(long, value_name = "LOCATION", help = "Service location: on-site or in-shop")]
    pub location: Option<String>,
    #[arg(long, value_name = "AMOUNT", help = "Extra charge added as its own line")]
    pub extra: Option<String>,
    #[arg(
        long,
        value_name = "PCT",
        help = "Surcharge percentage (defaults to the configured value)"
    )]
    pub surcharge: Option<String>,
    #[arg(long, help = "Apply the surcharge to the base total")]
    pub apply_surcharge: bool,
    #[arg(long, value_name = "PCT", help = "Discount percentage applied after the surcharge")]
    pub discount: Option<String>,
    #[arg(
        long = "price",
        value_name = "ID:LOCATION=VALUE",
        help = "Edit a catalog price before quoting"
    )]
    pub price: Vec<String>,
    #[arg(long, help = "Include the summary breakdown")]
    pub summary: bool,
}

#[derive(Debug, Serialize)]
struct QuoteOutput<'a> {
    correlation_id: &'a str,
    services_count: String,
    result: &'a QuoteResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<SummaryOutput>,
}

#[derive(Debug, Serialize)]
struct SummaryOutput {
    issued_at: String,
    breakdown: SummaryBreakdown,
    rendered: String,
}

#[derive(Debug, PartialEq)]
struct PriceEdit {
    service_id: ServiceId,
    location: Location,
    value: f64,
}

pub fn run(args: QuoteArgs) -> CommandResult {
    let correlation_id = format!("quote-{}", chrono::Utc::now().timestamp_millis());

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            let error = ApplicationError::Configuration(format!("configuration issue: {error}"));
            return rejected("config_validation", error, &correlation_id, 2, None);
        }
    };

    let catalog = match config.build_catalog() {
        Ok(catalog) => catalog,
        Err(error) => {
            let error = ApplicationError::Configuration(error.to_string());
            return rejected("config_validation", error, &correlation_id, 2, None);
        }
    };

    let mut session =
        QuoteSession::new(catalog).with_feedback_delay(config.feedback_revert_after());

    for raw in &args.price {
        let edit = match parse_price_edit(raw) {
            Ok(edit) => edit,
            Err(error) => {
                return CommandResult::failure("quote", "invalid_argument", format!("{error:#}"), 2);
            }
        };
        if let Err(error) = session.set_price(&edit.service_id, edit.location, edit.value) {
            return catalog_failure(error, &correlation_id);
        }
    }

    let form = match build_form(&args, &config, &session) {
        Ok(form) => form,
        Err(FormError::Argument(error)) => {
            return CommandResult::failure("quote", "invalid_argument", format!("{error:#}"), 2);
        }
        Err(FormError::Catalog(error)) => return catalog_failure(error, &correlation_id),
    };

    let request = form.into_request();
    let result = match session.calculate(&request) {
        Ok(result) => result.clone(),
        Err(error) => {
            let error_class = error.code().to_ascii_lowercase();
            let feedback = session.feedback();
            let data = feedback.active_message().map(|message| {
                json!({
                    "feedback": {
                        "message": message,
                        "revert_after_secs": feedback.revert_after().as_secs(),
                    }
                })
            });
            return rejected(&error_class, error.into(), &correlation_id, 1, data);
        }
    };

    info!(
        event_name = "cli.quote.completed",
        correlation_id = correlation_id.as_str(),
        final_total = result.final_total,
        "quote calculated"
    );

    let symbol = config.display.currency_symbol.as_str();
    let summary = if args.summary {
        match session.summary() {
            Ok(breakdown) => {
                let issued_at = Local::now().format("%B %-d, %Y %H:%M").to_string();
                let rendered = format!("{issued_at}\n{}", breakdown.render(symbol));
                Some(SummaryOutput { issued_at, breakdown, rendered })
            }
            Err(error) => {
                return rejected("no_calculation", error.into(), &correlation_id, 1, None);
            }
        }
    } else {
        None
    };

    let output = QuoteOutput {
        correlation_id: &correlation_id,
        services_count: result.services_count_label(),
        result: &result,
        summary,
    };

    CommandResult::success_with_payload(
        "quote",
        format!(
            "Total: {} ({})",
            format_currency(symbol, result.final_total),
            result.services_count_label()
        ),
        &output,
    )
}

fn rejected(
    error_class: &str,
    error: ApplicationError,
    correlation_id: &str,
    exit_code: u8,
    data: Option<Value>,
) -> CommandResult {
    let interface = error.into_interface(correlation_id);
    CommandResult::rejected("quote", error_class, &interface, exit_code, data)
}

enum FormError {
    Argument(anyhow::Error),
    Catalog(CatalogError),
}

fn build_form(
    args: &QuoteArgs,
    config: &AppConfig,
    session: &QuoteSession,
) -> Result<QuoteForm, FormError> {
    let location = match args.location.as_deref() {
        Some(raw) => raw
            .parse::<Location>()
            .map_err(|error| FormError::Argument(anyhow!(error).context("invalid --location")))?,
        None => config.pricing.default_location,
    };

    let mut form =
        QuoteForm::cleared(session.catalog(), location, config.pricing.default_surcharge_percent);

    for raw in &args.select {
        let (id, quantity) = split_selection(raw);
        let service_id = ServiceId::from(id);
        session.catalog().get(&service_id).map_err(FormError::Catalog)?;
        form.select(&service_id, quantity);
    }

    if let Some(extra) = &args.extra {
        form.extra_charge = extra.clone();
    }
    if let Some(surcharge) = &args.surcharge {
        form.surcharge_percent = surcharge.clone();
    }
    form.surcharge_enabled = args.apply_surcharge;
    if let Some(discount) = &args.discount {
        form.discount_percent = discount.clone();
    }

    Ok(form)
}

fn split_selection(raw: &str) -> (&str, &str) {
    match raw.split_once('=') {
        Some((id, quantity)) => (id.trim(), quantity),
        None => (raw.trim(), "1"),
    }
}

fn parse_price_edit(raw: &str) -> anyhow::Result<PriceEdit> {
    let (target, value) = raw
        .split_once('=')
        .with_context(|| format!("price edit `{raw}` must look like ID:LOCATION=VALUE"))?;
    let (id, location) = target
        .split_once(':')
        .with_context(|| format!("price edit `{raw}` is missing the :LOCATION part"))?;
    if id.trim().is_empty() {
        bail!("price edit `{raw}` is missing the service id");
    }
    let location = location
        .parse::<Location>()
        .map_err(|error| anyhow!(error).context(format!("invalid location in `{raw}`")))?;

    Ok(PriceEdit {
        service_id: ServiceId::from(id.trim()),
        location,
        value: parse_price_input(value),
    })
}

fn catalog_failure(error: CatalogError, correlation_id: &str) -> CommandResult {
    let error_class = match &error {
        CatalogError::NotFound(_) => "service_not_found",
        CatalogError::DuplicateService(_) => "duplicate_service",
        CatalogError::InvalidPrice { .. } => "invalid_price",
    };
    rejected(error_class, error.into(), correlation_id, 2, None)
}
