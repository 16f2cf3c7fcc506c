//! Conversion of raw presentation input into a validated [`QuoteRequest`].
//!
//! Malformed numbers never fail here: amounts fall back to zero and
//! quantities to one. Semantic checks belong to the pricing engine.

use serde::{Deserialize, Serialize};

use crate::cpq::catalog::Catalog;
use crate::domain::quote::{QuoteRequest, SelectionLine};
use crate::domain::service::{Location, ServiceId};

pub const DEFAULT_SURCHARGE_PERCENT: f64 = 30.0;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRow {
    pub service_id: ServiceId,
    pub selected: bool,
    pub quantity: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteForm {
    pub rows: Vec<FormRow>,
    pub location: Location,
    pub extra_charge: String,
    pub surcharge_enabled: bool,
    pub surcharge_percent: String,
    pub discount_percent: String,
}

impl QuoteForm {
    /// The state of a freshly cleared form: nothing selected, quantities of
    /// one, on-site, and the surcharge disabled at its default percentage.
    pub fn cleared(catalog: &Catalog, default_location: Location, default_surcharge: f64) -> Self {
        Self {
            rows: catalog
                .services()
                .map(|service| FormRow {
                    service_id: service.id.clone(),
                    selected: false,
                    quantity: "1".to_owned(),
                })
                .collect(),
            location: default_location,
            extra_charge: "0".to_owned(),
            surcharge_enabled: false,
            surcharge_percent: default_surcharge.to_string(),
            discount_percent: "0".to_owned(),
        }
    }

    /// Marks a row as selected with the given raw quantity. Returns `false`
    /// when the form has no row for the service.
    pub fn select(&mut self, service_id: &ServiceId, quantity: impl Into<String>) -> bool {
        match self.rows.iter_mut().find(|row| &row.service_id == service_id) {
            Some(row) => {
                row.selected = true;
                row.quantity = quantity.into();
                true
            }
            None => false,
        }
    }

    pub fn into_request(self) -> QuoteRequest {
        let selections = self
            .rows
            .into_iter()
            .filter(|row| row.selected)
            .map(|row| SelectionLine {
                service_id: row.service_id,
                quantity: parse_quantity(&row.quantity),
            })
            .collect();

        QuoteRequest {
            location: self.location,
            selections,
            extra_charge: parse_amount(&self.extra_charge),
            surcharge_percent: self
                .surcharge_enabled
                .then(|| parse_amount(&self.surcharge_percent)),
            discount_percent: parse_amount(&self.discount_percent),
        }
    }
}

/// Parses a non-negative amount. Empty, malformed, non-finite and negative
/// input all become zero.
pub fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Parses a quantity. Decimal input truncates toward zero; unparsable input
/// and zero become one. Negative quantities are kept for the engine to reject.
pub fn parse_quantity(raw: &str) -> i64 {
    let parsed = parse_integer(raw).unwrap_or(0);
    if parsed == 0 {
        1
    } else {
        parsed
    }
}

/// Parses an edited catalog price. Malformed input becomes zero.
pub fn parse_price_input(raw: &str) -> f64 {
    parse_integer(raw).map(|value| value as f64).unwrap_or(0.0)
}

fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.abs() < i64::MAX as f64)
        .map(|value| value.trunc() as i64)
}
