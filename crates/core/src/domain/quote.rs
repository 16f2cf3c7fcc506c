use serde::{Deserialize, Serialize};

use crate::domain::service::{Location, ServiceId};

/// Display name of the synthetic line emitted for the extra charge.
pub const EXTRA_SERVICES_LINE: &str = "Extra Services";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionLine {
    pub service_id: ServiceId,
    /// Signed so that non-positive quantities reach validation instead of
    /// being rejected by the type.
    pub quantity: i64,
}

impl SelectionLine {
    pub fn new(service_id: impl Into<String>, quantity: i64) -> Self {
        Self { service_id: ServiceId(service_id.into()), quantity }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub location: Location,
    pub selections: Vec<SelectionLine>,
    pub extra_charge: f64,
    /// `None` when the surcharge is disabled.
    pub surcharge_percent: Option<f64>,
    pub discount_percent: f64,
}

impl QuoteRequest {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            selections: Vec::new(),
            extra_charge: 0.0,
            surcharge_percent: None,
            discount_percent: 0.0,
        }
    }

    pub fn select(mut self, service_id: impl Into<String>, quantity: i64) -> Self {
        self.selections.push(SelectionLine::new(service_id, quantity));
        self
    }

    pub fn with_extra_charge(mut self, extra_charge: f64) -> Self {
        self.extra_charge = extra_charge;
        self
    }

    pub fn with_surcharge(mut self, percent: f64) -> Self {
        self.surcharge_percent = Some(percent);
        self
    }

    pub fn with_discount(mut self, percent: f64) -> Self {
        self.discount_percent = percent;
        self
    }

    /// True when there is something to price: at least one selected service
    /// or a positive extra charge.
    pub fn has_billable_input(&self) -> bool {
        !self.selections.is_empty() || self.extra_charge > 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineResult {
    pub name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub line_total: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub lines: Vec<LineResult>,
    pub base_total: f64,
    pub surcharge_percent: f64,
    pub surcharge_amount: f64,
    pub discount_percent: f64,
    pub discount_amount: f64,
    pub final_total: f64,
    pub location: Location,
}

impl QuoteResult {
    pub fn subtotal_after_surcharge(&self) -> f64 {
        self.base_total + self.surcharge_amount
    }

    pub fn services_count_label(&self) -> String {
        let count = self.lines.len();
        if count == 1 {
            "1 service selected".to_owned()
        } else {
            format!("{count} services selected")
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::service::Location;

    use super::{LineResult, QuoteRequest, QuoteResult};

    fn result(lines: usize) -> QuoteResult {
        QuoteResult {
            lines: (0..lines)
                .map(|_| LineResult {
                    name: "Pneu".to_owned(),
                    unit_price: 200.0,
                    quantity: 1,
                    line_total: 200.0,
                })
                .collect(),
            base_total: 200.0 * lines as f64,
            surcharge_percent: 0.0,
            surcharge_amount: 0.0,
            discount_percent: 0.0,
            discount_amount: 0.0,
            final_total: 200.0 * lines as f64,
            location: Location::InShop,
        }
    }

    #[test]
    fn services_count_label_is_pluralized() {
        assert_eq!(result(1).services_count_label(), "1 service selected");
        assert_eq!(result(3).services_count_label(), "3 services selected");
    }

    #[test]
    fn request_without_selection_or_extra_is_not_billable() {
        let request = QuoteRequest::new(Location::OnSite);
        assert!(!request.has_billable_input());
        assert!(request.clone().with_extra_charge(10.0).has_billable_input());
        assert!(request.select("pneu", 1).has_billable_input());
    }
}
