use tracing::debug;

use crate::cpq::catalog::Catalog;
use crate::cpq::constraints::validate_request;
use crate::domain::quote::{LineResult, QuoteRequest, QuoteResult, EXTRA_SERVICES_LINE};
use crate::errors::QuoteError;

pub trait PricingEngine: Send + Sync {
    fn price(&self, catalog: &Catalog, request: &QuoteRequest) -> Result<QuoteResult, QuoteError>;
}

#[derive(Default)]
pub struct DeterministicPricingEngine;

impl PricingEngine for DeterministicPricingEngine {
    fn price(&self, catalog: &Catalog, request: &QuoteRequest) -> Result<QuoteResult, QuoteError> {
        compute_quote(catalog, request)
    }
}

/// Surcharge applied to the base total. Zero when disabled or non-positive.
pub fn surcharge_amount(base_total: f64, surcharge_percent: f64) -> f64 {
    if surcharge_percent > 0.0 {
        base_total * surcharge_percent / 100.0
    } else {
        0.0
    }
}

/// Discount applied to the subtotal after surcharge, never to the base total.
pub fn discount_amount(subtotal_after_surcharge: f64, discount_percent: f64) -> f64 {
    if discount_percent > 0.0 {
        subtotal_after_surcharge * discount_percent / 100.0
    } else {
        0.0
    }
}

pub fn compute_quote(catalog: &Catalog, request: &QuoteRequest) -> Result<QuoteResult, QuoteError> {
    let resolved = validate_request(catalog, request)?;

    let mut lines = Vec::with_capacity(resolved.len() + 1);
    let mut base_total = 0.0;
    for line in resolved {
        let line_total = line.unit_price * line.quantity as f64;
        base_total += line_total;
        lines.push(LineResult {
            name: line.name,
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_total,
        });
    }

    if request.extra_charge > 0.0 {
        base_total += request.extra_charge;
        lines.push(LineResult {
            name: EXTRA_SERVICES_LINE.to_owned(),
            unit_price: request.extra_charge,
            quantity: 1,
            line_total: request.extra_charge,
        });
    }

    if base_total == 0.0 {
        return Err(QuoteError::ZeroTotal);
    }

    // A disabled surcharge is stored as 0% so the summary can recompute it.
    let surcharge_percent = request.surcharge_percent.filter(|pct| *pct > 0.0).unwrap_or(0.0);
    let discount_percent = request.discount_percent.max(0.0);

    let surcharge_amount = surcharge_amount(base_total, surcharge_percent);
    let subtotal = base_total + surcharge_amount;
    let discount_amount = discount_amount(subtotal, discount_percent);
    let final_total = subtotal - discount_amount;

    debug!(
        event_name = "pricing.quote.computed",
        location = %request.location,
        line_count = lines.len(),
        base_total,
        surcharge_amount,
        discount_amount,
        final_total,
        "quote computed"
    );

    Ok(QuoteResult {
        lines,
        base_total,
        surcharge_percent,
        surcharge_amount,
        discount_percent,
        discount_amount,
        final_total,
        location: request.location,
    })
}

#[cfg(test)]
mod tests {
    use super::{compute_quote, DeterministicPricingEngine, PricingEngine};
    use crate::cpq::catalog::Catalog;
    use crate::domain::quote::{QuoteRequest, EXTRA_SERVICES_LINE};
    use crate::domain::service::{Location, ServiceDefinition, ServiceId};
    use crate::errors::QuoteError;

    fn flat_catalog(price: f64) -> Catalog {
        Catalog::new(vec![ServiceDefinition::new("flat", "Flat", Some(price), price)])
            .expect("valid catalog")
    }

    #[test]
    fn kit_basico_in_shop_end_to_end() {
        let request = QuoteRequest::new(Location::InShop).select("kit-basico", 2);
        let result = compute_quote(&Catalog::default(), &request).expect("quote computes");

        assert_eq!(result.base_total, 2000.0);
        assert_eq!(result.final_total, 2000.0);
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].unit_price, 1000.0);
        assert_eq!(result.lines[0].quantity, 2);
        assert_eq!(result.lines[0].line_total, 2000.0);
        assert_eq!(result.location, Location::InShop);
    }

    #[test]
    fn turbo_on_site_is_unavailable() {
        let request = QuoteRequest::new(Location::OnSite).select("turbo", 1);

        assert_eq!(
            compute_quote(&Catalog::default(), &request),
            Err(QuoteError::ServiceUnavailableAtLocation(vec!["Turbo".to_owned()]))
        );
    }

    #[test]
    fn unavailable_service_aborts_even_with_valid_lines() {
        let request =
            QuoteRequest::new(Location::OnSite).select("reparo", 1).select("turbo", 1).with_extra_charge(50.0);

        assert!(matches!(
            compute_quote(&Catalog::default(), &request),
            Err(QuoteError::ServiceUnavailableAtLocation(_))
        ));
    }

    #[test]
    fn discount_applies_after_surcharge() {
        let request =
            QuoteRequest::new(Location::InShop).select("flat", 1).with_surcharge(100.0).with_discount(50.0);
        let result = compute_quote(&flat_catalog(1000.0), &request).expect("quote computes");

        assert_eq!(result.surcharge_amount, 1000.0);
        assert_eq!(result.subtotal_after_surcharge(), 2000.0);
        assert_eq!(result.discount_amount, 1000.0);
        assert_eq!(result.final_total, 1000.0);
        // Discounting the base first would take 500.
        assert_ne!(result.discount_amount, 1000.0 * 50.0 / 100.0);
    }

    #[test]
    fn asymmetric_surcharge_and_discount() {
        let request =
            QuoteRequest::new(Location::InShop).select("flat", 1).with_surcharge(50.0).with_discount(20.0);
        let result = compute_quote(&flat_catalog(1000.0), &request).expect("quote computes");

        assert_eq!(result.surcharge_amount, 500.0);
        assert_eq!(result.discount_amount, 300.0);
        assert_eq!(result.final_total, 1200.0);
    }

    #[test]
    fn disabled_surcharge_is_ignored() {
        let mut request = QuoteRequest::new(Location::InShop).select("flat", 1).with_discount(10.0);
        request.surcharge_percent = None;
        let result = compute_quote(&flat_catalog(1000.0), &request).expect("quote computes");

        assert_eq!(result.surcharge_amount, 0.0);
        assert_eq!(result.surcharge_percent, 0.0);
        assert_eq!(result.final_total, 900.0);
    }

    #[test]
    fn extra_charge_line_is_always_last() {
        let request = QuoteRequest::new(Location::OnSite)
            .select("pneu", 4)
            .select("reparo", 1)
            .with_extra_charge(150.0);
        let result = compute_quote(&Catalog::default(), &request).expect("quote computes");

        let names: Vec<&str> = result.lines.iter().map(|line| line.name.as_str()).collect();
        assert_eq!(names, ["Pneu", "Reparo", EXTRA_SERVICES_LINE]);
        assert_eq!(result.lines[2].quantity, 1);
        assert_eq!(result.base_total, 2000.0 + 2500.0 + 150.0);
        let sum: f64 = result.lines.iter().map(|line| line.line_total).sum();
        assert_eq!(result.base_total, sum);
    }

    #[test]
    fn extra_charge_alone_is_billable() {
        let request = QuoteRequest::new(Location::OnSite).with_extra_charge(80.0);
        let result = compute_quote(&Catalog::default(), &request).expect("quote computes");

        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.final_total, 80.0);
    }

    #[test]
    fn zero_priced_selection_fails_with_zero_total() {
        let mut catalog = Catalog::default();
        catalog.set_price(&ServiceId::from("pneu"), Location::InShop, 0.0).expect("price edit");
        let request = QuoteRequest::new(Location::InShop).select("pneu", 3);

        assert_eq!(compute_quote(&catalog, &request), Err(QuoteError::ZeroTotal));
    }

    #[test]
    fn unavailable_service_is_reported_before_zero_total() {
        let mut catalog = Catalog::default();
        catalog.set_price(&ServiceId::from("pneu"), Location::OnSite, 0.0).expect("price edit");
        let request = QuoteRequest::new(Location::OnSite).select("turbo", 1).select("pneu", 1);

        assert_eq!(
            compute_quote(&catalog, &request),
            Err(QuoteError::ServiceUnavailableAtLocation(vec!["Turbo".to_owned()]))
        );
    }

    #[test]
    fn discount_beyond_full_price_is_not_clamped() {
        let request = QuoteRequest::new(Location::InShop).select("flat", 1).with_discount(150.0);
        let result = compute_quote(&flat_catalog(100.0), &request).expect("quote computes");

        assert_eq!(result.final_total, -50.0);
    }

    #[test]
    fn final_total_matches_formula_for_mixed_request() {
        let request = QuoteRequest::new(Location::OnSite)
            .select("kit-avancado", 3)
            .select("chave-inglesa", 2)
            .with_extra_charge(123.45)
            .with_surcharge(30.0)
            .with_discount(7.5);
        let result = compute_quote(&Catalog::default(), &request).expect("quote computes");

        let base = 3.0 * 3500.0 + 2.0 * 800.0 + 123.45;
        let surcharge = base * 30.0 / 100.0;
        let discount = (base + surcharge) * 7.5 / 100.0;
        assert_eq!(result.base_total, base);
        assert_eq!(result.final_total, (base + surcharge) - discount);
    }

    #[test]
    fn engine_is_idempotent_and_leaves_catalog_untouched() {
        let catalog = Catalog::default();
        let before = catalog.clone();
        let request =
            QuoteRequest::new(Location::OnSite).select("reparo", 2).with_surcharge(30.0).with_discount(5.0);
        let engine = DeterministicPricingEngine;

        let first = engine.price(&catalog, &request).expect("first run");
        let second = engine.price(&catalog, &request).expect("second run");

        assert_eq!(first, second);
        assert_eq!(catalog, before);
    }
}
