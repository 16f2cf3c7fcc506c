use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cpq::pricing::{discount_amount, surcharge_amount};
use crate::domain::quote::{LineResult, QuoteResult};
use crate::domain::service::Location;
use crate::format::{format_amount, format_percent};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRow {
    pub percent: f64,
    pub amount: f64,
}

/// Read-only breakdown of a computed quote for a detail view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryBreakdown {
    pub lines: Vec<LineResult>,
    pub location: Location,
    pub subtotal: f64,
    pub surcharge: Option<AdjustmentRow>,
    pub discount: Option<AdjustmentRow>,
    pub final_total: f64,
}

impl SummaryBreakdown {
    /// Projects a result into a breakdown. Adjustment amounts are recomputed
    /// from the stored percentages with the engine's own formulas.
    pub fn from_result(result: &QuoteResult) -> Self {
        let subtotal = result.base_total;
        let surcharge = surcharge_amount(subtotal, result.surcharge_percent);
        let discount = discount_amount(subtotal + surcharge, result.discount_percent);

        Self {
            lines: result.lines.clone(),
            location: result.location,
            subtotal,
            surcharge: (surcharge > 0.0)
                .then_some(AdjustmentRow { percent: result.surcharge_percent, amount: surcharge }),
            discount: (discount > 0.0)
                .then_some(AdjustmentRow { percent: result.discount_percent, amount: discount }),
            final_total: result.final_total,
        }
    }

    pub fn render(&self, currency_symbol: &str) -> String {
        SummaryView { summary: self, currency_symbol }.to_string()
    }
}

struct SummaryView<'a> {
    summary: &'a SummaryBreakdown,
    currency_symbol: &'a str,
}

impl fmt::Display for SummaryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.currency_symbol;
        let summary = self.summary;

        writeln!(f, "SELECTED SERVICES:")?;
        for line in &summary.lines {
            writeln!(
                f,
                "  {}: {}x {symbol} {} = {symbol} {}",
                line.name,
                line.quantity,
                format_amount(line.unit_price),
                format_amount(line.line_total)
            )?;
        }
        writeln!(f, "Location: {}", summary.location.label())?;
        writeln!(f, "Subtotal: {symbol} {}", format_amount(summary.subtotal))?;
        if let Some(surcharge) = &summary.surcharge {
            writeln!(
                f,
                "Surcharge ({}): + {symbol} {}",
                format_percent(surcharge.percent),
                format_amount(surcharge.amount)
            )?;
        }
        if let Some(discount) = &summary.discount {
            writeln!(
                f,
                "Discount ({}): - {symbol} {}",
                format_percent(discount.percent),
                format_amount(discount.amount)
            )?;
        }
        write!(f, "FINAL TOTAL: {symbol} {}", format_amount(summary.final_total))
    }
}

#[cfg(test)]
mod tests {
    use super::SummaryBreakdown;
    use crate::cpq::catalog::Catalog;
    use crate::cpq::pricing::compute_quote;
    use crate::domain::quote::QuoteRequest;
    use crate::domain::service::Location;

    #[test]
    fn hides_adjustments_that_were_not_applied() {
        let request = QuoteRequest::new(Location::InShop).select("kit-basico", 2);
        let result = compute_quote(&Catalog::default(), &request).expect("quote computes");
        let summary = SummaryBreakdown::from_result(&result);

        assert_eq!(summary.subtotal, 2000.0);
        assert!(summary.surcharge.is_none());
        assert!(summary.discount.is_none());
        assert_eq!(summary.final_total, 2000.0);
    }

    #[test]
    fn recomputed_amounts_match_the_engine() {
        let request = QuoteRequest::new(Location::OnSite)
            .select("reparo", 3)
            .with_extra_charge(99.99)
            .with_surcharge(30.0)
            .with_discount(12.5);
        let result = compute_quote(&Catalog::default(), &request).expect("quote computes");
        let summary = SummaryBreakdown::from_result(&result);

        let surcharge = summary.surcharge.expect("surcharge row");
        let discount = summary.discount.expect("discount row");
        assert_eq!(surcharge.amount, result.surcharge_amount);
        assert_eq!(discount.amount, result.discount_amount);
        assert_eq!(summary.subtotal + surcharge.amount - discount.amount, result.final_total);
    }

    #[test]
    fn renders_rows_with_two_decimals() {
        let request = QuoteRequest::new(Location::OnSite)
            .select("pneu", 2)
            .with_surcharge(30.0)
            .with_discount(10.0);
        let result = compute_quote(&Catalog::default(), &request).expect("quote computes");
        let rendered = SummaryBreakdown::from_result(&result).render("R$");

        assert!(rendered.contains("  Pneu: 2x R$ 500.00 = R$ 1,000.00"));
        assert!(rendered.contains("Location: On-site"));
        assert!(rendered.contains("Subtotal: R$ 1,000.00"));
        assert!(rendered.contains("Surcharge (30%): + R$ 300.00"));
        assert!(rendered.contains("Discount (10%): - R$ 130.00"));
        assert!(rendered.ends_with("FINAL TOTAL: R$ 1,170.00"));
    }
}
