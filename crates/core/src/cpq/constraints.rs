use crate::cpq::catalog::Catalog;
use crate::domain::quote::QuoteRequest;
use crate::errors::QuoteError;

/// A selection line whose service and unit price have been resolved for the
/// requested location.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLine {
    pub name: String,
    pub unit_price: f64,
    pub quantity: i64,
}

/// Checks a request against the catalog and resolves unit prices.
///
/// Rules are applied in order and the first failing rule wins: empty
/// selection, then quantities, then availability at the location. Every
/// unavailable service is reported, not just the first one. The zero-total
/// rule needs the computed base total and is checked by the pricing engine.
pub fn validate_request(
    catalog: &Catalog,
    request: &QuoteRequest,
) -> Result<Vec<ResolvedLine>, QuoteError> {
    if !request.has_billable_input() {
        return Err(QuoteError::EmptySelection);
    }

    let mut services = Vec::with_capacity(request.selections.len());
    for selection in &request.selections {
        let service = catalog.get(&selection.service_id)?;
        if selection.quantity <= 0 {
            return Err(QuoteError::InvalidQuantity(service.name.clone()));
        }
        services.push((service, selection.quantity));
    }

    let mut resolved = Vec::with_capacity(services.len());
    let mut unavailable = Vec::new();
    for (service, quantity) in services {
        match service.price_at(request.location) {
            Some(unit_price) => {
                resolved.push(ResolvedLine { name: service.name.clone(), unit_price, quantity })
            }
            None => unavailable.push(service.name.clone()),
        }
    }

    if !unavailable.is_empty() {
        return Err(QuoteError::ServiceUnavailableAtLocation(unavailable));
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::validate_request;
    use crate::cpq::catalog::Catalog;
    use crate::domain::quote::QuoteRequest;
    use crate::domain::service::{Location, ServiceId};
    use crate::errors::{CatalogError, QuoteError};

    #[test]
    fn empty_selection_wins_over_every_other_field() {
        let request = QuoteRequest::new(Location::OnSite).with_surcharge(30.0).with_discount(10.0);

        assert_eq!(validate_request(&Catalog::default(), &request), Err(QuoteError::EmptySelection));
    }

    #[test]
    fn non_finite_extra_charge_is_not_billable() {
        let request = QuoteRequest::new(Location::InShop).with_extra_charge(f64::NAN);

        assert_eq!(validate_request(&Catalog::default(), &request), Err(QuoteError::EmptySelection));
    }

    #[test]
    fn invalid_quantity_is_reported_before_availability() {
        let request = QuoteRequest::new(Location::OnSite).select("turbo", 1).select("pneu", 0);

        assert_eq!(
            validate_request(&Catalog::default(), &request),
            Err(QuoteError::InvalidQuantity("Pneu".to_owned()))
        );
    }

    #[test]
    fn collects_every_unavailable_service() {
        let mut catalog = Catalog::default();
        catalog
            .insert(crate::domain::service::ServiceDefinition::new(
                "alinhamento",
                "Alinhamento",
                None,
                300.0,
            ))
            .expect("insert service");
        let request = QuoteRequest::new(Location::OnSite)
            .select("turbo", 1)
            .select("pneu", 2)
            .select("alinhamento", 1);

        assert_eq!(
            validate_request(&catalog, &request),
            Err(QuoteError::ServiceUnavailableAtLocation(vec![
                "Turbo".to_owned(),
                "Alinhamento".to_owned(),
            ]))
        );
    }

    #[test]
    fn unknown_service_fails_with_not_found() {
        let request = QuoteRequest::new(Location::InShop).select("ghost", 1);

        assert_eq!(
            validate_request(&Catalog::default(), &request),
            Err(QuoteError::Catalog(CatalogError::NotFound(ServiceId::from("ghost"))))
        );
    }

    #[test]
    fn resolves_prices_for_the_requested_location() {
        let request = QuoteRequest::new(Location::InShop).select("kit-basico", 2);
        let resolved = validate_request(&Catalog::default(), &request).expect("valid request");

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "Kit Básico");
        assert_eq!(resolved[0].unit_price, 1000.0);
        assert_eq!(resolved[0].quantity, 2);
    }
}
