use tracing::debug;

use crate::domain::service::{Location, ServiceDefinition, ServiceId};
use crate::errors::CatalogError;

/// Ordered set of service definitions. Definition order is the display and
/// iteration order; ids are unique.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    services: Vec<ServiceDefinition>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self { services: stock_services() }
    }
}

impl Catalog {
    pub fn empty() -> Self {
        Self { services: Vec::new() }
    }

    pub fn new(services: Vec<ServiceDefinition>) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty();
        for service in services {
            catalog.insert(service)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, service: ServiceDefinition) -> Result<(), CatalogError> {
        if self.find(&service.id).is_some() {
            return Err(CatalogError::DuplicateService(service.id));
        }
        validate_price(&service.id, Location::InShop, service.price_in_shop)?;
        if let Some(price) = service.price_on_site {
            validate_price(&service.id, Location::OnSite, price)?;
        }

        self.services.push(service);
        Ok(())
    }

    pub fn find(&self, service_id: &ServiceId) -> Option<&ServiceDefinition> {
        self.services.iter().find(|service| &service.id == service_id)
    }

    pub fn get(&self, service_id: &ServiceId) -> Result<&ServiceDefinition, CatalogError> {
        self.find(service_id).ok_or_else(|| CatalogError::NotFound(service_id.clone()))
    }

    pub fn set_price(
        &mut self,
        service_id: &ServiceId,
        location: Location,
        value: f64,
    ) -> Result<(), CatalogError> {
        validate_price(service_id, location, value)?;

        let service = self
            .services
            .iter_mut()
            .find(|service| &service.id == service_id)
            .ok_or_else(|| CatalogError::NotFound(service_id.clone()))?;

        match location {
            Location::OnSite => service.price_on_site = Some(value),
            Location::InShop => service.price_in_shop = value,
        }

        debug!(
            event_name = "catalog.price.updated",
            service_id = %service_id,
            location = %location,
            price = value,
            "catalog price updated"
        );
        Ok(())
    }

    pub fn list_ids(&self) -> Vec<ServiceId> {
        self.services.iter().map(|service| service.id.clone()).collect()
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

fn validate_price(
    service_id: &ServiceId,
    location: Location,
    value: f64,
) -> Result<(), CatalogError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }

    Err(CatalogError::InvalidPrice { service_id: service_id.clone(), location, value })
}

/// Services the shop offers out of the box.
pub fn stock_services() -> Vec<ServiceDefinition> {
    vec![
        ServiceDefinition::new("reparo", "Reparo", Some(2500.0), 1500.0),
        ServiceDefinition::new("kit-avancado", "Kit Avançado", Some(3500.0), 2500.0),
        ServiceDefinition::new("kit-basico", "Kit Básico", Some(2000.0), 1000.0),
        ServiceDefinition::new("turbo", "Turbo", None, 80_000.0),
        ServiceDefinition::new("chave-inglesa", "Chave Inglesa", Some(800.0), 600.0),
        ServiceDefinition::new("pneu", "Pneu", Some(500.0), 200.0),
    ]
}
