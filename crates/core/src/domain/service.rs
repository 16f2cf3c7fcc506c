use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub String);

impl ServiceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    OnSite,
    InShop,
}

impl Location {
    /// Human-readable label used by the summary view.
    pub fn label(self) -> &'static str {
        match self {
            Self::OnSite => "On-site",
            Self::InShop => "In-shop",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnSite => f.write_str("on-site"),
            Self::InShop => f.write_str("in-shop"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownLocation(pub String);

impl fmt::Display for UnknownLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported location `{}` (expected on-site|in-shop)", self.0)
    }
}

impl std::error::Error for UnknownLocation {}

impl std::str::FromStr for Location {
    type Err = UnknownLocation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "on-site" | "onsite" | "on_site" | "fora" => Ok(Self::OnSite),
            "in-shop" | "inshop" | "in_shop" | "dentro" => Ok(Self::InShop),
            other => Err(UnknownLocation(other.to_owned())),
        }
    }
}

/// A repair service the shop offers.
///
/// The in-shop price is always known. The on-site price is `None` when the
/// service cannot be performed outside the shop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub id: ServiceId,
    pub name: String,
    pub price_on_site: Option<f64>,
    pub price_in_shop: f64,
}

impl ServiceDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price_on_site: Option<f64>,
        price_in_shop: f64,
    ) -> Self {
        Self { id: ServiceId(id.into()), name: name.into(), price_on_site, price_in_shop }
    }

    pub fn price_at(&self, location: Location) -> Option<f64> {
        match location {
            Location::OnSite => self.price_on_site,
            Location::InShop => Some(self.price_in_shop),
        }
    }

    pub fn is_available_at(&self, location: Location) -> bool {
        self.price_at(location).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Location, ServiceDefinition};

    #[test]
    fn on_site_price_may_be_unavailable() {
        let turbo = ServiceDefinition::new("turbo", "Turbo", None, 80_000.0);

        assert_eq!(turbo.price_at(Location::OnSite), None);
        assert_eq!(turbo.price_at(Location::InShop), Some(80_000.0));
        assert!(!turbo.is_available_at(Location::OnSite));
    }

    #[test]
    fn location_parses_common_spellings() {
        assert_eq!("on-site".parse::<Location>(), Ok(Location::OnSite));
        assert_eq!(" In_Shop ".parse::<Location>(), Ok(Location::InShop));
        assert_eq!("dentro".parse::<Location>(), Ok(Location::InShop));
        assert!("garage".parse::<Location>().is_err());
    }

    #[test]
    fn location_serializes_as_kebab_case() {
        let json = serde_json::to_string(&Location::OnSite).expect("serialize location");
        assert_eq!(json, "\"on-site\"");
    }
}
