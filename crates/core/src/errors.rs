use thiserror::Error;

use crate::domain::service::{Location, ServiceId};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("service `{0}` was not found in the catalog")]
    NotFound(ServiceId),
    #[error("service `{0}` is already defined in the catalog")]
    DuplicateService(ServiceId),
    #[error("invalid {location} price for `{service_id}`: {value} (must be a non-negative number)")]
    InvalidPrice { service_id: ServiceId, location: Location, value: f64 },
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum QuoteError {
    #[error("select at least one service or provide an extra amount")]
    EmptySelection,
    #[error("invalid quantity for {0}")]
    InvalidQuantity(String),
    #[error("the following services are not available at the selected location: {}", .0.join(", "))]
    ServiceUnavailableAtLocation(Vec<String>),
    #[error("no valid service was selected")]
    ZeroTotal,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl QuoteError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptySelection => "EMPTY_SELECTION",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::ServiceUnavailableAtLocation(_) => "SERVICE_UNAVAILABLE_AT_LOCATION",
            Self::ZeroTotal => "ZERO_TOTAL",
            Self::Catalog(CatalogError::NotFound(_)) => "SERVICE_NOT_FOUND",
            Self::Catalog(CatalogError::DuplicateService(_)) => "DUPLICATE_SERVICE",
            Self::Catalog(CatalogError::InvalidPrice { .. }) => "INVALID_PRICE",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no calculation found to summarize")]
    NoCalculation,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApplicationError {
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<CatalogError> for ApplicationError {
    fn from(value: CatalogError) -> Self {
        Self::Quote(QuoteError::Catalog(value))
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The quote could not be calculated. Check the selected services and amounts."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. } | Self::Internal { message, .. } => message,
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Quote(error) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Session(error) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}
