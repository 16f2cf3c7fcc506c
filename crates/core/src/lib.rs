pub mod config;
pub mod cpq;
pub mod domain;
pub mod errors;
pub mod feedback;
pub mod format;
pub mod input;
pub mod session;

pub use cpq::{compute_quote, Catalog, PricingEngine, SummaryBreakdown};
pub use domain::quote::{LineResult, QuoteRequest, QuoteResult, SelectionLine};
pub use domain::service::{Location, ServiceDefinition, ServiceId};
pub use errors::{ApplicationError, CatalogError, InterfaceError, QuoteError, SessionError};
pub use input::QuoteForm;
pub use session::QuoteSession;
