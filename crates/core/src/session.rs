use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::cpq::catalog::Catalog;
use crate::cpq::pricing::{DeterministicPricingEngine, PricingEngine};
use crate::cpq::summary::SummaryBreakdown;
use crate::domain::quote::{QuoteRequest, QuoteResult};
use crate::domain::service::{Location, ServiceId};
use crate::errors::{CatalogError, QuoteError, SessionError};
use crate::feedback::ErrorFeedback;

/// Calculator state owned by the presentation side: the editable catalog, the
/// single current result, and the error feedback indicator.
pub struct QuoteSession<P = DeterministicPricingEngine> {
    catalog: Catalog,
    engine: P,
    current: Option<QuoteResult>,
    feedback: ErrorFeedback,
}

impl QuoteSession<DeterministicPricingEngine> {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_engine(catalog, DeterministicPricingEngine)
    }
}

impl<P: PricingEngine> QuoteSession<P> {
    pub fn with_engine(catalog: Catalog, engine: P) -> Self {
        Self { catalog, engine, current: None, feedback: ErrorFeedback::default() }
    }

    pub fn with_feedback_delay(mut self, revert_after: Duration) -> Self {
        self.feedback = ErrorFeedback::new(revert_after);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn set_price(
        &mut self,
        service_id: &ServiceId,
        location: Location,
        value: f64,
    ) -> Result<(), CatalogError> {
        self.catalog.set_price(service_id, location, value)
    }

    /// Replaces the current result on success. A failure leaves the previous
    /// result in place and raises the error feedback.
    pub fn calculate(&mut self, request: &QuoteRequest) -> Result<&QuoteResult, QuoteError> {
        match self.engine.price(&self.catalog, request) {
            Ok(result) => {
                debug!(
                    event_name = "session.quote.calculated",
                    final_total = result.final_total,
                    "current quote replaced"
                );
                self.feedback.reset();
                Ok(&*self.current.insert(result))
            }
            Err(error) => {
                warn!(
                    event_name = "session.quote.rejected",
                    error_code = error.code(),
                    error = %error,
                    "quote calculation rejected"
                );
                self.feedback.signal(error.to_string(), Instant::now());
                Err(error)
            }
        }
    }

    /// Recalculates only when there is something billable, mirroring the
    /// recalculation that runs on every input change.
    pub fn auto_calculate(
        &mut self,
        request: &QuoteRequest,
    ) -> Result<Option<&QuoteResult>, QuoteError> {
        if !request.has_billable_input() {
            return Ok(None);
        }
        self.calculate(request).map(Some)
    }

    pub fn current(&self) -> Option<&QuoteResult> {
        self.current.as_ref()
    }

    pub fn summary(&self) -> Result<SummaryBreakdown, SessionError> {
        self.current.as_ref().map(SummaryBreakdown::from_result).ok_or(SessionError::NoCalculation)
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.feedback.reset();
    }

    pub fn feedback(&mut self) -> &mut ErrorFeedback {
        &mut self.feedback
    }
}
