use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use lightcraft::quote::{Quote, QuoteRepository, RepositoryError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local quote log. Quotes live only as long as the service does,
/// matching the append-only semantics of the hosted flow.
#[derive(Default, Clone)]
pub(crate) struct InMemoryQuoteRepository {
    quotes: Arc<Mutex<Vec<Quote>>>,
}

impl QuoteRepository for InMemoryQuoteRepository {
    fn append(&self, quote: Quote) -> Result<Quote, RepositoryError> {
        let mut guard = self.quotes.lock().expect("quote mutex poisoned");
        guard.push(quote.clone());
        Ok(quote)
    }

    fn list(&self) -> Result<Vec<Quote>, RepositoryError> {
        let guard = self.quotes.lock().expect("quote mutex poisoned");
        Ok(guard.clone())
    }
}
