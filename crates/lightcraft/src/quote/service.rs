use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{Local, Utc};
use serde::Serialize;

use super::repository::{QuoteRepository, RepositoryError};
use super::{DesignPackage, Quote, QuoteStatus};
use crate::analysis::{
    AnalysisRequest, AnalysisResult, AnalysisStep, PropertyEstimator, ANALYSIS_SCRIPT,
};

/// Finished analysis run: the synthesized measurements plus the progress
/// script the caller may replay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRun {
    pub analysis: AnalysisResult,
    pub steps: &'static [AnalysisStep],
}

static QUOTE_SEQUENCE: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp, bumped past the previous id when two quotes land in
/// the same millisecond.
fn next_quote_id() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut previous = QUOTE_SEQUENCE.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(previous + 1);
        match QUOTE_SEQUENCE.compare_exchange_weak(
            previous,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(observed) => previous = observed,
        }
    }
}

/// Service composing the estimation seam and the quote log.
pub struct DesignService<E, Q> {
    estimator: Arc<E>,
    quotes: Arc<Q>,
}

impl<E, Q> DesignService<E, Q>
where
    E: PropertyEstimator + 'static,
    Q: QuoteRepository + 'static,
{
    pub fn new(estimator: Arc<E>, quotes: Arc<Q>) -> Self {
        Self { estimator, quotes }
    }

    /// Run one analysis. Always succeeds and always walks the full script;
    /// there is no cancellation once a run starts.
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisRun {
        AnalysisRun {
            analysis: self.estimator.estimate(request),
            steps: &ANALYSIS_SCRIPT,
        }
    }

    /// Price the chosen package against an analysis snapshot and append the
    /// resulting quote to the log.
    pub fn generate_quote(
        &self,
        design_type: DesignPackage,
        analysis: AnalysisResult,
        address: String,
    ) -> Result<Quote, DesignServiceError> {
        let quote = Quote {
            id: next_quote_id(),
            total_price: design_type.price(&analysis),
            design_type,
            analysis,
            address,
            date: Local::now().date_naive(),
            status: QuoteStatus::Generated,
        };

        let stored = self.quotes.append(quote)?;
        Ok(stored)
    }

    /// All quotes generated so far, oldest first.
    pub fn quotes(&self) -> Result<Vec<Quote>, DesignServiceError> {
        Ok(self.quotes.list()?)
    }
}

/// Error raised by the design service.
#[derive(Debug, thiserror::Error)]
pub enum DesignServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
