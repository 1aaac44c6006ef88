//! Quote calculation and the append-only quote log.

use crate::analysis::AnalysisResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod repository;
pub mod router;
pub mod service;

pub use repository::{QuoteRepository, RepositoryError};
pub use router::design_router;
pub use service::{AnalysisRun, DesignService, DesignServiceError};

/// Starting price for a fully custom design; no formula applies.
pub const CUSTOM_STARTING_PRICE: i64 = 650;

/// Lighting package the customer picks after analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignPackage {
    #[default]
    Classic,
    Premium,
    Custom,
}

impl DesignPackage {
    pub const ALL: [DesignPackage; 3] = [
        DesignPackage::Classic,
        DesignPackage::Premium,
        DesignPackage::Custom,
    ];

    /// Total price in whole dollars for this package against one measurement
    /// set.
    ///
    /// classic: roofline footage at the local rate plus a $50 base.
    /// premium: roofline and porch footage at 1.5x the rate, $45 per window
    /// for wreath/garland work, plus a $100 base.
    pub fn price(self, analysis: &AnalysisResult) -> i64 {
        let rate = analysis.price_per_foot;
        match self {
            DesignPackage::Classic => {
                (f64::from(analysis.roofline_length) * rate + 50.0).floor() as i64
            }
            DesignPackage::Premium => {
                let footage = f64::from(analysis.roofline_length + analysis.porch_length);
                let windows = f64::from(analysis.window_count) * 45.0;
                (footage * rate * 1.5 + windows + 100.0).floor() as i64
            }
            DesignPackage::Custom => CUSTOM_STARTING_PRICE,
        }
    }
}

/// Lifecycle label on a stored quote. Only one state exists today; the enum
/// keeps the serialized shape stable if acceptance tracking lands later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteStatus {
    Generated,
}

/// One generated quote: the chosen package, the analysis snapshot it priced,
/// and where the request came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Millisecond-timestamp-derived identifier, unique within the process.
    pub id: i64,
    pub design_type: DesignPackage,
    pub total_price: i64,
    pub analysis: AnalysisResult,
    /// Street address, or "Photo Upload" when the flow started from a photo.
    pub address: String,
    pub date: NaiveDate,
    pub status: QuoteStatus,
}
