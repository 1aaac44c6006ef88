//! Simulated property analysis.
//!
//! Nothing here inspects a photo or geocodes an address: the estimator is an
//! explicit stub boundary that synthesizes front-facade measurements within
//! fixed ranges. Anything that can produce an [`AnalysisResult`] can stand in
//! behind the [`PropertyEstimator`] trait.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

/// Local market tier driving the per-foot installation rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeTier {
    Low,
    Medium,
    High,
}

impl IncomeTier {
    pub const ALL: [IncomeTier; 3] = [IncomeTier::Low, IncomeTier::Medium, IncomeTier::High];

    /// Installation rate in dollars per foot of roofline.
    pub fn price_per_foot(self) -> f64 {
        match self {
            IncomeTier::Low => 7.0,
            IncomeTier::Medium => 8.5,
            IncomeTier::High => 10.0,
        }
    }
}

/// Installer-facing difficulty label for the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Moderate,
    Complex,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Easy,
        Difficulty::Moderate,
        Difficulty::Complex,
    ];
}

/// What the customer handed us to analyze: an address, or nothing when the
/// flow started from a photo upload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub address: Option<String>,
}

impl AnalysisRequest {
    /// Label stored on quotes derived from this request.
    pub fn source_label(&self) -> String {
        match self.address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => address.to_string(),
            _ => "Photo Upload".to_string(),
        }
    }
}

/// Synthetic front-facade measurements produced by one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub roofline_length: u32,
    pub window_count: u32,
    pub door_count: u32,
    pub garage_door_count: u32,
    pub porch_length: u32,
    pub entry_feature_count: u32,
    pub price_per_foot: f64,
    pub income_level: IncomeTier,
    pub difficulty: Difficulty,
    pub estimated_install_hours: u32,
    pub recommendations: Vec<String>,
}

/// One checkpoint of the scripted analysis progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisStep {
    pub progress: u8,
    pub message: &'static str,
}

/// Fixed progress script every run walks through. The final checkpoint is
/// always 100.
pub const ANALYSIS_SCRIPT: [AnalysisStep; 7] = [
    AnalysisStep {
        progress: 15,
        message: "Detecting front roofline and facade...",
    },
    AnalysisStep {
        progress: 30,
        message: "Measuring front-facing roofline dimensions...",
    },
    AnalysisStep {
        progress: 45,
        message: "Identifying front windows and entryway...",
    },
    AnalysisStep {
        progress: 60,
        message: "Calculating front facade light placement...",
    },
    AnalysisStep {
        progress: 75,
        message: "Analyzing front porch and entrance features...",
    },
    AnalysisStep {
        progress: 90,
        message: "Generating front-facing design recommendations...",
    },
    AnalysisStep {
        progress: 100,
        message: "Front facade analysis complete!",
    },
];

/// Pause between checkpoints when the script is replayed interactively.
pub const STEP_CADENCE: Duration = Duration::from_millis(800);

fn standard_recommendations() -> Vec<String> {
    [
        "Outline front roofline with warm white LEDs",
        "Frame all front-facing windows with lights",
        "Add wreath to front door and garage doors",
        "Accent front porch columns and railings",
        "Consider mini lights on front landscaping",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Seam between the quoting flow and whatever produces measurements.
pub trait PropertyEstimator: Send + Sync {
    /// Produce one measurement set. Cannot fail: a simulated estimator has no
    /// error path, and a future real one is expected to degrade to defaults.
    fn estimate(&self, request: &AnalysisRequest) -> AnalysisResult;
}

/// Estimator that draws every measurement uniformly within the documented
/// ranges. The request only contributes its label; the numbers never depend
/// on it.
pub struct SimulatedEstimator {
    rng: Mutex<StdRng>,
}

impl SimulatedEstimator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic variant for tests and reproducible demos.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SimulatedEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyEstimator for SimulatedEstimator {
    fn estimate(&self, _request: &AnalysisRequest) -> AnalysisResult {
        let mut rng = self.rng.lock().expect("estimator rng mutex poisoned");

        let income_level = IncomeTier::ALL[rng.gen_range(0..IncomeTier::ALL.len())];
        let difficulty = Difficulty::ALL[rng.gen_range(0..Difficulty::ALL.len())];

        AnalysisResult {
            roofline_length: rng.gen_range(120..=220),
            window_count: rng.gen_range(3..=8),
            // Front facade only, so exactly one entry door.
            door_count: 1,
            garage_door_count: rng.gen_range(0..=2),
            porch_length: rng.gen_range(10..=40),
            entry_feature_count: rng.gen_range(1..=3),
            price_per_foot: income_level.price_per_foot(),
            income_level,
            difficulty,
            estimated_install_hours: rng.gen_range(2..=5),
            recommendations: standard_recommendations(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_rates_match_documented_mapping() {
        assert_eq!(IncomeTier::Low.price_per_foot(), 7.0);
        assert_eq!(IncomeTier::Medium.price_per_foot(), 8.5);
        assert_eq!(IncomeTier::High.price_per_foot(), 10.0);
    }

    #[test]
    fn simulated_measurements_stay_within_ranges() {
        let estimator = SimulatedEstimator::with_seed(7);
        let request = AnalysisRequest::default();
        for _ in 0..200 {
            let result = estimator.estimate(&request);
            assert!((120..=220).contains(&result.roofline_length));
            assert!((3..=8).contains(&result.window_count));
            assert_eq!(result.door_count, 1);
            assert!(result.garage_door_count <= 2);
            assert!((10..=40).contains(&result.porch_length));
            assert!((1..=3).contains(&result.entry_feature_count));
            assert!((2..=5).contains(&result.estimated_install_hours));
            assert_eq!(
                result.price_per_foot,
                result.income_level.price_per_foot(),
                "rate must match the drawn tier"
            );
            assert_eq!(result.recommendations.len(), 5);
        }
    }

    #[test]
    fn seeded_estimator_is_reproducible() {
        let request = AnalysisRequest::default();
        let first = SimulatedEstimator::with_seed(42).estimate(&request);
        let second = SimulatedEstimator::with_seed(42).estimate(&request);
        assert_eq!(first, second);
    }

    #[test]
    fn script_ends_at_completion() {
        assert_eq!(ANALYSIS_SCRIPT.len(), 7);
        assert_eq!(ANALYSIS_SCRIPT[0].progress, 15);
        assert_eq!(ANALYSIS_SCRIPT.last().expect("non-empty").progress, 100);
        assert!(ANALYSIS_SCRIPT.windows(2).all(|w| w[0].progress < w[1].progress));
    }

    #[test]
    fn request_label_falls_back_to_photo_upload() {
        assert_eq!(AnalysisRequest::default().source_label(), "Photo Upload");
        assert_eq!(
            AnalysisRequest {
                address: Some("  ".to_string())
            }
            .source_label(),
            "Photo Upload"
        );
        assert_eq!(
            AnalysisRequest {
                address: Some("12 Elm St".to_string())
            }
            .source_label(),
            "12 Elm St"
        );
    }
}
