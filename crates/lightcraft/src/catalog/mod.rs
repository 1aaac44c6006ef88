//! Static subscription plan catalog.
//!
//! The three tiers are fixed; only the external price references vary by
//! deployment and come from [`BillingConfig`].

use crate::config::BillingConfig;
use serde::Serialize;

/// A named subscription tier. `price` is in minor currency units and null for
/// the custom-priced enterprise tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub id: String,
    pub name: String,
    pub price: Option<u32>,
    pub price_id: Option<String>,
    pub features: Vec<String>,
}

/// The catalog served by the pricing-plans endpoint. Always exactly three
/// plans, in display order.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Vec<PricingPlan>,
}

fn features(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

impl PlanCatalog {
    pub fn standard(billing: &BillingConfig) -> Self {
        let plans = vec![
            PricingPlan {
                id: "basic".to_string(),
                name: "Basic Business".to_string(),
                price: Some(4900),
                price_id: Some(billing.basic_price_id.clone()),
                features: features(&[
                    "50 quote generations per month",
                    "AI roofline measurement",
                    "3D design mockups",
                    "Professional quote templates",
                    "Customer-ready presentations",
                ]),
            },
            PricingPlan {
                id: "professional".to_string(),
                name: "Professional".to_string(),
                price: Some(12900),
                price_id: Some(billing.professional_price_id.clone()),
                features: features(&[
                    "Unlimited quote generations",
                    "Advanced AI property analysis",
                    "Custom pricing & markup tools",
                    "CRM integration",
                    "White-label presentations",
                    "Automated material calculations",
                ]),
            },
            PricingPlan {
                id: "enterprise".to_string(),
                name: "Enterprise".to_string(),
                price: None,
                price_id: None,
                features: features(&[
                    "Everything in Professional",
                    "Multi-location management",
                    "Team collaboration tools",
                    "Advanced analytics & reporting",
                    "API access & integrations",
                    "Dedicated account manager",
                ]),
            },
        ];

        Self { plans }
    }

    pub fn plans(&self) -> &[PricingPlan] {
        &self.plans
    }
}
