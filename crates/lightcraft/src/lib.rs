//! Domain library for the LightCraft seasonal-lighting platform: simulated
//! property analysis, quote calculation, the subscription plan catalog, and
//! the billing passthrough to Stripe.

pub mod analysis;
pub mod billing;
pub mod catalog;
pub mod config;
pub mod error;
pub mod quote;
pub mod telemetry;
