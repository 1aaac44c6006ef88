//! Billing passthrough to the payments provider.
//!
//! Every operation forwards one-to-one to Stripe; this module adds no billing
//! logic of its own beyond parameter forwarding, response reshaping, and
//! webhook signature verification.

pub mod provider;
pub mod router;
pub mod stripe;
pub mod webhook;

pub use provider::{
    BillingError, BillingProvider, CustomerCreated, NewCustomer, NewSubscription,
    SetupIntentCreated, SubscriptionCreated,
};
pub use router::{billing_router, BillingState};
pub use stripe::StripeGateway;
