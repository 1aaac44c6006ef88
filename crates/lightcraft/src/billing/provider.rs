use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Customer details collected at signup.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub email: String,
    pub name: String,
    pub company: String,
}

/// Subscription request pairing an existing customer with a catalog price.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub customer_id: String,
    pub price_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreated {
    pub customer_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCreated {
    pub subscription_id: String,
    /// Payment-intent client secret for the initial invoice, when the
    /// provider expanded one.
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupIntentCreated {
    pub client_secret: Option<String>,
}

/// Error raised by a billing provider. Handlers collapse every variant to a
/// generic 500; the detail only reaches the server log.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("provider transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("provider response missing field '{0}'")]
    MalformedResponse(&'static str),
}

/// Unified interface over the payments provider's subscription lifecycle.
///
/// Implementations own URL construction, authentication, and response
/// decoding. Subscription payloads are passed through as raw JSON so the
/// frontend sees exactly what the provider returned.
#[async_trait]
pub trait BillingProvider: Send + Sync + 'static {
    async fn create_customer(&self, customer: NewCustomer)
        -> Result<CustomerCreated, BillingError>;

    async fn create_subscription(
        &self,
        request: NewSubscription,
    ) -> Result<SubscriptionCreated, BillingError>;

    async fn create_setup_intent(
        &self,
        customer_id: &str,
    ) -> Result<SetupIntentCreated, BillingError>;

    /// Every subscription for the customer, any status, as provider-native
    /// JSON objects.
    async fn list_subscriptions(&self, customer_id: &str) -> Result<Vec<Value>, BillingError>;

    /// Request cancellation at period end. Idempotent from the caller's
    /// perspective: repeating the call returns the unchanged subscription.
    async fn cancel_subscription(&self, subscription_id: &str) -> Result<Value, BillingError>;
}
