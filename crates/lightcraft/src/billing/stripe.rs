use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::provider::{
    BillingError, BillingProvider, CustomerCreated, NewCustomer, NewSubscription,
    SetupIntentCreated, SubscriptionCreated,
};
use crate::config::BillingConfig;

/// Stripe REST implementation of the billing seam.
///
/// Requests are form-encoded against `/v1` with bearer authentication, the
/// same parameter set the hosted dashboard flow uses. No retries and no
/// idempotency keys; the provider's own guarantees apply.
pub struct StripeGateway {
    http: Client,
    secret_key: String,
    api_base: String,
}

impl StripeGateway {
    pub fn new(config: &BillingConfig) -> Self {
        Self {
            http: Client::new(),
            secret_key: config.secret_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_base, path)
    }

    async fn decode(&self, response: reqwest::Response) -> Result<Value, BillingError> {
        let status = response.status();
        let body: Value = response.json().await?;

        if status.is_success() {
            return Ok(body);
        }

        let message = body["error"]["message"]
            .as_str()
            .unwrap_or("unknown provider error")
            .to_string();
        Err(BillingError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<Value, BillingError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await?;
        self.decode(response).await
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, BillingError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.secret_key)
            .query(query)
            .send()
            .await?;
        self.decode(response).await
    }
}

fn required_str(value: &Value, pointer: &str, field: &'static str) -> Result<String, BillingError> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(BillingError::MalformedResponse(field))
}

#[async_trait]
impl BillingProvider for StripeGateway {
    async fn create_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<CustomerCreated, BillingError> {
        let body = self
            .post_form(
                "customers",
                &[
                    ("email", customer.email.as_str()),
                    ("name", customer.name.as_str()),
                    ("metadata[company]", customer.company.as_str()),
                ],
            )
            .await?;

        Ok(CustomerCreated {
            customer_id: required_str(&body, "/id", "id")?,
        })
    }

    async fn create_subscription(
        &self,
        request: NewSubscription,
    ) -> Result<SubscriptionCreated, BillingError> {
        let body = self
            .post_form(
                "subscriptions",
                &[
                    ("customer", request.customer_id.as_str()),
                    ("items[0][price]", request.price_id.as_str()),
                    ("payment_behavior", "default_incomplete"),
                    (
                        "payment_settings[save_default_payment_method]",
                        "on_subscription",
                    ),
                    ("expand[]", "latest_invoice.payment_intent"),
                ],
            )
            .await?;

        let client_secret = body
            .pointer("/latest_invoice/payment_intent/client_secret")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(SubscriptionCreated {
            subscription_id: required_str(&body, "/id", "id")?,
            client_secret,
        })
    }

    async fn create_setup_intent(
        &self,
        customer_id: &str,
    ) -> Result<SetupIntentCreated, BillingError> {
        let body = self
            .post_form(
                "setup_intents",
                &[
                    ("customer", customer_id),
                    ("payment_method_types[]", "card"),
                ],
            )
            .await?;

        Ok(SetupIntentCreated {
            client_secret: body["client_secret"].as_str().map(str::to_string),
        })
    }

    async fn list_subscriptions(&self, customer_id: &str) -> Result<Vec<Value>, BillingError> {
        let body = self
            .get(
                "subscriptions",
                &[
                    ("customer", customer_id),
                    ("status", "all"),
                    ("expand[]", "data.default_payment_method"),
                ],
            )
            .await?;

        match body["data"].as_array() {
            Some(items) => Ok(items.clone()),
            None => Err(BillingError::MalformedResponse("data")),
        }
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> Result<Value, BillingError> {
        self.post_form(
            &format!("subscriptions/{subscription_id}"),
            &[("cancel_at_period_end", "true")],
        )
        .await
    }
}
