use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::provider::{BillingError, BillingProvider, NewCustomer, NewSubscription};
use super::webhook::{self, SIGNATURE_TOLERANCE};
use crate::catalog::PlanCatalog;

/// Shared state for the billing routes.
pub struct BillingState<P> {
    pub provider: Arc<P>,
    pub catalog: Arc<PlanCatalog>,
    pub webhook_secret: String,
}

impl<P> Clone for BillingState<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            catalog: Arc::clone(&self.catalog),
            webhook_secret: self.webhook_secret.clone(),
        }
    }
}

/// Router builder exposing the Stripe passthrough surface.
pub fn billing_router<P: BillingProvider>(state: BillingState<P>) -> Router {
    Router::new()
        .route(
            "/api/stripe/create-customer",
            post(create_customer_handler::<P>),
        )
        .route(
            "/api/stripe/create-subscription",
            post(create_subscription_handler::<P>),
        )
        .route(
            "/api/stripe/create-setup-intent",
            post(create_setup_intent_handler::<P>),
        )
        .route(
            "/api/stripe/subscriptions/:customer_id",
            get(subscriptions_handler::<P>),
        )
        .route(
            "/api/stripe/cancel-subscription/:subscription_id",
            post(cancel_subscription_handler::<P>),
        )
        .route("/api/stripe/pricing-plans", get(pricing_plans_handler::<P>))
        .route("/api/stripe/webhook", post(webhook_handler::<P>))
        .with_state(state)
}

/// Provider failures all collapse to a generic 500; the detail stays in the
/// server log.
fn provider_failure(error: BillingError, message: &str) -> Response {
    tracing::error!(%error, "{message}");
    let payload = json!({ "error": message });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

pub(crate) async fn create_customer_handler<P: BillingProvider>(
    State(state): State<BillingState<P>>,
    axum::Json(customer): axum::Json<NewCustomer>,
) -> Response {
    match state.provider.create_customer(customer).await {
        Ok(created) => (StatusCode::OK, axum::Json(created)).into_response(),
        Err(error) => provider_failure(error, "Failed to create customer"),
    }
}

pub(crate) async fn create_subscription_handler<P: BillingProvider>(
    State(state): State<BillingState<P>>,
    axum::Json(request): axum::Json<NewSubscription>,
) -> Response {
    match state.provider.create_subscription(request).await {
        Ok(created) => (StatusCode::OK, axum::Json(created)).into_response(),
        Err(error) => provider_failure(error, "Failed to create subscription"),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SetupIntentRequest {
    pub(crate) customer_id: String,
}

pub(crate) async fn create_setup_intent_handler<P: BillingProvider>(
    State(state): State<BillingState<P>>,
    axum::Json(request): axum::Json<SetupIntentRequest>,
) -> Response {
    match state.provider.create_setup_intent(&request.customer_id).await {
        Ok(created) => (StatusCode::OK, axum::Json(created)).into_response(),
        Err(error) => provider_failure(error, "Failed to create setup intent"),
    }
}

pub(crate) async fn subscriptions_handler<P: BillingProvider>(
    State(state): State<BillingState<P>>,
    Path(customer_id): Path<String>,
) -> Response {
    match state.provider.list_subscriptions(&customer_id).await {
        Ok(subscriptions) => (
            StatusCode::OK,
            axum::Json(json!({ "subscriptions": subscriptions })),
        )
            .into_response(),
        Err(error) => provider_failure(error, "Failed to get subscriptions"),
    }
}

pub(crate) async fn cancel_subscription_handler<P: BillingProvider>(
    State(state): State<BillingState<P>>,
    Path(subscription_id): Path<String>,
) -> Response {
    match state.provider.cancel_subscription(&subscription_id).await {
        Ok(subscription) => (
            StatusCode::OK,
            axum::Json(json!({ "subscription": subscription })),
        )
            .into_response(),
        Err(error) => provider_failure(error, "Failed to cancel subscription"),
    }
}

pub(crate) async fn pricing_plans_handler<P: BillingProvider>(
    State(state): State<BillingState<P>>,
) -> Response {
    (
        StatusCode::OK,
        axum::Json(json!({ "plans": state.catalog.plans() })),
    )
        .into_response()
}

/// Raw-body webhook endpoint. Signature failures reject the request with 400
/// before any payload inspection.
pub(crate) async fn webhook_handler<P: BillingProvider>(
    State(state): State<BillingState<P>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let now = Utc::now().timestamp();
    if let Err(error) = webhook::verify_signature(
        &body,
        signature,
        &state.webhook_secret,
        now,
        SIGNATURE_TOLERANCE,
    ) {
        tracing::warn!(%error, "webhook signature verification failed");
        let payload = json!({ "error": format!("Webhook Error: {error}") });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    }

    let event: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(error) => {
            tracing::warn!(%error, "webhook payload is not valid JSON");
            let payload = json!({ "error": "Webhook Error: invalid payload" });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    webhook::dispatch_event(&event);
    (StatusCode::OK, axum::Json(json!({ "received": true }))).into_response()
}
