//! Wire-level checks for the Stripe gateway: exact form parameters, bearer
//! authentication, response reshaping, and error mapping, against a local
//! mock of the provider's REST surface.

use httpmock::prelude::*;
use serde_json::json;

use lightcraft::billing::{BillingProvider, NewCustomer, NewSubscription, StripeGateway};
use lightcraft::config::BillingConfig;

fn gateway_for(server: &MockServer) -> StripeGateway {
    StripeGateway::new(&BillingConfig {
        secret_key: "sk_test_wire".to_string(),
        webhook_secret: String::new(),
        basic_price_id: "price_basic".to_string(),
        professional_price_id: "price_professional".to_string(),
        api_base: server.base_url(),
    })
}

#[tokio::test]
async fn create_customer_forwards_fields_and_company_metadata() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/customers")
                .header("authorization", "Bearer sk_test_wire")
                .form_urlencoded_tuple("email", "jess@example.com")
                .form_urlencoded_tuple("name", "Jess Doe")
                .form_urlencoded_tuple("metadata[company]", "Glow Co");
            then.status(200).json_body(json!({ "id": "cus_777" }));
        })
        .await;

    let created = gateway_for(&server)
        .create_customer(NewCustomer {
            email: "jess@example.com".to_string(),
            name: "Jess Doe".to_string(),
            company: "Glow Co".to_string(),
        })
        .await
        .expect("customer created");

    mock.assert_async().await;
    assert_eq!(created.customer_id, "cus_777");
}

#[tokio::test]
async fn create_subscription_requests_incomplete_payment_and_expansion() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/subscriptions")
                .form_urlencoded_tuple("customer", "cus_777")
                .form_urlencoded_tuple("items[0][price]", "price_basic")
                .form_urlencoded_tuple("payment_behavior", "default_incomplete")
                .form_urlencoded_tuple(
                    "payment_settings[save_default_payment_method]",
                    "on_subscription",
                )
                .form_urlencoded_tuple("expand[]", "latest_invoice.payment_intent");
            then.status(200).json_body(json!({
                "id": "sub_555",
                "latest_invoice": {
                    "payment_intent": { "client_secret": "pi_555_secret" }
                }
            }));
        })
        .await;

    let created = gateway_for(&server)
        .create_subscription(NewSubscription {
            customer_id: "cus_777".to_string(),
            price_id: "price_basic".to_string(),
        })
        .await
        .expect("subscription created");

    mock.assert_async().await;
    assert_eq!(created.subscription_id, "sub_555");
    assert_eq!(created.client_secret.as_deref(), Some("pi_555_secret"));
}

#[tokio::test]
async fn create_setup_intent_requests_card_method() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/setup_intents")
                .form_urlencoded_tuple("customer", "cus_777")
                .form_urlencoded_tuple("payment_method_types[]", "card");
            then.status(200)
                .json_body(json!({ "id": "seti_1", "client_secret": "seti_1_secret" }));
        })
        .await;

    let created = gateway_for(&server)
        .create_setup_intent("cus_777")
        .await
        .expect("setup intent created");

    mock.assert_async().await;
    assert_eq!(created.client_secret.as_deref(), Some("seti_1_secret"));
}

#[tokio::test]
async fn list_subscriptions_queries_all_statuses() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/subscriptions")
                .query_param("customer", "cus_777")
                .query_param("status", "all")
                .query_param("expand[]", "data.default_payment_method");
            then.status(200).json_body(json!({
                "object": "list",
                "data": [{ "id": "sub_1" }, { "id": "sub_2" }]
            }));
        })
        .await;

    let subscriptions = gateway_for(&server)
        .list_subscriptions("cus_777")
        .await
        .expect("subscriptions listed");

    mock.assert_async().await;
    assert_eq!(subscriptions.len(), 2);
    assert_eq!(subscriptions[1]["id"], "sub_2");
}

#[tokio::test]
async fn cancel_subscription_sets_cancel_at_period_end() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/subscriptions/sub_555")
                .form_urlencoded_tuple("cancel_at_period_end", "true");
            then.status(200).json_body(json!({
                "id": "sub_555",
                "status": "active",
                "cancel_at_period_end": true
            }));
        })
        .await;

    let subscription = gateway_for(&server)
        .cancel_subscription("sub_555")
        .await
        .expect("cancellation requested");

    mock.assert_async().await;
    assert_eq!(subscription["cancel_at_period_end"], true);
}

#[tokio::test]
async fn provider_error_bodies_surface_as_api_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/customers");
            then.status(402).json_body(json!({
                "error": { "message": "Your card was declined." }
            }));
        })
        .await;

    let error = gateway_for(&server)
        .create_customer(NewCustomer {
            email: "jess@example.com".to_string(),
            name: "Jess Doe".to_string(),
            company: "Glow Co".to_string(),
        })
        .await
        .expect_err("provider rejects");

    let rendered = error.to_string();
    assert!(rendered.contains("402"), "unexpected error: {rendered}");
    assert!(rendered.contains("declined"), "unexpected error: {rendered}");
}
