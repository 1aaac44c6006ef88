use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryQuoteRepository};
use crate::routes::operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lightcraft::analysis::SimulatedEstimator;
use lightcraft::billing::{billing_router, BillingState, StripeGateway};
use lightcraft::catalog::PlanCatalog;
use lightcraft::config::AppConfig;
use lightcraft::error::AppError;
use lightcraft::quote::{design_router, DesignService};
use lightcraft::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.billing.webhook_secret.is_empty() {
        warn!("STRIPE_WEBHOOK_SECRET is not set; all webhook requests will be rejected");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let estimator = Arc::new(SimulatedEstimator::new());
    let quotes = Arc::new(InMemoryQuoteRepository::default());
    let design_service = Arc::new(DesignService::new(estimator, quotes));

    let billing_state = BillingState {
        provider: Arc::new(StripeGateway::new(&config.billing)),
        catalog: Arc::new(PlanCatalog::standard(&config.billing)),
        webhook_secret: config.billing.webhook_secret.clone(),
    };

    let app = operational_routes()
        .merge(design_router(design_service))
        .merge(billing_router(billing_state))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lightcraft quoting service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
