use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::QuoteRepository;
use super::service::{DesignService, DesignServiceError};
use super::DesignPackage;
use crate::analysis::{AnalysisRequest, AnalysisResult, PropertyEstimator};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateQuoteRequest {
    pub(crate) design_type: DesignPackage,
    pub(crate) analysis: AnalysisResult,
    #[serde(default)]
    pub(crate) address: Option<String>,
}

/// Router builder exposing the design flow: run an analysis, price a package,
/// list stored quotes.
pub fn design_router<E, Q>(service: Arc<DesignService<E, Q>>) -> Router
where
    E: PropertyEstimator + 'static,
    Q: QuoteRepository + 'static,
{
    Router::new()
        .route("/api/design/analyze", post(analyze_handler::<E, Q>))
        .route("/api/design/quote", post(quote_handler::<E, Q>))
        .route("/api/design/quotes", get(quotes_handler::<E, Q>))
        .with_state(service)
}

pub(crate) async fn analyze_handler<E, Q>(
    State(service): State<Arc<DesignService<E, Q>>>,
    axum::Json(request): axum::Json<AnalysisRequest>,
) -> Response
where
    E: PropertyEstimator + 'static,
    Q: QuoteRepository + 'static,
{
    let run = service.analyze(&request);
    (StatusCode::OK, axum::Json(run)).into_response()
}

pub(crate) async fn quote_handler<E, Q>(
    State(service): State<Arc<DesignService<E, Q>>>,
    axum::Json(request): axum::Json<GenerateQuoteRequest>,
) -> Response
where
    E: PropertyEstimator + 'static,
    Q: QuoteRepository + 'static,
{
    let GenerateQuoteRequest {
        design_type,
        analysis,
        address,
    } = request;

    let label = AnalysisRequest { address }.source_label();
    match service.generate_quote(design_type, analysis, label) {
        Ok(quote) => (StatusCode::CREATED, axum::Json(quote)).into_response(),
        Err(DesignServiceError::Repository(error)) => {
            tracing::error!(%error, "failed to store quote");
            let payload = json!({ "error": "Failed to generate quote" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn quotes_handler<E, Q>(
    State(service): State<Arc<DesignService<E, Q>>>,
) -> Response
where
    E: PropertyEstimator + 'static,
    Q: QuoteRepository + 'static,
{
    match service.quotes() {
        Ok(quotes) => (StatusCode::OK, axum::Json(json!({ "quotes": quotes }))).into_response(),
        Err(error) => {
            tracing::error!(%error, "failed to list quotes");
            let payload = json!({ "error": "Failed to list quotes" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
