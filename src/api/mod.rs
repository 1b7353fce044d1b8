//! HTTP surface: routing, CORS and request tracing around the allocation core.

pub mod error;
pub mod stocks;

use crate::core::config::AppConfig;
use crate::core::instrument::Instrument;
use crate::core::price::PriceProvider;
use crate::core::quotes::PriceLookup;
use crate::providers::yahoo_finance::YahooFinanceProvider;
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Read-only state shared by all requests.
pub struct AppState {
    pub instruments: Arc<[Instrument]>,
    pub lookup: PriceLookup,
}

impl AppState {
    pub fn new(instruments: Vec<Instrument>, provider: Arc<dyn PriceProvider>) -> Self {
        AppState {
            instruments: instruments.into(),
            lookup: PriceLookup::new(provider),
        }
    }

    /// Builds the state from configuration, using the Yahoo Finance provider.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = YahooFinanceProvider::new(config.providers.yahoo_base_url())?;
        Ok(Self::new(config.instruments.clone(), Arc::new(provider)))
    }
}

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(stocks::health))
        .route("/api/stocks", get(stocks::get_stocks))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the configured address and serves until the process is stopped.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    let router = app_router(state);

    let addr = config.server.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::price::PriceResult;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    // Prices are looked up from a fixed table; the first ticker answers last
    struct MockPriceProvider {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl PriceProvider for MockPriceProvider {
        async fn fetch_price(&self, symbol: &str) -> anyhow::Result<PriceResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let price = match symbol {
                "BHARTIARTL.NS" => {
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    1503.25
                }
                "HDFCBANK.NS" => 1650.0,
                _ => anyhow::bail!("Request timed out for symbol: {}", symbol),
            };
            Ok(PriceResult { price })
        }
    }

    fn make_router() -> (Router, Arc<MockPriceProvider>) {
        let provider = Arc::new(MockPriceProvider {
            calls: AtomicUsize::new(0),
        });
        let instruments = vec![
            Instrument::new("BHARTIARTL.NS", "Bharti Airtel Limited", 4.4),
            Instrument::new("ICRA.NS", "ICRA Limited", 2.83),
            Instrument::new("HDFCBANK.NS", "HDFC Bank Limited", 4.08),
        ];
        let state = Arc::new(AppState::new(instruments, provider.clone()));
        (app_router(state), provider)
    }

    async fn call(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = make_router();
        let (status, body) = call(router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(body).unwrap(), "Stock API is running");
    }

    #[tokio::test]
    async fn test_stocks_with_investment() {
        let (router, provider) = make_router();
        let (status, body) = call(router, "/api/stocks?investment=100000").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["investment_amount"], 100000.0);
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));

        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data[0]["stock_ticker"], "BHARTIARTL.NS");
        assert_eq!(data[0]["last_traded_price"], 1503.25);
        assert_eq!(data[0]["allocated_amount"], 4400);
        assert_eq!(data[0]["allocated_quantity"], 3);

        assert_eq!(data[1]["stock_ticker"], "ICRA.NS");
        assert_eq!(data[1]["last_traded_price"], "N/A");
        assert!(data[1]["allocated_amount"].is_null());
        assert!(data[1]["allocated_quantity"].is_null());

        assert_eq!(data[2]["stock_name"], "HDFC Bank Limited");
        assert_eq!(data[2]["allocated_amount"], 4080);
        assert_eq!(data[2]["allocated_quantity"], 3);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stocks_without_investment() {
        let (router, _) = make_router();
        let (status, body) = call(router, "/api/stocks").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["investment_amount"].is_null());
        for row in json["data"].as_array().unwrap() {
            assert!(row["allocated_amount"].is_null());
            assert!(row["allocated_quantity"].is_null());
        }
        assert_eq!(json["data"][0]["last_traded_price"], 1503.25);
    }

    #[tokio::test]
    async fn test_invalid_investment_is_rejected_before_lookup() {
        for investment in ["abc", "-5", "0"] {
            let (router, provider) = make_router();
            let (status, body) = call(router, &format!("/api/stocks?investment={investment}")).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{investment}");

            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["success"], false);
            assert_eq!(json["error"], "Investment amount must be a positive number");
            assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_malformed_query_returns_json_error() {
        let (router, provider) = make_router();
        let request = Request::builder()
            .uri("/api/stocks?investment=1&investment=2")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .contains("duplicate field `investment`")
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_investment_with_trailing_text_is_accepted() {
        let (router, _) = make_router();
        let (status, body) = call(router, "/api/stocks?investment=100000abc").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["investment_amount"], 100000.0);
        assert_eq!(json["data"][0]["allocated_amount"], 4400);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let (router, _) = make_router();
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "https://example.com")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
