use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::collections::HashMap;
use stockscope_api::reports::{Persona, StockReportRequest};
use stockscope_api::trends::MomentumParams;
use stockscope_api::{ApiError, ClientConfig, StockscopeClient};
use stockscope_shared_models::CalendarKey;

async fn spawn_backend(router: Router) -> StockscopeClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Fake backend crashed");
    });

    StockscopeClient::new(&ClientConfig::builder().base_url(format!("http://{addr}")).build())
        .expect("Failed to build client")
}

async fn prices_handler(Path(symbol): Path<String>) -> Result<Json<Value>, (StatusCode, String)> {
    if symbol != "AAPL" {
        return Err((StatusCode::NOT_FOUND, format!("Symbol {symbol} not found")));
    }

    Ok(Json(json!({
        "symbol": symbol,
        "points": [
            {"date": "2024-01-01", "open": 100.0, "high": 102.5, "low": 99.0, "close": 101.25},
            {"date": "2024-04-01", "open": 109, "high": 111, "low": 108, "close": 110},
        ],
    })))
}

/// Echoes the query back through the payload so the test can see it.
async fn forecast_handler(
    Path(symbol): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let start = query.get("start_date").cloned().unwrap_or_else(|| "none".into());
    let horizon: u32 = query.get("horizon").and_then(|h| h.parse().ok()).unwrap_or(0);

    Json(json!({
        "symbol": symbol,
        "points": [{"date": start, "close": horizon}],
    }))
}

async fn momentum_handler(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "lookback_days": query["lookback_days"].parse::<u32>().unwrap_or(0),
        "top": [{"ticker": format!("TOP{}", query["top_n"]), "ret_1m": 0.12}],
    }))
}

async fn report_handler(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "ticker": body["ticker"],
        "persona": body["persona"],
        "report_markdown": format!("# {} over {} days", body["ticker"].as_str().unwrap_or("?"), body["horizon_days"]),
    }))
}

fn router() -> Router {
    Router::new()
        .route("/tickers", get(|| async { Json(json!({"tickers": ["AAPL", "MSFT"]})) }))
        .route("/prices/{symbol}", get(prices_handler))
        .route("/forecast/{symbol}", get(forecast_handler))
        .route(
            "/trends/overview",
            get(|| async {
                Json(json!({
                    "last_date": "2024-04-01",
                    "index_1m_return": 0.021,
                    "pct_above_50d": 0.64,
                    "vol_regime": "Normal Volatility",
                    "num_new_highs": 12,
                }))
            }),
        )
        .route("/trends/momentum", get(momentum_handler))
        .route("/reports/stock", post(report_handler))
}

#[tokio::test]
async fn fetches_tickers() {
    let client = spawn_backend(router()).await;
    assert_eq!(client.tickers().await.unwrap(), ["AAPL", "MSFT"]);
}

#[tokio::test]
async fn fetches_price_history() {
    let client = spawn_backend(router()).await;
    let points = client.prices("AAPL").await.unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].date, CalendarKey::new("2024-01-01"));
    assert_eq!(points[0].close, Decimal::new(10125, 2));
    assert_eq!(points[1].close, Decimal::from(110));
}

#[tokio::test]
async fn non_success_status_is_an_error_with_body() {
    let client = spawn_backend(router()).await;
    let err = client.prices("NOPE").await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    match err {
        ApiError::Status { body, .. } => assert_eq!(body, "Symbol NOPE not found"),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn forecast_sends_window_start_and_horizon() {
    let client = spawn_backend(router()).await;
    let start = CalendarKey::new("2024-01-01");

    let points = client.forecast("AAPL", Some(&start)).await.unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].date, start);
    assert_eq!(points[0].predicted, Decimal::from(7));

    let points = client.forecast("AAPL", None).await.unwrap();
    assert_eq!(points[0].date.as_str(), "none");
}

#[tokio::test]
async fn fetches_overview_with_missing_fields_defaulted() {
    let client = spawn_backend(router()).await;
    let overview = client.trends_overview().await.unwrap();

    assert_eq!(overview.last_date, "2024-04-01");
    assert_eq!(overview.vol_regime, "Normal Volatility");
    assert_eq!(overview.num_new_highs, 12);
    assert_eq!(overview.pct_new_lows, 0.0);
}

#[tokio::test]
async fn momentum_params_are_clamped_and_missing_arrays_default() {
    let client = spawn_backend(router()).await;
    let params = MomentumParams::builder().lookback_days(500).top_n(0).build();

    let snapshot = client.momentum(params).await.unwrap();
    assert_eq!(snapshot.lookback_days, 126);
    assert_eq!(snapshot.top[0].ticker, "TOP1");
    assert!(snapshot.bottom.is_empty());
}

#[tokio::test]
async fn posts_stock_report_request() {
    let client = spawn_backend(router()).await;
    let request = StockReportRequest::builder()
        .ticker("AAPL")
        .persona(Persona::Skeptic)
        .horizon_days(90)
        .build();

    let report = client.stock_report(&request).await.unwrap();
    assert_eq!(report.ticker, "AAPL");
    assert_eq!(report.persona, "skeptic");
    assert_eq!(report.report_markdown, "# AAPL over 90 days");
}

#[tokio::test]
async fn missing_points_array_is_empty() {
    let router = Router::new().route(
        "/prices/{symbol}",
        get(|Path(symbol): Path<String>| async move { Json(json!({"symbol": symbol})) }),
    );
    let client = spawn_backend(router).await;

    assert!(client.prices("AAPL").await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let router = Router::new().route("/tickers", get(|| async { "<html>oops</html>" }));
    let client = spawn_backend(router).await;

    assert!(matches!(client.tickers().await, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        StockscopeClient::new(&ClientConfig::builder().base_url(format!("http://{addr}")).build())
            .unwrap();

    assert!(matches!(client.tickers().await, Err(ApiError::Transport(_))));
}
