pub mod error;
pub mod forecast;
pub mod method;
pub mod prices;
pub mod reports;
pub mod tickers;
pub mod trends;

pub use error::ApiError;
pub use reqwest::StatusCode;

use bon::Builder;
use reqwest::{Client, ClientBuilder, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use stockscope_shared_models::{CalendarKey, ForecastPoint, PricePoint};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct ClientConfig {
    pub base_url: String,
    #[builder(default = Duration::from_secs(30))]
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().base_url(DEFAULT_BASE_URL).build()
    }
}

#[derive(Debug, Clone)]
pub struct StockscopeClient {
    base_url: Url,
    reqwest: Client,
}

impl StockscopeClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(config.base_url.trim())
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ApiError::BaseUrl(config.base_url.clone()))?;

        let reqwest = ClientBuilder::new()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self { base_url, reqwest })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, segment: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.split('/'));
            if let Some(segment) = segment {
                segments.push(segment);
            }
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        let body = response.bytes().await.map_err(ApiError::Transport)?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub(crate) async fn get<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        url: Url,
        params: &P,
    ) -> Result<T, ApiError> {
        debug!(%url, "GET");
        self.send(self.reqwest.get(url).query(params)).await
    }

    pub async fn call<M: method::Method>(&self, params: M::Params) -> Result<M::Response, ApiError> {
        let url = self.endpoint(M::PATH, M::segment(&params));
        self.get(url, &params).await
    }

    pub async fn call0<M: method::Method0>(&self) -> Result<M::Response, ApiError> {
        let url = self.endpoint(M::PATH, None);
        debug!(%url, "GET");
        self.send(self.reqwest.get(url)).await
    }

    pub async fn post<M: method::PostMethod>(&self, body: &M::Body) -> Result<M::Response, ApiError> {
        let url = self.endpoint(M::PATH, None);
        debug!(%url, "POST");
        self.send(self.reqwest.post(url).json(body)).await
    }

    pub async fn tickers(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.call0::<tickers::Tickers>().await?.tickers)
    }

    pub async fn prices(&self, symbol: &str) -> Result<Vec<PricePoint>, ApiError> {
        let params = prices::PricesParams::builder().symbol(symbol).build();
        Ok(self.call::<prices::Prices>(params).await?.points)
    }

    pub async fn forecast(
        &self,
        symbol: &str,
        start_date: Option<&CalendarKey>,
    ) -> Result<Vec<ForecastPoint>, ApiError> {
        let params = forecast::ForecastParams::builder()
            .symbol(symbol)
            .maybe_start_date(start_date.cloned())
            .build();
        Ok(self.call::<forecast::Forecast>(params).await?.into_points())
    }

    pub async fn trends_overview(&self) -> Result<trends::TrendsOverview, ApiError> {
        self.call0::<trends::Overview>().await
    }

    pub async fn momentum(
        &self,
        params: trends::MomentumParams,
    ) -> Result<trends::MomentumSnapshot, ApiError> {
        self.call::<trends::Momentum>(params.clamped()).await
    }

    pub async fn stock_report(
        &self,
        request: &reports::StockReportRequest,
    ) -> Result<reports::StockReportResponse, ApiError> {
        self.post::<reports::StockReport>(request).await
    }
}
