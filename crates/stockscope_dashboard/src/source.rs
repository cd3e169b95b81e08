use crate::dashboard::{Command, Outcome};
use std::future::Future;
use stockscope_api::reports::{StockReportRequest, StockReportResponse};
use stockscope_api::trends::{MomentumParams, MomentumSnapshot, TrendsOverview};
use stockscope_api::{ApiError, StockscopeClient};
use stockscope_shared_models::{CalendarKey, ForecastPoint, PricePoint};

/// Where the dashboard's data comes from.
pub trait MarketSource: Send + Sync {
    fn prices(&self, symbol: &str) -> impl Future<Output = Result<Vec<PricePoint>, ApiError>> + Send;

    fn forecast(
        &self,
        symbol: &str,
        start_date: Option<&CalendarKey>,
    ) -> impl Future<Output = Result<Vec<ForecastPoint>, ApiError>> + Send;

    fn trends_overview(&self) -> impl Future<Output = Result<TrendsOverview, ApiError>> + Send;

    fn momentum(
        &self,
        params: MomentumParams,
    ) -> impl Future<Output = Result<MomentumSnapshot, ApiError>> + Send;

    fn stock_report(
        &self,
        request: &StockReportRequest,
    ) -> impl Future<Output = Result<StockReportResponse, ApiError>> + Send;
}

impl MarketSource for StockscopeClient {
    fn prices(&self, symbol: &str) -> impl Future<Output = Result<Vec<PricePoint>, ApiError>> + Send {
        StockscopeClient::prices(self, symbol)
    }

    fn forecast(
        &self,
        symbol: &str,
        start_date: Option<&CalendarKey>,
    ) -> impl Future<Output = Result<Vec<ForecastPoint>, ApiError>> + Send {
        StockscopeClient::forecast(self, symbol, start_date)
    }

    fn trends_overview(&self) -> impl Future<Output = Result<TrendsOverview, ApiError>> + Send {
        StockscopeClient::trends_overview(self)
    }

    fn momentum(
        &self,
        params: MomentumParams,
    ) -> impl Future<Output = Result<MomentumSnapshot, ApiError>> + Send {
        StockscopeClient::momentum(self, params)
    }

    fn stock_report(
        &self,
        request: &StockReportRequest,
    ) -> impl Future<Output = Result<StockReportResponse, ApiError>> + Send {
        StockscopeClient::stock_report(self, request)
    }
}

/// Performs one [`Command`] and tags the result the way it was issued.
pub async fn execute<S: MarketSource>(source: &S, command: Command) -> Outcome {
    match command {
        Command::FetchHistory(ticket) => {
            let result = source.prices(&ticket.symbol).await;
            Outcome::History(ticket, result)
        }
        Command::FetchForecast(request) => {
            let result = source
                .forecast(&request.ticket.symbol, request.start_date.as_ref())
                .await;
            Outcome::Forecast(request.ticket, result)
        }
        Command::FetchTrends { generation, params } => {
            let (overview, momentum) =
                tokio::join!(source.trends_overview(), source.momentum(params));
            Outcome::Trends(generation, overview.and_then(|overview| Ok((overview, momentum?))))
        }
        Command::GenerateReport { ticket, request } => {
            let result = source.stock_report(&request).await;
            Outcome::Report(ticket, result)
        }
    }
}
