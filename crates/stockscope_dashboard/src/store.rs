use crate::generation::{Generation, Ticket};
use itertools::Itertools;
use stockscope_api::ApiError;
use stockscope_chart_engine::{CandleIndex, Window, WindowError, merge};
use stockscope_shared_models::{CalendarKey, ChartPoint, ForecastPoint, PricePoint};
use tracing::{debug, info, warn};

/// A forecast fetch for the window start that was active when it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub ticket: Ticket,
    pub start_date: Option<CalendarKey>,
}

/// Per-symbol series: full history, the candle view derived from it, the
/// active window, and the forecast for that window.
///
/// History and forecast are replaced wholesale. A response is applied only
/// while its ticket is the latest of its kind and names the selected symbol.
#[derive(Debug, Default)]
pub struct SeriesStore {
    symbol: Option<String>,
    history: Vec<PricePoint>,
    candles: CandleIndex,
    forecast: Vec<ForecastPoint>,
    window: Window,
    loading: bool,
    forecast_loading: bool,
    error: Option<String>,
    forecast_error: Option<String>,
    history_generation: Generation,
    forecast_generation: Generation,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn history(&self) -> &[PricePoint] {
        &self.history
    }

    pub fn candles(&self) -> &CandleIndex {
        &self.candles
    }

    pub fn forecast(&self) -> &[ForecastPoint] {
        &self.forecast
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_forecast_loading(&self) -> bool {
        self.forecast_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn forecast_error(&self) -> Option<&str> {
        self.forecast_error.as_deref()
    }

    /// Switches to `symbol` and returns the history fetch to run. Everything
    /// held for the previous symbol is dropped and any forecast in flight is
    /// superseded.
    pub fn select(&mut self, symbol: &str) -> Option<Ticket> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return None;
        }

        self.symbol = Some(symbol.clone());
        self.clear_series();
        self.window = Window::unset();
        self.loading = true;
        self.error = None;
        self.forecast_generation.advance();

        let generation = self.history_generation.advance();
        debug!(%symbol, generation, "history fetch issued");

        Some(Ticket { generation, symbol })
    }

    /// Loads the selected symbol again from scratch.
    pub fn reload(&mut self) -> Option<Ticket> {
        let symbol = self.symbol.clone()?;
        self.select(&symbol)
    }

    fn accepts(&self, generation: &Generation, ticket: &Ticket) -> bool {
        generation.is_current(ticket.generation) && self.symbol.as_deref() == Some(ticket.symbol.as_str())
    }

    fn clear_series(&mut self) {
        self.history.clear();
        self.candles = CandleIndex::default();
        self.forecast.clear();
        self.forecast_loading = false;
        self.forecast_error = None;
    }

    /// Applies a history response. On success the default window is computed
    /// (unless the user already picked one) and the dependent forecast fetch
    /// is returned.
    pub fn apply_history(
        &mut self,
        ticket: &Ticket,
        result: Result<Vec<PricePoint>, ApiError>,
    ) -> Option<ForecastRequest> {
        if !self.accepts(&self.history_generation, ticket) {
            debug!(symbol = %ticket.symbol, generation = ticket.generation, "discarding stale history");
            return None;
        }

        self.loading = false;

        match result {
            Ok(history) => {
                if !history.iter().tuple_windows().all(|(a, b)| a.date < b.date) {
                    warn!(symbol = %ticket.symbol, "history is not strictly ascending by date");
                }

                info!(symbol = %ticket.symbol, points = history.len(), "history loaded");
                self.candles = CandleIndex::from_history(&history);
                self.history = history;
                self.error = None;

                if !self.window.is_manual() {
                    self.window.reset_to_default(&self.history);
                }

                Some(self.request_forecast(ticket.symbol.clone()))
            }
            Err(err) => {
                warn!(symbol = %ticket.symbol, "history fetch failed: {err}");
                self.clear_series();
                self.window = Window::unset();
                self.error = Some(err.to_string());
                None
            }
        }
    }

    fn request_forecast(&mut self, symbol: String) -> ForecastRequest {
        let generation = self.forecast_generation.advance();
        self.forecast_loading = true;
        self.forecast_error = None;

        let start_date = self.window.start().cloned();
        debug!(%symbol, generation, start = ?start_date, "forecast fetch issued");

        ForecastRequest {
            ticket: Ticket { generation, symbol },
            start_date,
        }
    }

    /// Manual window edit. A changed start re-runs the forecast for the
    /// loaded symbol.
    pub fn set_window_start(&mut self, input: &str) -> Result<Option<ForecastRequest>, WindowError> {
        let changed = self.window.override_start(input)?;
        if !changed || self.loading || self.error.is_some() {
            return Ok(None);
        }

        Ok(self.symbol.clone().map(|symbol| self.request_forecast(symbol)))
    }

    /// Applies a forecast response; returns whether it was current.
    pub fn apply_forecast(
        &mut self,
        ticket: &Ticket,
        result: Result<Vec<ForecastPoint>, ApiError>,
    ) -> bool {
        if !self.accepts(&self.forecast_generation, ticket) {
            debug!(symbol = %ticket.symbol, generation = ticket.generation, "discarding stale forecast");
            return false;
        }

        self.forecast_loading = false;
        match result {
            Ok(forecast) => {
                self.forecast = forecast;
                self.forecast_error = None;
            }
            Err(err) => {
                warn!(symbol = %ticket.symbol, "forecast fetch failed: {err}");
                self.forecast.clear();
                self.forecast_error = Some(err.to_string());
            }
        }
        true
    }

    pub fn filtered_history(&self) -> impl Iterator<Item = &PricePoint> {
        self.window.filter(&self.history)
    }

    pub fn chart_points(&self, include_forecast: bool) -> Vec<ChartPoint> {
        merge(self.filtered_history(), &self.forecast, include_forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use stockscope_api::StatusCode;

    fn history(dates: &[&str]) -> Vec<PricePoint> {
        dates
            .iter()
            .map(|date| PricePoint {
                date: CalendarKey::new(*date),
                open: Decimal::from(100),
                high: Decimal::from(105),
                low: Decimal::from(95),
                close: Decimal::from(101),
            })
            .collect()
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: StatusCode::NOT_FOUND,
            body: "Symbol not found".into(),
        }
    }

    #[test]
    fn select_normalizes_symbol_and_marks_loading() {
        let mut store = SeriesStore::new();
        let ticket = store.select("  aapl ").unwrap();

        assert_eq!(ticket.symbol, "AAPL");
        assert_eq!(store.symbol(), Some("AAPL"));
        assert!(store.is_loading());
        assert!(store.select("   ").is_none());
    }

    #[test]
    fn history_success_sets_default_window_and_requests_forecast() {
        let mut store = SeriesStore::new();
        let ticket = store.select("AAPL").unwrap();

        let request = store
            .apply_history(&ticket, Ok(history(&["2024-01-01", "2024-04-01"])))
            .unwrap();

        assert!(!store.is_loading());
        assert!(store.is_forecast_loading());
        assert_eq!(store.candles().len(), 2);
        assert_eq!(store.window().start(), Some(&CalendarKey::new("2024-01-01")));
        assert_eq!(request.start_date, Some(CalendarKey::new("2024-01-01")));
        assert_eq!(request.ticket.symbol, "AAPL");
    }

    #[test]
    fn history_failure_clears_previous_data() {
        let mut store = SeriesStore::new();
        let ticket = store.select("AAPL").unwrap();
        store.apply_history(&ticket, Ok(history(&["2024-01-01"])));

        let ticket = store.select("NOPE").unwrap();
        assert!(store.history().is_empty());

        assert!(store.apply_history(&ticket, Err(not_found())).is_none());
        assert!(store.history().is_empty());
        assert!(store.candles().is_empty());
        assert!(store.forecast().is_empty());
        assert!(store.window().start().is_none());
        assert!(store.error().unwrap().contains("404"));
        assert!(!store.is_loading());
    }

    #[test]
    fn late_history_for_previous_symbol_is_dropped() {
        let mut store = SeriesStore::new();
        let aapl = store.select("AAPL").unwrap();
        let msft = store.select("MSFT").unwrap();

        assert!(store.apply_history(&aapl, Ok(history(&["2024-01-01"]))).is_none());
        assert!(store.history().is_empty());
        assert!(store.is_loading());

        assert!(store.apply_history(&msft, Ok(history(&["2024-02-01"]))).is_some());
        assert_eq!(store.history()[0].date.as_str(), "2024-02-01");
    }

    #[test]
    fn reselecting_same_symbol_supersedes_earlier_fetch() {
        let mut store = SeriesStore::new();
        let first = store.select("AAPL").unwrap();
        let second = store.reload().unwrap();

        assert_eq!(first.symbol, second.symbol);
        assert!(store.apply_history(&first, Ok(history(&["2024-01-01"]))).is_none());
        assert!(store.apply_history(&second, Ok(history(&["2024-01-01"]))).is_some());
    }

    #[test]
    fn window_change_reissues_forecast_and_supersedes_old_one() {
        let mut store = SeriesStore::new();
        let ticket = store.select("AAPL").unwrap();
        let first = store
            .apply_history(&ticket, Ok(history(&["2024-01-01", "2024-02-01", "2024-04-01"])))
            .unwrap();

        let second = store.set_window_start("2024-02-01").unwrap().unwrap();
        assert_eq!(second.start_date, Some(CalendarKey::new("2024-02-01")));

        assert!(!store.apply_forecast(&first.ticket, Ok(Vec::new())));
        assert!(store.is_forecast_loading());
        assert!(store.apply_forecast(&second.ticket, Ok(Vec::new())));
        assert!(!store.is_forecast_loading());

        // Same start again is not a change.
        assert!(store.set_window_start("2024-02-01").unwrap().is_none());
        assert!(store.set_window_start("02/01/2024").is_err());
    }

    #[test]
    fn manual_window_survives_history_arriving_later() {
        let mut store = SeriesStore::new();
        let ticket = store.select("AAPL").unwrap();
        assert!(store.set_window_start("2024-03-01").unwrap().is_none());

        let request = store
            .apply_history(&ticket, Ok(history(&["2023-01-01", "2024-04-01"])))
            .unwrap();
        assert_eq!(request.start_date, Some(CalendarKey::new("2024-03-01")));

        // A new symbol brings the default back.
        let ticket = store.select("MSFT").unwrap();
        store.apply_history(&ticket, Ok(history(&["2023-01-01", "2024-04-01"])));
        assert_eq!(store.window().start(), Some(&CalendarKey::new("2024-01-01")));
    }

    #[test]
    fn window_edit_after_empty_history_still_refetches_forecast() {
        let mut store = SeriesStore::new();
        let ticket = store.select("AAPL").unwrap();
        let request = store.apply_history(&ticket, Ok(Vec::new())).unwrap();
        assert_eq!(request.start_date, None);

        let request = store.set_window_start("2024-02-01").unwrap().unwrap();
        assert_eq!(request.ticket.symbol, "AAPL");
        assert_eq!(request.start_date, Some(CalendarKey::new("2024-02-01")));
    }

    #[test]
    fn window_edit_after_failed_history_does_not_fetch() {
        let mut store = SeriesStore::new();
        let ticket = store.select("NOPE").unwrap();
        assert!(store.apply_history(&ticket, Err(not_found())).is_none());

        assert!(store.set_window_start("2024-02-01").unwrap().is_none());
        assert!(!store.is_forecast_loading());
    }

    #[test]
    fn forecast_failure_keeps_history() {
        let mut store = SeriesStore::new();
        let ticket = store.select("AAPL").unwrap();
        let request = store.apply_history(&ticket, Ok(history(&["2024-01-01"]))).unwrap();

        assert!(store.apply_forecast(&request.ticket, Err(not_found())));
        assert_eq!(store.history().len(), 1);
        assert!(store.forecast().is_empty());
        assert!(store.forecast_error().is_some());
        assert!(store.error().is_none());
    }

    #[test]
    fn chart_points_follow_window() {
        let mut store = SeriesStore::new();
        let ticket = store.select("AAPL").unwrap();
        let request = store
            .apply_history(&ticket, Ok(history(&["2023-12-01", "2024-01-15", "2024-04-01"])))
            .unwrap();
        store.apply_forecast(
            &request.ticket,
            Ok(vec![ForecastPoint {
                date: CalendarKey::new("2024-04-02"),
                predicted: Decimal::from(102),
            }]),
        );

        let dates: Vec<_> = store
            .chart_points(true)
            .into_iter()
            .map(|p| p.date.into_string())
            .collect();
        assert_eq!(dates, ["2024-01-15", "2024-04-01", "2024-04-02"]);
        assert_eq!(store.chart_points(false).len(), 2);
        // Candles are never windowed.
        assert_eq!(store.candles().len(), 3);
    }
}
