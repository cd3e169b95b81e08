use crate::generation::Ticket;
use crate::report::ReportPanel;
use crate::store::{ForecastRequest, SeriesStore};
use crate::trends::TrendsPanel;
use stockscope_api::ApiError;
use stockscope_api::reports::{Persona, StockReportRequest, StockReportResponse};
use stockscope_api::trends::{MomentumParams, MomentumSnapshot, TrendsOverview};
use stockscope_chart_engine::{PointerEvent, WindowError};
use stockscope_shared_models::{CandlePoint, ChartPoint, ForecastPoint, PricePoint};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Chart,
    Trends,
    Report,
}

/// I/O the dashboard wants performed. Each carries the tag its response
/// must echo back.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchHistory(Ticket),
    FetchForecast(ForecastRequest),
    FetchTrends {
        generation: u64,
        params: MomentumParams,
    },
    GenerateReport {
        ticket: Ticket,
        request: StockReportRequest,
    },
}

/// Result of a [`Command`], tagged as it was issued.
#[derive(Debug)]
pub enum Outcome {
    History(Ticket, Result<Vec<PricePoint>, ApiError>),
    Forecast(Ticket, Result<Vec<ForecastPoint>, ApiError>),
    Trends(u64, Result<(TrendsOverview, MomentumSnapshot), ApiError>),
    Report(Ticket, Result<StockReportResponse, ApiError>),
}

/// Client side state of the dashboard. Pure: user actions and fetch outcomes
/// go in, follow-up [`Command`]s come out.
#[derive(Debug)]
pub struct Dashboard {
    store: SeriesStore,
    include_forecast: bool,
    tooltip: Option<CandlePoint>,
    tab: Tab,
    trends: TrendsPanel,
    report: ReportPanel,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            store: SeriesStore::new(),
            include_forecast: true,
            tooltip: None,
            tab: Tab::default(),
            trends: TrendsPanel::default(),
            report: ReportPanel::default(),
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub fn trends(&self) -> &TrendsPanel {
        &self.trends
    }

    pub fn report(&self) -> &ReportPanel {
        &self.report
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn tooltip(&self) -> Option<&CandlePoint> {
        self.tooltip.as_ref()
    }

    pub fn include_forecast(&self) -> bool {
        self.include_forecast
    }

    pub fn select_symbol(&mut self, symbol: &str) -> Vec<Command> {
        let Some(ticket) = self.store.select(symbol) else {
            return Vec::new();
        };
        self.tooltip = None;
        self.report.reset();

        vec![Command::FetchHistory(ticket)]
    }

    pub fn reload(&mut self) -> Vec<Command> {
        let Some(ticket) = self.store.reload() else {
            return Vec::new();
        };
        self.tooltip = None;
        self.report.reset();

        vec![Command::FetchHistory(ticket)]
    }

    pub fn set_window_start(&mut self, input: &str) -> Result<Vec<Command>, WindowError> {
        Ok(self
            .store
            .set_window_start(input)?
            .map(Command::FetchForecast)
            .into_iter()
            .collect())
    }

    pub fn set_include_forecast(&mut self, include: bool) {
        self.include_forecast = include;
    }

    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.store.chart_points(self.include_forecast)
    }

    /// Crosshair move. Resolved against the full candle set in memory; never
    /// triggers I/O.
    pub fn hover(&mut self, event: &PointerEvent) -> Option<&CandlePoint> {
        self.tooltip = self.store.candles().resolve(event).cloned();
        self.tooltip.as_ref()
    }

    /// Switches tab. Entering the trends tab refreshes it.
    pub fn activate_tab(&mut self, tab: Tab) -> Vec<Command> {
        let entering = self.tab != tab;
        self.tab = tab;

        if entering && tab == Tab::Trends {
            let generation = self.trends.begin();
            return vec![Command::FetchTrends {
                generation,
                params: self.trends.params(),
            }];
        }
        Vec::new()
    }

    pub fn set_momentum_params(&mut self, params: MomentumParams) {
        self.trends.set_params(params);
    }

    pub fn request_report(&mut self, persona: Persona, horizon_days: u32) -> Vec<Command> {
        let Some(symbol) = self.store.symbol().map(str::to_string) else {
            return Vec::new();
        };

        let (ticket, request) = self.report.begin(&symbol, persona, horizon_days);
        vec![Command::GenerateReport { ticket, request }]
    }

    pub fn apply(&mut self, outcome: Outcome) -> Vec<Command> {
        match outcome {
            Outcome::History(ticket, result) => self
                .store
                .apply_history(&ticket, result)
                .map(Command::FetchForecast)
                .into_iter()
                .collect(),
            Outcome::Forecast(ticket, result) => {
                self.store.apply_forecast(&ticket, result);
                Vec::new()
            }
            Outcome::Trends(generation, result) => {
                self.trends.apply(generation, result);
                Vec::new()
            }
            Outcome::Report(ticket, result) => {
                if self.store.symbol() == Some(ticket.symbol.as_str()) {
                    self.report.apply(&ticket, result);
                } else {
                    debug!(symbol = %ticket.symbol, "report for deselected symbol ignored");
                }
                Vec::new()
            }
        }
    }
}
