use crate::generation::{Generation, Ticket};
use stockscope_api::ApiError;
use stockscope_api::reports::{Persona, StockReportRequest, StockReportResponse};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct ReportPanel {
    report: Option<StockReportResponse>,
    loading: bool,
    error: Option<String>,
    generation: Generation,
}

impl ReportPanel {
    pub fn report(&self) -> Option<&StockReportResponse> {
        self.report.as_ref()
    }

    pub fn markdown(&self) -> Option<&str> {
        self.report.as_ref().map(|report| report.report_markdown.as_str())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn begin(
        &mut self,
        symbol: &str,
        persona: Persona,
        horizon_days: u32,
    ) -> (Ticket, StockReportRequest) {
        self.loading = true;
        self.error = None;
        self.report = None;

        let ticket = Ticket {
            generation: self.generation.advance(),
            symbol: symbol.to_string(),
        };
        let request = StockReportRequest::builder()
            .ticker(symbol)
            .persona(persona)
            .horizon_days(horizon_days)
            .build();

        (ticket, request)
    }

    /// Drops any report for a previous symbol and supersedes one in flight.
    pub(crate) fn reset(&mut self) {
        self.generation.advance();
        self.report = None;
        self.loading = false;
        self.error = None;
    }

    pub(crate) fn apply(
        &mut self,
        ticket: &Ticket,
        result: Result<StockReportResponse, ApiError>,
    ) -> bool {
        if !self.generation.is_current(ticket.generation) {
            debug!(symbol = %ticket.symbol, "discarding stale report");
            return false;
        }

        self.loading = false;
        match result {
            Ok(report) => self.report = Some(report),
            Err(err) => {
                warn!(symbol = %ticket.symbol, "report generation failed: {err}");
                self.error = Some(err.to_string());
            }
        }
        true
    }
}
