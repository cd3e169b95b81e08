use crate::generation::Generation;
use stockscope_api::ApiError;
use stockscope_api::trends::{MomentumParams, MomentumSnapshot, TrendsOverview};
use tracing::{debug, warn};

/// Market overview and momentum, always shown together or not at all.
#[derive(Debug, Default)]
pub struct TrendsPanel {
    overview: Option<TrendsOverview>,
    momentum: Option<MomentumSnapshot>,
    params: MomentumParams,
    loading: bool,
    error: Option<String>,
    generation: Generation,
}

impl TrendsPanel {
    pub fn overview(&self) -> Option<&TrendsOverview> {
        self.overview.as_ref()
    }

    pub fn momentum(&self) -> Option<&MomentumSnapshot> {
        self.momentum.as_ref()
    }

    pub fn params(&self) -> MomentumParams {
        self.params
    }

    pub fn set_params(&mut self, params: MomentumParams) {
        self.params = params.clamped();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn begin(&mut self) -> u64 {
        self.loading = true;
        self.error = None;
        self.generation.advance()
    }

    pub(crate) fn apply(
        &mut self,
        generation: u64,
        result: Result<(TrendsOverview, MomentumSnapshot), ApiError>,
    ) -> bool {
        if !self.generation.is_current(generation) {
            debug!(generation, "discarding stale trends");
            return false;
        }

        self.loading = false;
        match result {
            Ok((overview, momentum)) => {
                self.overview = Some(overview);
                self.momentum = Some(momentum);
                self.error = None;
            }
            Err(err) => {
                warn!("trends fetch failed: {err}");
                self.overview = None;
                self.momentum = None;
                self.error = Some(err.to_string());
            }
        }
        true
    }
}
