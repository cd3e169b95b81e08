use crate::method::Method;
use bon::Builder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockscope_shared_models::{CalendarKey, ForecastPoint};

/// Longest horizon the backend will produce; larger requests are clamped
/// server side.
pub const MAX_HORIZON: u32 = 7;

#[derive(Serialize, Debug, Builder)]
#[builder(on(String, into))]
pub struct ForecastParams {
    #[serde(skip)]
    pub symbol: String,
    /// Start of the active window; biases the model towards recent samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<CalendarKey>,
    #[builder(default = MAX_HORIZON)]
    pub horizon: u32,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ForecastResponse {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub points: Vec<ForecastEntry>,
}

/// Forecast day as sent by the backend, which reuses the `close` name for the
/// predicted value.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ForecastEntry {
    pub date: CalendarKey,
    pub close: Decimal,
}

impl ForecastResponse {
    pub fn into_points(self) -> Vec<ForecastPoint> {
        self.points
            .into_iter()
            .map(|entry| ForecastPoint {
                date: entry.date,
                predicted: entry.close,
            })
            .collect()
    }
}

pub struct Forecast;

impl Method for Forecast {
    const PATH: &'static str = "forecast";

    type Response = ForecastResponse;
    type Params = ForecastParams;

    fn segment(params: &Self::Params) -> Option<&str> {
        Some(&params.symbol)
    }
}
