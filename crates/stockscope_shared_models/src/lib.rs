mod calendar_key;
mod series;

pub use calendar_key::CalendarKey;
pub use series::{CandlePoint, ChartPoint, ForecastPoint, PricePoint};
