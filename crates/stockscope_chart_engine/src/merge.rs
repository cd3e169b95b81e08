use stockscope_shared_models::{ChartPoint, ForecastPoint, PricePoint};
use tracing::warn;

/// Builds the line chart series: filtered history in its own order, then the
/// forecast in its own order when `include_forecast` is set.
///
/// The two parts are concatenated as is. If the forecast starts on or before
/// the last history date the output carries duplicate keys; that is logged and
/// left for the renderer.
pub fn merge<'a, I>(filtered: I, forecast: &[ForecastPoint], include_forecast: bool) -> Vec<ChartPoint>
where
    I: IntoIterator<Item = &'a PricePoint>,
{
    let mut points: Vec<ChartPoint> = filtered.into_iter().map(ChartPoint::from).collect();

    if !include_forecast {
        return points;
    }

    if let (Some(last), Some(first)) = (points.last(), forecast.first()) {
        if first.date <= last.date {
            warn!(
                last_history = %last.date,
                first_forecast = %first.date,
                "forecast overlaps history, chart will contain duplicate dates"
            );
        }
    }

    points.reserve(forecast.len());
    points.extend(forecast.iter().map(ChartPoint::from));
    points
}
