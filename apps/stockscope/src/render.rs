use itertools::Itertools;
use prettytable::{Table, row};
use rust_decimal::Decimal;
use stockscope_api::trends::{MomentumEntry, MomentumSnapshot, TrendsOverview};
use stockscope_chart_engine::WindowOrigin;
use stockscope_dashboard::{Dashboard, Tab};
use stockscope_shared_models::{CandlePoint, ChartPoint};

fn price(value: Option<Decimal>) -> String {
    value.map(|v| format!("{:.2}", v.round_dp(2))).unwrap_or_default()
}

fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

pub fn tickers_table(tickers: &[String]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["#", "Ticker"]);
    for (i, ticker) in tickers.iter().enumerate() {
        table.add_row(row![i + 1, ticker]);
    }
    table
}

pub fn chart_table(points: &[ChartPoint]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Date", "Open", "High", "Low", "Close", "Forecast"]);
    for point in points {
        table.add_row(row![
            point.date,
            price(point.open),
            price(point.high),
            price(point.low),
            price(point.close),
            price(point.predicted),
        ]);
    }
    table
}

/// Crosshair readout for one candle.
pub fn tooltip_table(candle: &CandlePoint) -> Table {
    let change = candle
        .change_pct()
        .map(|pct| {
            let sign = if pct.is_sign_negative() { "" } else { "+" };
            format!("{sign}{:.2}%", pct.round_dp(2))
        })
        .unwrap_or_else(|| "n/a".to_string());

    let mut table = Table::new();
    let direction = if candle.is_bullish() { "up" } else { "down" };

    table.set_titles(row!["Date", "O", "H", "L", "C", "Change", ""]);
    table.add_row(row![
        candle.time,
        price(Some(candle.open)),
        price(Some(candle.high)),
        price(Some(candle.low)),
        price(Some(candle.close)),
        change,
        direction,
    ]);
    table
}

pub fn overview_table(overview: &TrendsOverview) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Metric", "Value"]);
    table.add_row(row!["As of", overview.last_date]);
    table.add_row(row!["Index 1M return", percent(overview.index_1m_return)]);
    table.add_row(row!["Index 3M return", percent(overview.index_3m_return)]);
    table.add_row(row!["Above 50D MA", percent(overview.pct_above_50d)]);
    table.add_row(row!["Above 200D MA", percent(overview.pct_above_200d)]);
    table.add_row(row!["Median 20D vol", percent(overview.median_20d_vol)]);
    table.add_row(row!["Vol regime", overview.vol_regime]);
    table.add_row(row!["Advancers", percent(overview.pct_advancers)]);
    table.add_row(row!["Decliners", percent(overview.pct_decliners)]);
    table.add_row(row![
        "New highs",
        format!("{} ({})", overview.num_new_highs, percent(overview.pct_new_highs))
    ]);
    table.add_row(row![
        "New lows",
        format!("{} ({})", overview.num_new_lows, percent(overview.pct_new_lows))
    ]);
    table.add_row(row!["1M dispersion", percent(overview.dispersion_1m)]);
    table
}

pub fn momentum_table(snapshot: &MomentumSnapshot) -> Table {
    let cell = |entry: Option<&MomentumEntry>| {
        entry
            .map(|entry| format!("{} {}", entry.ticker, percent(entry.ret_1m)))
            .unwrap_or_default()
    };

    let mut table = Table::new();
    table.set_titles(row![
        format!("Top ({}d)", snapshot.lookback_days),
        format!("Bottom ({}d)", snapshot.lookback_days)
    ]);
    let rows = snapshot.top.len().max(snapshot.bottom.len());
    for i in 0..rows {
        table.add_row(row![cell(snapshot.top.get(i)), cell(snapshot.bottom.get(i))]);
    }
    table
}

/// One line summary of what the dashboard currently holds.
pub fn status_line(dashboard: &Dashboard) -> String {
    let store = dashboard.store();
    let Some(symbol) = store.symbol() else {
        return "no symbol selected".to_string();
    };

    let mut parts = vec![symbol.to_string()];
    if store.is_loading() {
        parts.push("loading history".into());
    } else if let Some(err) = store.error() {
        parts.push(format!("history failed: {err}"));
    } else {
        parts.push(format!("{} days", store.history().len()));
    }

    let window = store.window();
    parts.push(match (window.start(), window.origin()) {
        (Some(start), WindowOrigin::Manual) => format!("from {start} (manual)"),
        (Some(start), WindowOrigin::Default) => format!("from {start}"),
        (None, WindowOrigin::Manual) => "full range (manual)".into(),
        (None, WindowOrigin::Default) => "full range".into(),
    });

    if store.is_forecast_loading() {
        parts.push("forecasting".into());
    } else if let Some(err) = store.forecast_error() {
        parts.push(format!("forecast failed: {err}"));
    } else if !store.forecast().is_empty() {
        let shown = if dashboard.include_forecast() { "shown" } else { "hidden" };
        parts.push(format!("{} forecast days {shown}", store.forecast().len()));
    }

    let tab = match dashboard.tab() {
        Tab::Chart => "chart",
        Tab::Trends => "trends",
        Tab::Report => "report",
    };
    parts.push(format!("[{tab}]"));

    parts.iter().join(" | ")
}
