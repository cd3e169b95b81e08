use crate::CalendarKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading day of history for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: CalendarKey,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

/// One forecast day beyond the last historical date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: CalendarKey,
    pub predicted: Decimal,
}

/// Sparse union record fed to the line chart. Absent fields are omitted on
/// the wire so the renderer draws a gap instead of a zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: CalendarKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,
}

impl ChartPoint {
    pub fn is_historical(&self) -> bool {
        self.close.is_some()
    }
}

impl From<&PricePoint> for ChartPoint {
    fn from(point: &PricePoint) -> Self {
        Self {
            date: point.date.clone(),
            close: Some(point.close),
            predicted: None,
            open: Some(point.open),
            high: Some(point.high),
            low: Some(point.low),
        }
    }
}

impl From<&ForecastPoint> for ChartPoint {
    fn from(point: &ForecastPoint) -> Self {
        Self {
            date: point.date.clone(),
            predicted: Some(point.predicted),
            ..Default::default()
        }
    }
}

/// History reshaped for the candlestick widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlePoint {
    pub time: CalendarKey,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl CandlePoint {
    /// Open to close change in percent.
    pub fn change_pct(&self) -> Option<Decimal> {
        (self.close - self.open)
            .checked_div(self.open)
            .map(|ratio| ratio * Decimal::ONE_HUNDRED)
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

impl From<&PricePoint> for CandlePoint {
    fn from(point: &PricePoint) -> Self {
        Self {
            time: point.date.clone(),
            open: point.open,
            high: point.high,
            low: point.low,
            close: point.close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(date: &str, close: i64) -> PricePoint {
        PricePoint {
            date: CalendarKey::new(date),
            open: Decimal::from(close - 1),
            high: Decimal::from(close + 2),
            low: Decimal::from(close - 3),
            close: Decimal::from(close),
        }
    }

    #[test]
    fn history_chart_point_has_no_prediction() {
        let point = ChartPoint::from(&price("2024-01-02", 100));
        assert_eq!(point.close, Some(Decimal::from(100)));
        assert_eq!(point.open, Some(Decimal::from(99)));
        assert!(point.predicted.is_none());
        assert!(point.is_historical());
    }

    #[test]
    fn forecast_chart_point_omits_ohlc_on_the_wire() {
        let point = ChartPoint::from(&ForecastPoint {
            date: CalendarKey::new("2024-01-03"),
            predicted: Decimal::new(1015, 1),
        });
        let json = serde_json::to_value(&point).unwrap();

        assert_eq!(json["date"], "2024-01-03");
        assert_eq!(json["predicted"], 101.5);
        assert!(json.get("close").is_none());
        assert!(json.get("open").is_none());
        assert!(!point.is_historical());
    }

    #[test]
    fn price_point_reads_json_numbers() {
        let point: PricePoint = serde_json::from_str(
            r#"{"date":"2024-01-01","open":100,"high":101.25,"low":99.5,"close":100.75}"#,
        )
        .unwrap();

        assert_eq!(point.high, Decimal::new(10125, 2));
        assert_eq!(point.close, Decimal::new(10075, 2));
    }

    #[test]
    fn candle_change_pct() {
        let candle = CandlePoint::from(&PricePoint {
            date: CalendarKey::new("2024-01-01"),
            open: Decimal::from(100),
            high: Decimal::from(112),
            low: Decimal::from(98),
            close: Decimal::from(110),
        });
        assert_eq!(candle.change_pct(), Some(Decimal::from(10)));
        assert!(candle.is_bullish());

        let flat_open = CandlePoint {
            open: Decimal::ZERO,
            ..candle
        };
        assert_eq!(flat_open.change_pct(), None);
    }
}
