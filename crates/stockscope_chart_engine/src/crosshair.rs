use crate::calendar::{RawTime, normalize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stockscope_shared_models::{CalendarKey, CandlePoint, PricePoint};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

/// Crosshair move as emitted by the candlestick widget. Both fields are
/// missing once the cursor leaves the plot area.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerEvent {
    #[serde(default)]
    pub time: Option<RawTime>,
    #[serde(default)]
    pub point: Option<PointerPosition>,
}

impl PointerEvent {
    pub fn at(time: impl Into<RawTime>) -> Self {
        Self {
            time: Some(time.into()),
            point: None,
        }
    }

    pub fn left() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<CalendarKey> {
        self.time.as_ref().map(normalize)
    }
}

/// Reference lookup: normalize the event time and scan `candles` for the
/// first exact key match.
pub fn resolve<'a>(event: &PointerEvent, candles: &'a [CandlePoint]) -> Option<&'a CandlePoint> {
    let key = event.key()?;
    candles.iter().find(|candle| candle.time == key)
}

/// Full-history candles with a key index for per-move lookups.
#[derive(Debug, Clone, Default)]
pub struct CandleIndex {
    candles: Vec<CandlePoint>,
    by_key: HashMap<CalendarKey, usize>,
}

impl CandleIndex {
    pub fn new(candles: Vec<CandlePoint>) -> Self {
        let mut by_key = HashMap::with_capacity(candles.len());
        for (i, candle) in candles.iter().enumerate() {
            by_key.entry(candle.time.clone()).or_insert(i);
        }

        Self { candles, by_key }
    }

    pub fn from_history(history: &[PricePoint]) -> Self {
        Self::new(history.iter().map(CandlePoint::from).collect())
    }

    pub fn candles(&self) -> &[CandlePoint] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn get(&self, key: &CalendarKey) -> Option<&CandlePoint> {
        self.by_key.get(key).map(|&i| &self.candles[i])
    }

    pub fn resolve(&self, event: &PointerEvent) -> Option<&CandlePoint> {
        self.get(&event.key()?)
    }
}
