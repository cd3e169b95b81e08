use crate::method::{Method, Method0};
use bon::Builder;
use serde::{Deserialize, Serialize};

/// Cross-sectional snapshot of the whole ticker universe.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct TrendsOverview {
    pub last_date: String,
    pub index_1m_return: f64,
    pub index_3m_return: f64,
    pub pct_above_50d: f64,
    pub pct_above_200d: f64,
    pub median_20d_vol: f64,
    pub vol_regime: String,
    pub pct_advancers: f64,
    pub pct_decliners: f64,
    pub pct_new_highs: f64,
    pub pct_new_lows: f64,
    pub num_new_highs: u32,
    pub num_new_lows: u32,
    pub dispersion_1m: f64,
}

pub struct Overview;

impl Method0 for Overview {
    const PATH: &'static str = "trends/overview";

    type Response = TrendsOverview;
}

pub const DEFAULT_LOOKBACK_DAYS: u32 = 21;
pub const DEFAULT_TOP_N: u32 = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct MomentumParams {
    #[builder(default = DEFAULT_LOOKBACK_DAYS)]
    pub lookback_days: u32,
    #[builder(default = DEFAULT_TOP_N)]
    pub top_n: u32,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl MomentumParams {
    /// Same bounds the backend enforces.
    pub fn clamped(self) -> Self {
        Self {
            lookback_days: self.lookback_days.clamp(5, 126),
            top_n: self.top_n.clamp(1, 50),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MomentumSnapshot {
    pub lookback_days: u32,
    pub top: Vec<MomentumEntry>,
    pub bottom: Vec<MomentumEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MomentumEntry {
    pub ticker: String,
    #[serde(default)]
    pub ret_1m: f64,
}

pub struct Momentum;

impl Method for Momentum {
    const PATH: &'static str = "trends/momentum";

    type Response = MomentumSnapshot;
    type Params = MomentumParams;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn momentum_params_clamp_like_the_backend() {
        let params = MomentumParams::builder().lookback_days(1).top_n(500).build();
        assert_eq!(
            params.clamped(),
            MomentumParams {
                lookback_days: 5,
                top_n: 50
            }
        );
        assert_eq!(MomentumParams::builder().build(), MomentumParams::default());
    }

    #[test]
    fn partial_overview_payload_is_tolerated() {
        let overview: TrendsOverview =
            serde_json::from_str(r#"{"last_date":"2024-04-01","vol_regime":"Low Volatility"}"#)
                .unwrap();
        assert_eq!(overview.last_date, "2024-04-01");
        assert_eq!(overview.num_new_highs, 0);
    }
}
