use crate::method::Method0;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct TickersResponse {
    #[serde(default)]
    pub tickers: Vec<String>,
}

pub struct Tickers;

impl Method0 for Tickers {
    const PATH: &'static str = "tickers";

    type Response = TickersResponse;
}
