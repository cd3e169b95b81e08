use crate::method::Method;
use bon::Builder;
use serde::{Deserialize, Serialize};
use stockscope_shared_models::PricePoint;

#[derive(Serialize, Debug, Builder)]
#[builder(on(String, into))]
pub struct PricesParams {
    #[serde(skip)]
    pub symbol: String,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct PricesResponse {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub points: Vec<PricePoint>,
}

pub struct Prices;

impl Method for Prices {
    const PATH: &'static str = "prices";

    type Response = PricesResponse;
    type Params = PricesParams;

    fn segment(params: &Self::Params) -> Option<&str> {
        Some(&params.symbol)
    }
}
