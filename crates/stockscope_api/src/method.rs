use serde::Serialize;
use serde::de::DeserializeOwned;

/// GET endpoint with parameters. Params serialize to the query string; any
/// field marked `#[serde(skip)]` can instead be surfaced as the trailing path
/// segment through [`Method::segment`].
pub trait Method {
    const PATH: &'static str;

    type Response: DeserializeOwned;
    type Params: Serialize;

    fn segment(_params: &Self::Params) -> Option<&str> {
        None
    }
}

/// GET endpoint without parameters.
pub trait Method0 {
    const PATH: &'static str;

    type Response: DeserializeOwned;
}

/// POST endpoint taking a JSON body.
pub trait PostMethod {
    const PATH: &'static str;

    type Response: DeserializeOwned;
    type Body: Serialize;
}
