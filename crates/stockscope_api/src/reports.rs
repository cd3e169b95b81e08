use crate::method::PostMethod;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_HORIZON_DAYS: u32 = 300;

/// Voice the backend writes the report in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    #[default]
    Balanced,
    Skeptic,
    Optimist,
    RiskTaker,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Balanced,
        Persona::Skeptic,
        Persona::Optimist,
        Persona::RiskTaker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Balanced => "balanced",
            Persona::Skeptic => "skeptic",
            Persona::Optimist => "optimist",
            Persona::RiskTaker => "risk_taker",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown persona '{0}', expected one of: balanced, skeptic, optimist, risk_taker")]
pub struct ParsePersonaError(String);

impl FromStr for Persona {
    type Err = ParsePersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Persona::ALL
            .into_iter()
            .find(|persona| persona.as_str() == wanted)
            .ok_or_else(|| ParsePersonaError(s.to_string()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
pub struct StockReportRequest {
    #[builder(into)]
    pub ticker: String,
    #[builder(default)]
    pub persona: Persona,
    #[builder(default = DEFAULT_HORIZON_DAYS)]
    pub horizon_days: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StockReportResponse {
    pub ticker: String,
    pub persona: String,
    pub report_markdown: String,
}

pub struct StockReport;

impl PostMethod for StockReport {
    const PATH: &'static str = "reports/stock";

    type Response = StockReportResponse;
    type Body = StockReportRequest;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_parses_loosely() {
        assert_eq!("Skeptic".parse::<Persona>(), Ok(Persona::Skeptic));
        assert_eq!("risk-taker".parse::<Persona>(), Ok(Persona::RiskTaker));
        assert_eq!("risk_taker".parse::<Persona>(), Ok(Persona::RiskTaker));
        assert!("bear".parse::<Persona>().is_err());
    }

    #[test]
    fn request_body_matches_backend_shape() {
        let request = StockReportRequest::builder().ticker("AAPL").build();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"ticker": "AAPL", "persona": "balanced", "horizon_days": 300})
        );

        let request = StockReportRequest::builder()
            .ticker("MSFT")
            .persona(Persona::RiskTaker)
            .horizon_days(30)
            .build();
        assert_eq!(serde_json::to_value(&request).unwrap()["persona"], "risk_taker");
    }
}
