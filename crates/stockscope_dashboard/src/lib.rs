pub mod dashboard;
pub mod generation;
pub mod report;
pub mod source;
pub mod store;
pub mod trends;

pub use dashboard::{Command, Dashboard, Outcome, Tab};
pub use generation::{Generation, Ticket};
pub use report::ReportPanel;
pub use source::{MarketSource, execute};
pub use store::{ForecastRequest, SeriesStore};
pub use trends::TrendsPanel;
