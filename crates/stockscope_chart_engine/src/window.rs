use chrono::Months;
use stockscope_shared_models::{CalendarKey, PricePoint};
use thiserror::Error;

/// Length of the default view, counted back from the last history date.
pub const DEFAULT_WINDOW_MONTHS: u32 = 3;

#[derive(Error, Debug, PartialEq)]
pub enum WindowError {
    #[error("Invalid window start '{0}', expected a YYYY-MM-DD date")]
    InvalidStart(String),
}

/// Inclusive lower bound of the default view: the last history date minus
/// three calendar months, clamped to the first history date. `None` when
/// there is no history, meaning "no filter".
pub fn default_window(history: &[PricePoint]) -> Option<CalendarKey> {
    let first = &history.first()?.date;
    let last = &history.last()?.date;

    let Some(candidate) = last
        .date()
        .and_then(|date| date.checked_sub_months(Months::new(DEFAULT_WINDOW_MONTHS)))
        .map(CalendarKey::from_date)
    else {
        return Some(first.clone());
    };

    Some(candidate.max(first.clone()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowOrigin {
    #[default]
    Default,
    Manual,
}

/// The active date window over a symbol's history.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Window {
    start: Option<CalendarKey>,
    origin: WindowOrigin,
}

impl Window {
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<&CalendarKey> {
        self.start.as_ref()
    }

    pub fn origin(&self) -> WindowOrigin {
        self.origin
    }

    pub fn is_manual(&self) -> bool {
        self.origin == WindowOrigin::Manual
    }

    pub fn reset_to_default(&mut self, history: &[PricePoint]) {
        self.start = default_window(history);
        self.origin = WindowOrigin::Default;
    }

    /// Pins the window start to a user supplied date. An empty input clears
    /// the filter. Returns whether the start actually changed.
    pub fn override_start(&mut self, input: &str) -> Result<bool, WindowError> {
        let input = input.trim();
        let start = if input.is_empty() {
            None
        } else {
            let key = CalendarKey::new(input);
            if key.date().is_none() {
                return Err(WindowError::InvalidStart(input.to_string()));
            }
            Some(key)
        };

        let changed = self.start != start;
        self.start = start;
        self.origin = WindowOrigin::Manual;

        Ok(changed)
    }

    pub fn contains(&self, key: &CalendarKey) -> bool {
        match &self.start {
            Some(start) => key >= start,
            None => true,
        }
    }

    pub fn filter<'a>(&'a self, history: &'a [PricePoint]) -> impl Iterator<Item = &'a PricePoint> + 'a {
        history.iter().filter(move |point| self.contains(&point.date))
    }
}
