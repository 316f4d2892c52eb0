use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date-range presets offered by the filter bar. All presets except
/// `Custom` resolve their bounds client-side from today's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Today,
    Week,
    Month,
    Year,
    Custom,
}

impl FilterMode {
    pub const ALL: [FilterMode; 5] = [
        FilterMode::Today,
        FilterMode::Week,
        FilterMode::Month,
        FilterMode::Year,
        FilterMode::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterMode::Today => "Today",
            FilterMode::Week => "Last 7 Days",
            FilterMode::Month => "This Month",
            FilterMode::Year => "This Year",
            FilterMode::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("Date cannot be empty")]
    MissingBound,
    #[error("start date {from} is after end date {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },
}

/// The currently selected date range. Owned by the dashboard widget
/// instance, created from server defaults at start and mutated only through
/// [`FilterState::set_filter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub mode: FilterMode,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            mode: FilterMode::Month,
            date_from: None,
            date_to: None,
        }
    }
}

impl FilterState {
    /// Change the selected range. Invalid custom bounds are rejected before
    /// any request is issued and leave the previous selection untouched.
    pub fn set_filter(
        &mut self,
        mode: FilterMode,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<(), FilterError> {
        self.set_filter_from(mode, date_from, date_to, Local::now().date_naive())
    }

    /// Same as [`set_filter`](Self::set_filter) with an explicit "today",
    /// so preset resolution is deterministic under test.
    pub fn set_filter_from(
        &mut self,
        mode: FilterMode,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<(), FilterError> {
        let (from, to) = match mode {
            FilterMode::Custom => {
                let (Some(from), Some(to)) = (date_from, date_to) else {
                    return Err(FilterError::MissingBound);
                };
                if from > to {
                    return Err(FilterError::InvertedRange { from, to });
                }
                (from, to)
            }
            FilterMode::Today => (today, today),
            FilterMode::Week => (today - Duration::days(6), today),
            FilterMode::Month => (today.with_day(1).unwrap_or(today), today),
            FilterMode::Year => (
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
                today,
            ),
        };
        self.mode = mode;
        self.date_from = Some(from);
        self.date_to = Some(to);
        Ok(())
    }

    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_from.zip(self.date_to)
    }
}
