use chrono::NaiveDate;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("invalid date range: {end} is before {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("date range out of bounds: {past_months} past / {future_months} future months from {today}")]
    RangeOverflow {
        today: NaiveDate,
        past_months: u32,
        future_months: u32,
    },

    #[error("fetch #{generation} failed: {source}")]
    FetchFailed {
        generation: u64,
        #[source]
        source: BoxError,
    },
}

impl GridError {
    pub fn fetch_failed(generation: u64, source: impl Into<BoxError>) -> Self {
        Self::FetchFailed {
            generation,
            source: source.into(),
        }
    }
}
