use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::{GridError, IndexRange, RangeConfig};

/// Date format used for the string lookup and for fetch request bounds (ISO 8601 day).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One column of the grid.
///
/// The column index is the date's ordinal position in the range; it is not stored here.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarDate {
    pub date: NaiveDate,
    pub formatted_date: String,
    pub is_past: bool,
    pub is_today: bool,
    pub is_weekend: bool,
}

impl CalendarDate {
    fn new(date: NaiveDate, today: NaiveDate) -> Self {
        Self {
            date,
            formatted_date: date.format(DATE_FORMAT).to_string(),
            is_past: date < today,
            is_today: date == today,
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }
}

/// A contiguous run of columns that share a calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonthGroup {
    /// The first day of the month, even when the range starts mid-month.
    pub first_of_month: NaiveDate,
    pub columns: IndexRange,
}

/// The ordered day sequence backing the grid's columns.
///
/// Indexes are contiguous: entry `i` is `start + i` days.
#[derive(Clone, Debug, Default)]
pub struct DateIndex {
    dates: Vec<CalendarDate>,
    index_by_date: HashMap<String, usize>,
    month_groups: Vec<MonthGroup>,
}

impl DateIndex {
    /// Builds the inclusive range `[start, end]`.
    ///
    /// `today` only feeds the `is_past`/`is_today` flags.
    pub fn build_range(
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, GridError> {
        if end < start {
            return Err(GridError::InvalidRange { start, end });
        }

        let len = (end - start).num_days() as usize + 1;
        let mut dates = Vec::with_capacity(len);
        let mut index_by_date = HashMap::with_capacity(len);
        let mut month_groups: Vec<MonthGroup> = Vec::new();

        for (i, date) in start.iter_days().take(len).enumerate() {
            let entry = CalendarDate::new(date, today);
            index_by_date.insert(entry.formatted_date.clone(), i);
            dates.push(entry);

            match month_groups.last_mut() {
                Some(group)
                    if group.first_of_month.year() == date.year()
                        && group.first_of_month.month() == date.month() =>
                {
                    group.columns.end_index = i + 1;
                }
                _ => month_groups.push(MonthGroup {
                    first_of_month: date.with_day(1).unwrap_or(date),
                    columns: IndexRange::new(i, i + 1),
                }),
            }
        }

        gdebug!(
            %start,
            %end,
            days = dates.len(),
            months = month_groups.len(),
            "DateIndex::build_range"
        );

        Ok(Self {
            dates,
            index_by_date,
            month_groups,
        })
    }

    /// Builds the range from whole months around `today`.
    ///
    /// The range opens on the first day of the month `past_months` before today's month and
    /// closes on the last day of the month `future_months` after it.
    pub fn around(today: NaiveDate, range: RangeConfig) -> Result<Self, GridError> {
        let overflow = || GridError::RangeOverflow {
            today,
            past_months: range.past_months,
            future_months: range.future_months,
        };

        let this_month = today.with_day(1).ok_or_else(overflow)?;
        let start = this_month
            .checked_sub_months(Months::new(range.past_months))
            .ok_or_else(overflow)?;
        let end = this_month
            .checked_add_months(Months::new(range.future_months.saturating_add(1)))
            .and_then(|d| d.pred_opt())
            .ok_or_else(overflow)?;

        Self::build_range(start, end, today)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[CalendarDate] {
        &self.dates
    }

    pub fn get(&self, index: usize) -> Option<&CalendarDate> {
        self.dates.get(index)
    }

    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        self.dates.get(index).map(|d| d.date)
    }

    pub fn month_groups(&self) -> &[MonthGroup] {
        &self.month_groups
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.dates.first().map(|d| d.date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.dates.last().map(|d| d.date)
    }

    /// Looks up a `YYYY-MM-DD` string.
    pub fn index_of(&self, formatted_date: &str) -> Option<usize> {
        self.index_by_date.get(formatted_date).copied()
    }

    pub fn index_of_date(&self, date: NaiveDate) -> Option<usize> {
        let start = self.start_date()?;
        let offset = (date - start).num_days();
        if offset < 0 || offset as usize >= self.dates.len() {
            return None;
        }
        Some(offset as usize)
    }

    /// Signed day distance from the first column to `date`.
    pub fn days_from_start(&self, date: NaiveDate) -> i64 {
        match self.start_date() {
            Some(start) => (date - start).num_days(),
            None => 0,
        }
    }

    /// Clamps an inclusive date interval to column indexes.
    ///
    /// Returns `None` when the interval misses the range entirely or is inverted.
    pub fn clamp_to_columns(&self, start: NaiveDate, end: NaiveDate) -> Option<IndexRange> {
        let first = self.start_date()?;
        let last = self.end_date()?;
        if end < start || end < first || start > last {
            return None;
        }
        let from = self.index_of_date(start.max(first))?;
        let to = self.index_of_date(end.min(last))?;
        Some(IndexRange::new(from, to + 1))
    }
}
