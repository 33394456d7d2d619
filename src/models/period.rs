// src/models/period.rs

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Period ───────────────────────────────────────────────────────────────────

/// Inclusive date interval. `end_date = None` means the interval is still open.
///
/// The owner of a period enforces `end_date >= start_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Period {
    pub fn new(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn open(start_date: NaiveDate) -> Self {
        Self::new(start_date, None)
    }

    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.is_none_or(|end| date <= end)
    }

    /// `start_date <= to AND (end_date IS NULL OR end_date >= from)`.
    /// A missing `to` overlaps everything from `from` onwards.
    pub fn overlaps(&self, from: NaiveDate, to: Option<NaiveDate>) -> bool {
        to.is_none_or(|to| self.start_date <= to) && self.end_date.is_none_or(|end| end >= from)
    }
}

// ─── MonthRange ───────────────────────────────────────────────────────────────

/// First and last day of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub struct MonthRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthRange {
    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.checked_sub_days(Days::new(1)))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_range_handles_every_month_length() {
        assert_eq!(MonthRange::containing(date(2026, 2, 15)).end, date(2026, 2, 28));
        assert_eq!(MonthRange::containing(date(2024, 2, 1)).end, date(2024, 2, 29));
        assert_eq!(MonthRange::containing(date(2026, 4, 30)).end, date(2026, 4, 30));
        assert_eq!(MonthRange::containing(date(2026, 12, 31)).end, date(2026, 12, 31));
        assert_eq!(MonthRange::containing(date(2026, 1, 20)).days(), 31);
        assert_eq!(MonthRange::containing(date(2026, 2, 20)).start, date(2026, 2, 1));
    }

    #[test]
    fn open_period_contains_all_later_dates() {
        let period = Period::open(date(2026, 1, 15));
        assert!(period.is_open());
        assert!(period.contains(date(2030, 1, 1)));
        assert!(!period.contains(date(2026, 1, 14)));
    }

    #[test]
    fn overlap_is_inclusive_at_both_ends() {
        let feb = MonthRange::containing(date(2026, 2, 1));
        let ends_on_first = Period::new(date(2026, 1, 1), Some(date(2026, 2, 1)));
        let starts_on_last = Period::new(date(2026, 2, 28), None);
        let ends_day_before = Period::new(date(2026, 1, 1), Some(date(2026, 1, 31)));

        assert!(ends_on_first.overlaps(feb.start, Some(feb.end)));
        assert!(starts_on_last.overlaps(feb.start, Some(feb.end)));
        assert!(!ends_day_before.overlaps(feb.start, Some(feb.end)));
        assert!(ends_day_before.overlaps(date(2025, 12, 1), None));
    }
}
