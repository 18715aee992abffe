//! Business calendar: fixed holidays, weekends, business-day counting and
//! categorical urgency labels.
//!
//! The holiday table is a static (month, day) approximation. Festival dates
//! that follow a lunisolar calendar are pinned to one year's observance and do
//! not move.

use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt;

/// Fixed holiday table, ordered by (month, day).
const HOLIDAY_TABLE: [(u32, u32, &str); 18] = [
    (1, 26, "Republic Day"),
    (3, 8, "Maha Shivaratri"),
    (3, 25, "Holi"),
    (3, 29, "Good Friday"),
    (4, 17, "Ram Navami"),
    (4, 21, "Mahavir Jayanti"),
    (5, 1, "May Day"),
    (5, 23, "Buddha Purnima"),
    (6, 28, "Eid ul-Fitr"),
    (7, 17, "Muharram"),
    (8, 15, "Independence Day"),
    (9, 16, "Milad un-Nabi"),
    (10, 2, "Gandhi Jayanti"),
    (10, 12, "Dussehra"),
    (10, 20, "Diwali"),
    (10, 21, "Diwali (Day 2)"),
    (11, 15, "Guru Nanak Jayanti"),
    (12, 25, "Christmas"),
];

/// A holiday evaluated against a concrete year.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: &'static str,
}

/// Result of a holiday lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HolidayInfo {
    pub is_holiday: bool,
    pub name: Option<&'static str>,
}

/// All holidays for `year`, in date order.
pub fn holidays(year: i32) -> Vec<Holiday> {
    HOLIDAY_TABLE
        .iter()
        .filter_map(|&(month, day, name)| {
            NaiveDate::from_ymd_opt(year, month, day).map(|date| Holiday { date, name })
        })
        .collect()
}

/// Check whether `date` falls on a listed holiday.
pub fn is_holiday(date: NaiveDate) -> HolidayInfo {
    let (month, day) = (date.month(), date.day());
    match HOLIDAY_TABLE
        .iter()
        .find(|&&(m, d, _)| m == month && d == day)
    {
        Some(&(_, _, name)) => HolidayInfo {
            is_holiday: true,
            name: Some(name),
        },
        None => HolidayInfo::default(),
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Count business days in the half-open interval `[from, to)`.
///
/// Returns 0 when `from >= to`. Linear in the number of calendar days.
pub fn business_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    if from >= to {
        return 0;
    }
    from.iter_days()
        .take_while(|day| *day < to)
        .filter(|day| !is_weekend(*day) && !is_holiday(*day).is_holiday)
        .count() as i64
}

/// Categorical urgency derived from calendar days until due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UrgencyLabel {
    Overdue,
    DueToday,
    DueTomorrow,
    DueSoon,
    DueThisWeek,
    DueLater,
}

impl UrgencyLabel {
    /// Classify a signed day count.
    pub fn from_days(days_until_due: i64) -> Self {
        match days_until_due {
            d if d < 0 => Self::Overdue,
            0 => Self::DueToday,
            1 => Self::DueTomorrow,
            2..=3 => Self::DueSoon,
            4..=7 => Self::DueThisWeek,
            _ => Self::DueLater,
        }
    }

    /// Stable machine key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::DueToday => "due_today",
            Self::DueTomorrow => "due_tomorrow",
            Self::DueSoon => "due_soon",
            Self::DueThisWeek => "due_this_week",
            Self::DueLater => "due_later",
        }
    }

    /// Human-readable form used in explanations.
    pub fn display_text(&self) -> &'static str {
        match self {
            Self::Overdue => "OVERDUE",
            Self::DueToday => "DUE TODAY",
            Self::DueTomorrow => "DUE TOMORROW",
            Self::DueSoon => "DUE SOON",
            Self::DueThisWeek => "DUE THIS WEEK",
            Self::DueLater => "DUE LATER",
        }
    }
}

impl fmt::Display for UrgencyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

pub fn urgency_label(days_until_due: i64) -> UrgencyLabel {
    UrgencyLabel::from_days(days_until_due)
}
