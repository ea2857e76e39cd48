//! Calendar events and month navigation helpers.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{BranchId, EventId, EventTitle, HubId, TypeConstraintError, UserId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub id: EventId,
    pub hub_id: HubId,
    pub branch_id: Option<BranchId>,
    pub title: EventTitle,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub all_day: bool,
    pub created_by: Option<UserId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Validated time span of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventSchedule {
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
    all_day: bool,
}

impl EventSchedule {
    /// Builds a schedule. All-day events cover whole days from the start day
    /// through the end day.
    pub fn try_new(
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
        all_day: bool,
    ) -> Result<Self, TypeConstraintError> {
        let (starts_at, ends_at) = if all_day {
            (
                starts_at.date().and_time(NaiveTime::MIN),
                ends_at.date().and_hms_opt(23, 59, 59).unwrap_or(ends_at),
            )
        } else {
            (starts_at, ends_at)
        };

        if ends_at < starts_at {
            return Err(TypeConstraintError::InvalidRange);
        }

        Ok(Self {
            starts_at,
            ends_at,
            all_day,
        })
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.starts_at
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.ends_at
    }

    pub fn all_day(&self) -> bool {
        self.all_day
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EventFields {
    pub branch_id: Option<BranchId>,
    pub title: EventTitle,
    pub description: Option<String>,
    pub location: Option<String>,
    pub schedule: EventSchedule,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCalendarEvent {
    pub hub_id: HubId,
    pub created_by: Option<UserId>,
    pub fields: EventFields,
}

pub type UpdateCalendarEvent = EventFields;

/// A calendar month used by the month view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
}

impl CalendarMonth {
    /// Both neighbouring months must be representable so navigation and
    /// `range` stay within chrono's calendar.
    pub fn try_new(year: i32, month: u32) -> Result<Self, TypeConstraintError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .filter(|first| {
                first.checked_add_months(Months::new(1)).is_some()
                    && first.checked_sub_months(Months::new(1)).is_some()
            })
            .map(|_| Self { year, month })
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("{year}-{month}")))
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(&self) -> Self {
        self.first_day()
            .checked_add_months(Months::new(1))
            .map_or(*self, Self::containing)
    }

    pub fn previous(&self) -> Self {
        self.first_day()
            .checked_sub_months(Months::new(1))
            .map_or(*self, Self::containing)
    }

    /// Half-open range `[first day 00:00, first day of next month 00:00)`.
    /// The last representable month ends at `NaiveDateTime::MAX`.
    pub fn range(&self) -> (NaiveDateTime, NaiveDateTime) {
        let from = self.first_day().and_time(NaiveTime::MIN);
        let to = self
            .first_day()
            .checked_add_months(Months::new(1))
            .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN));
        (from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn schedule_rejects_inverted_range() {
        let result = EventSchedule::try_new(at(2025, 5, 2, 10, 0), at(2025, 5, 2, 9, 0), false);
        assert_eq!(result, Err(TypeConstraintError::InvalidRange));
    }

    #[test]
    fn all_day_schedule_spans_whole_days() {
        let schedule =
            EventSchedule::try_new(at(2025, 5, 2, 10, 0), at(2025, 5, 3, 9, 0), true).unwrap();
        assert_eq!(schedule.starts_at(), at(2025, 5, 2, 0, 0));
        assert_eq!(
            schedule.ends_at(),
            NaiveDate::from_ymd_opt(2025, 5, 3)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap()
        );
    }

    #[test]
    fn month_navigation_wraps_years() {
        let december = CalendarMonth::try_new(2024, 12).unwrap();
        assert_eq!(december.next(), CalendarMonth::try_new(2025, 1).unwrap());
        let january = CalendarMonth::try_new(2025, 1).unwrap();
        assert_eq!(january.previous(), december);
        assert!(CalendarMonth::try_new(2025, 13).is_err());
    }

    #[test]
    fn month_range_is_half_open() {
        let (from, to) = CalendarMonth::try_new(2024, 2).unwrap().range();
        assert_eq!(from, at(2024, 2, 1, 0, 0));
        assert_eq!(to, at(2024, 3, 1, 0, 0));
    }

    #[test]
    fn months_at_the_calendar_edges_are_rejected() {
        assert!(CalendarMonth::try_new(NaiveDate::MAX.year(), 12).is_err());
        assert!(CalendarMonth::try_new(NaiveDate::MIN.year(), 1).is_err());

        let last = CalendarMonth::try_new(NaiveDate::MAX.year(), 11).unwrap();
        assert_eq!(last.next(), CalendarMonth::containing(NaiveDate::MAX));
        let (from, to) = last.range();
        assert!(from < to);
    }

    #[test]
    fn navigation_past_the_edge_stays_put() {
        let edge = CalendarMonth::containing(NaiveDate::MAX);
        assert_eq!(edge.next(), edge);
        assert_eq!(edge.range().1, NaiveDateTime::MAX);
        let start = CalendarMonth::containing(NaiveDate::MIN);
        assert_eq!(start.previous(), start);
    }
}
