use serde::Serialize;

use crate::domain::branch::Branch;
use crate::domain::calendar_event::{CalendarEvent, CalendarMonth};

/// One cell of the month grid.
#[derive(Debug, Serialize)]
pub struct CalendarDay {
    /// Day of month, `None` for padding cells outside the month.
    pub day: Option<u32>,
    pub is_today: bool,
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Serialize)]
pub struct CalendarPageData {
    pub month: CalendarMonth,
    pub previous: CalendarMonth,
    pub next: CalendarMonth,
    /// Weeks of seven days starting on Monday.
    pub weeks: Vec<Vec<CalendarDay>>,
    pub events: Vec<CalendarEvent>,
    pub branches: Vec<Branch>,
    pub branch_id: Option<i32>,
    pub can_edit: bool,
}

#[derive(Debug, Serialize)]
pub struct EventPageData {
    pub event: CalendarEvent,
    pub branch: Option<Branch>,
    pub branches: Vec<Branch>,
    pub can_edit: bool,
}
