//! DTOs exposed by the JSON API endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::branch::Branch;
use crate::domain::calendar_event::CalendarEvent;
use crate::domain::news::News;

#[derive(Debug, Default, Deserialize)]
pub struct NewsFeedQuery {
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NewsFeedResponse {
    /// Total number of posts visible to the caller.
    pub total: usize,
    pub page: usize,
    pub news: Vec<News>,
}

/// Range query of the events endpoint. Dates are `YYYY-MM-DD` or
/// `YYYY-MM-DDTHH:MM`. `to` is exclusive.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub branch_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BranchesLookupQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BranchesLookupResponse {
    pub branches: Vec<Branch>,
}
