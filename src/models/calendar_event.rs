//! Diesel models for calendar events.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::calendar_event::{
    CalendarEvent as DomainCalendarEvent, EventFields, NewCalendarEvent as DomainNewCalendarEvent,
};
use crate::domain::types::{BranchId, EventId, EventTitle, HubId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::calendar_events)]
pub struct CalendarEvent {
    pub id: i32,
    pub hub_id: i32,
    pub branch_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub all_day: bool,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::calendar_events)]
pub struct NewCalendarEvent<'a> {
    pub hub_id: i32,
    pub branch_id: Option<i32>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub all_day: bool,
    pub created_by: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::calendar_events)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCalendarEvent<'a> {
    pub branch_id: Option<i32>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub all_day: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<CalendarEvent> for DomainCalendarEvent {
    type Error = TypeConstraintError;

    fn try_from(event: CalendarEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EventId::new(event.id)?,
            hub_id: HubId::new(event.hub_id)?,
            branch_id: event.branch_id.map(BranchId::new).transpose()?,
            title: EventTitle::new(event.title)?,
            description: event.description,
            location: event.location,
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            all_day: event.all_day,
            created_by: event.created_by.map(UserId::new).transpose()?,
            created_at: event.created_at,
            updated_at: event.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCalendarEvent> for NewCalendarEvent<'a> {
    fn from(event: &'a DomainNewCalendarEvent) -> Self {
        let fields = &event.fields;
        Self {
            hub_id: event.hub_id.get(),
            branch_id: fields.branch_id.map(BranchId::get),
            title: fields.title.as_str(),
            description: fields.description.as_deref(),
            location: fields.location.as_deref(),
            starts_at: fields.schedule.starts_at(),
            ends_at: fields.schedule.ends_at(),
            all_day: fields.schedule.all_day(),
            created_by: event.created_by.map(UserId::get),
        }
    }
}

impl<'a> UpdateCalendarEvent<'a> {
    pub fn new(fields: &'a EventFields, updated_at: NaiveDateTime) -> Self {
        Self {
            branch_id: fields.branch_id.map(BranchId::get),
            title: fields.title.as_str(),
            description: fields.description.as_deref(),
            location: fields.location.as_deref(),
            starts_at: fields.schedule.starts_at(),
            ends_at: fields.schedule.ends_at(),
            all_day: fields.schedule.all_day(),
            updated_at,
        }
    }
}
