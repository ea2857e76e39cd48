use chrono::Utc;
use diesel::prelude::*;

use crate::domain::calendar_event::{CalendarEvent, NewCalendarEvent, UpdateCalendarEvent};
use crate::domain::types::{EventId, HubId};
use crate::models::calendar_event::{
    CalendarEvent as DbCalendarEvent, NewCalendarEvent as DbNewCalendarEvent,
    UpdateCalendarEvent as DbUpdateCalendarEvent,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CalendarEventReader, CalendarEventWriter, DieselRepository, EventListQuery, EventScope,
};
use crate::schema::calendar_events;

impl CalendarEventReader for DieselRepository {
    fn get_event_by_id(
        &self,
        id: EventId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<CalendarEvent>> {
        let mut conn = self.conn()?;

        let event = calendar_events::table
            .filter(calendar_events::id.eq(id.get()))
            .filter(calendar_events::hub_id.eq(hub_id.get()))
            .first::<DbCalendarEvent>(&mut conn)
            .optional()?;

        Ok(event.map(CalendarEvent::try_from).transpose()?)
    }

    fn list_events(&self, query: EventListQuery) -> RepositoryResult<Vec<CalendarEvent>> {
        let mut conn = self.conn()?;

        let mut items = calendar_events::table
            .filter(calendar_events::hub_id.eq(query.hub_id.get()))
            .into_boxed();

        match query.to {
            Some(to) => {
                items = items
                    .filter(calendar_events::starts_at.lt(to))
                    .filter(calendar_events::ends_at.ge(query.from));
            }
            None => {
                items = items.filter(calendar_events::starts_at.ge(query.from));
            }
        }

        match query.scope {
            EventScope::All => {}
            EventScope::Branch(branch_id) => {
                items = items.filter(
                    calendar_events::branch_id
                        .is_null()
                        .or(calendar_events::branch_id.eq(branch_id.get())),
                );
            }
            EventScope::NetworkWide => {
                items = items.filter(calendar_events::branch_id.is_null());
            }
        }

        let mut items = items
            .order(calendar_events::starts_at.asc())
            .then_order_by(calendar_events::id.asc());
        if let Some(limit) = query.limit {
            items = items.limit(limit);
        }

        let events = items
            .load::<DbCalendarEvent>(&mut conn)?
            .into_iter()
            .map(CalendarEvent::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(events)
    }
}

impl CalendarEventWriter for DieselRepository {
    fn create_event(&self, new_event: &NewCalendarEvent) -> RepositoryResult<CalendarEvent> {
        let mut conn = self.conn()?;

        let insertable: DbNewCalendarEvent = new_event.into();
        let created = diesel::insert_into(calendar_events::table)
            .values(&insertable)
            .get_result::<DbCalendarEvent>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_event(
        &self,
        id: EventId,
        hub_id: HubId,
        updates: &UpdateCalendarEvent,
    ) -> RepositoryResult<CalendarEvent> {
        let mut conn = self.conn()?;

        let changes = DbUpdateCalendarEvent::new(updates, Utc::now().naive_utc());
        let updated = diesel::update(
            calendar_events::table
                .filter(calendar_events::id.eq(id.get()))
                .filter(calendar_events::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .get_result::<DbCalendarEvent>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn delete_event(&self, id: EventId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            calendar_events::table
                .filter(calendar_events::id.eq(id.get()))
                .filter(calendar_events::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
