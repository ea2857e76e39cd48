use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::alert::{Alert, NewAlert, UpdateAlert};
use crate::domain::types::{AlertId, HubId};
use crate::models::alert::{Alert as DbAlert, NewAlert as DbNewAlert, UpdateAlert as DbUpdateAlert};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AlertReader, AlertWriter, DieselRepository};
use crate::schema::alerts;

impl AlertReader for DieselRepository {
    fn get_alert_by_id(&self, id: AlertId, hub_id: HubId) -> RepositoryResult<Option<Alert>> {
        let mut conn = self.conn()?;

        let alert = alerts::table
            .filter(alerts::id.eq(id.get()))
            .filter(alerts::hub_id.eq(hub_id.get()))
            .first::<DbAlert>(&mut conn)
            .optional()?;

        Ok(alert.map(Alert::try_from).transpose()?)
    }

    fn list_alerts(&self, hub_id: HubId) -> RepositoryResult<Vec<Alert>> {
        let mut conn = self.conn()?;

        let items = alerts::table
            .filter(alerts::hub_id.eq(hub_id.get()))
            .order(alerts::created_at.desc())
            .then_order_by(alerts::id.desc())
            .load::<DbAlert>(&mut conn)?;

        Ok(items
            .into_iter()
            .map(Alert::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    fn list_active_alerts(
        &self,
        hub_id: HubId,
        now: NaiveDateTime,
    ) -> RepositoryResult<Vec<Alert>> {
        let mut conn = self.conn()?;

        let items = alerts::table
            .filter(alerts::hub_id.eq(hub_id.get()))
            .filter(alerts::is_active.eq(true))
            .filter(alerts::starts_at.is_null().or(alerts::starts_at.le(now)))
            .filter(alerts::expires_at.is_null().or(alerts::expires_at.gt(now)))
            .order(alerts::created_at.desc())
            .then_order_by(alerts::id.desc())
            .load::<DbAlert>(&mut conn)?;

        Ok(items
            .into_iter()
            .map(Alert::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

impl AlertWriter for DieselRepository {
    fn create_alert(&self, new_alert: &NewAlert) -> RepositoryResult<Alert> {
        let mut conn = self.conn()?;

        let insertable: DbNewAlert = new_alert.into();
        let created = diesel::insert_into(alerts::table)
            .values(&insertable)
            .get_result::<DbAlert>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_alert(
        &self,
        id: AlertId,
        hub_id: HubId,
        updates: &UpdateAlert,
    ) -> RepositoryResult<Alert> {
        let mut conn = self.conn()?;

        let changes: DbUpdateAlert = updates.into();
        let updated = diesel::update(
            alerts::table
                .filter(alerts::id.eq(id.get()))
                .filter(alerts::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .get_result::<DbAlert>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn set_alert_active(
        &self,
        id: AlertId,
        hub_id: HubId,
        is_active: bool,
    ) -> RepositoryResult<Alert> {
        let mut conn = self.conn()?;

        let updated = diesel::update(
            alerts::table
                .filter(alerts::id.eq(id.get()))
                .filter(alerts::hub_id.eq(hub_id.get())),
        )
        .set(alerts::is_active.eq(is_active))
        .get_result::<DbAlert>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn delete_alert(&self, id: AlertId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            alerts::table
                .filter(alerts::id.eq(id.get()))
                .filter(alerts::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
