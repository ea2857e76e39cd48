use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::types::{EmailAddress, HubId, UserId};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::models::user::{NewUser as DbNewUser, UpdateUser as DbUpdateUser, User as DbUser};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, UserListQuery, UserReader, UserWriter, like_pattern};
use crate::schema::users;

fn filtered(query: &UserListQuery) -> users::BoxedQuery<'static, Sqlite> {
    let mut items = users::table
        .filter(users::hub_id.eq(query.hub_id.get()))
        .into_boxed();

    if let Some(term) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        items = items.filter(users::name.like(pattern.clone()).or(users::email.like(pattern)));
    }

    if let Some(user_type) = query.user_type {
        items = items.filter(users::user_type.eq(user_type.as_str()));
    }

    if let Some(branch_id) = query.branch_id {
        items = items.filter(users::branch_id.eq(branch_id.get()));
    }

    items
}

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId, hub_id: HubId) -> RepositoryResult<Option<User>> {
        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::id.eq(id.get()))
            .filter(users::hub_id.eq(hub_id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(User::try_from).transpose()?)
    }

    fn get_user_by_email(
        &self,
        email: &EmailAddress,
        hub_id: HubId,
    ) -> RepositoryResult<Option<User>> {
        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::email.eq(email.as_str()))
            .filter(users::hub_id.eq(hub_id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(User::try_from).transpose()?)
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = filtered(&query).order(users::name.asc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let items = items
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, items))
    }
}

impl UserWriter for DieselRepository {
    fn sync_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        let mut conn = self.conn()?;

        let insertable: DbNewUser = new_user.into();
        let user = diesel::insert_into(users::table)
            .values(&insertable)
            .on_conflict((users::hub_id, users::email))
            .do_update()
            .set((
                users::name.eq(insertable.name),
                users::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbUser>(&mut conn)?;

        Ok(user.try_into()?)
    }

    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        let mut conn = self.conn()?;

        let insertable: DbNewUser = new_user.into();
        let created = diesel::insert_into(users::table)
            .values(&insertable)
            .get_result::<DbUser>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_user(
        &self,
        id: UserId,
        hub_id: HubId,
        updates: &UpdateUser,
    ) -> RepositoryResult<User> {
        let mut conn = self.conn()?;

        let changes = DbUpdateUser::new(updates, Utc::now().naive_utc());
        let updated = diesel::update(
            users::table
                .filter(users::id.eq(id.get()))
                .filter(users::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .get_result::<DbUser>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn set_user_active(
        &self,
        id: UserId,
        hub_id: HubId,
        is_active: bool,
    ) -> RepositoryResult<User> {
        let mut conn = self.conn()?;

        let updated = diesel::update(
            users::table
                .filter(users::id.eq(id.get()))
                .filter(users::hub_id.eq(hub_id.get())),
        )
        .set((
            users::is_active.eq(is_active),
            users::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbUser>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn delete_user(&self, id: UserId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            users::table
                .filter(users::id.eq(id.get()))
                .filter(users::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
