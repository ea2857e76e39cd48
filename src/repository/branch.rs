use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::branch::{Branch, NewBranch, UpdateBranch};
use crate::domain::types::{BranchId, HubId};
use crate::models::branch::{
    Branch as DbBranch, NewBranch as DbNewBranch, UpdateBranch as DbUpdateBranch,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{BranchListQuery, BranchReader, BranchWriter, DieselRepository, like_pattern};
use crate::schema::branches;

fn filtered(query: &BranchListQuery) -> branches::BoxedQuery<'static, Sqlite> {
    let mut items = branches::table
        .filter(branches::hub_id.eq(query.hub_id.get()))
        .into_boxed();

    if let Some(term) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        items = items.filter(
            branches::name
                .like(pattern.clone())
                .or(branches::address.like(pattern.clone()))
                .or(branches::city.like(pattern.clone()))
                .or(branches::manager_name.like(pattern)),
        );
    }

    if let Some(city) = query.city.as_deref().filter(|c| !c.trim().is_empty()) {
        items = items.filter(branches::city.eq(city.trim().to_string()));
    }

    if query.active_only {
        items = items.filter(branches::is_active.eq(true));
    }

    items
}

impl BranchReader for DieselRepository {
    fn get_branch_by_id(&self, id: BranchId, hub_id: HubId) -> RepositoryResult<Option<Branch>> {
        let mut conn = self.conn()?;

        let branch = branches::table
            .filter(branches::id.eq(id.get()))
            .filter(branches::hub_id.eq(hub_id.get()))
            .first::<DbBranch>(&mut conn)
            .optional()?;

        Ok(branch.map(Branch::try_from).transpose()?)
    }

    fn list_branches(&self, query: BranchListQuery) -> RepositoryResult<(usize, Vec<Branch>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = filtered(&query).order(branches::name.asc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let items = items
            .load::<DbBranch>(&mut conn)?
            .into_iter()
            .map(Branch::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, items))
    }

    fn list_branch_cities(&self, hub_id: HubId) -> RepositoryResult<Vec<String>> {
        let mut conn = self.conn()?;

        let cities = branches::table
            .filter(branches::hub_id.eq(hub_id.get()))
            .filter(branches::city.is_not_null())
            .select(branches::city)
            .distinct()
            .order(branches::city.asc())
            .load::<Option<String>>(&mut conn)?;

        Ok(cities.into_iter().flatten().collect())
    }
}

impl BranchWriter for DieselRepository {
    fn create_branch(&self, new_branch: &NewBranch) -> RepositoryResult<Branch> {
        let mut conn = self.conn()?;

        let insertable: DbNewBranch = new_branch.into();
        let created = diesel::insert_into(branches::table)
            .values(&insertable)
            .get_result::<DbBranch>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn import_branches(&self, new_branches: &[NewBranch]) -> RepositoryResult<usize> {
        if new_branches.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn()?;

        let insertables: Vec<DbNewBranch> = new_branches.iter().map(Into::into).collect();
        let inserted = conn.transaction::<_, RepositoryError, _>(|conn| {
            let mut inserted = 0;
            for row in &insertables {
                inserted += diesel::insert_or_ignore_into(branches::table)
                    .values(row)
                    .execute(conn)?;
            }
            Ok(inserted)
        })?;

        Ok(inserted)
    }

    fn update_branch(
        &self,
        id: BranchId,
        hub_id: HubId,
        updates: &UpdateBranch,
    ) -> RepositoryResult<Branch> {
        let mut conn = self.conn()?;

        let changes = DbUpdateBranch::new(updates, Utc::now().naive_utc());
        let updated = diesel::update(
            branches::table
                .filter(branches::id.eq(id.get()))
                .filter(branches::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .get_result::<DbBranch>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn delete_branch(&self, id: BranchId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            branches::table
                .filter(branches::id.eq(id.get()))
                .filter(branches::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
