use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::company::{Company, NewCompany, UpdateCompany};
use crate::domain::types::{CompanyId, HubId};
use crate::models::company::{
    Company as DbCompany, NewCompany as DbNewCompany, UpdateCompany as DbUpdateCompany,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CompanyListQuery, CompanyReader, CompanyWriter, DieselRepository, like_pattern,
};
use crate::schema::{companies, products};

fn filtered(query: &CompanyListQuery) -> companies::BoxedQuery<'static, Sqlite> {
    let mut items = companies::table
        .filter(companies::hub_id.eq(query.hub_id.get()))
        .into_boxed();

    if let Some(term) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        items = items.filter(
            companies::name
                .like(pattern.clone())
                .or(companies::description.like(pattern)),
        );
    }

    if query.active_only {
        items = items.filter(companies::is_active.eq(true));
    }

    items
}

impl CompanyReader for DieselRepository {
    fn get_company_by_id(
        &self,
        id: CompanyId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Company>> {
        let mut conn = self.conn()?;

        let company = companies::table
            .filter(companies::id.eq(id.get()))
            .filter(companies::hub_id.eq(hub_id.get()))
            .first::<DbCompany>(&mut conn)
            .optional()?;

        Ok(company.map(Company::try_from).transpose()?)
    }

    fn list_companies(&self, query: CompanyListQuery) -> RepositoryResult<(usize, Vec<Company>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = filtered(&query).order(companies::name.asc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let items = items
            .load::<DbCompany>(&mut conn)?
            .into_iter()
            .map(Company::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, items))
    }

    fn count_company_products(&self, id: CompanyId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let total: i64 = products::table
            .filter(products::company_id.eq(id.get()))
            .count()
            .get_result(&mut conn)?;

        Ok(total as usize)
    }
}

impl CompanyWriter for DieselRepository {
    fn create_company(&self, new_company: &NewCompany) -> RepositoryResult<Company> {
        let mut conn = self.conn()?;

        let insertable: DbNewCompany = new_company.into();
        let created = diesel::insert_into(companies::table)
            .values(&insertable)
            .get_result::<DbCompany>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_company(
        &self,
        id: CompanyId,
        hub_id: HubId,
        updates: &UpdateCompany,
    ) -> RepositoryResult<Company> {
        let mut conn = self.conn()?;

        let changes = DbUpdateCompany::new(updates, Utc::now().naive_utc());
        let updated = diesel::update(
            companies::table
                .filter(companies::id.eq(id.get()))
                .filter(companies::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .get_result::<DbCompany>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn delete_company(&self, id: CompanyId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            companies::table
                .filter(companies::id.eq(id.get()))
                .filter(companies::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
