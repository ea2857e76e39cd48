use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::types::{HubId, ProductId};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, ProductListQuery, ProductReader, ProductWriter, like_pattern,
};
use crate::schema::products;

fn filtered(query: &ProductListQuery) -> products::BoxedQuery<'static, Sqlite> {
    let mut items = products::table
        .filter(products::hub_id.eq(query.hub_id.get()))
        .into_boxed();

    if let Some(term) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        items = items.filter(
            products::title
                .like(pattern.clone())
                .or(products::summary.like(pattern.clone()))
                .or(products::body.like(pattern)),
        );
    }

    if let Some(category) = query.category.as_deref().filter(|c| !c.trim().is_empty()) {
        items = items.filter(products::category.eq(category.trim().to_string()));
    }

    if let Some(company_id) = query.company_id {
        items = items.filter(products::company_id.eq(company_id.get()));
    }

    if query.published_only {
        items = items.filter(products::is_published.eq(true));
    }

    items
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(
        &self,
        id: ProductId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;

        let product = products::table
            .filter(products::id.eq(id.get()))
            .filter(products::hub_id.eq(hub_id.get()))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Product::try_from).transpose()?)
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = filtered(&query)
            .order(products::category.asc())
            .then_order_by(products::title.asc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let items = items
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, items))
    }

    fn list_product_categories(&self, hub_id: HubId) -> RepositoryResult<Vec<String>> {
        let mut conn = self.conn()?;

        let categories = products::table
            .filter(products::hub_id.eq(hub_id.get()))
            .select(products::category)
            .distinct()
            .order(products::category.asc())
            .load::<String>(&mut conn)?;

        Ok(categories)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
        let mut conn = self.conn()?;

        let insertable: DbNewProduct = new_product.into();
        let created = diesel::insert_into(products::table)
            .values(&insertable)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_product(
        &self,
        id: ProductId,
        hub_id: HubId,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product> {
        let mut conn = self.conn()?;

        let changes = DbUpdateProduct::new(updates, Utc::now().naive_utc());
        let updated = diesel::update(
            products::table
                .filter(products::id.eq(id.get()))
                .filter(products::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn delete_product(&self, id: ProductId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            products::table
                .filter(products::id.eq(id.get()))
                .filter(products::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
