use diesel::prelude::*;

use crate::domain::types::HubId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, HubStats, StatsReader};
use crate::schema::{branches, companies, documents, news, products, users};

impl StatsReader for DieselRepository {
    fn hub_stats(&self, hub_id: HubId) -> RepositoryResult<HubStats> {
        let mut conn = self.conn()?;
        let hub = hub_id.get();

        let branches: i64 = branches::table
            .filter(branches::hub_id.eq(hub))
            .count()
            .get_result(&mut conn)?;
        let companies: i64 = companies::table
            .filter(companies::hub_id.eq(hub))
            .count()
            .get_result(&mut conn)?;
        let products: i64 = products::table
            .filter(products::hub_id.eq(hub))
            .count()
            .get_result(&mut conn)?;
        let documents: i64 = documents::table
            .filter(documents::hub_id.eq(hub))
            .count()
            .get_result(&mut conn)?;
        let news: i64 = news::table
            .filter(news::hub_id.eq(hub))
            .count()
            .get_result(&mut conn)?;
        let users: i64 = users::table
            .filter(users::hub_id.eq(hub))
            .count()
            .get_result(&mut conn)?;

        Ok(HubStats {
            branches: branches as usize,
            companies: companies as usize,
            products: products as usize,
            documents: documents as usize,
            news: news as usize,
            users: users as usize,
        })
    }
}
