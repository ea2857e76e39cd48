use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::news::{NewNews, News, NewsVisibility, UpdateNews};
use crate::domain::types::{BranchId, HubId, NewsId};
use crate::models::news::{
    NewNews as DbNewNews, NewNewsVisibility as DbNewNewsVisibility, News as DbNews,
    NewsVisibility as DbNewsVisibility, UpdateNews as DbUpdateNews,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, NewsListQuery, NewsReader, NewsWriter, like_pattern};
use crate::schema::{news, news_visibility};

fn filtered(query: &NewsListQuery) -> news::BoxedQuery<'static, Sqlite> {
    let mut items = news::table
        .filter(news::hub_id.eq(query.hub_id.get()))
        .into_boxed();

    if let Some(term) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        items = items.filter(
            news::title
                .like(pattern.clone())
                .or(news::body.like(pattern.clone()))
                .or(news::tags.like(pattern)),
        );
    }

    if let Some(category) = query.category.as_deref().filter(|c| !c.trim().is_empty()) {
        items = items.filter(news::category.eq(category.trim().to_string()));
    }

    if query.published_only {
        items = items.filter(news::is_published.eq(true));
    }

    if let Some(audience) = query.audience {
        // `branch_id = NULL` never matches, so a reader without a branch only
        // gets rows addressed to all branches.
        let visible_ids = news_visibility::table
            .filter(
                news_visibility::branch_id
                    .is_null()
                    .or(news_visibility::branch_id.eq(audience.branch_id.map(BranchId::get))),
            )
            .filter(
                news_visibility::user_type
                    .is_null()
                    .or(news_visibility::user_type.eq(audience.user_type.as_str())),
            )
            .select(news_visibility::news_id);
        items = items.filter(news::id.eq_any(visible_ids));
    }

    items
}

fn insert_visibility(
    conn: &mut SqliteConnection,
    news_id: NewsId,
    rows: &[NewsVisibility],
) -> QueryResult<usize> {
    if rows.is_empty() {
        return Ok(0);
    }
    let insertables: Vec<DbNewNewsVisibility> = rows
        .iter()
        .map(|row| DbNewNewsVisibility::new(news_id, row))
        .collect();
    diesel::insert_into(news_visibility::table)
        .values(&insertables)
        .execute(conn)
}

impl NewsReader for DieselRepository {
    fn get_news_by_id(&self, id: NewsId, hub_id: HubId) -> RepositoryResult<Option<News>> {
        let mut conn = self.conn()?;

        let post = news::table
            .filter(news::id.eq(id.get()))
            .filter(news::hub_id.eq(hub_id.get()))
            .first::<DbNews>(&mut conn)
            .optional()?;

        Ok(post.map(News::try_from).transpose()?)
    }

    fn list_news_visibility(&self, id: NewsId) -> RepositoryResult<Vec<NewsVisibility>> {
        let mut conn = self.conn()?;

        let rows = news_visibility::table
            .filter(news_visibility::news_id.eq(id.get()))
            .order(news_visibility::id.asc())
            .load::<DbNewsVisibility>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(NewsVisibility::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    fn list_news(&self, query: NewsListQuery) -> RepositoryResult<(usize, Vec<News>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = if query.published_only {
            filtered(&query)
                .order(news::published_at.desc())
                .then_order_by(news::id.desc())
        } else {
            filtered(&query)
                .order(news::created_at.desc())
                .then_order_by(news::id.desc())
        };
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let items = items
            .load::<DbNews>(&mut conn)?
            .into_iter()
            .map(News::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, items))
    }

    fn list_news_categories(&self, hub_id: HubId) -> RepositoryResult<Vec<String>> {
        let mut conn = self.conn()?;

        let categories = news::table
            .filter(news::hub_id.eq(hub_id.get()))
            .select(news::category)
            .distinct()
            .order(news::category.asc())
            .load::<String>(&mut conn)?;

        Ok(categories)
    }
}

impl NewsWriter for DieselRepository {
    fn create_news(
        &self,
        new_news: &NewNews,
        published_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<News> {
        let mut conn = self.conn()?;

        let insertable = DbNewNews::new(
            new_news.hub_id,
            new_news.author_id,
            &new_news.fields,
            published_at,
        );

        let created = conn.transaction::<_, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(news::table)
                .values(&insertable)
                .get_result::<DbNews>(conn)?;
            let news_id = NewsId::new(created.id)?;
            insert_visibility(conn, news_id, &new_news.visibility)?;
            Ok(created)
        })?;

        Ok(created.try_into()?)
    }

    fn update_news(
        &self,
        id: NewsId,
        hub_id: HubId,
        updates: &UpdateNews,
        published_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<News> {
        let mut conn = self.conn()?;

        let changes = DbUpdateNews::new(&updates.fields, published_at, Utc::now().naive_utc());

        let updated = conn.transaction::<_, RepositoryError, _>(|conn| {
            let updated = diesel::update(
                news::table
                    .filter(news::id.eq(id.get()))
                    .filter(news::hub_id.eq(hub_id.get())),
            )
            .set(&changes)
            .get_result::<DbNews>(conn)?;

            diesel::delete(news_visibility::table.filter(news_visibility::news_id.eq(id.get())))
                .execute(conn)?;
            insert_visibility(conn, id, &updates.visibility)?;
            Ok(updated)
        })?;

        Ok(updated.try_into()?)
    }

    fn delete_news(&self, id: NewsId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let owned = news::table
                .filter(news::id.eq(id.get()))
                .filter(news::hub_id.eq(hub_id.get()))
                .select(news::id)
                .first::<i32>(conn)
                .optional()?;
            if owned.is_none() {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(news_visibility::table.filter(news_visibility::news_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(news::table.filter(news::id.eq(id.get()))).execute(conn)?;
            Ok(())
        })
    }
}
