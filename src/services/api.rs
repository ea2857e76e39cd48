//! JSON endpoints used by widgets and selectors.

use chrono::{Duration, NaiveDateTime};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::BranchId;
use crate::dto::api::{
    BranchesLookupQuery, BranchesLookupResponse, EventsQuery, EventsResponse, NewsFeedQuery,
    NewsFeedResponse,
};
use crate::forms::parse_datetime;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{
    BranchListQuery, BranchReader, CalendarEventReader, EventListQuery, NewsReader, UserReader,
};
use crate::services::news::feed_query;
use crate::services::{
    ServiceError, ServiceResult, authorize_reader, filter_value, is_admin, page_or_first,
};

/// Longest range the events endpoint serves.
pub const MAX_EVENT_RANGE_DAYS: i64 = 366;
/// Range used when `to` is omitted.
const DEFAULT_EVENT_RANGE_DAYS: i64 = 31;

/// One page of the caller's visible news.
pub fn news_feed<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: NewsFeedQuery,
) -> ServiceResult<NewsFeedResponse>
where
    R: NewsReader + UserReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;

    let page = page_or_first(params.page);
    let query = feed_query(repo, user, hub_id)?.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, news) = repo.list_news(query)?;

    Ok(NewsFeedResponse { total, page, news })
}

/// Events overlapping `[from, to)`. `from` defaults to `now`.
pub fn list_events<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: EventsQuery,
    now: NaiveDateTime,
) -> ServiceResult<EventsResponse>
where
    R: CalendarEventReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;

    let from = match filter_value(params.from) {
        Some(value) => parse_datetime(&value)?,
        None => now,
    };
    let to = match filter_value(params.to) {
        Some(value) => parse_datetime(&value)?,
        None => from
            .checked_add_signed(Duration::days(DEFAULT_EVENT_RANGE_DAYS))
            .ok_or_else(|| ServiceError::Form("`from` is out of range".to_string()))?,
    };

    if to <= from {
        return Err(ServiceError::Form("`to` must be after `from`".to_string()));
    }
    if to - from > Duration::days(MAX_EVENT_RANGE_DAYS) {
        return Err(ServiceError::Form(format!(
            "range must not exceed {MAX_EVENT_RANGE_DAYS} days"
        )));
    }

    let mut query = EventListQuery::between(hub_id, from, to);
    if let Some(id) = params.branch_id.filter(|id| *id > 0) {
        query = query.branch(BranchId::new(id)?);
    }

    let events = repo.list_events(query)?;

    Ok(EventsResponse { events })
}

/// Branch lookup for selectors. Inactive branches are only offered to admins.
pub fn lookup_branches<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: BranchesLookupQuery,
) -> ServiceResult<BranchesLookupResponse>
where
    R: BranchReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;

    let mut query = BranchListQuery::new(hub_id).paginate(1, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = filter_value(params.search) {
        query = query.search(term);
    }
    if !is_admin(user) {
        query = query.active_only();
    }

    let (_, branches) = repo.list_branches(query)?;

    Ok(BranchesLookupResponse { branches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::*;

    fn events_query(from: Option<&str>, to: Option<&str>) -> EventsQuery {
        EventsQuery {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            branch_id: None,
        }
    }

    #[test]
    fn events_default_to_a_month_from_now() {
        let mut repo = MockRepository::new();
        repo.expect_list_events()
            .withf(|query| {
                query.from == at(10, 12) && query.to == Some(at(10, 12) + Duration::days(31))
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        list_events(&repo, &reader_user(), events_query(None, None), at(10, 12)).unwrap();
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_list_events().times(0);

        let result = list_events(
            &repo,
            &reader_user(),
            events_query(Some("2025-06-10"), Some("2025-06-01")),
            at(10, 12),
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn range_longer_than_a_year_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_list_events().times(0);

        let result = list_events(
            &repo,
            &reader_user(),
            events_query(Some("2025-01-01"), Some("2026-01-03")),
            at(10, 12),
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn default_range_past_the_last_date_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_list_events().times(0);

        let result = list_events(
            &repo,
            &reader_user(),
            events_query(Some("+262142-12-31"), None),
            at(10, 12),
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let repo = MockRepository::new();

        let result = list_events(
            &repo,
            &reader_user(),
            events_query(Some("June 1st"), None),
            at(10, 12),
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn outsiders_get_unauthorized() {
        let repo = MockRepository::new();

        assert!(matches!(
            lookup_branches(&repo, &outsider_user(), BranchesLookupQuery::default()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn lookup_limits_readers_to_active_branches() {
        let mut repo = MockRepository::new();
        repo.expect_list_branches()
            .withf(|query| query.active_only && query.search.as_deref() == Some("nor"))
            .times(1)
            .returning(|_| Ok((0, vec![])));

        lookup_branches(
            &repo,
            &reader_user(),
            BranchesLookupQuery {
                search: Some("nor".to_string()),
            },
        )
        .unwrap();
    }

    #[test]
    fn news_feed_reports_total_and_page() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().returning(|_, _| Ok(None));
        repo.expect_list_news()
            .withf(|query| query.pagination.as_ref().map(|p| p.page) == Some(2))
            .returning(|_| Ok((25, vec![])));

        let response = news_feed(&repo, &reader_user(), NewsFeedQuery { page: Some(2) }).unwrap();

        assert_eq!(response.total, 25);
        assert_eq!(response.page, 2);
    }
}
