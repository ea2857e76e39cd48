//! Dashboard shown after sign-in.

use chrono::NaiveDateTime;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::main::DashboardPageData;
use crate::repository::{
    AlertReader, CalendarEventReader, NewsReader, StatsReader, UserReader, UserWriter,
};
use crate::services::calendar::upcoming_events;
use crate::services::news::feed_query;
use crate::services::users::sync_profile;
use crate::services::{ServiceError, ServiceResult, authorize_reader, is_admin};

const DASHBOARD_NEWS: usize = 5;
const DASHBOARD_EVENTS: i64 = 5;

/// Syncs the caller's profile and gathers the dashboard widgets.
pub fn load_dashboard<R>(
    repo: &R,
    user: &AuthenticatedUser,
    now: NaiveDateTime,
) -> ServiceResult<DashboardPageData>
where
    R: UserReader
        + UserWriter
        + AlertReader
        + NewsReader
        + CalendarEventReader
        + StatsReader
        + ?Sized,
{
    let hub_id = authorize_reader(user)?;

    let profile = sync_profile(repo, user).map_err(|err| {
        log::error!("Failed to sync profile of {}: {err}", user.email);
        err
    })?;
    if !profile.is_active && !is_admin(user) {
        return Err(ServiceError::Unauthorized);
    }

    let alerts = repo.list_active_alerts(hub_id, now)?;

    let (_, news) = repo.list_news(feed_query(repo, user, hub_id)?.paginate(1, DASHBOARD_NEWS))?;

    let events = upcoming_events(repo, hub_id, profile.branch_id, now, DASHBOARD_EVENTS)?;

    let stats = if is_admin(user) {
        Some(repo.hub_stats(hub_id)?)
    } else {
        None
    };

    Ok(DashboardPageData {
        profile,
        alerts,
        news,
        events,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{BranchId, EmailAddress, UserId, UserName};
    use crate::domain::user::{User, UserType};
    use crate::repository::{EventScope, HubStats};
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::*;

    fn profile(branch: Option<i32>, is_active: bool) -> User {
        User {
            id: UserId::new(1).unwrap(),
            hub_id: hub(),
            email: EmailAddress::new("reader@example.com").unwrap(),
            name: UserName::new("reader").unwrap(),
            user_type: UserType::Agent,
            branch_id: branch.map(|id| BranchId::new(id).unwrap()),
            phone: None,
            is_active,
            created_at: at(1, 9),
            updated_at: at(1, 9),
        }
    }

    #[test]
    fn reader_dashboard_is_scoped_to_profile() {
        let mut repo = MockRepository::new();
        repo.expect_sync_user()
            .times(1)
            .returning(|_| Ok(profile(Some(7), true)));
        repo.expect_get_user_by_email()
            .returning(|_, _| Ok(Some(profile(Some(7), true))));
        repo.expect_list_active_alerts()
            .withf(|_, now| *now == at(10, 12))
            .returning(|_, _| Ok(vec![]));
        repo.expect_list_news()
            .withf(|query| {
                query.audience.map(|a| a.branch_id) == Some(Some(BranchId::new(7).unwrap()))
                    && query.pagination.as_ref().map(|p| p.per_page) == Some(5)
            })
            .times(1)
            .returning(|_| Ok((0, vec![])));
        repo.expect_list_events()
            .withf(|query| {
                query.to.is_none()
                    && query.from == at(10, 12)
                    && query.limit == Some(5)
                    && query.scope == EventScope::Branch(BranchId::new(7).unwrap())
            })
            .times(1)
            .returning(|_| Ok(vec![]));
        repo.expect_hub_stats().times(0);

        let data = load_dashboard(&repo, &reader_user(), at(10, 12)).unwrap();

        assert!(data.stats.is_none());
        assert_eq!(data.profile.user_type, UserType::Agent);
    }

    #[test]
    fn reader_without_branch_only_gets_network_wide_events() {
        let mut repo = MockRepository::new();
        repo.expect_sync_user().returning(|_| Ok(profile(None, true)));
        repo.expect_get_user_by_email()
            .returning(|_, _| Ok(Some(profile(None, true))));
        repo.expect_list_active_alerts().returning(|_, _| Ok(vec![]));
        repo.expect_list_news().returning(|_| Ok((0, vec![])));
        repo.expect_list_events()
            .withf(|query| query.scope == EventScope::NetworkWide && query.limit == Some(5))
            .times(1)
            .returning(|_| Ok(vec![]));

        load_dashboard(&repo, &reader_user(), at(10, 12)).unwrap();
    }

    #[test]
    fn admin_dashboard_includes_stats() {
        let mut repo = MockRepository::new();
        repo.expect_sync_user().returning(|_| Ok(profile(None, true)));
        repo.expect_list_active_alerts().returning(|_, _| Ok(vec![]));
        repo.expect_list_news()
            .withf(|query| query.audience.is_none() && query.published_only)
            .returning(|_| Ok((0, vec![])));
        repo.expect_list_events()
            .withf(|query| query.scope == EventScope::NetworkWide)
            .returning(|_| Ok(vec![]));
        repo.expect_hub_stats().times(1).returning(|_| {
            Ok(HubStats {
                branches: 3,
                ..HubStats::default()
            })
        });

        let data = load_dashboard(&repo, &admin_user(), at(10, 12)).unwrap();

        assert_eq!(data.stats.map(|s| s.branches), Some(3));
    }

    #[test]
    fn deactivated_reader_is_turned_away() {
        let mut repo = MockRepository::new();
        repo.expect_sync_user().returning(|_| Ok(profile(None, false)));
        repo.expect_list_active_alerts().times(0);

        assert!(matches!(
            load_dashboard(&repo, &reader_user(), at(10, 12)),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn outsiders_are_not_synced() {
        let mut repo = MockRepository::new();
        repo.expect_sync_user().times(0);

        assert!(matches!(
            load_dashboard(&repo, &outsider_user(), at(10, 12)),
            Err(ServiceError::Unauthorized)
        ));
    }
}
