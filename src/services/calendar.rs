//! Calendar month view and event editing.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::changes::{ChangeAction, ChangeMessage, ChangeNotifier, notify};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::calendar_event::{CalendarEvent, CalendarMonth, EventFields, NewCalendarEvent};
use crate::domain::types::{BranchId, EventId, HubId};
use crate::dto::calendar::{CalendarDay, CalendarPageData, EventPageData};
use crate::forms::calendar::{CalendarQuery, EventForm};
use crate::repository::{
    BranchListQuery, BranchReader, CalendarEventReader, CalendarEventWriter, EventListQuery,
    UserReader,
};
use crate::services::users::profile_id;
use crate::services::{ServiceError, ServiceResult, authorize_admin, authorize_reader, is_admin};

const TABLE: &str = "calendar_events";

fn overlaps_day(event: &CalendarEvent, day: NaiveDate) -> bool {
    event.starts_at.date() <= day && event.ends_at.date() >= day
}

/// Monday-first grid of the month with each day's events.
fn month_grid(
    month: CalendarMonth,
    events: &[CalendarEvent],
    today: NaiveDate,
) -> Vec<Vec<CalendarDay>> {
    let first = month.first_day();
    let days_in_month = (month.next().first_day() - first).num_days() as u32;
    let leading = first.weekday().num_days_from_monday();

    let mut cells: Vec<CalendarDay> = (0..leading)
        .map(|_| CalendarDay {
            day: None,
            is_today: false,
            events: Vec::new(),
        })
        .collect();

    for offset in 0..days_in_month {
        let date = first + chrono::Days::new(offset as u64);
        cells.push(CalendarDay {
            day: Some(date.day()),
            is_today: date == today,
            events: events
                .iter()
                .filter(|event| overlaps_day(event, date))
                .cloned()
                .collect(),
        });
    }

    while cells.len() % 7 != 0 {
        cells.push(CalendarDay {
            day: None,
            is_today: false,
            events: Vec::new(),
        });
    }

    let mut weeks = Vec::with_capacity(cells.len() / 7);
    let mut cells = cells.into_iter().peekable();
    while cells.peek().is_some() {
        weeks.push(cells.by_ref().take(7).collect());
    }
    weeks
}

/// Events overlapping the requested month, defaulting to the month of `now`.
pub fn month_view<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CalendarQuery,
    now: NaiveDateTime,
) -> ServiceResult<CalendarPageData>
where
    R: CalendarEventReader + BranchReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;

    let today = now.date();
    let month = match (query.year, query.month) {
        (Some(year), Some(month)) => CalendarMonth::try_new(year, month)?,
        _ => CalendarMonth::containing(today),
    };
    let branch_id = query.branch_id.filter(|id| *id > 0);

    let (from, to) = month.range();
    let mut list_query = EventListQuery::between(hub_id, from, to);
    if let Some(id) = branch_id {
        list_query = list_query.branch(BranchId::new(id)?);
    }

    let events = repo.list_events(list_query)?;
    let (_, branches) = repo.list_branches(BranchListQuery::new(hub_id).active_only())?;

    Ok(CalendarPageData {
        month,
        previous: month.previous(),
        next: month.next(),
        weeks: month_grid(month, &events, today),
        events,
        branches,
        branch_id,
        can_edit: is_admin(user),
    })
}

/// Next `limit` events starting at or after `now` that a member of
/// `branch_id` sees.
pub(crate) fn upcoming_events<R>(
    repo: &R,
    hub_id: HubId,
    branch_id: Option<BranchId>,
    now: NaiveDateTime,
    limit: i64,
) -> ServiceResult<Vec<CalendarEvent>>
where
    R: CalendarEventReader + ?Sized,
{
    let query = EventListQuery::upcoming(hub_id, now)
        .visible_from(branch_id)
        .limit(limit);
    Ok(repo.list_events(query)?)
}

pub fn show_event<R>(
    repo: &R,
    user: &AuthenticatedUser,
    event_id: i32,
) -> ServiceResult<EventPageData>
where
    R: CalendarEventReader + BranchReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;
    let can_edit = is_admin(user);

    let event = repo
        .get_event_by_id(EventId::new(event_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let branch = match event.branch_id {
        Some(branch_id) => repo.get_branch_by_id(branch_id, hub_id)?,
        None => None,
    };

    let branches = if can_edit {
        repo.list_branches(BranchListQuery::new(hub_id))?.1
    } else {
        Vec::new()
    };

    Ok(EventPageData {
        event,
        branch,
        branches,
        can_edit,
    })
}

fn event_fields<R>(repo: &R, form: EventForm, hub_id: HubId) -> ServiceResult<EventFields>
where
    R: BranchReader + ?Sized,
{
    let fields = EventFields::try_from(form)?;
    if let Some(branch_id) = fields.branch_id
        && repo.get_branch_by_id(branch_id, hub_id)?.is_none()
    {
        return Err(ServiceError::Form(format!("Unknown branch {branch_id}")));
    }
    Ok(fields)
}

pub fn add_event<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    form: EventForm,
) -> ServiceResult<CalendarEvent>
where
    R: CalendarEventWriter + BranchReader + UserReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let fields = event_fields(repo, form, hub_id)?;

    let event = repo.create_event(&NewCalendarEvent {
        hub_id,
        created_by: profile_id(repo, user, hub_id),
        fields,
    })?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Created, event.id.get()),
    );

    Ok(event)
}

pub fn update_event<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    event_id: i32,
    form: EventForm,
) -> ServiceResult<CalendarEvent>
where
    R: CalendarEventWriter + BranchReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let event_id = EventId::new(event_id)?;
    let fields = event_fields(repo, form, hub_id)?;

    let event = repo.update_event(event_id, hub_id, &fields)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Updated, event.id.get()),
    );

    Ok(event)
}

pub fn delete_event<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    event_id: i32,
) -> ServiceResult<()>
where
    R: CalendarEventWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let event_id = EventId::new(event_id)?;

    repo.delete_event(event_id, hub_id)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Deleted, event_id.get()),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::MockChangeNotifier;
    use crate::domain::types::EventTitle;
    use crate::repository::EventScope;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::*;

    fn event(id: i32, starts: NaiveDateTime, ends: NaiveDateTime) -> CalendarEvent {
        CalendarEvent {
            id: EventId::new(id).unwrap(),
            hub_id: hub(),
            branch_id: None,
            title: EventTitle::new("Training").unwrap(),
            description: None,
            location: None,
            starts_at: starts,
            ends_at: ends,
            all_day: false,
            created_by: None,
            created_at: at(1, 9),
            updated_at: at(1, 9),
        }
    }

    fn form(branch_id: Option<i32>) -> EventForm {
        EventForm {
            title: "Training".to_string(),
            description: None,
            location: None,
            branch_id,
            starts_at: "2025-06-10T10:00".to_string(),
            ends_at: Some("2025-06-10T12:00".to_string()),
            all_day: None,
        }
    }

    #[test]
    fn grid_starts_on_monday_and_places_multi_day_events() {
        // June 2025 starts on a Sunday.
        let month = CalendarMonth::try_new(2025, 6).unwrap();
        let events = vec![event(1, at(2, 10), at(3, 12))];

        let weeks = month_grid(month, &events, at(3, 0).date());

        assert_eq!(weeks.len(), 6);
        assert!(weeks.iter().all(|week| week.len() == 7));
        assert_eq!(weeks[0][5].day, None);
        assert_eq!(weeks[0][6].day, Some(1));
        // Monday 2 and Tuesday 3 both carry the event.
        assert_eq!(weeks[1][0].events.len(), 1);
        assert_eq!(weeks[1][1].events.len(), 1);
        assert!(weeks[1][1].is_today);
        assert!(weeks[1][2].events.is_empty());
    }

    #[test]
    fn month_view_queries_half_open_month_range() {
        let mut repo = MockRepository::new();
        repo.expect_list_events()
            .withf(|query| {
                query.from == at(1, 0)
                    && query.to
                        == Some(
                            NaiveDate::from_ymd_opt(2025, 7, 1)
                                .unwrap()
                                .and_hms_opt(0, 0, 0)
                                .unwrap(),
                        )
                    && query.scope == EventScope::Branch(BranchId::new(4).unwrap())
            })
            .times(1)
            .returning(|_| Ok(vec![]));
        repo.expect_list_branches().returning(|_| Ok((0, vec![])));

        let data = month_view(
            &repo,
            &reader_user(),
            CalendarQuery {
                year: Some(2025),
                month: Some(6),
                branch_id: Some(4),
            },
            at(15, 12),
        )
        .unwrap();

        assert_eq!(data.previous, CalendarMonth::try_new(2025, 5).unwrap());
        assert_eq!(data.next, CalendarMonth::try_new(2025, 7).unwrap());
        assert!(!data.can_edit);
    }

    #[test]
    fn invalid_month_is_rejected() {
        let repo = MockRepository::new();

        let result = month_view(
            &repo,
            &reader_user(),
            CalendarQuery {
                year: Some(2025),
                month: Some(13),
                branch_id: None,
            },
            at(15, 12),
        );

        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[test]
    fn last_representable_month_is_rejected() {
        let repo = MockRepository::new();

        let result = month_view(
            &repo,
            &reader_user(),
            CalendarQuery {
                year: Some(chrono::NaiveDate::MAX.year()),
                month: Some(12),
                branch_id: None,
            },
            at(15, 12),
        );

        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[test]
    fn network_wide_event_skips_branch_check() {
        let mut repo = MockRepository::new();
        repo.expect_get_branch_by_id().times(0);
        repo.expect_get_user_by_email().returning(|_, _| Ok(None));
        repo.expect_create_event()
            .withf(|new_event| new_event.fields.branch_id.is_none() && new_event.hub_id == hub())
            .times(1)
            .returning(|_| Ok(event(1, at(10, 10), at(10, 12))));
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(1).returning(|_| Ok(()));

        add_event(&repo, &notifier, &admin_user(), form(Some(0))).unwrap();
    }

    #[test]
    fn event_for_unknown_branch_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_branch_by_id().returning(|_, _| Ok(None));
        repo.expect_create_event().times(0);
        let notifier = MockChangeNotifier::new();

        let result = add_event(&repo, &notifier, &admin_user(), form(Some(8)));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn readers_cannot_delete_events() {
        let mut repo = MockRepository::new();
        repo.expect_delete_event().times(0);
        let notifier = MockChangeNotifier::new();

        assert!(matches!(
            delete_event(&repo, &notifier, &reader_user(), 1),
            Err(ServiceError::Unauthorized)
        ));
    }
}
