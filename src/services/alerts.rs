//! Dashboard alert administration.

use chrono::NaiveDateTime;

use crate::changes::{ChangeAction, ChangeMessage, ChangeNotifier, notify};
use crate::domain::alert::{Alert, AlertFields, NewAlert};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::AlertId;
use crate::dto::alerts::{AlertView, AlertsPageData};
use crate::forms::alerts::AlertForm;
use crate::repository::{AlertReader, AlertWriter};
use crate::services::{ServiceError, ServiceResult, authorize_admin};

const TABLE: &str = "alerts";

/// All alerts, newest first, flagged with whether they show at `now`.
pub fn list_alerts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    now: NaiveDateTime,
) -> ServiceResult<AlertsPageData>
where
    R: AlertReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let alerts = repo
        .list_alerts(hub_id)?
        .into_iter()
        .map(|alert| AlertView {
            is_live: alert.is_active_at(now),
            alert,
        })
        .collect();

    Ok(AlertsPageData { alerts })
}

pub fn add_alert<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    form: AlertForm,
) -> ServiceResult<Alert>
where
    R: AlertWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let fields = AlertFields::try_from(form)?;

    let alert = repo.create_alert(&NewAlert { hub_id, fields })?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Created, alert.id.get()),
    );

    Ok(alert)
}

pub fn update_alert<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    alert_id: i32,
    form: AlertForm,
) -> ServiceResult<Alert>
where
    R: AlertWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let alert_id = AlertId::new(alert_id)?;
    let fields = AlertFields::try_from(form)?;

    let alert = repo.update_alert(alert_id, hub_id, &fields)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Updated, alert.id.get()),
    );

    Ok(alert)
}

/// Switches an alert on or off. Returns the new state.
pub fn toggle_alert<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    alert_id: i32,
) -> ServiceResult<bool>
where
    R: AlertReader + AlertWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let alert = repo
        .get_alert_by_id(AlertId::new(alert_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let alert = repo.set_alert_active(alert.id, hub_id, !alert.is_active)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Updated, alert.id.get()),
    );

    Ok(alert.is_active)
}

pub fn delete_alert<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    alert_id: i32,
) -> ServiceResult<()>
where
    R: AlertWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let alert_id = AlertId::new(alert_id)?;

    repo.delete_alert(alert_id, hub_id)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Deleted, alert_id.get()),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::MockChangeNotifier;
    use crate::domain::alert::AlertLevel;
    use crate::domain::types::{AlertTitle, RichText};
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::*;

    fn alert(id: i32, is_active: bool, expires_at: Option<NaiveDateTime>) -> Alert {
        Alert {
            id: AlertId::new(id).unwrap(),
            hub_id: hub(),
            title: AlertTitle::new("Maintenance").unwrap(),
            message: RichText::new("Portal offline").unwrap(),
            level: AlertLevel::Warning,
            is_active,
            starts_at: None,
            expires_at,
            created_at: at(1, 9),
        }
    }

    fn form(level: &str) -> AlertForm {
        AlertForm {
            title: "Maintenance".to_string(),
            message: "Portal offline".to_string(),
            level: level.to_string(),
            is_active: Some("on".to_string()),
            starts_at: None,
            expires_at: None,
        }
    }

    #[test]
    fn list_marks_live_alerts() {
        let mut repo = MockRepository::new();
        repo.expect_list_alerts().returning(|_| {
            Ok(vec![
                alert(1, true, None),
                alert(2, true, Some(at(5, 0))),
                alert(3, false, None),
            ])
        });

        let data = list_alerts(&repo, &admin_user(), at(10, 12)).unwrap();

        let live: Vec<bool> = data.alerts.iter().map(|view| view.is_live).collect();
        assert_eq!(live, vec![true, false, false]);
    }

    #[test]
    fn readers_cannot_manage_alerts() {
        let mut repo = MockRepository::new();
        repo.expect_list_alerts().times(0);

        assert!(matches!(
            list_alerts(&repo, &reader_user(), at(10, 12)),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn toggle_switches_state() {
        let mut repo = MockRepository::new();
        repo.expect_get_alert_by_id()
            .returning(|_, _| Ok(Some(alert(4, false, None))));
        repo.expect_set_alert_active()
            .withf(|id, _, is_active| id.get() == 4 && *is_active)
            .times(1)
            .returning(|_, _, _| Ok(alert(4, true, None)));
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(1).returning(|_| Ok(()));

        assert!(toggle_alert(&repo, &notifier, &admin_user(), 4).unwrap());
    }

    #[test]
    fn unknown_level_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_create_alert().times(0);
        let notifier = MockChangeNotifier::new();

        let result = add_alert(&repo, &notifier, &admin_user(), form("critical"));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn add_alert_persists() {
        let mut repo = MockRepository::new();
        repo.expect_create_alert()
            .withf(|new_alert| new_alert.fields.level == AlertLevel::Danger)
            .times(1)
            .returning(|_| Ok(alert(1, true, None)));
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(1).returning(|_| Ok(()));

        add_alert(&repo, &notifier, &admin_user(), form("danger")).unwrap();
    }
}
