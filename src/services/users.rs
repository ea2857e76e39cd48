//! User profile administration.

use crate::changes::{ChangeAction, ChangeMessage, ChangeNotifier, notify};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{BranchId, EmailAddress, HubId, UserId};
use crate::domain::user::{NewUser, UpdateUser, User, UserType};
use crate::dto::users::{UserPageData, UsersPageData, UsersQuery};
use crate::forms::users::{AddUserForm, AddUserPayload, EditUserForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{BranchListQuery, BranchReader, UserListQuery, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult, authorize_admin, filter_value, page_or_first};

const TABLE: &str = "users";

/// Upserts the profile of the signed-in user from the session identity.
pub fn sync_profile<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let new_user = NewUser::try_from(user)?;
    Ok(repo.sync_user(&new_user)?)
}

/// Profile id of the signed-in user, if a profile exists. Lookup failures are
/// logged and treated as "no profile".
pub(crate) fn profile_id<R>(repo: &R, user: &AuthenticatedUser, hub_id: HubId) -> Option<UserId>
where
    R: UserReader + ?Sized,
{
    let email = EmailAddress::new(&user.email).ok()?;
    match repo.get_user_by_email(&email, hub_id) {
        Ok(profile) => profile.map(|p| p.id),
        Err(err) => {
            log::warn!("Failed to look up profile of {}: {err}", user.email);
            None
        }
    }
}

fn validate_branch<R>(repo: &R, branch_id: Option<BranchId>, hub_id: HubId) -> ServiceResult<()>
where
    R: BranchReader + ?Sized,
{
    if let Some(branch_id) = branch_id
        && repo.get_branch_by_id(branch_id, hub_id)?.is_none()
    {
        return Err(ServiceError::Form(format!("Unknown branch {branch_id}")));
    }
    Ok(())
}

pub fn list_users<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: UsersQuery,
) -> ServiceResult<UsersPageData>
where
    R: UserReader + BranchReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let page = page_or_first(query.page);
    let search = filter_value(query.search);
    let user_type = filter_value(query.user_type)
        .map(|value| value.parse::<UserType>())
        .transpose()?;
    let branch_id = query.branch_id.filter(|id| *id > 0);

    let mut list_query = UserListQuery::new(hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search {
        list_query = list_query.search(term.clone());
    }
    if let Some(user_type) = user_type {
        list_query = list_query.user_type(user_type);
    }
    if let Some(id) = branch_id {
        list_query = list_query.branch(BranchId::new(id)?);
    }

    let (total, users) = repo.list_users(list_query)?;
    let (_, branches) = repo.list_branches(BranchListQuery::new(hub_id))?;

    Ok(UsersPageData {
        users: Paginated::new(users, page, total, DEFAULT_ITEMS_PER_PAGE),
        branches,
        user_types: UserType::ALL.to_vec(),
        search,
        user_type,
        branch_id,
    })
}

pub fn show_user<R>(
    repo: &R,
    user: &AuthenticatedUser,
    user_id: i32,
) -> ServiceResult<UserPageData>
where
    R: UserReader + BranchReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let profile = repo
        .get_user_by_id(UserId::new(user_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let (_, branches) = repo.list_branches(BranchListQuery::new(hub_id))?;

    Ok(UserPageData {
        user: profile,
        branches,
        user_types: UserType::ALL.to_vec(),
    })
}

/// Creates a profile ahead of the user's first sign-in.
pub fn add_user<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    form: AddUserForm,
) -> ServiceResult<User>
where
    R: UserWriter + BranchReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let payload = AddUserPayload::try_from(form)?;
    validate_branch(repo, payload.branch_id, hub_id)?;

    let created = repo.create_user(&payload.into_new_user(hub_id))?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Created, created.id.get()),
    );

    Ok(created)
}

pub fn update_user<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    user_id: i32,
    form: EditUserForm,
) -> ServiceResult<User>
where
    R: UserWriter + BranchReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let user_id = UserId::new(user_id)?;
    let updates = UpdateUser::try_from(form)?;
    validate_branch(repo, updates.branch_id, hub_id)?;

    let updated = repo.update_user(user_id, hub_id, &updates)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Updated, updated.id.get()),
    );

    Ok(updated)
}

/// Flips the active flag of a profile. Returns the new state.
pub fn toggle_user<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    user_id: i32,
) -> ServiceResult<bool>
where
    R: UserReader + UserWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let profile = repo
        .get_user_by_id(UserId::new(user_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let updated = repo.set_user_active(profile.id, hub_id, !profile.is_active)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Updated, updated.id.get()),
    );

    Ok(updated.is_active)
}

pub fn delete_user<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    user_id: i32,
) -> ServiceResult<()>
where
    R: UserWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let user_id = UserId::new(user_id)?;

    repo.delete_user(user_id, hub_id)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Deleted, user_id.get()),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::MockChangeNotifier;
    use crate::domain::types::UserName;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::*;

    fn profile(id: i32, is_active: bool) -> User {
        User {
            id: UserId::new(id).unwrap(),
            hub_id: hub(),
            email: EmailAddress::new("agent@example.com").unwrap(),
            name: UserName::new("Agent").unwrap(),
            user_type: UserType::Agent,
            branch_id: None,
            phone: None,
            is_active,
            created_at: at(1, 9),
            updated_at: at(1, 9),
        }
    }

    fn add_form(email: &str) -> AddUserForm {
        AddUserForm {
            email: email.to_string(),
            name: "Agent".to_string(),
            user_type: "agent".to_string(),
            branch_id: None,
            phone: None,
        }
    }

    #[test]
    fn sync_profile_upserts_identity() {
        let mut repo = MockRepository::new();
        repo.expect_sync_user()
            .withf(|new_user| {
                new_user.email.as_str() == "reader@example.com"
                    && new_user.hub_id == hub()
                    && new_user.user_type == UserType::Employee
            })
            .times(1)
            .returning(|_| Ok(profile(1, true)));

        sync_profile(&repo, &reader_user()).unwrap();
    }

    #[test]
    fn list_filters_by_type_and_branch() {
        let mut repo = MockRepository::new();
        repo.expect_list_users()
            .withf(|query| {
                query.user_type == Some(UserType::Manager)
                    && query.branch_id.map(BranchId::get) == Some(2)
            })
            .times(1)
            .returning(|_| Ok((0, vec![])));
        repo.expect_list_branches().returning(|_| Ok((0, vec![])));

        let data = list_users(
            &repo,
            &admin_user(),
            UsersQuery {
                user_type: Some("manager".to_string()),
                branch_id: Some(2),
                ..UsersQuery::default()
            },
        )
        .unwrap();

        assert_eq!(data.user_type, Some(UserType::Manager));
    }

    #[test]
    fn readers_cannot_list_users() {
        let mut repo = MockRepository::new();
        repo.expect_list_users().times(0);

        assert!(matches!(
            list_users(&repo, &reader_user(), UsersQuery::default()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_create_user()
            .returning(|_| Err(RepositoryError::Duplicate("users.email".to_string())));
        let notifier = MockChangeNotifier::new();

        let result = add_user(&repo, &notifier, &admin_user(), add_form("agent@example.com"));

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn invalid_email_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_create_user().times(0);
        let notifier = MockChangeNotifier::new();

        let result = add_user(&repo, &notifier, &admin_user(), add_form("nope"));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn toggle_flips_active_flag() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|_, _| Ok(Some(profile(3, true))));
        repo.expect_set_user_active()
            .withf(|id, _, is_active| id.get() == 3 && !*is_active)
            .times(1)
            .returning(|_, _, _| Ok(profile(3, false)));
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(1).returning(|_| Ok(()));

        let is_active = toggle_user(&repo, &notifier, &admin_user(), 3).unwrap();

        assert!(!is_active);
    }

    #[test]
    fn profile_id_ignores_lookup_errors() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email()
            .returning(|_, _| Err(RepositoryError::ConnectionError("down".to_string())));

        assert_eq!(profile_id(&repo, &admin_user(), hub()), None);
    }
}
