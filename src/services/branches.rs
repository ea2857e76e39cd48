//! Branch directory workflows.

use crate::changes::{ChangeAction, ChangeMessage, ChangeNotifier, notify};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::branch::Branch;
use crate::domain::types::BranchId;
use crate::dto::branches::{BranchPageData, BranchesPageData, BranchesQuery};
use crate::forms::branches::{BranchForm, BranchPayload, UploadBranchesForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{BranchListQuery, BranchReader, BranchWriter, UserListQuery, UserReader};
use crate::services::{
    ServiceError, ServiceResult, authorize_admin, authorize_reader, filter_value, is_admin,
    page_or_first,
};

const TABLE: &str = "branches";

/// Loads the paginated branch list. Readers only see active branches.
pub fn list_branches<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: BranchesQuery,
) -> ServiceResult<BranchesPageData>
where
    R: BranchReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;
    let can_edit = is_admin(user);

    let page = page_or_first(query.page);
    let search = filter_value(query.search);
    let city = filter_value(query.city);
    let active_only = !can_edit || query.active.unwrap_or(false);

    let mut list_query = BranchListQuery::new(hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search {
        list_query = list_query.search(term.clone());
    }
    if let Some(city) = &city {
        list_query = list_query.city(city.clone());
    }
    if active_only {
        list_query = list_query.active_only();
    }

    let (total, branches) = repo.list_branches(list_query)?;
    let cities = repo.list_branch_cities(hub_id)?;

    Ok(BranchesPageData {
        branches: Paginated::new(branches, page, total, DEFAULT_ITEMS_PER_PAGE),
        cities,
        search,
        city,
        active_only,
        can_edit,
    })
}

/// Loads one branch with the users assigned to it.
pub fn show_branch<R>(
    repo: &R,
    user: &AuthenticatedUser,
    branch_id: i32,
) -> ServiceResult<BranchPageData>
where
    R: BranchReader + UserReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;
    let can_edit = is_admin(user);

    let branch = repo
        .get_branch_by_id(BranchId::new(branch_id)?, hub_id)?
        .filter(|branch| can_edit || branch.is_active)
        .ok_or(ServiceError::NotFound)?;

    let (_, staff) = repo.list_users(UserListQuery::new(hub_id).branch(branch.id))?;

    Ok(BranchPageData {
        branch,
        staff,
        can_edit,
    })
}

pub fn add_branch<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    form: BranchForm,
) -> ServiceResult<Branch>
where
    R: BranchWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let payload = BranchPayload::try_from(form)?;

    let branch = repo.create_branch(&payload.into_new_branch(hub_id))?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Created, branch.id.get()),
    );

    Ok(branch)
}

pub fn update_branch<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    branch_id: i32,
    form: BranchForm,
) -> ServiceResult<Branch>
where
    R: BranchWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let branch_id = BranchId::new(branch_id)?;
    let payload = BranchPayload::try_from(form)?;

    let branch = repo.update_branch(branch_id, hub_id, &payload.into_update())?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Updated, branch.id.get()),
    );

    Ok(branch)
}

/// Deletes a branch. Users and events of the branch are detached by the store.
pub fn delete_branch<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    branch_id: i32,
) -> ServiceResult<()>
where
    R: BranchWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let branch_id = BranchId::new(branch_id)?;

    repo.delete_branch(branch_id, hub_id)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Deleted, branch_id.get()),
    );

    Ok(())
}

/// Parses the uploaded CSV and inserts the branches whose names are new.
/// Returns the number of inserted rows.
pub fn import_branches<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    form: &UploadBranchesForm,
) -> ServiceResult<usize>
where
    R: BranchWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let branches = form.parse(hub_id).map_err(|err| {
        log::warn!("Rejected branch import: {err}");
        ServiceError::from(err)
    })?;

    let inserted = repo.import_branches(&branches)?;
    log::info!(
        "Imported {inserted} of {} branches for hub {hub_id}",
        branches.len()
    );

    if inserted > 0 {
        notify(
            notifier,
            ChangeMessage::bulk(hub_id.get(), TABLE, ChangeAction::Created),
        );
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::MockChangeNotifier;
    use crate::domain::branch::BranchDetails;
    use crate::domain::types::{BranchName, HubId};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::*;

    fn branch(id: i32, name: &str, is_active: bool) -> Branch {
        Branch {
            id: BranchId::new(id).unwrap(),
            hub_id: hub(),
            name: BranchName::new(name).unwrap(),
            address: None,
            city: None,
            postal_code: None,
            phone: None,
            email: None,
            manager_name: None,
            is_active,
            created_at: at(1, 9),
            updated_at: at(1, 9),
        }
    }

    fn form(name: &str) -> BranchForm {
        BranchForm {
            name: name.to_string(),
            address: Some("1 Main St".to_string()),
            city: Some("Springfield".to_string()),
            postal_code: None,
            phone: None,
            email: Some("office@example.com".to_string()),
            manager_name: None,
            is_active: Some("on".to_string()),
        }
    }

    #[test]
    fn readers_only_list_active_branches() {
        let mut repo = MockRepository::new();
        repo.expect_list_branches()
            .withf(|query| {
                query.active_only
                    && query.search.as_deref() == Some("north")
                    && query.city.is_none()
                    && query.hub_id == hub()
            })
            .times(1)
            .returning(|_| Ok((1, vec![branch(1, "North", true)])));
        repo.expect_list_branch_cities()
            .returning(|_| Ok(vec!["Springfield".to_string()]));

        let data = list_branches(
            &repo,
            &reader_user(),
            BranchesQuery {
                search: Some("  north ".to_string()),
                city: Some(" ".to_string()),
                active: Some(false),
                page: None,
            },
        )
        .unwrap();

        assert!(!data.can_edit);
        assert!(data.active_only);
        assert_eq!(data.branches.items.len(), 1);
        assert_eq!(data.cities, vec!["Springfield".to_string()]);
    }

    #[test]
    fn admins_see_inactive_branches_by_default() {
        let mut repo = MockRepository::new();
        repo.expect_list_branches()
            .withf(|query| !query.active_only)
            .times(1)
            .returning(|_| Ok((0, vec![])));
        repo.expect_list_branch_cities().returning(|_| Ok(vec![]));

        let data = list_branches(&repo, &admin_user(), BranchesQuery::default()).unwrap();
        assert!(data.can_edit);
    }

    #[test]
    fn outsiders_cannot_list_branches() {
        let mut repo = MockRepository::new();
        repo.expect_list_branches().times(0);

        let result = list_branches(&repo, &outsider_user(), BranchesQuery::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn inactive_branch_is_hidden_from_readers() {
        let mut repo = MockRepository::new();
        repo.expect_get_branch_by_id()
            .returning(|_, _| Ok(Some(branch(3, "Closed", false))));
        repo.expect_list_users().times(0);

        let result = show_branch(&repo, &reader_user(), 3);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn add_branch_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_create_branch().times(0);
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(0);

        let result = add_branch(&repo, &notifier, &reader_user(), form("North"));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn add_branch_persists_and_notifies() {
        let mut repo = MockRepository::new();
        repo.expect_create_branch()
            .withf(|new_branch| {
                new_branch.hub_id == hub()
                    && new_branch.name.as_str() == "North"
                    && new_branch.details.city.as_deref() == Some("Springfield")
            })
            .times(1)
            .returning(|_| Ok(branch(5, "North", true)));
        let mut notifier = MockChangeNotifier::new();
        notifier
            .expect_publish()
            .withf(|message| {
                message.table == "branches"
                    && message.action == ChangeAction::Created
                    && message.id == Some(5)
            })
            .times(1)
            .returning(|_| Ok(()));

        let created = add_branch(&repo, &notifier, &admin_user(), form(" North ")).unwrap();

        assert_eq!(created.id.get(), 5);
    }

    #[test]
    fn blank_name_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_create_branch().times(0);
        let notifier = MockChangeNotifier::new();

        let result = add_branch(&repo, &notifier, &admin_user(), form(""));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn duplicate_name_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_create_branch()
            .returning(|_| Err(RepositoryError::Duplicate("branches.name".to_string())));
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(0);

        let result = add_branch(&repo, &notifier, &admin_user(), form("North"));

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn delete_missing_branch_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_delete_branch()
            .withf(|id, hub_id| id.get() == 9 && *hub_id == HubId::new(HUB).unwrap())
            .returning(|_, _| Err(RepositoryError::NotFound));
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(0);

        let result = delete_branch(&repo, &notifier, &admin_user(), 9);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    fn upload(content: &str) -> UploadBranchesForm {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        UploadBranchesForm {
            csv: actix_multipart::form::tempfile::TempFile {
                file,
                content_type: None,
                file_name: Some("branches.csv".to_string()),
                size: content.len(),
            },
        }
    }

    #[test]
    fn import_reports_inserted_rows_and_notifies_once() {
        let mut repo = MockRepository::new();
        repo.expect_import_branches()
            .withf(|rows| rows.len() == 2 && rows[1].name.as_str() == "South")
            .times(1)
            .returning(|_| Ok(1));
        let mut notifier = MockChangeNotifier::new();
        notifier
            .expect_publish()
            .withf(|message| message.id.is_none() && message.table == "branches")
            .times(1)
            .returning(|_| Ok(()));

        let form = upload("name,city\nNorth,Springfield\nSouth,Shelbyville\n");
        let inserted = import_branches(&repo, &notifier, &admin_user(), &form).unwrap();

        assert_eq!(inserted, 1);
    }

    #[test]
    fn import_with_invalid_row_names_the_row() {
        let mut repo = MockRepository::new();
        repo.expect_import_branches().times(0);
        let notifier = MockChangeNotifier::new();

        let form = upload("name,email\nNorth,north@example.com\n,nobody@example.com\n");
        let result = import_branches(&repo, &notifier, &admin_user(), &form);

        assert!(matches!(result, Err(ServiceError::Form(msg)) if msg.starts_with("row 3")));
    }

    #[test]
    fn update_branch_passes_details() {
        let mut repo = MockRepository::new();
        repo.expect_update_branch()
            .withf(|id, _, updates| {
                id.get() == 2
                    && updates.details
                        == BranchDetails {
                            address: Some("1 Main St".to_string()),
                            city: Some(crate::domain::types::CityName::new("Springfield").unwrap()),
                            postal_code: None,
                            phone: None,
                            email: Some(
                                crate::domain::types::EmailAddress::new("office@example.com")
                                    .unwrap(),
                            ),
                            manager_name: None,
                        }
            })
            .returning(|_, _, _| Ok(branch(2, "North", true)));
        let mut notifier = MockChangeNotifier::new();
        notifier
            .expect_publish()
            .withf(|message| message.action == ChangeAction::Updated)
            .times(1)
            .returning(|_| Ok(()));

        update_branch(&repo, &notifier, &admin_user(), 2, form("North")).unwrap();
    }
}
