//! Insurance company directory.

use crate::changes::{ChangeAction, ChangeMessage, ChangeNotifier, notify};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::company::Company;
use crate::domain::types::CompanyId;
use crate::dto::companies::{CompaniesPageData, CompaniesQuery, CompanyPageData};
use crate::forms::companies::{CompanyForm, CompanyPayload};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    CompanyListQuery, CompanyReader, CompanyWriter, ProductListQuery, ProductReader,
};
use crate::services::{
    ServiceError, ServiceResult, authorize_admin, authorize_reader, filter_value, is_admin,
    page_or_first,
};

const TABLE: &str = "companies";

pub fn list_companies<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CompaniesQuery,
) -> ServiceResult<CompaniesPageData>
where
    R: CompanyReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;
    let can_edit = is_admin(user);

    let page = page_or_first(query.page);
    let search = filter_value(query.search);

    let mut list_query = CompanyListQuery::new(hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search {
        list_query = list_query.search(term.clone());
    }
    if !can_edit {
        list_query = list_query.active_only();
    }

    let (total, companies) = repo.list_companies(list_query)?;

    Ok(CompaniesPageData {
        companies: Paginated::new(companies, page, total, DEFAULT_ITEMS_PER_PAGE),
        search,
        can_edit,
    })
}

/// Loads a company and its knowledge-base entries.
pub fn show_company<R>(
    repo: &R,
    user: &AuthenticatedUser,
    company_id: i32,
) -> ServiceResult<CompanyPageData>
where
    R: CompanyReader + ProductReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;
    let can_edit = is_admin(user);

    let company = repo
        .get_company_by_id(CompanyId::new(company_id)?, hub_id)?
        .filter(|company| can_edit || company.is_active)
        .ok_or(ServiceError::NotFound)?;

    let mut products_query = ProductListQuery::new(hub_id).company(company.id);
    if !can_edit {
        products_query = products_query.published_only();
    }
    let (_, products) = repo.list_products(products_query)?;

    Ok(CompanyPageData {
        company,
        products,
        can_edit,
    })
}

pub fn add_company<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    form: CompanyForm,
) -> ServiceResult<Company>
where
    R: CompanyWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let payload = CompanyPayload::try_from(form)?;

    let company = repo.create_company(&payload.into_new_company(hub_id))?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Created, company.id.get()),
    );

    Ok(company)
}

pub fn update_company<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    company_id: i32,
    form: CompanyForm,
) -> ServiceResult<Company>
where
    R: CompanyWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let company_id = CompanyId::new(company_id)?;
    let payload = CompanyPayload::try_from(form)?;

    let company = repo.update_company(company_id, hub_id, &payload.fields)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Updated, company.id.get()),
    );

    Ok(company)
}

/// Deletes a company that no product references any more.
pub fn delete_company<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    company_id: i32,
) -> ServiceResult<()>
where
    R: CompanyReader + CompanyWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let company = repo
        .get_company_by_id(CompanyId::new(company_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let products = repo.count_company_products(company.id)?;
    if products > 0 {
        return Err(ServiceError::Conflict(format!(
            "{} still has {products} product(s)",
            company.name
        )));
    }

    repo.delete_company(company.id, hub_id)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Deleted, company.id.get()),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::MockChangeNotifier;
    use crate::domain::types::CompanyName;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::*;

    fn company(id: i32, is_active: bool) -> Company {
        Company {
            id: CompanyId::new(id).unwrap(),
            hub_id: hub(),
            name: CompanyName::new("Acme Insurance").unwrap(),
            description: None,
            website: None,
            logo_url: None,
            contact_email: None,
            contact_phone: None,
            is_active,
            created_at: at(1, 9),
            updated_at: at(1, 9),
        }
    }

    fn form() -> CompanyForm {
        CompanyForm {
            name: "Acme Insurance".to_string(),
            description: None,
            website: Some("https://acme.example.com".to_string()),
            logo_url: None,
            contact_email: None,
            contact_phone: None,
            is_active: Some("on".to_string()),
        }
    }

    #[test]
    fn readers_see_published_products_only() {
        let mut repo = MockRepository::new();
        repo.expect_get_company_by_id()
            .returning(|_, _| Ok(Some(company(1, true))));
        repo.expect_list_products()
            .withf(|query| query.published_only && query.company_id.map(CompanyId::get) == Some(1))
            .times(1)
            .returning(|_| Ok((0, vec![])));

        let data = show_company(&repo, &reader_user(), 1).unwrap();

        assert!(!data.can_edit);
    }

    #[test]
    fn readers_list_active_companies() {
        let mut repo = MockRepository::new();
        repo.expect_list_companies()
            .withf(|query| query.active_only && query.search.is_none())
            .times(1)
            .returning(|_| Ok((1, vec![company(1, true)])));

        let data = list_companies(&repo, &reader_user(), CompaniesQuery::default()).unwrap();

        assert_eq!(data.companies.total, 1);
    }

    #[test]
    fn delete_is_refused_while_products_reference_company() {
        let mut repo = MockRepository::new();
        repo.expect_get_company_by_id()
            .returning(|_, _| Ok(Some(company(1, true))));
        repo.expect_count_company_products().returning(|_| Ok(2));
        repo.expect_delete_company().times(0);
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(0);

        let result = delete_company(&repo, &notifier, &admin_user(), 1);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn delete_unreferenced_company() {
        let mut repo = MockRepository::new();
        repo.expect_get_company_by_id()
            .returning(|_, _| Ok(Some(company(1, true))));
        repo.expect_count_company_products().returning(|_| Ok(0));
        repo.expect_delete_company().times(1).returning(|_, _| Ok(()));
        let mut notifier = MockChangeNotifier::new();
        notifier
            .expect_publish()
            .withf(|message| message.action == ChangeAction::Deleted && message.id == Some(1))
            .times(1)
            .returning(|_| Ok(()));

        delete_company(&repo, &notifier, &admin_user(), 1).unwrap();
    }

    #[test]
    fn add_company_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_create_company().times(0);
        let notifier = MockChangeNotifier::new();

        let result = add_company(&repo, &notifier, &reader_user(), form());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn add_company_persists() {
        let mut repo = MockRepository::new();
        repo.expect_create_company()
            .withf(|new_company| new_company.hub_id == hub() && new_company.fields.website.is_some())
            .times(1)
            .returning(|_| Ok(company(3, true)));
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(1).returning(|_| Ok(()));

        let created = add_company(&repo, &notifier, &admin_user(), form()).unwrap();

        assert_eq!(created.id.get(), 3);
    }
}
