//! Product knowledge base.

use crate::changes::{ChangeAction, ChangeMessage, ChangeNotifier, notify};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::company::Company;
use crate::domain::product::Product;
use crate::domain::types::{CompanyId, HubId, ProductId};
use crate::dto::products::{ProductPageData, ProductsPageData, ProductsQuery};
use crate::forms::products::{ProductForm, ProductPayload};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    CompanyListQuery, CompanyReader, ProductListQuery, ProductReader, ProductWriter,
};
use crate::services::{
    ServiceError, ServiceResult, authorize_admin, authorize_reader, filter_value, is_admin,
    page_or_first,
};

const TABLE: &str = "products";

fn all_companies<R>(repo: &R, hub_id: HubId) -> ServiceResult<Vec<Company>>
where
    R: CompanyReader + ?Sized,
{
    let (_, companies) = repo.list_companies(CompanyListQuery::new(hub_id))?;
    Ok(companies)
}

/// Rejects a company id that does not belong to the hub.
fn ensure_company<R>(repo: &R, company_id: Option<CompanyId>, hub_id: HubId) -> ServiceResult<()>
where
    R: CompanyReader + ?Sized,
{
    if let Some(company_id) = company_id
        && repo.get_company_by_id(company_id, hub_id)?.is_none()
    {
        return Err(ServiceError::Form("Unknown company".to_string()));
    }
    Ok(())
}

/// Lists knowledge-base entries. Readers only see published ones.
pub fn list_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + CompanyReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;
    let can_edit = is_admin(user);

    let page = page_or_first(query.page);
    let search = filter_value(query.search);
    let category = filter_value(query.category);
    let company_id = query.company_id.filter(|id| *id > 0);

    let mut list_query = ProductListQuery::new(hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search {
        list_query = list_query.search(term.clone());
    }
    if let Some(category) = &category {
        list_query = list_query.category(category.clone());
    }
    if let Some(id) = company_id {
        list_query = list_query.company(CompanyId::new(id)?);
    }
    if !can_edit {
        list_query = list_query.published_only();
    }

    let (total, products) = repo.list_products(list_query)?;
    let categories = repo.list_product_categories(hub_id)?;
    let companies = all_companies(repo, hub_id)?;

    Ok(ProductsPageData {
        products: Paginated::new(products, page, total, DEFAULT_ITEMS_PER_PAGE),
        categories,
        companies,
        search,
        category,
        company_id,
        can_edit,
    })
}

pub fn show_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<ProductPageData>
where
    R: ProductReader + CompanyReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;
    let can_edit = is_admin(user);

    let product = repo
        .get_product_by_id(ProductId::new(product_id)?, hub_id)?
        .filter(|product| can_edit || product.is_published)
        .ok_or(ServiceError::NotFound)?;

    let company = match product.company_id {
        Some(company_id) => repo.get_company_by_id(company_id, hub_id)?,
        None => None,
    };

    let (companies, categories) = if can_edit {
        (
            all_companies(repo, hub_id)?,
            repo.list_product_categories(hub_id)?,
        )
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(ProductPageData {
        product,
        company,
        companies,
        categories,
        can_edit,
    })
}

pub fn add_product<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + CompanyReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let payload = ProductPayload::try_from(form)?;
    ensure_company(repo, payload.fields.company_id, hub_id)?;

    let product = repo.create_product(&payload.into_new_product(hub_id))?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Created, product.id.get()),
    );

    Ok(product)
}

pub fn update_product<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    product_id: i32,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + CompanyReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let product_id = ProductId::new(product_id)?;
    let payload = ProductPayload::try_from(form)?;
    ensure_company(repo, payload.fields.company_id, hub_id)?;

    let product = repo.update_product(product_id, hub_id, &payload.fields)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Updated, product.id.get()),
    );

    Ok(product)
}

pub fn delete_product<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let product_id = ProductId::new(product_id)?;

    repo.delete_product(product_id, hub_id)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Deleted, product_id.get()),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::MockChangeNotifier;
    use crate::domain::types::{CategoryName, ProductTitle, RichText};
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::*;

    fn product(id: i32, is_published: bool) -> Product {
        Product {
            id: ProductId::new(id).unwrap(),
            hub_id: hub(),
            company_id: None,
            title: ProductTitle::new("Home cover").unwrap(),
            category: CategoryName::new("Property").unwrap(),
            summary: None,
            body: RichText::new("<p>Details</p>").unwrap(),
            is_published,
            created_at: at(1, 9),
            updated_at: at(1, 9),
        }
    }

    fn form(company_id: Option<i32>) -> ProductForm {
        ProductForm {
            title: "Home cover".to_string(),
            category: "Property".to_string(),
            company_id,
            summary: None,
            body: "<p>Details</p>".to_string(),
            is_published: Some("on".to_string()),
        }
    }

    #[test]
    fn readers_cannot_open_drafts() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|_, _| Ok(Some(product(4, false))));

        let result = show_product(&repo, &reader_user(), 4);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn admins_open_drafts_with_editor_data() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|_, _| Ok(Some(product(4, false))));
        repo.expect_list_companies().returning(|_| Ok((0, vec![])));
        repo.expect_list_product_categories()
            .returning(|_| Ok(vec!["Property".to_string()]));

        let data = show_product(&repo, &admin_user(), 4).unwrap();

        assert!(data.can_edit);
        assert_eq!(data.categories, vec!["Property".to_string()]);
    }

    #[test]
    fn reader_list_is_filtered_to_published() {
        let mut repo = MockRepository::new();
        repo.expect_list_products()
            .withf(|query| {
                query.published_only
                    && query.category.as_deref() == Some("Property")
                    && query.company_id.is_none()
            })
            .times(1)
            .returning(|_| Ok((1, vec![product(1, true)])));
        repo.expect_list_product_categories()
            .returning(|_| Ok(vec![]));
        repo.expect_list_companies().returning(|_| Ok((0, vec![])));

        let data = list_products(
            &repo,
            &reader_user(),
            ProductsQuery {
                category: Some("Property".to_string()),
                company_id: Some(0),
                ..ProductsQuery::default()
            },
        )
        .unwrap();

        assert_eq!(data.products.items.len(), 1);
        assert_eq!(data.company_id, None);
    }

    #[test]
    fn unknown_company_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_company_by_id().returning(|_, _| Ok(None));
        repo.expect_create_product().times(0);
        let notifier = MockChangeNotifier::new();

        let result = add_product(&repo, &notifier, &admin_user(), form(Some(77)));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn add_product_without_company() {
        let mut repo = MockRepository::new();
        repo.expect_get_company_by_id().times(0);
        repo.expect_create_product()
            .withf(|new_product| new_product.fields.is_published)
            .times(1)
            .returning(|_| Ok(product(8, true)));
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(1).returning(|_| Ok(()));

        let created = add_product(&repo, &notifier, &admin_user(), form(None)).unwrap();

        assert_eq!(created.id.get(), 8);
    }

    #[test]
    fn delete_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_delete_product().times(0);
        let notifier = MockChangeNotifier::new();

        let result = delete_product(&repo, &notifier, &reader_user(), 1);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
