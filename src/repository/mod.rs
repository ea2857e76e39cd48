//! Persistence traits and the Diesel-backed implementation.
//!
//! Every entity gets a `*Reader` and a `*Writer` trait so services can ask
//! for exactly the capabilities they need. [`DieselRepository`] implements
//! all of them on top of the SQLite pool. `mock::MockRepository` implements
//! them for service tests.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::{DbConnection, DbPool};
use crate::domain::alert::{Alert, NewAlert, UpdateAlert};
use crate::domain::branch::{Branch, NewBranch, UpdateBranch};
use crate::domain::calendar_event::{CalendarEvent, NewCalendarEvent, UpdateCalendarEvent};
use crate::domain::company::{Company, NewCompany, UpdateCompany};
use crate::domain::document::{Document, NewDocument, UpdateDocument};
use crate::domain::news::{NewNews, News, NewsVisibility, UpdateNews};
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::types::{
    AlertId, BranchId, CompanyId, DocumentId, EmailAddress, EventId, HubId, NewsId, ProductId,
    StorageKey, UserId,
};
use crate::domain::user::{NewUser, UpdateUser, User, UserType};
use crate::repository::errors::RepositoryResult;

pub mod alert;
pub mod branch;
pub mod calendar_event;
pub mod company;
pub mod document;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod news;
pub mod product;
pub mod stats;
pub mod user;

/// Diesel-backed repository shared by all route handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub(crate) fn offset(&self) -> i64 {
        ((self.page.max(1) - 1) * self.per_page) as i64
    }

    pub(crate) fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Wraps a free-text term into a `LIKE` pattern.
pub(crate) fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim())
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub city: Option<String>,
    pub active_only: bool,
    pub pagination: Option<Pagination>,
}

impl BranchListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            city: None,
            active_only: false,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub active_only: bool,
    pub pagination: Option<Pagination>,
}

impl CompanyListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            active_only: false,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub category: Option<String>,
    pub company_id: Option<CompanyId>,
    pub published_only: bool,
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            category: None,
            company_id: None,
            published_only: false,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn published_only(mut self) -> Self {
        self.published_only = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub category: Option<String>,
    pub pagination: Option<Pagination>,
}

impl DocumentListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            category: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Reader profile used to narrow news to what a user may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Audience {
    pub branch_id: Option<BranchId>,
    pub user_type: UserType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub category: Option<String>,
    pub published_only: bool,
    pub audience: Option<Audience>,
    pub pagination: Option<Pagination>,
}

impl NewsListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            category: None,
            published_only: false,
            audience: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn published_only(mut self) -> Self {
        self.published_only = true;
        self
    }

    /// Published news visible to `audience`.
    pub fn visible_to(mut self, audience: Audience) -> Self {
        self.published_only = true;
        self.audience = Some(audience);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Which branches' events a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventScope {
    #[default]
    All,
    /// One branch plus the network-wide events.
    Branch(BranchId),
    /// Only events with no branch.
    NetworkWide,
}

/// Events overlapping `[from, to)`, or starting at `from` or later when `to`
/// is open.
#[derive(Debug, Clone, PartialEq)]
pub struct EventListQuery {
    pub hub_id: HubId,
    pub from: NaiveDateTime,
    pub to: Option<NaiveDateTime>,
    pub scope: EventScope,
    pub limit: Option<i64>,
}

impl EventListQuery {
    pub fn between(hub_id: HubId, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self {
            hub_id,
            from,
            to: Some(to),
            scope: EventScope::All,
            limit: None,
        }
    }

    pub fn upcoming(hub_id: HubId, from: NaiveDateTime) -> Self {
        Self {
            hub_id,
            from,
            to: None,
            scope: EventScope::All,
            limit: None,
        }
    }

    pub fn branch(mut self, branch_id: BranchId) -> Self {
        self.scope = EventScope::Branch(branch_id);
        self
    }

    /// Events a member of `branch_id` sees. Without a branch only
    /// network-wide events match.
    pub fn visible_from(mut self, branch_id: Option<BranchId>) -> Self {
        self.scope = match branch_id {
            Some(branch_id) => EventScope::Branch(branch_id),
            None => EventScope::NetworkWide,
        };
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub user_type: Option<UserType>,
    pub branch_id: Option<BranchId>,
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            user_type: None,
            branch_id: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn user_type(mut self, user_type: UserType) -> Self {
        self.user_type = Some(user_type);
        self
    }

    pub fn branch(mut self, branch_id: BranchId) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Row counts shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub branches: usize,
    pub companies: usize,
    pub products: usize,
    pub documents: usize,
    pub news: usize,
    pub users: usize,
}

pub trait BranchReader {
    fn get_branch_by_id(&self, id: BranchId, hub_id: HubId) -> RepositoryResult<Option<Branch>>;
    fn list_branches(&self, query: BranchListQuery) -> RepositoryResult<(usize, Vec<Branch>)>;
    fn list_branch_cities(&self, hub_id: HubId) -> RepositoryResult<Vec<String>>;
}

pub trait BranchWriter {
    fn create_branch(&self, new_branch: &NewBranch) -> RepositoryResult<Branch>;
    /// Inserts branches skipping names that already exist. Returns inserted rows.
    fn import_branches(&self, new_branches: &[NewBranch]) -> RepositoryResult<usize>;
    fn update_branch(
        &self,
        id: BranchId,
        hub_id: HubId,
        updates: &UpdateBranch,
    ) -> RepositoryResult<Branch>;
    fn delete_branch(&self, id: BranchId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait CompanyReader {
    fn get_company_by_id(&self, id: CompanyId, hub_id: HubId)
    -> RepositoryResult<Option<Company>>;
    fn list_companies(&self, query: CompanyListQuery) -> RepositoryResult<(usize, Vec<Company>)>;
    fn count_company_products(&self, id: CompanyId) -> RepositoryResult<usize>;
}

pub trait CompanyWriter {
    fn create_company(&self, new_company: &NewCompany) -> RepositoryResult<Company>;
    fn update_company(
        &self,
        id: CompanyId,
        hub_id: HubId,
        updates: &UpdateCompany,
    ) -> RepositoryResult<Company>;
    fn delete_company(&self, id: CompanyId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait ProductReader {
    fn get_product_by_id(&self, id: ProductId, hub_id: HubId)
    -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    fn list_product_categories(&self, hub_id: HubId) -> RepositoryResult<Vec<String>>;
}

pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(
        &self,
        id: ProductId,
        hub_id: HubId,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn delete_product(&self, id: ProductId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait DocumentReader {
    fn get_document_by_id(
        &self,
        id: DocumentId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Document>>;
    fn get_document_by_storage_key(
        &self,
        key: &StorageKey,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Document>>;
    fn list_documents(&self, query: DocumentListQuery)
    -> RepositoryResult<(usize, Vec<Document>)>;
    fn list_document_categories(&self, hub_id: HubId) -> RepositoryResult<Vec<String>>;
}

pub trait DocumentWriter {
    fn create_document(&self, new_document: &NewDocument) -> RepositoryResult<Document>;
    fn update_document(
        &self,
        id: DocumentId,
        hub_id: HubId,
        updates: &UpdateDocument,
    ) -> RepositoryResult<Document>;
    fn delete_document(&self, id: DocumentId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait NewsReader {
    fn get_news_by_id(&self, id: NewsId, hub_id: HubId) -> RepositoryResult<Option<News>>;
    fn list_news_visibility(&self, id: NewsId) -> RepositoryResult<Vec<NewsVisibility>>;
    fn list_news(&self, query: NewsListQuery) -> RepositoryResult<(usize, Vec<News>)>;
    fn list_news_categories(&self, hub_id: HubId) -> RepositoryResult<Vec<String>>;
}

pub trait NewsWriter {
    /// Inserts the post and its visibility rows in one transaction.
    fn create_news(
        &self,
        new_news: &NewNews,
        published_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<News>;
    /// Updates the post and replaces all of its visibility rows atomically.
    fn update_news(
        &self,
        id: NewsId,
        hub_id: HubId,
        updates: &UpdateNews,
        published_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<News>;
    fn delete_news(&self, id: NewsId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait CalendarEventReader {
    fn get_event_by_id(&self, id: EventId, hub_id: HubId)
    -> RepositoryResult<Option<CalendarEvent>>;
    fn list_events(&self, query: EventListQuery) -> RepositoryResult<Vec<CalendarEvent>>;
}

pub trait CalendarEventWriter {
    fn create_event(&self, new_event: &NewCalendarEvent) -> RepositoryResult<CalendarEvent>;
    fn update_event(
        &self,
        id: EventId,
        hub_id: HubId,
        updates: &UpdateCalendarEvent,
    ) -> RepositoryResult<CalendarEvent>;
    fn delete_event(&self, id: EventId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId, hub_id: HubId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(
        &self,
        email: &EmailAddress,
        hub_id: HubId,
    ) -> RepositoryResult<Option<User>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
}

pub trait UserWriter {
    /// Upserts by `(hub_id, email)`. Existing profiles only get their name refreshed.
    fn sync_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, id: UserId, hub_id: HubId, updates: &UpdateUser)
    -> RepositoryResult<User>;
    fn set_user_active(&self, id: UserId, hub_id: HubId, is_active: bool)
    -> RepositoryResult<User>;
    fn delete_user(&self, id: UserId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait AlertReader {
    fn get_alert_by_id(&self, id: AlertId, hub_id: HubId) -> RepositoryResult<Option<Alert>>;
    fn list_alerts(&self, hub_id: HubId) -> RepositoryResult<Vec<Alert>>;
    fn list_active_alerts(&self, hub_id: HubId, now: NaiveDateTime)
    -> RepositoryResult<Vec<Alert>>;
}

pub trait AlertWriter {
    fn create_alert(&self, new_alert: &NewAlert) -> RepositoryResult<Alert>;
    fn update_alert(&self, id: AlertId, hub_id: HubId, updates: &UpdateAlert)
    -> RepositoryResult<Alert>;
    fn set_alert_active(&self, id: AlertId, hub_id: HubId, is_active: bool)
    -> RepositoryResult<Alert>;
    fn delete_alert(&self, id: AlertId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait StatsReader {
    fn hub_stats(&self, hub_id: HubId) -> RepositoryResult<HubStats>;
}
