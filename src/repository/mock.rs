//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

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
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AlertReader, AlertWriter, BranchListQuery, BranchReader, BranchWriter, CalendarEventReader,
    CalendarEventWriter, CompanyListQuery, CompanyReader, CompanyWriter, DocumentListQuery,
    DocumentReader, DocumentWriter, EventListQuery, HubStats, NewsListQuery, NewsReader,
    NewsWriter, ProductListQuery, ProductReader, ProductWriter, StatsReader, UserListQuery,
    UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl BranchReader for Repository {
        fn get_branch_by_id(&self, id: BranchId, hub_id: HubId) -> RepositoryResult<Option<Branch>>;
        fn list_branches(&self, query: BranchListQuery) -> RepositoryResult<(usize, Vec<Branch>)>;
        fn list_branch_cities(&self, hub_id: HubId) -> RepositoryResult<Vec<String>>;
    }

    impl BranchWriter for Repository {
        fn create_branch(&self, new_branch: &NewBranch) -> RepositoryResult<Branch>;
        fn import_branches(&self, new_branches: &[NewBranch]) -> RepositoryResult<usize>;
        fn update_branch(
            &self,
            id: BranchId,
            hub_id: HubId,
            updates: &UpdateBranch,
        ) -> RepositoryResult<Branch>;
        fn delete_branch(&self, id: BranchId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl CompanyReader for Repository {
        fn get_company_by_id(&self, id: CompanyId, hub_id: HubId) -> RepositoryResult<Option<Company>>;
        fn list_companies(&self, query: CompanyListQuery) -> RepositoryResult<(usize, Vec<Company>)>;
        fn count_company_products(&self, id: CompanyId) -> RepositoryResult<usize>;
    }

    impl CompanyWriter for Repository {
        fn create_company(&self, new_company: &NewCompany) -> RepositoryResult<Company>;
        fn update_company(
            &self,
            id: CompanyId,
            hub_id: HubId,
            updates: &UpdateCompany,
        ) -> RepositoryResult<Company>;
        fn delete_company(&self, id: CompanyId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl ProductReader for Repository {
        fn get_product_by_id(&self, id: ProductId, hub_id: HubId) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
        fn list_product_categories(&self, hub_id: HubId) -> RepositoryResult<Vec<String>>;
    }

    impl ProductWriter for Repository {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(
            &self,
            id: ProductId,
            hub_id: HubId,
            updates: &UpdateProduct,
        ) -> RepositoryResult<Product>;
        fn delete_product(&self, id: ProductId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl DocumentReader for Repository {
        fn get_document_by_id(&self, id: DocumentId, hub_id: HubId) -> RepositoryResult<Option<Document>>;
        fn get_document_by_storage_key(&self, key: &StorageKey, hub_id: HubId) -> RepositoryResult<Option<Document>>;
        fn list_documents(&self, query: DocumentListQuery) -> RepositoryResult<(usize, Vec<Document>)>;
        fn list_document_categories(&self, hub_id: HubId) -> RepositoryResult<Vec<String>>;
    }

    impl DocumentWriter for Repository {
        fn create_document(&self, new_document: &NewDocument) -> RepositoryResult<Document>;
        fn update_document(
            &self,
            id: DocumentId,
            hub_id: HubId,
            updates: &UpdateDocument,
        ) -> RepositoryResult<Document>;
        fn delete_document(&self, id: DocumentId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl NewsReader for Repository {
        fn get_news_by_id(&self, id: NewsId, hub_id: HubId) -> RepositoryResult<Option<News>>;
        fn list_news_visibility(&self, id: NewsId) -> RepositoryResult<Vec<NewsVisibility>>;
        fn list_news(&self, query: NewsListQuery) -> RepositoryResult<(usize, Vec<News>)>;
        fn list_news_categories(&self, hub_id: HubId) -> RepositoryResult<Vec<String>>;
    }

    impl NewsWriter for Repository {
        fn create_news(
            &self,
            new_news: &NewNews,
            published_at: Option<NaiveDateTime>,
        ) -> RepositoryResult<News>;
        fn update_news(
            &self,
            id: NewsId,
            hub_id: HubId,
            updates: &UpdateNews,
            published_at: Option<NaiveDateTime>,
        ) -> RepositoryResult<News>;
        fn delete_news(&self, id: NewsId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl CalendarEventReader for Repository {
        fn get_event_by_id(&self, id: EventId, hub_id: HubId) -> RepositoryResult<Option<CalendarEvent>>;
        fn list_events(&self, query: EventListQuery) -> RepositoryResult<Vec<CalendarEvent>>;
    }

    impl CalendarEventWriter for Repository {
        fn create_event(&self, new_event: &NewCalendarEvent) -> RepositoryResult<CalendarEvent>;
        fn update_event(
            &self,
            id: EventId,
            hub_id: HubId,
            updates: &UpdateCalendarEvent,
        ) -> RepositoryResult<CalendarEvent>;
        fn delete_event(&self, id: EventId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId, hub_id: HubId) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(
            &self,
            email: &EmailAddress,
            hub_id: HubId,
        ) -> RepositoryResult<Option<User>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl UserWriter for Repository {
        fn sync_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_user(&self, id: UserId, hub_id: HubId, updates: &UpdateUser) -> RepositoryResult<User>;
        fn set_user_active(&self, id: UserId, hub_id: HubId, is_active: bool) -> RepositoryResult<User>;
        fn delete_user(&self, id: UserId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl AlertReader for Repository {
        fn get_alert_by_id(&self, id: AlertId, hub_id: HubId) -> RepositoryResult<Option<Alert>>;
        fn list_alerts(&self, hub_id: HubId) -> RepositoryResult<Vec<Alert>>;
        fn list_active_alerts(&self, hub_id: HubId, now: NaiveDateTime) -> RepositoryResult<Vec<Alert>>;
    }

    impl AlertWriter for Repository {
        fn create_alert(&self, new_alert: &NewAlert) -> RepositoryResult<Alert>;
        fn update_alert(&self, id: AlertId, hub_id: HubId, updates: &UpdateAlert) -> RepositoryResult<Alert>;
        fn set_alert_active(&self, id: AlertId, hub_id: HubId, is_active: bool) -> RepositoryResult<Alert>;
        fn delete_alert(&self, id: AlertId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl StatsReader for Repository {
        fn hub_stats(&self, hub_id: HubId) -> RepositoryResult<HubStats>;
    }
}
