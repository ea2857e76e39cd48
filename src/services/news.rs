//! News publishing and the audience-scoped feed.
//!
//! Readers see a post when it is published and one of its visibility rows
//! covers their home branch and user type. Admins see every post.

use chrono::Utc;

use crate::changes::{ChangeAction, ChangeMessage, ChangeNotifier, notify};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::news::{NewNews, News, UpdateNews, resolve_published_at};
use crate::domain::types::{BranchId, EmailAddress, HubId, NewsId};
use crate::domain::user::{User, UserType};
use crate::dto::news::{NewsEditorData, NewsPageData, NewsPostPageData, NewsQuery};
use crate::forms::news::{NewsForm, NewsPayload};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    Audience, BranchListQuery, BranchReader, NewsListQuery, NewsReader, NewsWriter, UserReader,
};
use crate::services::users::profile_id;
use crate::services::{
    ServiceError, ServiceResult, authorize_admin, authorize_reader, filter_value, is_admin,
    page_or_first,
};

const TABLE: &str = "news";

fn profile<R>(repo: &R, user: &AuthenticatedUser, hub_id: HubId) -> ServiceResult<Option<User>>
where
    R: UserReader + ?Sized,
{
    let email = EmailAddress::new(&user.email)?;
    Ok(repo.get_user_by_email(&email, hub_id)?)
}

/// Audience of a non-admin reader. Users without a profile read as employees
/// without a branch. Deactivated profiles are refused.
pub(crate) fn reader_audience<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hub_id: HubId,
) -> ServiceResult<Audience>
where
    R: UserReader + ?Sized,
{
    match profile(repo, user, hub_id)? {
        Some(profile) if !profile.is_active => Err(ServiceError::Unauthorized),
        Some(profile) => Ok(Audience {
            branch_id: profile.branch_id,
            user_type: profile.user_type,
        }),
        None => Ok(Audience {
            branch_id: None,
            user_type: UserType::default(),
        }),
    }
}

/// Feed query for `user`: every published post for admins, the visible ones
/// for everybody else.
pub(crate) fn feed_query<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hub_id: HubId,
) -> ServiceResult<NewsListQuery>
where
    R: UserReader + ?Sized,
{
    let query = NewsListQuery::new(hub_id);
    if is_admin(user) {
        Ok(query.published_only())
    } else {
        Ok(query.visible_to(reader_audience(repo, user, hub_id)?))
    }
}

/// The current user's news feed, newest first.
pub fn news_feed<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: NewsQuery,
) -> ServiceResult<NewsPageData>
where
    R: NewsReader + UserReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;

    let page = page_or_first(query.page);
    let search = filter_value(query.search);
    let category = filter_value(query.category);

    let mut list_query = feed_query(repo, user, hub_id)?.paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search {
        list_query = list_query.search(term.clone());
    }
    if let Some(category) = &category {
        list_query = list_query.category(category.clone());
    }

    let (total, news) = repo.list_news(list_query)?;
    let categories = repo.list_news_categories(hub_id)?;

    Ok(NewsPageData {
        news: Paginated::new(news, page, total, DEFAULT_ITEMS_PER_PAGE),
        categories,
        search,
        category,
        can_edit: is_admin(user),
    })
}

/// Admin list including drafts.
pub fn manage_news<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: NewsQuery,
) -> ServiceResult<NewsPageData>
where
    R: NewsReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let page = page_or_first(query.page);
    let search = filter_value(query.search);
    let category = filter_value(query.category);

    let mut list_query = NewsListQuery::new(hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search {
        list_query = list_query.search(term.clone());
    }
    if let Some(category) = &category {
        list_query = list_query.category(category.clone());
    }

    let (total, news) = repo.list_news(list_query)?;
    let categories = repo.list_news_categories(hub_id)?;

    Ok(NewsPageData {
        news: Paginated::new(news, page, total, DEFAULT_ITEMS_PER_PAGE),
        categories,
        search,
        category,
        can_edit: true,
    })
}

/// Opens one post. Hidden posts are reported as missing to readers.
pub fn show_news<R>(
    repo: &R,
    user: &AuthenticatedUser,
    news_id: i32,
) -> ServiceResult<NewsPostPageData>
where
    R: NewsReader + UserReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;

    let post = repo
        .get_news_by_id(NewsId::new(news_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    if is_admin(user) {
        return Ok(NewsPostPageData {
            post,
            can_edit: true,
        });
    }

    if !post.is_published {
        return Err(ServiceError::NotFound);
    }

    let audience = reader_audience(repo, user, hub_id)?;
    let visible = repo
        .list_news_visibility(post.id)?
        .iter()
        .any(|row| row.matches(audience.branch_id, audience.user_type));
    if !visible {
        return Err(ServiceError::NotFound);
    }

    Ok(NewsPostPageData {
        post,
        can_edit: false,
    })
}

/// Data for the editor. `news_id` is `None` for a new post.
pub fn load_news_editor<R>(
    repo: &R,
    user: &AuthenticatedUser,
    news_id: Option<i32>,
) -> ServiceResult<NewsEditorData>
where
    R: NewsReader + BranchReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let (post, visibility) = match news_id {
        Some(id) => {
            let post = repo
                .get_news_by_id(NewsId::new(id)?, hub_id)?
                .ok_or(ServiceError::NotFound)?;
            let visibility = repo.list_news_visibility(post.id)?;
            (Some(post), visibility)
        }
        None => (None, Vec::new()),
    };

    let mut selected_branches = Vec::new();
    let mut selected_user_types = Vec::new();
    for row in &visibility {
        if let Some(branch_id) = row.branch_id
            && !selected_branches.contains(&branch_id)
        {
            selected_branches.push(branch_id);
        }
        if let Some(user_type) = row.user_type
            && !selected_user_types.contains(&user_type)
        {
            selected_user_types.push(user_type);
        }
    }

    let (_, branches) = repo.list_branches(BranchListQuery::new(hub_id))?;
    let categories = repo.list_news_categories(hub_id)?;

    Ok(NewsEditorData {
        post,
        branches,
        user_types: UserType::ALL.to_vec(),
        categories,
        selected_branches,
        selected_user_types,
        visibility,
    })
}

/// Every selected branch must belong to the hub.
fn ensure_branches<R>(repo: &R, branch_ids: &[BranchId], hub_id: HubId) -> ServiceResult<()>
where
    R: BranchReader + ?Sized,
{
    for branch_id in branch_ids {
        if repo.get_branch_by_id(*branch_id, hub_id)?.is_none() {
            return Err(ServiceError::Form(format!("Unknown branch {branch_id}")));
        }
    }
    Ok(())
}

pub fn create_news<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    form: NewsForm,
) -> ServiceResult<News>
where
    R: NewsWriter + BranchReader + UserReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let payload = NewsPayload::try_from(form)?;
    ensure_branches(repo, &payload.branch_ids, hub_id)?;

    let published_at = resolve_published_at(
        None,
        payload.fields.is_published,
        Utc::now().naive_utc(),
    );

    let new_news = NewNews {
        hub_id,
        author_id: profile_id(repo, user, hub_id),
        fields: payload.fields,
        visibility: payload.visibility,
    };

    let news = repo.create_news(&new_news, published_at)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Created, news.id.get()),
    );

    Ok(news)
}

/// Saves the post and replaces its audience.
pub fn update_news<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    news_id: i32,
    form: NewsForm,
) -> ServiceResult<News>
where
    R: NewsReader + NewsWriter + BranchReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let current = repo
        .get_news_by_id(NewsId::new(news_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let payload = NewsPayload::try_from(form)?;
    ensure_branches(repo, &payload.branch_ids, hub_id)?;

    let published_at = resolve_published_at(
        current.published_at,
        payload.fields.is_published,
        Utc::now().naive_utc(),
    );

    let updates = UpdateNews {
        fields: payload.fields,
        visibility: payload.visibility,
    };

    let news = repo.update_news(current.id, hub_id, &updates, published_at)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Updated, news.id.get()),
    );

    Ok(news)
}

pub fn delete_news<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    news_id: i32,
) -> ServiceResult<()>
where
    R: NewsWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let news_id = NewsId::new(news_id)?;

    repo.delete_news(news_id, hub_id)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Deleted, news_id.get()),
    );

    Ok(())
}
