use serde::{Deserialize, Serialize};

use crate::domain::branch::Branch;
use crate::domain::news::{News, NewsVisibility};
use crate::domain::types::BranchId;
use crate::domain::user::UserType;
use crate::pagination::Paginated;

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NewsPageData {
    pub news: Paginated<News>,
    pub categories: Vec<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub can_edit: bool,
}

#[derive(Debug, Serialize)]
pub struct NewsPostPageData {
    pub post: News,
    pub can_edit: bool,
}

/// Data for the news editor. `post` is `None` when creating.
#[derive(Debug, Serialize)]
pub struct NewsEditorData {
    pub post: Option<News>,
    pub branches: Vec<Branch>,
    pub user_types: Vec<UserType>,
    pub categories: Vec<String>,
    /// Branches currently selected. Empty means all.
    pub selected_branches: Vec<BranchId>,
    /// User types currently selected. Empty means all.
    pub selected_user_types: Vec<UserType>,
    pub visibility: Vec<NewsVisibility>,
}
