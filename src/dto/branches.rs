use serde::{Deserialize, Serialize};

use crate::domain::branch::Branch;
use crate::domain::user::User;
use crate::pagination::Paginated;

/// Query parameters of the branch list.
#[derive(Debug, Default, Deserialize)]
pub struct BranchesQuery {
    pub search: Option<String>,
    pub city: Option<String>,
    /// Admins see inactive branches unless this is set.
    pub active: Option<bool>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct BranchesPageData {
    pub branches: Paginated<Branch>,
    pub cities: Vec<String>,
    pub search: Option<String>,
    pub city: Option<String>,
    pub active_only: bool,
    pub can_edit: bool,
}

#[derive(Debug, Serialize)]
pub struct BranchPageData {
    pub branch: Branch,
    /// Users whose home branch this is.
    pub staff: Vec<User>,
    pub can_edit: bool,
}
