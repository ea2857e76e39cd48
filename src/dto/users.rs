use serde::{Deserialize, Serialize};

use crate::domain::branch::Branch;
use crate::domain::user::{User, UserType};
use crate::pagination::Paginated;

#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub search: Option<String>,
    pub user_type: Option<String>,
    pub branch_id: Option<i32>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct UsersPageData {
    pub users: Paginated<User>,
    pub branches: Vec<Branch>,
    pub user_types: Vec<UserType>,
    pub search: Option<String>,
    pub user_type: Option<UserType>,
    pub branch_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct UserPageData {
    pub user: User,
    pub branches: Vec<Branch>,
    pub user_types: Vec<UserType>,
}
