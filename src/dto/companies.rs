use serde::{Deserialize, Serialize};

use crate::domain::company::Company;
use crate::domain::product::Product;
use crate::pagination::Paginated;

#[derive(Debug, Default, Deserialize)]
pub struct CompaniesQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CompaniesPageData {
    pub companies: Paginated<Company>,
    pub search: Option<String>,
    pub can_edit: bool,
}

#[derive(Debug, Serialize)]
pub struct CompanyPageData {
    pub company: Company,
    /// Products of the company. Drafts only for admins.
    pub products: Vec<Product>,
    pub can_edit: bool,
}
