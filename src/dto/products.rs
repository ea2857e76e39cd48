use serde::{Deserialize, Serialize};

use crate::domain::company::Company;
use crate::domain::product::Product;
use crate::pagination::Paginated;

#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub company_id: Option<i32>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ProductsPageData {
    pub products: Paginated<Product>,
    pub categories: Vec<String>,
    /// Companies for the filter and the editor select.
    pub companies: Vec<Company>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub company_id: Option<i32>,
    pub can_edit: bool,
}

#[derive(Debug, Serialize)]
pub struct ProductPageData {
    pub product: Product,
    pub company: Option<Company>,
    pub companies: Vec<Company>,
    pub categories: Vec<String>,
    pub can_edit: bool,
}
