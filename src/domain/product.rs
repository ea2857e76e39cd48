//! Knowledge-base articles describing insurance products.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryName, CompanyId, HubId, ProductId, ProductTitle, RichText};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub hub_id: HubId,
    pub company_id: Option<CompanyId>,
    pub title: ProductTitle,
    pub category: CategoryName,
    pub summary: Option<String>,
    pub body: RichText,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProductFields {
    pub company_id: Option<CompanyId>,
    pub title: ProductTitle,
    pub category: CategoryName,
    pub summary: Option<String>,
    pub body: RichText,
    pub is_published: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub hub_id: HubId,
    pub fields: ProductFields,
}

pub type UpdateProduct = ProductFields;
