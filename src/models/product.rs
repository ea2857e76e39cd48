//! Diesel models for knowledge-base products.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductFields,
};
use crate::domain::types::{
    CategoryName, CompanyId, HubId, ProductId, ProductTitle, RichText, TypeConstraintError,
};
use crate::models::company::Company;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Company, foreign_key = company_id))]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub hub_id: i32,
    pub company_id: Option<i32>,
    pub title: String,
    pub category: String,
    pub summary: Option<String>,
    pub body: String,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub hub_id: i32,
    pub company_id: Option<i32>,
    pub title: &'a str,
    pub category: &'a str,
    pub summary: Option<&'a str>,
    pub body: &'a str,
    pub is_published: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProduct<'a> {
    pub company_id: Option<i32>,
    pub title: &'a str,
    pub category: &'a str,
    pub summary: Option<&'a str>,
    pub body: &'a str,
    pub is_published: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::new(product.id)?,
            hub_id: HubId::new(product.hub_id)?,
            company_id: product.company_id.map(CompanyId::new).transpose()?,
            title: ProductTitle::new(product.title)?,
            category: CategoryName::new(product.category)?,
            summary: product.summary,
            body: RichText::new(product.body)?,
            is_published: product.is_published,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(product: &'a DomainNewProduct) -> Self {
        let fields = &product.fields;
        Self {
            hub_id: product.hub_id.get(),
            company_id: fields.company_id.map(CompanyId::get),
            title: fields.title.as_str(),
            category: fields.category.as_str(),
            summary: fields.summary.as_deref(),
            body: fields.body.as_str(),
            is_published: fields.is_published,
        }
    }
}

impl<'a> UpdateProduct<'a> {
    pub fn new(fields: &'a ProductFields, updated_at: NaiveDateTime) -> Self {
        Self {
            company_id: fields.company_id.map(CompanyId::get),
            title: fields.title.as_str(),
            category: fields.category.as_str(),
            summary: fields.summary.as_deref(),
            body: fields.body.as_str(),
            is_published: fields.is_published,
            updated_at,
        }
    }
}
