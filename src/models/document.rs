//! Diesel models for uploaded documents.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::document::{
    Document as DomainDocument, NewDocument as DomainNewDocument,
    UpdateDocument as DomainUpdateDocument,
};
use crate::domain::types::{
    CategoryName, DocumentId, DocumentTitle, HubId, StorageKey, TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::documents)]
pub struct Document {
    pub id: i32,
    pub hub_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub file_name: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::documents)]
pub struct NewDocument<'a> {
    pub hub_id: i32,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub file_name: &'a str,
    pub storage_key: &'a str,
    pub content_type: &'a str,
    pub size_bytes: i64,
    pub uploaded_by: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::documents)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateDocument<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
}

impl TryFrom<Document> for DomainDocument {
    type Error = TypeConstraintError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        Ok(Self {
            id: DocumentId::new(document.id)?,
            hub_id: HubId::new(document.hub_id)?,
            title: DocumentTitle::new(document.title)?,
            description: document.description,
            category: document.category.map(CategoryName::new).transpose()?,
            file_name: document.file_name,
            storage_key: StorageKey::new(document.storage_key)?,
            content_type: document.content_type,
            size_bytes: document.size_bytes,
            uploaded_by: document.uploaded_by.map(UserId::new).transpose()?,
            created_at: document.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewDocument> for NewDocument<'a> {
    fn from(document: &'a DomainNewDocument) -> Self {
        Self {
            hub_id: document.hub_id.get(),
            title: document.title.as_str(),
            description: document.description.as_deref(),
            category: document.category.as_ref().map(CategoryName::as_str),
            file_name: document.file_name.as_str(),
            storage_key: document.storage_key.as_str(),
            content_type: document.content_type.as_str(),
            size_bytes: document.size_bytes,
            uploaded_by: document.uploaded_by.map(UserId::get),
        }
    }
}

impl<'a> From<&'a DomainUpdateDocument> for UpdateDocument<'a> {
    fn from(document: &'a DomainUpdateDocument) -> Self {
        Self {
            title: document.title.as_str(),
            description: document.description.as_deref(),
            category: document.category.as_ref().map(CategoryName::as_str),
        }
    }
}
