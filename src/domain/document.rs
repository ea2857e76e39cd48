//! Uploaded documents with their storage pointer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryName, DocumentId, DocumentTitle, HubId, StorageKey, UserId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub hub_id: HubId,
    pub title: DocumentTitle,
    pub description: Option<String>,
    pub category: Option<CategoryName>,
    pub file_name: String,
    pub storage_key: StorageKey,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Option<UserId>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewDocument {
    pub hub_id: HubId,
    pub title: DocumentTitle,
    pub description: Option<String>,
    pub category: Option<CategoryName>,
    pub file_name: String,
    pub storage_key: StorageKey,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Option<UserId>,
}

/// Metadata that can be edited after the upload.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateDocument {
    pub title: DocumentTitle,
    pub description: Option<String>,
    pub category: Option<CategoryName>,
}
