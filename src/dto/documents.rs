use serde::{Deserialize, Serialize};

use crate::domain::document::Document;
use crate::pagination::Paginated;

#[derive(Debug, Default, Deserialize)]
pub struct DocumentsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
}

/// Document row with its resolved download URL.
#[derive(Debug, Serialize)]
pub struct DocumentView {
    #[serde(flatten)]
    pub document: Document,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentsPageData {
    pub documents: Paginated<DocumentView>,
    pub categories: Vec<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub can_edit: bool,
}
