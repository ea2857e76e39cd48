use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Deserialize;
use validator::Validate;

use crate::domain::document::UpdateDocument;
use crate::domain::types::{CategoryName, DocumentTitle, non_blank};
use crate::forms::FormError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(MultipartForm)]
/// Multipart upload of a new document.
pub struct UploadDocumentForm {
    pub title: Text<String>,
    pub description: Option<Text<String>>,
    pub category: Option<Text<String>>,
    #[multipart(limit = "25MB")]
    pub file: TempFile,
}

/// Validated upload. Keeps the temp file alive until it is stored.
pub struct UploadDocumentPayload {
    pub title: DocumentTitle,
    pub description: Option<String>,
    pub category: Option<CategoryName>,
    pub file_name: String,
    pub content_type: String,
    pub upload: TempFile,
}

impl TryFrom<UploadDocumentForm> for UploadDocumentPayload {
    type Error = FormError;

    fn try_from(form: UploadDocumentForm) -> Result<Self, Self::Error> {
        let title =
            DocumentTitle::new(form.title.into_inner()).map_err(|_| FormError::Required("title"))?;

        if form.file.size == 0 {
            return Err(FormError::EmptyFile);
        }

        let file_name = non_blank(form.file.file_name.clone())
            .map(|name| {
                // Browsers on Windows may send the full client path.
                name.rsplit(['/', '\\']).next().unwrap_or_default().to_string()
            })
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "document".to_string());

        let content_type = form
            .file
            .content_type
            .as_ref()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        Ok(Self {
            title,
            description: non_blank(form.description.map(Text::into_inner)),
            category: non_blank(form.category.map(Text::into_inner))
                .map(CategoryName::new)
                .transpose()
                .map_err(|_| FormError::Required("category"))?,
            file_name,
            content_type,
            upload: form.file,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Metadata edit form for an existing document.
pub struct DocumentForm {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl TryFrom<DocumentForm> for UpdateDocument {
    type Error = FormError;

    fn try_from(form: DocumentForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(UpdateDocument {
            title: DocumentTitle::new(form.title).map_err(|_| FormError::Required("title"))?,
            description: non_blank(form.description),
            category: non_blank(form.category)
                .map(CategoryName::new)
                .transpose()
                .map_err(|_| FormError::Required("category"))?,
        })
    }
}
