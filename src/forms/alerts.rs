use serde::Deserialize;
use validator::Validate;

use crate::domain::alert::AlertFields;
use crate::domain::types::{AlertTitle, RichText};
use crate::forms::{FormError, checkbox, parse_optional_datetime};

#[derive(Debug, Deserialize, Validate)]
/// Add/edit form for a dashboard alert.
pub struct AlertForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    pub level: String,
    #[serde(default)]
    pub is_active: Option<String>,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl TryFrom<AlertForm> for AlertFields {
    type Error = FormError;

    fn try_from(form: AlertForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let starts_at = parse_optional_datetime(form.starts_at.as_deref())?;
        let expires_at = parse_optional_datetime(form.expires_at.as_deref())?;
        if let (Some(start), Some(end)) = (starts_at, expires_at)
            && end <= start
        {
            return Err(FormError::InvalidRange);
        }

        Ok(AlertFields {
            title: AlertTitle::new(form.title).map_err(|_| FormError::Required("title"))?,
            message: RichText::new(form.message).map_err(|_| FormError::Required("message"))?,
            level: form.level.parse().map_err(|_| FormError::InvalidLevel)?,
            is_active: checkbox(&form.is_active),
            starts_at,
            expires_at,
        })
    }
}
