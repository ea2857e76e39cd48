use serde::Deserialize;
use validator::Validate;

use crate::domain::news::{NewsFields, NewsVisibility, expand_visibility};
use crate::domain::types::{BranchId, CategoryName, NewsTitle, RichText, Tags};
use crate::domain::user::UserType;
use crate::forms::{FormError, checkbox};

#[derive(Debug, Deserialize, Validate)]
/// News editor. Branch and user-type selects are multi-valued, so the body is
/// decoded with `serde_html_form`.
pub struct NewsForm {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub branch_ids: Vec<i32>,
    #[serde(default)]
    pub user_types: Vec<String>,
    #[serde(default)]
    pub is_published: Option<String>,
}

impl NewsForm {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(bytes).map_err(|err| FormError::Encoding(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsPayload {
    pub fields: NewsFields,
    /// Selected branches, deduplicated. Empty means every branch.
    pub branch_ids: Vec<BranchId>,
    pub visibility: Vec<NewsVisibility>,
}

impl TryFrom<NewsForm> for NewsPayload {
    type Error = FormError;

    fn try_from(form: NewsForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let mut branch_ids = Vec::with_capacity(form.branch_ids.len());
        for id in form.branch_ids {
            let id = BranchId::new(id).map_err(|_| FormError::InvalidId("branch"))?;
            if !branch_ids.contains(&id) {
                branch_ids.push(id);
            }
        }

        let user_types = form
            .user_types
            .iter()
            .map(|t| t.parse::<UserType>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| FormError::InvalidUserType)?;

        let fields = NewsFields {
            title: NewsTitle::new(form.title).map_err(|_| FormError::Required("title"))?,
            body: RichText::new(form.body).map_err(|_| FormError::Required("body"))?,
            category: CategoryName::new(form.category)
                .map_err(|_| FormError::Required("category"))?,
            tags: Tags::parse(&form.tags),
            is_published: checkbox(&form.is_published),
        };

        let visibility = expand_visibility(&branch_ids, &user_types);

        Ok(Self {
            fields,
            branch_ids,
            visibility,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_selects_are_decoded() {
        let body = b"title=Launch&body=%3Cp%3EHi%3C%2Fp%3E&category=General&tags=Sales%2C+sales%2C+Q1\
&branch_ids=1&branch_ids=2&branch_ids=1&user_types=agent&user_types=manager&is_published=on";

        let form = NewsForm::from_bytes(body).unwrap();
        let payload = NewsPayload::try_from(form).unwrap();

        assert_eq!(payload.branch_ids.len(), 2);
        assert_eq!(payload.visibility.len(), 4);
        assert_eq!(payload.fields.tags.as_slice(), ["sales", "q1"]);
        assert!(payload.fields.is_published);
    }

    #[test]
    fn no_selection_targets_everyone() {
        let form = NewsForm::from_bytes(b"title=Hi&body=Hello&category=General").unwrap();
        let payload = NewsPayload::try_from(form).unwrap();

        assert_eq!(
            payload.visibility,
            vec![NewsVisibility {
                branch_id: None,
                user_type: None
            }]
        );
        assert!(!payload.fields.is_published);
    }

    #[test]
    fn unknown_user_type_is_rejected() {
        let form =
            NewsForm::from_bytes(b"title=Hi&body=Hello&category=General&user_types=boss").unwrap();
        assert!(matches!(
            NewsPayload::try_from(form),
            Err(FormError::InvalidUserType)
        ));
    }

    #[test]
    fn missing_title_fails_validation() {
        let form = NewsForm::from_bytes(b"title=&body=Hello&category=General").unwrap();
        assert!(matches!(
            NewsPayload::try_from(form),
            Err(FormError::Validation(_))
        ));
    }
}
