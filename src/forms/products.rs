use serde::Deserialize;
use validator::Validate;

use crate::domain::product::{NewProduct, ProductFields};
use crate::domain::types::{CategoryName, CompanyId, HubId, ProductTitle, RichText, non_blank};
use crate::forms::{FormError, checkbox};

#[derive(Debug, Deserialize, Validate)]
/// Knowledge-base article editor.
pub struct ProductForm {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    /// `0` or missing means "no company".
    #[serde(default)]
    pub company_id: Option<i32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[validate(length(min = 1))]
    pub body: String,
    #[serde(default)]
    pub is_published: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductPayload {
    pub fields: ProductFields,
}

impl ProductPayload {
    pub fn into_new_product(self, hub_id: HubId) -> NewProduct {
        NewProduct {
            hub_id,
            fields: self.fields,
        }
    }
}

impl TryFrom<ProductForm> for ProductPayload {
    type Error = FormError;

    fn try_from(form: ProductForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let company_id = match form.company_id {
            None | Some(0) => None,
            Some(id) => Some(CompanyId::new(id).map_err(|_| FormError::InvalidId("company"))?),
        };

        let fields = ProductFields {
            company_id,
            title: ProductTitle::new(form.title).map_err(|_| FormError::Required("title"))?,
            category: CategoryName::new(form.category)
                .map_err(|_| FormError::Required("category"))?,
            summary: non_blank(form.summary),
            body: RichText::new(form.body).map_err(|_| FormError::Required("body"))?,
            is_published: checkbox(&form.is_published),
        };

        Ok(Self { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            title: "Home cover".into(),
            category: "Property".into(),
            company_id: Some(0),
            summary: None,
            body: "<p>Covers fire</p><script>alert(1)</script>".into(),
            is_published: None,
        }
    }

    #[test]
    fn body_is_sanitised_and_company_optional() {
        let payload = ProductPayload::try_from(form()).unwrap();
        assert_eq!(payload.fields.company_id, None);
        assert!(!payload.fields.body.as_str().contains("script"));
        assert!(!payload.fields.is_published);
    }

    #[test]
    fn body_made_only_of_markup_is_rejected() {
        let mut f = form();
        f.body = "<script>alert(1)</script>".into();
        assert!(matches!(
            ProductPayload::try_from(f),
            Err(FormError::Required("body"))
        ));
    }

    #[test]
    fn negative_company_is_rejected() {
        let mut f = form();
        f.company_id = Some(-3);
        assert!(matches!(
            ProductPayload::try_from(f),
            Err(FormError::InvalidId("company"))
        ));
    }
}
