use serde::Deserialize;
use validator::Validate;

use crate::domain::company::{CompanyFields, NewCompany};
use crate::domain::types::{CompanyName, EmailAddress, HubId, PhoneNumber, WebsiteUrl, non_blank};
use crate::forms::{FormError, checkbox};

#[derive(Debug, Deserialize, Validate)]
/// Add/edit form for an insurance company.
pub struct CompanyForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyPayload {
    pub fields: CompanyFields,
}

impl CompanyPayload {
    pub fn into_new_company(self, hub_id: HubId) -> NewCompany {
        NewCompany {
            hub_id,
            fields: self.fields,
        }
    }
}

impl TryFrom<CompanyForm> for CompanyPayload {
    type Error = FormError;

    fn try_from(form: CompanyForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let logo_url = non_blank(form.logo_url)
            .map(WebsiteUrl::new)
            .transpose()
            .map_err(|_| FormError::InvalidUrl)?
            .map(WebsiteUrl::into_inner);

        let fields = CompanyFields {
            name: CompanyName::new(form.name).map_err(|_| FormError::Required("name"))?,
            description: non_blank(form.description),
            website: non_blank(form.website)
                .map(WebsiteUrl::new)
                .transpose()
                .map_err(|_| FormError::InvalidUrl)?,
            logo_url,
            contact_email: non_blank(form.contact_email)
                .map(EmailAddress::new)
                .transpose()
                .map_err(|_| FormError::InvalidEmail)?,
            contact_phone: non_blank(form.contact_phone)
                .map(PhoneNumber::new)
                .transpose()
                .map_err(|_| FormError::InvalidPhoneNumber)?,
            is_active: checkbox(&form.is_active),
        };

        Ok(Self { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CompanyForm {
        CompanyForm {
            name: "Acme Insurance".into(),
            description: Some("  ".into()),
            website: Some("https://acme.example.com".into()),
            logo_url: None,
            contact_email: None,
            contact_phone: None,
            is_active: Some("on".into()),
        }
    }

    #[test]
    fn valid_form_becomes_payload() {
        let payload = CompanyPayload::try_from(form()).unwrap();
        assert_eq!(payload.fields.name.as_str(), "Acme Insurance");
        assert_eq!(payload.fields.description, None);
        assert!(payload.fields.website.is_some());
        assert!(payload.fields.is_active);
    }

    #[test]
    fn invalid_website_is_rejected() {
        let mut f = form();
        f.website = Some("not a url".into());
        assert!(matches!(
            CompanyPayload::try_from(f),
            Err(FormError::InvalidUrl)
        ));
    }

    #[test]
    fn missing_name_is_rejected() {
        let mut f = form();
        f.name = String::new();
        assert!(matches!(
            CompanyPayload::try_from(f),
            Err(FormError::Validation(_))
        ));
    }
}
