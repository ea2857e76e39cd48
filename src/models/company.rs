//! Diesel models for insurance companies.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::company::{
    Company as DomainCompany, CompanyFields, NewCompany as DomainNewCompany,
};
use crate::domain::types::{
    CompanyId, CompanyName, EmailAddress, HubId, PhoneNumber, TypeConstraintError, WebsiteUrl,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::companies)]
pub struct Company {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::companies)]
pub struct NewCompany<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub website: Option<&'a str>,
    pub logo_url: Option<&'a str>,
    pub contact_email: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::companies)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCompany<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub website: Option<&'a str>,
    pub logo_url: Option<&'a str>,
    pub contact_email: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Company> for DomainCompany {
    type Error = TypeConstraintError;

    fn try_from(company: Company) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CompanyId::new(company.id)?,
            hub_id: HubId::new(company.hub_id)?,
            name: CompanyName::new(company.name)?,
            description: company.description,
            website: company.website.map(WebsiteUrl::new).transpose()?,
            logo_url: company.logo_url,
            contact_email: company.contact_email.map(EmailAddress::new).transpose()?,
            contact_phone: company.contact_phone.map(PhoneNumber::new).transpose()?,
            is_active: company.is_active,
            created_at: company.created_at,
            updated_at: company.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCompany> for NewCompany<'a> {
    fn from(company: &'a DomainNewCompany) -> Self {
        let fields = &company.fields;
        Self {
            hub_id: company.hub_id.get(),
            name: fields.name.as_str(),
            description: fields.description.as_deref(),
            website: fields.website.as_ref().map(WebsiteUrl::as_str),
            logo_url: fields.logo_url.as_deref(),
            contact_email: fields.contact_email.as_ref().map(EmailAddress::as_str),
            contact_phone: fields.contact_phone.as_ref().map(PhoneNumber::as_str),
            is_active: fields.is_active,
        }
    }
}

impl<'a> UpdateCompany<'a> {
    pub fn new(fields: &'a CompanyFields, updated_at: NaiveDateTime) -> Self {
        Self {
            name: fields.name.as_str(),
            description: fields.description.as_deref(),
            website: fields.website.as_ref().map(WebsiteUrl::as_str),
            logo_url: fields.logo_url.as_deref(),
            contact_email: fields.contact_email.as_ref().map(EmailAddress::as_str),
            contact_phone: fields.contact_phone.as_ref().map(PhoneNumber::as_str),
            is_active: fields.is_active,
            updated_at,
        }
    }
}
