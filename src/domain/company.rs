//! Domain model for insurance companies presented to franchise staff.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CompanyId, CompanyName, EmailAddress, HubId, PhoneNumber, WebsiteUrl};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub id: CompanyId,
    pub hub_id: HubId,
    pub name: CompanyName,
    pub description: Option<String>,
    pub website: Option<WebsiteUrl>,
    pub logo_url: Option<String>,
    pub contact_email: Option<EmailAddress>,
    pub contact_phone: Option<PhoneNumber>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable company attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct CompanyFields {
    pub name: CompanyName,
    pub description: Option<String>,
    pub website: Option<WebsiteUrl>,
    pub logo_url: Option<String>,
    pub contact_email: Option<EmailAddress>,
    pub contact_phone: Option<PhoneNumber>,
    pub is_active: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCompany {
    pub hub_id: HubId,
    pub fields: CompanyFields,
}

pub type UpdateCompany = CompanyFields;
