//! Domain model for franchise branch offices.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{BranchId, BranchName, CityName, EmailAddress, HubId, PhoneNumber};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Branch {
    pub id: BranchId,
    pub hub_id: HubId,
    pub name: BranchName,
    pub address: Option<String>,
    pub city: Option<CityName>,
    pub postal_code: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub email: Option<EmailAddress>,
    pub manager_name: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Contact and address details shared by create and update payloads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BranchDetails {
    pub address: Option<String>,
    pub city: Option<CityName>,
    pub postal_code: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub email: Option<EmailAddress>,
    pub manager_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewBranch {
    pub hub_id: HubId,
    pub name: BranchName,
    pub details: BranchDetails,
    pub is_active: bool,
}

impl NewBranch {
    #[must_use]
    pub fn new(hub_id: HubId, name: BranchName, details: BranchDetails, is_active: bool) -> Self {
        Self {
            hub_id,
            name,
            details,
            is_active,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateBranch {
    pub name: BranchName,
    pub details: BranchDetails,
    pub is_active: bool,
}

impl UpdateBranch {
    #[must_use]
    pub fn new(name: BranchName, details: BranchDetails, is_active: bool) -> Self {
        Self {
            name,
            details,
            is_active,
        }
    }
}
