use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::branch::{BranchDetails, NewBranch, UpdateBranch};
use crate::domain::types::{BranchName, CityName, EmailAddress, HubId, PhoneNumber, non_blank};
use crate::forms::{FormError, checkbox};

#[derive(Debug, Deserialize, Validate)]
/// Add/edit form for a branch office.
pub struct BranchForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchPayload {
    pub name: BranchName,
    pub details: BranchDetails,
    pub is_active: bool,
}

impl BranchPayload {
    pub fn into_new_branch(self, hub_id: HubId) -> NewBranch {
        NewBranch::new(hub_id, self.name, self.details, self.is_active)
    }

    pub fn into_update(self) -> UpdateBranch {
        UpdateBranch::new(self.name, self.details, self.is_active)
    }
}

fn branch_details(
    address: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    manager_name: Option<String>,
) -> Result<BranchDetails, FormError> {
    Ok(BranchDetails {
        address: non_blank(address),
        city: non_blank(city)
            .map(CityName::new)
            .transpose()
            .map_err(|_| FormError::Required("city"))?,
        postal_code: non_blank(postal_code),
        phone: non_blank(phone)
            .map(PhoneNumber::new)
            .transpose()
            .map_err(|_| FormError::InvalidPhoneNumber)?,
        email: non_blank(email)
            .map(EmailAddress::new)
            .transpose()
            .map_err(|_| FormError::InvalidEmail)?,
        manager_name: non_blank(manager_name),
    })
}

impl TryFrom<BranchForm> for BranchPayload {
    type Error = FormError;

    fn try_from(form: BranchForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let is_active = checkbox(&form.is_active);
        let name = BranchName::new(form.name).map_err(|_| FormError::Required("name"))?;
        let details = branch_details(
            form.address,
            form.city,
            form.postal_code,
            form.phone,
            form.email,
            form.manager_name,
        )?;

        Ok(Self {
            name,
            details,
            is_active,
        })
    }
}

#[derive(MultipartForm)]
/// CSV upload used for the bulk import.
pub struct UploadBranchesForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

#[derive(Debug, Deserialize)]
struct BranchCsvRow {
    name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    postal_code: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    manager_name: Option<String>,
}

impl UploadBranchesForm {
    pub fn parse(&self, hub_id: HubId) -> Result<Vec<NewBranch>, FormError> {
        let file = self.csv.file.reopen().map_err(|e| FormError::Csv(e.into()))?;
        parse_branches_csv(file, hub_id)
    }
}

/// Reads branch rows from CSV with a header row. Unknown columns are ignored.
pub fn parse_branches_csv<R: Read>(reader: R, hub_id: HubId) -> Result<Vec<NewBranch>, FormError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut branches = Vec::new();
    for (index, record) in rdr.deserialize::<BranchCsvRow>().enumerate() {
        // Header is line 1.
        let row = index + 2;
        let record = record?;

        let name = non_blank(record.name)
            .map(BranchName::new)
            .transpose()
            .ok()
            .flatten()
            .ok_or_else(|| FormError::InvalidRow {
                row,
                reason: "name is required".to_string(),
            })?;

        let details = branch_details(
            record.address,
            record.city,
            record.postal_code,
            record.phone,
            record.email,
            record.manager_name,
        )
        .map_err(|err| FormError::InvalidRow {
            row,
            reason: err.to_string(),
        })?;

        branches.push(NewBranch::new(hub_id, name, details, true));
    }

    Ok(branches)
}
