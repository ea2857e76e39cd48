//! Diesel models for branch offices.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::branch::{
    Branch as DomainBranch, BranchDetails, NewBranch as DomainNewBranch,
    UpdateBranch as DomainUpdateBranch,
};
use crate::domain::types::{
    BranchId, BranchName, CityName, EmailAddress, HubId, PhoneNumber, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::branches)]
/// Diesel model for [`crate::domain::branch::Branch`].
pub struct Branch {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub manager_name: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::branches)]
/// Insertable form of [`Branch`].
pub struct NewBranch<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub manager_name: Option<&'a str>,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::branches)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Branch`] record.
pub struct UpdateBranch<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub manager_name: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Branch> for DomainBranch {
    type Error = TypeConstraintError;

    fn try_from(branch: Branch) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BranchId::new(branch.id)?,
            hub_id: HubId::new(branch.hub_id)?,
            name: BranchName::new(branch.name)?,
            address: branch.address,
            city: branch.city.map(CityName::new).transpose()?,
            postal_code: branch.postal_code,
            phone: branch.phone.map(PhoneNumber::new).transpose()?,
            email: branch.email.map(EmailAddress::new).transpose()?,
            manager_name: branch.manager_name,
            is_active: branch.is_active,
            created_at: branch.created_at,
            updated_at: branch.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewBranch> for NewBranch<'a> {
    fn from(branch: &'a DomainNewBranch) -> Self {
        let BranchDetails {
            address,
            city,
            postal_code,
            phone,
            email,
            manager_name,
        } = &branch.details;
        Self {
            hub_id: branch.hub_id.get(),
            name: branch.name.as_str(),
            address: address.as_deref(),
            city: city.as_ref().map(CityName::as_str),
            postal_code: postal_code.as_deref(),
            phone: phone.as_ref().map(PhoneNumber::as_str),
            email: email.as_ref().map(EmailAddress::as_str),
            manager_name: manager_name.as_deref(),
            is_active: branch.is_active,
        }
    }
}

impl<'a> UpdateBranch<'a> {
    pub fn new(branch: &'a DomainUpdateBranch, updated_at: NaiveDateTime) -> Self {
        let details = &branch.details;
        Self {
            name: branch.name.as_str(),
            address: details.address.as_deref(),
            city: details.city.as_ref().map(CityName::as_str),
            postal_code: details.postal_code.as_deref(),
            phone: details.phone.as_ref().map(PhoneNumber::as_str),
            email: details.email.as_ref().map(EmailAddress::as_str),
            manager_name: details.manager_name.as_deref(),
            is_active: branch.is_active,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn branch_into_domain_validates_columns() {
        let now = Utc::now().naive_utc();
        let db = Branch {
            id: 4,
            hub_id: 1,
            name: "Downtown".into(),
            address: Some("1 Main St".into()),
            city: Some("Springfield".into()),
            postal_code: None,
            phone: Some("+14155552671".into()),
            email: Some("downtown@example.com".into()),
            manager_name: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let domain = DomainBranch::try_from(db).expect("valid branch");
        assert_eq!(domain.id.get(), 4);
        assert_eq!(domain.city.as_deref(), Some("Springfield"));

        let broken = Branch {
            id: 0,
            hub_id: 1,
            name: "x".into(),
            address: None,
            city: None,
            postal_code: None,
            phone: None,
            email: None,
            manager_name: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        assert!(DomainBranch::try_from(broken).is_err());
    }

    #[test]
    fn new_branch_borrows_domain_values() {
        let domain = DomainNewBranch::new(
            HubId::new(2).unwrap(),
            BranchName::new("North").unwrap(),
            BranchDetails {
                city: Some(CityName::new("Ogdenville").unwrap()),
                ..BranchDetails::default()
            },
            true,
        );
        let insertable: NewBranch = (&domain).into();
        assert_eq!(insertable.hub_id, 2);
        assert_eq!(insertable.name, "North");
        assert_eq!(insertable.city, Some("Ogdenville"));
        assert_eq!(insertable.phone, None);
    }
}
