//! Diesel models representing portal user profiles.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{
    BranchId, EmailAddress, HubId, PhoneNumber, TypeConstraintError, UserId, UserName,
};
use crate::domain::user::{
    NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`].
pub struct User {
    pub id: i32,
    pub hub_id: i32,
    pub email: String,
    pub name: String,
    pub user_type: String,
    pub branch_id: Option<i32>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
/// Insertable form of [`User`].
pub struct NewUser<'a> {
    pub hub_id: i32,
    pub email: &'a str,
    pub name: &'a str,
    pub user_type: &'static str,
    pub branch_id: Option<i32>,
    pub phone: Option<&'a str>,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`User`] record.
pub struct UpdateUser<'a> {
    pub name: &'a str,
    pub user_type: &'static str,
    pub branch_id: Option<i32>,
    pub phone: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(user.id)?,
            hub_id: HubId::new(user.hub_id)?,
            email: EmailAddress::new(user.email)?,
            name: UserName::new(user.name)?,
            user_type: user.user_type.parse()?,
            branch_id: user.branch_id.map(BranchId::new).transpose()?,
            phone: user.phone.map(PhoneNumber::new).transpose()?,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            hub_id: user.hub_id.get(),
            email: user.email.as_str(),
            name: user.name.as_str(),
            user_type: user.user_type.as_str(),
            branch_id: user.branch_id.map(BranchId::get),
            phone: user.phone.as_ref().map(PhoneNumber::as_str),
            is_active: user.is_active,
        }
    }
}

impl<'a> UpdateUser<'a> {
    pub fn new(user: &'a DomainUpdateUser, updated_at: NaiveDateTime) -> Self {
        Self {
            name: user.name.as_str(),
            user_type: user.user_type.as_str(),
            branch_id: user.branch_id.map(BranchId::get),
            phone: user.phone.as_ref().map(PhoneNumber::as_str),
            is_active: user.is_active,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserType;
    use chrono::Utc;

    #[test]
    fn user_into_domain_parses_type() {
        let now = Utc::now().naive_utc();
        let db = User {
            id: 1,
            hub_id: 2,
            email: "bob@example.com".into(),
            name: "Bob".into(),
            user_type: "franchisee".into(),
            branch_id: Some(3),
            phone: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let domain = DomainUser::try_from(db).expect("valid user");
        assert_eq!(domain.user_type, UserType::Franchisee);
        assert_eq!(domain.branch_id.map(BranchId::get), Some(3));
    }

    #[test]
    fn unknown_user_type_is_rejected() {
        let now = Utc::now().naive_utc();
        let db = User {
            id: 1,
            hub_id: 2,
            email: "bob@example.com".into(),
            name: "Bob".into(),
            user_type: "superuser".into(),
            branch_id: None,
            phone: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        assert!(DomainUser::try_from(db).is_err());
    }
}
