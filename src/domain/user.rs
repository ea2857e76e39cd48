//! Portal user profiles.
//!
//! Identity is owned by the external auth service. This module keeps the
//! intranet-specific profile (user type, home branch, phone) keyed by email.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{
    BranchId, EmailAddress, HubId, PhoneNumber, TypeConstraintError, UserId, UserName,
};

/// Audience segment used for news targeting.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Admin,
    Franchisee,
    Manager,
    Agent,
    #[default]
    Employee,
}

impl UserType {
    pub const ALL: [UserType; 5] = [
        UserType::Admin,
        UserType::Franchisee,
        UserType::Manager,
        UserType::Agent,
        UserType::Employee,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Franchisee => "franchisee",
            UserType::Manager => "manager",
            UserType::Agent => "agent",
            UserType::Employee => "employee",
        }
    }
}

impl Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(UserType::Admin),
            "franchisee" => Ok(UserType::Franchisee),
            "manager" => Ok(UserType::Manager),
            "agent" => Ok(UserType::Agent),
            "employee" => Ok(UserType::Employee),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown user type `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub hub_id: HubId,
    pub email: EmailAddress,
    pub name: UserName,
    pub user_type: UserType,
    pub branch_id: Option<BranchId>,
    pub phone: Option<PhoneNumber>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub hub_id: HubId,
    pub email: EmailAddress,
    pub name: UserName,
    pub user_type: UserType,
    pub branch_id: Option<BranchId>,
    pub phone: Option<PhoneNumber>,
    pub is_active: bool,
}

impl TryFrom<&AuthenticatedUser> for NewUser {
    type Error = TypeConstraintError;

    /// Profile seeded from the session identity. New profiles start as employees.
    fn try_from(user: &AuthenticatedUser) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(&user.email)?;
        let name = UserName::new(&user.name).or_else(|_| UserName::new(email.as_str()))?;
        Ok(Self {
            hub_id: HubId::new(user.hub_id)?,
            email,
            name,
            user_type: UserType::default(),
            branch_id: None,
            phone: None,
            is_active: true,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateUser {
    pub name: UserName,
    pub user_type: UserType,
    pub branch_id: Option<BranchId>,
    pub phone: Option<PhoneNumber>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_round_trips_through_text() {
        for user_type in UserType::ALL {
            assert_eq!(user_type.as_str().parse::<UserType>(), Ok(user_type));
        }
        assert!("owner".parse::<UserType>().is_err());
    }

    #[test]
    fn new_user_from_identity_falls_back_to_email_for_name() {
        let identity = AuthenticatedUser {
            sub: "9".into(),
            email: "Agent@Example.com".into(),
            hub_id: 3,
            name: "  ".into(),
            roles: vec![],
            exp: 0,
        };

        let user = NewUser::try_from(&identity).expect("valid identity");

        assert_eq!(user.email.as_str(), "agent@example.com");
        assert_eq!(user.name.as_str(), "agent@example.com");
        assert_eq!(user.user_type, UserType::Employee);
        assert!(user.is_active);
    }
}
