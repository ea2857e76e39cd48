use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{BranchId, EmailAddress, HubId, PhoneNumber, UserName, non_blank};
use crate::domain::user::{NewUser, UpdateUser, UserType};
use crate::forms::{FormError, checkbox};

fn parse_branch(value: Option<i32>) -> Result<Option<BranchId>, FormError> {
    match value {
        None | Some(0) => Ok(None),
        Some(id) => BranchId::new(id)
            .map(Some)
            .map_err(|_| FormError::InvalidId("branch")),
    }
}

fn parse_phone(value: Option<String>) -> Result<Option<PhoneNumber>, FormError> {
    non_blank(value)
        .map(PhoneNumber::new)
        .transpose()
        .map_err(|_| FormError::InvalidPhoneNumber)
}

#[derive(Debug, Deserialize, Validate)]
/// Admin form creating a user profile ahead of the first sign-in.
pub struct AddUserForm {
    /// Checked by `EmailAddress`, which trims before validating.
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub user_type: String,
    #[serde(default)]
    pub branch_id: Option<i32>,
    #[serde(default)]
    pub phone: Option<String>,
}

pub struct AddUserPayload {
    pub email: EmailAddress,
    pub name: UserName,
    pub user_type: UserType,
    pub branch_id: Option<BranchId>,
    pub phone: Option<PhoneNumber>,
}

impl AddUserPayload {
    pub fn into_new_user(self, hub_id: HubId) -> NewUser {
        NewUser {
            hub_id,
            email: self.email,
            name: self.name,
            user_type: self.user_type,
            branch_id: self.branch_id,
            phone: self.phone,
            is_active: true,
        }
    }
}

impl TryFrom<AddUserForm> for AddUserPayload {
    type Error = FormError;

    fn try_from(form: AddUserForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            email: EmailAddress::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            name: UserName::new(form.name).map_err(|_| FormError::Required("name"))?,
            user_type: form
                .user_type
                .parse()
                .map_err(|_| FormError::InvalidUserType)?,
            branch_id: parse_branch(form.branch_id)?,
            phone: parse_phone(form.phone)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Profile edit form. The email is the identity key and cannot be changed.
pub struct EditUserForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub user_type: String,
    #[serde(default)]
    pub branch_id: Option<i32>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl TryFrom<EditUserForm> for UpdateUser {
    type Error = FormError;

    fn try_from(form: EditUserForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(UpdateUser {
            name: UserName::new(form.name).map_err(|_| FormError::Required("name"))?,
            user_type: form
                .user_type
                .parse()
                .map_err(|_| FormError::InvalidUserType)?,
            branch_id: parse_branch(form.branch_id)?,
            phone: parse_phone(form.phone)?,
            is_active: checkbox(&form.is_active),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_user_normalises_email() {
        let payload = AddUserPayload::try_from(AddUserForm {
            email: " Agent@Example.COM".into(),
            name: "Agent Smith".into(),
            user_type: "agent".into(),
            branch_id: Some(2),
            phone: Some("".into()),
        })
        .unwrap();

        assert_eq!(payload.email.as_str(), "agent@example.com");
        assert_eq!(payload.user_type, UserType::Agent);
        assert_eq!(payload.branch_id.map(BranchId::get), Some(2));
        assert_eq!(payload.phone, None);
    }

    #[test]
    fn add_user_rejects_malformed_email() {
        let result = AddUserPayload::try_from(AddUserForm {
            email: " not-an-email ".into(),
            name: "Agent Smith".into(),
            user_type: "agent".into(),
            branch_id: None,
            phone: None,
        });

        assert!(matches!(result, Err(FormError::InvalidEmail)));
    }

    #[test]
    fn edit_user_rejects_unknown_type() {
        let result = UpdateUser::try_from(EditUserForm {
            name: "Bob".into(),
            user_type: "owner".into(),
            branch_id: None,
            phone: None,
            is_active: Some("on".into()),
        });
        assert!(matches!(result, Err(FormError::InvalidUserType)));
    }

    #[test]
    fn edit_user_without_checkbox_deactivates() {
        let update = UpdateUser::try_from(EditUserForm {
            name: "Bob".into(),
            user_type: "employee".into(),
            branch_id: Some(0),
            phone: None,
            is_active: None,
        })
        .unwrap();
        assert!(!update.is_active);
        assert_eq!(update.branch_id, None);
    }
}
