//! Service layer: role checks and orchestration between forms, repositories
//! and the change feed. Services are generic over repository traits so they
//! can be exercised with `MockRepository`.

use crate::auth::check_role;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{HubId, non_blank};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

pub mod alerts;
pub mod api;
pub mod branches;
pub mod calendar;
pub mod companies;
pub mod documents;
pub mod errors;
pub mod main;
pub mod news;
pub mod products;
pub mod users;

pub use errors::{ServiceError, ServiceResult};

pub fn is_admin(user: &AuthenticatedUser) -> bool {
    check_role(SERVICE_ADMIN_ROLE, &user.roles)
}

/// Resolves the tenant of a user allowed to read the portal. Admins are readers too.
pub fn authorize_reader(user: &AuthenticatedUser) -> ServiceResult<HubId> {
    if is_admin(user) || check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        Ok(HubId::new(user.hub_id)?)
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Resolves the tenant of a user allowed to modify data.
pub fn authorize_admin(user: &AuthenticatedUser) -> ServiceResult<HubId> {
    if is_admin(user) {
        Ok(HubId::new(user.hub_id)?)
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Page number from a query string, defaulting to the first page.
pub(crate) fn page_or_first(page: Option<usize>) -> usize {
    page.unwrap_or(1).max(1)
}

/// Trimmed filter value, `None` when blank.
pub(crate) fn filter_value(value: Option<String>) -> Option<String> {
    non_blank(value)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::auth::AuthenticatedUser;
    use crate::domain::types::HubId;
    use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

    pub const HUB: i32 = 42;

    pub fn hub() -> HubId {
        HubId::new(HUB).expect("valid hub id")
    }

    fn user(sub: &str, email: &str, roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: sub.to_string(),
            email: email.to_string(),
            hub_id: HUB,
            name: sub.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: 0,
        }
    }

    pub fn admin_user() -> AuthenticatedUser {
        user("admin", "admin@example.com", &[SERVICE_ADMIN_ROLE])
    }

    pub fn reader_user() -> AuthenticatedUser {
        user("reader", "reader@example.com", &[SERVICE_ACCESS_ROLE])
    }

    pub fn outsider_user() -> AuthenticatedUser {
        user("outsider", "outsider@example.com", &["accounting"])
    }

    pub fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .expect("valid date")
            .and_hms_opt(hour, 0, 0)
            .expect("valid time")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn admin_is_also_a_reader() {
        assert_eq!(authorize_reader(&admin_user()).unwrap(), hub());
        assert_eq!(authorize_reader(&reader_user()).unwrap(), hub());
        assert!(matches!(
            authorize_reader(&outsider_user()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn only_admins_may_write() {
        assert!(authorize_admin(&admin_user()).is_ok());
        assert!(matches!(
            authorize_admin(&reader_user()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn invalid_hub_is_a_type_error() {
        let mut user = admin_user();
        user.hub_id = 0;
        assert!(matches!(
            authorize_admin(&user),
            Err(ServiceError::TypeConstraint(_))
        ));
    }
}
