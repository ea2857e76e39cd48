//! Identity claims issued by the external auth service.

use serde::{Deserialize, Serialize};

/// Claims carried by the session JWT.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AuthenticatedUser {
    /// Subject, the auth service user identifier.
    pub sub: String,
    pub email: String,
    pub hub_id: i32,
    pub name: String,
    pub roles: Vec<String>,
    /// Expiration as a unix timestamp.
    pub exp: usize,
}
