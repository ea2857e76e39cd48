//! Session identity extraction.
//!
//! The auth service stores a signed JWT as the `actix-identity` id. Every
//! handler that takes an [`AuthenticatedUser`] argument decodes it here.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::domain::auth::AuthenticatedUser;
use crate::models::config::CommonServerConfig;

/// Signs the claims with the shared secret (HS256).
pub fn encode_token(
    user: &AuthenticatedUser,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        user,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verifies the signature and expiry of a session token.
pub fn decode_token(
    token: &str,
    secret: &str,
) -> Result<AuthenticatedUser, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<AuthenticatedUser>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req.get_identity().and_then(|identity| identity.id()) {
            Ok(token) => token,
            Err(_) => return ready(Err(actix_web::error::ErrorUnauthorized("Unauthorized"))),
        };

        let Some(config) = req.app_data::<web::Data<CommonServerConfig>>() else {
            log::error!("CommonServerConfig is not registered");
            return ready(Err(actix_web::error::ErrorInternalServerError(
                "Server misconfigured",
            )));
        };

        match decode_token(&token, &config.secret) {
            Ok(user) => ready(Ok(user)),
            Err(err) => {
                log::warn!("Rejected session token: {err}");
                ready(Err(actix_web::error::ErrorUnauthorized("Unauthorized")))
            }
        }
    }
}

pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp: usize) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".into(),
            email: "jane@example.com".into(),
            hub_id: 4,
            name: "Jane".into(),
            roles: vec!["intranet".into()],
            exp,
        }
    }

    fn far_future() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn token_round_trip_keeps_claims() {
        let user = claims(far_future());
        let token = encode_token(&user, "secret").unwrap();
        assert_eq!(decode_token(&token, "secret").unwrap(), user);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = encode_token(&claims(far_future()), "secret").unwrap();
        assert!(decode_token(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = encode_token(&claims(1), "secret").unwrap();
        assert!(decode_token(&token, "secret").is_err());
    }

    #[test]
    fn check_role_requires_exact_match() {
        let user = claims(0);
        assert!(check_role("intranet", &user.roles));
        assert!(!check_role("intranet_admin", &user.roles));
    }
}
