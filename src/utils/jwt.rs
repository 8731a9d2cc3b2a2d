use crate::models::user::{User, UserRole};
use crate::services::user_service::UserService;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use rocket::State;
use rocket_okapi::request::OpenApiFromRequest;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user id
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub exp: usize,
}

/// Request guard: bearer token resolved to a live user row. Tokens of
/// deactivated accounts are rejected even before expiry.
#[derive(Debug, OpenApiFromRequest)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Request guard: authenticated user with the admin role.
#[derive(Debug, OpenApiFromRequest)]
pub struct AdminUser {
    pub user: User,
}

pub fn generate_token(user: &User) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = chrono::Utc::now()
        // Set expiration time to 24 hours
        .checked_add_signed(chrono::Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        role: user.role,
        exp: expiration,
    };

    let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = match request.headers().get_one("Authorization") {
            Some(token) if token.starts_with("Bearer ") => token[7..].to_string(),
            _ => return Outcome::Error((Status::Unauthorized, ())),
        };

        let claims = match decode_token(&token) {
            Ok(claims) => claims,
            Err(_) => return Outcome::Error((Status::Unauthorized, ())),
        };

        let user_service = match request.guard::<&State<UserService>>().await {
            Outcome::Success(service) => service,
            _ => return Outcome::Error((Status::InternalServerError, ())),
        };

        let user = match user_service.get_user_by_id(claims.sub).await {
            Ok(user) => user,
            Err(_) => return Outcome::Error((Status::Unauthorized, ())),
        };

        if !user.is_active {
            return Outcome::Error((Status::Forbidden, ()));
        }

        Outcome::Success(AuthenticatedUser { user })
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth = match request.guard::<AuthenticatedUser>().await {
            Outcome::Success(auth) => auth,
            Outcome::Error(e) => return Outcome::Error(e),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        if auth.user.role != UserRole::Admin {
            return Outcome::Error((Status::Forbidden, ()));
        }

        Outcome::Success(AdminUser { user: auth.user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 42,
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            full_name: None,
            hashed_password: "x".to_string(),
            role: UserRole::Admin,
            is_active: true,
        }
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        env::set_var("JWT_SECRET", "unit-test-secret");
        let token = generate_token(&sample_user()).unwrap();
        let claims = decode_token(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn garbage_token_is_rejected() {
        env::set_var("JWT_SECRET", "unit-test-secret");
        assert!(decode_token("not-a-token").is_err());
    }
}
