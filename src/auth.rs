use crate::error::ApiError;
use crate::schemas::UserId;
use actix_web::{dev::Payload, http::header::HeaderValue, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::num::ParseIntError;

type HmacSha256 = Hmac<Sha256>;

/// Server secret the user tokens are signed with.
pub struct AuthSecret(String);

impl AuthSecret {
    pub fn new(secret: String) -> Self {
        AuthSecret(secret)
    }
}

/// The user a request was made by. Handlers receive it as an argument;
/// nothing downstream looks at the request again to find out who is asking.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser(pub UserId);

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<AuthSecret>>() {
            Some(secret) => check_authorization(req, &secret.0).map(AuthenticatedUser),
            None => Err(ApiError::Internal(
                "no AuthSecret registered in app data".to_string(),
            )),
        };
        if let Err(err) = &result {
            tracing::debug!(%err, path = req.path(), "rejected request");
        }
        ready(result)
    }
}

/// Token format: `<user id>:<hex hmac-sha256 of the user id>`.
pub fn issue_token(user: &str, secret: &str) -> String {
    let mut hmac_hasher = keyed_hasher(secret);
    hmac_hasher.update(user.as_bytes());
    let signature = hmac_hasher
        .finalize()
        .into_bytes()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<String>();
    format!("{}:{}", user, signature)
}

pub fn check_authorization(request: &HttpRequest, secret: &str) -> Result<UserId, ApiError> {
    let authorization = request
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .map(HeaderValue::to_str)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .map_err(|_| unauthorized("Malformed Authorization header"))?;
    let (user, hash) = authorization
        .rsplit_once(':')
        .filter(|(user, _)| !user.is_empty())
        .ok_or_else(|| unauthorized("Malformed Authorization header"))?;
    let hash = hash
        .chars()
        .collect::<Vec<_>>()
        .chunks(2)
        .map(|n| u8::from_str_radix(&String::from_iter(n), 16))
        .collect::<Result<Vec<u8>, ParseIntError>>()
        .map_err(|_| unauthorized("Invalid token"))?;

    let mut hmac_hasher = keyed_hasher(secret);
    hmac_hasher.update(user.as_bytes());
    hmac_hasher
        .verify_slice(&hash)
        .map_err(|_| unauthorized("Invalid token"))?;
    Ok(user.to_string())
}

fn keyed_hasher(secret: &str) -> HmacSha256 {
    let mut sha256_hasher = Sha256::new();
    sha256_hasher.update(secret.as_bytes());
    let key = sha256_hasher.finalize();
    HmacSha256::new_from_slice(&key).expect("HMAC takes keys of any length")
}

fn unauthorized(message: &str) -> ApiError {
    ApiError::Unauthorized(message.to_string())
}
