use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use courtside_shared::{Metadata, social::Role};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, routes::AppState};

/// Identity claims issued by the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Player id
    pub sub: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub gender: Option<String>,
    /// Expiration timestamp
    pub exp: u64,
}

impl From<Claims> for Metadata {
    fn from(claims: Claims) -> Self {
        Metadata::new(claims.sub, claims.role, claims.gender)
    }
}

pub fn generate_token(claims: &Claims, secret: &str) -> anyhow::Result<String> {
    Ok(encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn validate_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(data.claims)
}

/// Resolves the caller from a bearer token, falling back to the
/// `auth_token` cookie, and inserts their [`Metadata`] as an extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned);

    let Some(token) = bearer.or_else(|| jar.get("auth_token").map(|c| c.value().to_owned()))
    else {
        tracing::debug!("Missing credentials");
        return AppError::Unauthenticated.into_response();
    };

    let claims = match validate_token(&token, &state.config.jwt.secret) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(err = %err, "Invalid JWT token");
            return AppError::Unauthenticated.into_response();
        }
    };

    req.extensions_mut().insert(Metadata::from(claims));

    next.run(req).await
}
