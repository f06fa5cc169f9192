use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use chrono::Utc;
use tracing::warn;

use super::claims::{Claims, Token};
use super::jwt::SharedTokenizer;
use crate::error::ApiError;

pub const TOKEN_COOKIE: &str = "token";

/// Verified session claims of the caller.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    SharedTokenizer: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(ApiError::MissingToken)?;

        let tokens = SharedTokenizer::from_ref(state);
        let claims = tokens.extract_claims(token).map_err(|_| {
            warn!(path = %parts.uri.path(), "rejected session token");
            ApiError::InvalidToken
        })?;

        Ok(AuthUser(claims))
    }
}

/// The `token` cookie, or a bearer token when no cookie is sent.
fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == TOKEN_COOKIE && !value.is_empty()).then_some(value)
        });
    if from_cookie.is_some() {
        return from_cookie;
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").or_else(|| auth.strip_prefix("bearer ")))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// `Set-Cookie` value carrying `token` for the rest of its lifetime.
pub fn session_cookie(token: &Token) -> String {
    let max_age = (token.expires_at - Utc::now()).num_seconds().max(0);
    format!(
        "{TOKEN_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}",
        token.value
    )
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Duration;

    use super::*;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn reads_token_cookie_among_others() {
        let h = headers(&[(header::COOKIE, "theme=dark; token=abc.def.ghi; lang=en")]);
        assert_eq!(token_from_headers(&h), Some("abc.def.ghi"));
    }

    #[test]
    fn cookie_wins_over_bearer() {
        let h = headers(&[
            (header::COOKIE, "token=from-cookie"),
            (header::AUTHORIZATION, "Bearer from-header"),
        ]);
        assert_eq!(token_from_headers(&h), Some("from-cookie"));
    }

    #[test]
    fn falls_back_to_bearer() {
        let h = headers(&[
            (header::COOKIE, "tokenish=nope"),
            (header::AUTHORIZATION, "Bearer xyz"),
        ]);
        assert_eq!(token_from_headers(&h), Some("xyz"));
    }

    #[test]
    fn nothing_usable_is_none() {
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
        let h = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert_eq!(token_from_headers(&h), None);
    }

    #[test]
    fn cookie_max_age_tracks_expiry() {
        let token = Token {
            value: "v".into(),
            expires_at: Utc::now() + Duration::hours(1),
        };
        let cookie = session_cookie(&token);
        assert!(cookie.starts_with("token=v; HttpOnly;"));
        let max_age: i64 = cookie
            .rsplit("Max-Age=")
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!((3590..=3600).contains(&max_age));
    }
}
