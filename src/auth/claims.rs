use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT payload carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String, // identity
    pub timezone: String, // IANA zone used to render reads
    pub iss: String,      // issuer, always the username
    pub iat: i64,         // issued at (unix timestamp)
    pub exp: i64,         // expires at (unix timestamp)
}

/// Signed token handed back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}
