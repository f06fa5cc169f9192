use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::claims::Token;
use crate::validation::{FieldRules, Rule, Validate};

const PASSWORD_RULES: &[Rule] = &[
    Rule::Required,
    Rule::MinLen(6),
    Rule::MaxLen(256),
    Rule::ContainsAny("!@#?"),
];

/// Request body for registration.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUp {
    pub username: String,
    pub password: String,
    pub repeat_password: String,
    pub timezone: String,
}

impl Validate for SignUp {
    fn rules(&self) -> &'static [FieldRules] {
        const RULES: &[FieldRules] = &[
            FieldRules {
                field: "username",
                rules: &[
                    Rule::Required,
                    Rule::MinLen(3),
                    Rule::MaxLen(40),
                    Rule::Alphanumeric,
                    Rule::NotEqualField("password"),
                ],
            },
            FieldRules {
                field: "password",
                rules: PASSWORD_RULES,
            },
            FieldRules {
                field: "repeat_password",
                rules: &[Rule::Required, Rule::EqualField("password")],
            },
            FieldRules {
                field: "timezone",
                rules: &[Rule::Required, Rule::Timezone],
            },
        ];
        RULES
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "username" => Some(&self.username),
            "password" => Some(&self.password),
            "repeat_password" => Some(&self.repeat_password),
            "timezone" => Some(&self.timezone),
            _ => None,
        }
    }
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize)]
pub struct SignIn {
    pub username: String,
    pub password: String,
}

impl Validate for SignIn {
    fn rules(&self) -> &'static [FieldRules] {
        const RULES: &[FieldRules] = &[
            FieldRules {
                field: "username",
                rules: &[
                    Rule::Required,
                    Rule::MinLen(3),
                    Rule::MaxLen(40),
                    Rule::Alphanumeric,
                ],
            },
            FieldRules {
                field: "password",
                rules: PASSWORD_RULES,
            },
        ];
        RULES
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "username" => Some(&self.username),
            "password" => Some(&self.password),
            _ => None,
        }
    }
}

/// Response returned after sign-in, sign-up or a timezone change.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Token> for TokenResponse {
    fn from(token: Token) -> Self {
        Self {
            token: token.value,
            expires_at: token.expires_at,
        }
    }
}
