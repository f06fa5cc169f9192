use serde::{Deserialize, Serialize};

use crate::validation::{FieldRules, Rule, Validate};

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String, // unique, alphanumeric
    #[serde(skip_serializing)]
    pub password: String, // Argon2 hash once stored, never exposed in JSON
    pub timezone: String, // IANA zone name
}

impl Validate for User {
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
                rules: &[Rule::Required, Rule::MinLen(6)],
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
            "timezone" => Some(&self.timezone),
            _ => None,
        }
    }
}
