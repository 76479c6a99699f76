use action_framework::{CrudSchemas, FieldRule, Schema};
use serde::{Deserialize, Serialize};

/// Minimum password length accepted by `users.create` and `users.update`.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered user as stored in the `users` collection.
///
/// The password is kept exactly as submitted; nothing hashes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Payload for creating a new user.
#[derive(Debug, Clone, Serialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl UserCreate {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Payload for updating an existing user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl User {
    pub fn create_schema() -> Schema {
        Schema::new()
            .field("name", FieldRule::string().non_empty())
            .field("email", FieldRule::email())
            .field("password", FieldRule::string().min(MIN_PASSWORD_LEN))
    }

    pub fn update_schema() -> Schema {
        Schema::new()
            .field("name", FieldRule::string().non_empty().optional())
            .field("email", FieldRule::email().optional())
            .field("password", FieldRule::string().min(MIN_PASSWORD_LEN).optional())
    }

    pub fn schemas() -> CrudSchemas {
        CrudSchemas {
            create: Self::create_schema(),
            update: Self::update_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_framework::{validate, Params, Rule};
    use serde_json::json;

    fn params(value: serde_json::Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_create_schema_reports_every_violation() {
        let raw = params(json!({ "name": "", "email": "not-an-email", "password": "abc" }));
        let errors = validate(&User::create_schema(), &raw).unwrap_err();
        let rules: Vec<Rule> = errors.iter().map(|e| e.rule).collect();
        assert_eq!(rules, vec![Rule::Empty, Rule::Email, Rule::MinLength]);
    }

    #[test]
    fn test_update_schema_accepts_partial_payload() {
        let raw = params(json!({ "email": "new@example.com" }));
        let validated = validate(&User::update_schema(), &raw).unwrap();
        assert_eq!(validated.str("email"), Some("new@example.com"));
        assert!(!validated.contains("name"));
    }

    #[test]
    fn test_update_payload_omits_unset_fields() {
        let update = UserUpdate {
            name: Some("Bea".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(update).unwrap(), json!({ "name": "Bea" }));
    }
}
