use action_framework::{CrudSchemas, FieldRule, Schema};
use serde::{Deserialize, Serialize};

/// A postal address belonging to a user.
///
/// `user_id` is stored as given; no check is made that the user exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    pub user_id: String,
    pub street: String,
    pub city: String,
    pub zip: String,
}

/// Payload for creating a new address.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressCreate {
    pub user_id: String,
    pub street: String,
    pub city: String,
    pub zip: String,
}

/// Payload for updating an existing address. The owner cannot be changed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddressUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

impl Address {
    pub fn create_schema() -> Schema {
        Schema::new()
            .field("userId", FieldRule::string().non_empty())
            .field("street", FieldRule::string().non_empty())
            .field("city", FieldRule::string().non_empty())
            .field("zip", FieldRule::string().non_empty())
    }

    pub fn update_schema() -> Schema {
        Schema::new()
            .field("street", FieldRule::string().non_empty().optional())
            .field("city", FieldRule::string().non_empty().optional())
            .field("zip", FieldRule::string().non_empty().optional())
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
    use serde_json::json;

    #[test]
    fn test_wire_shape_uses_camel_case_owner() {
        let create = AddressCreate {
            user_id: "u1".into(),
            street: "1 Main St".into(),
            city: "Springfield".into(),
            zip: "12345".into(),
        };
        let value = serde_json::to_value(create).unwrap();
        assert_eq!(value["userId"], "u1");

        let address: Address = serde_json::from_value(json!({
            "id": "a1", "userId": "u1", "street": "s", "city": "c", "zip": "z"
        }))
        .unwrap();
        assert_eq!(address.user_id, "u1");
    }

    #[test]
    fn test_update_schema_has_no_owner_field() {
        assert!(Address::update_schema().get("userId").is_none());
        assert_eq!(Address::update_schema().len(), 3);
    }
}
