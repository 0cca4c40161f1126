use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCredentials {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Authenticated user as issued by the server.
///
/// `role` is opaque to the client beyond string comparison. Numeric ids are
/// read as their decimal text. Fields the client does not model are kept in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Payload of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_keeps_unknown_fields() {
        let raw = r#"{"id": "u1", "name": "Ada", "role": "admin", "email": "ada@example.com"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.role, "admin");
        assert_eq!(user.extra["email"], "ada@example.com");
    }

    #[test]
    fn test_numeric_user_id() {
        let raw = r#"{"user": {"id": 42, "name": "Ada", "role": "admin"}, "token": "tok"}"#;
        let payload: AuthPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.user.id, "42");
        assert!(payload.user.extra.is_empty());
        assert_eq!(payload.token, "tok");
    }

    #[test]
    fn test_user_id_rejects_other_shapes() {
        let raw = r#"{"id": {"value": 1}, "name": "Ada", "role": "admin"}"#;
        assert!(serde_json::from_str::<User>(raw).is_err());
    }
}
