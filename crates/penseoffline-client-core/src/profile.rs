use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_LEVEL: u64 = 1;

/// Cached user profile. Every field the server sent is kept, so the
/// snapshot can be written back to storage without loss.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Accepts only JSON objects; anything else is not a profile.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.str_field("username")
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    #[must_use]
    pub fn level(&self) -> Option<u64> {
        self.0.get("nivel").and_then(Value::as_u64)
    }

    #[must_use]
    pub fn points(&self) -> Option<u64> {
        self.0.get("pontos").and_then(Value::as_u64)
    }

    #[must_use]
    pub fn xp_total(&self) -> Option<u64> {
        self.0.get("xp_total").and_then(Value::as_u64)
    }

    /// `name`, falling back to `username` when the name is missing or blank.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name().or_else(|| self.username())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<Profile>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accessors_read_backend_field_names() {
        let profile = Profile::from_value(json!({
            "id": 7,
            "username": "ana",
            "name": "Ana Souza",
            "email": "ana@example.com",
            "nivel": 3,
            "pontos": 120,
            "xp_total": 450,
            "dias_consecutivos": 4
        }))
        .expect("object profile");

        assert_eq!(profile.id(), Some(7));
        assert_eq!(profile.username(), Some("ana"));
        assert_eq!(profile.display_name(), Some("Ana Souza"));
        assert_eq!(profile.level(), Some(3));
        assert_eq!(profile.points(), Some(120));
        assert_eq!(profile.xp_total(), Some(450));
        assert_eq!(profile.get("dias_consecutivos"), Some(&json!(4)));
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let profile = Profile::from_value(json!({ "username": "x", "name": "" })).expect("object");
        assert_eq!(profile.display_name(), Some("x"));
    }

    #[test]
    fn unknown_fields_survive_serialization() {
        let raw = json!({ "username": "x", "tempo_sem_tela_minutos": 90 });
        let profile = Profile::from_value(raw.clone()).expect("object");
        let encoded = serde_json::to_value(&profile).expect("encode");
        assert_eq!(encoded, raw);
    }

    #[test]
    fn non_objects_are_not_profiles() {
        assert!(Profile::from_value(Value::Null).is_none());
        assert!(Profile::from_value(json!(["x"])).is_none());
    }
}
