use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use sqlx::FromRow;

use crate::error::ApiError;

pub const CONTACT_ADDED: &str = "Contact added successfully";

/// The text form of SQLite's `CURRENT_TIMESTAMP`.
const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(serialize_with = "sqlite_timestamp")]
    pub created_at: NaiveDateTime,
}

fn sqlite_timestamp<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(SQLITE_TIMESTAMP))
}

/// A contact that passed validation and is ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateContactRequest {
    #[serde(default, deserialize_with = "text_field")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub phone: Option<String>,
}

/// Reads a field that must be text. `null`, `false` and `0` read as absent,
/// any other non-string value is rejected.
fn text_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(None),
        other => Err(de::Error::invalid_type(unexpected(&other), &"a string")),
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) => de::Unexpected::Float(f),
            None => de::Unexpected::Other("number"),
        },
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
        Value::Null | Value::String(_) => de::Unexpected::Other("value"),
    }
}

impl CreateContactRequest {
    /// Empty strings are treated the same as missing fields.
    pub fn validate(self) -> Result<NewContact, ApiError> {
        fn present(field: Option<String>) -> Option<String> {
            field.filter(|value| !value.is_empty())
        }

        match (present(self.name), present(self.email), present(self.phone)) {
            (Some(name), Some(email), Some(phone)) => Ok(NewContact { name, email, phone }),
            _ => Err(ApiError::MissingFields),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactList {
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Serialize)]
pub struct CreatedContact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl CreatedContact {
    pub fn new(id: i64, contact: NewContact) -> Self {
        Self {
            id,
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateContactResponse {
    pub message: &'static str,
    pub contact: CreatedContact,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: serde_json::Value) -> CreateContactRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn accepts_all_fields() {
        let contact = request(json!({"name": "Jane", "email": "jane@x.com", "phone": "555-1234"}))
            .validate()
            .unwrap();
        assert_eq!(
            contact,
            NewContact {
                name: "Jane".into(),
                email: "jane@x.com".into(),
                phone: "555-1234".into(),
            }
        );
    }

    #[test]
    fn rejects_missing_null_and_empty() {
        for body in [
            json!({"email": "a@b.com", "phone": "1"}),
            json!({"name": null, "email": "a@b.com", "phone": "1"}),
            json!({"name": "", "email": "a@b.com", "phone": "1"}),
            json!({"name": "A", "email": "", "phone": "1"}),
            json!({"name": "A", "email": "a@b.com"}),
            json!({}),
        ] {
            let err = request(body.clone()).validate().unwrap_err();
            assert!(matches!(err, ApiError::MissingFields), "{body}");
        }
    }

    #[test]
    fn falsy_non_strings_count_as_missing() {
        for body in [
            json!({"name": "A", "email": "a@b.com", "phone": 0}),
            json!({"name": false, "email": "a@b.com", "phone": "1"}),
            json!({"name": "A", "email": 0.0, "phone": "1"}),
        ] {
            let err = request(body.clone()).validate().unwrap_err();
            assert!(matches!(err, ApiError::MissingFields), "{body}");
        }
    }

    #[test]
    fn other_non_strings_are_rejected() {
        for body in [
            json!({"name": "A", "email": "a@b.com", "phone": 5551234}),
            json!({"name": true, "email": "a@b.com", "phone": "1"}),
            json!({"name": ["A"], "email": "a@b.com", "phone": "1"}),
        ] {
            assert!(
                serde_json::from_value::<CreateContactRequest>(body.clone()).is_err(),
                "{body}"
            );
        }
    }

    #[test]
    fn created_at_uses_sqlite_format() {
        let contact = Contact {
            id: 1,
            name: "Jane".into(),
            email: "jane@x.com".into(),
            phone: "555-1234".into(),
            created_at: chrono::NaiveDate::from_ymd_opt(2026, 10, 19)
                .unwrap()
                .and_hms_opt(12, 0, 5)
                .unwrap(),
        };
        assert_eq!(
            serde_json::to_value(contact).unwrap()["created_at"],
            "2026-10-19 12:00:05"
        );
    }

    #[test]
    fn whitespace_counts_as_present() {
        assert!(request(json!({"name": " ", "email": " ", "phone": " "}))
            .validate()
            .is_ok());
    }

    #[test]
    fn created_contact_omits_timestamp() {
        let response = CreateContactResponse {
            message: CONTACT_ADDED,
            contact: CreatedContact::new(
                7,
                NewContact {
                    name: "Jane".into(),
                    email: "jane@x.com".into(),
                    phone: "555-1234".into(),
                },
            ),
        };
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({
                "message": "Contact added successfully",
                "contact": {"id": 7, "name": "Jane", "email": "jane@x.com", "phone": "555-1234"}
            })
        );
    }
}
