use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Raw contact form input. `website` is the honeypot field and is carried
/// through untouched; filtering on it happens above the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub website: String,
}

/// What goes over the wire to `POST /api/contact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub website: String,
    #[serde(rename = "createdAt", serialize_with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn new(form: ContactForm, created_at: DateTime<Utc>) -> Self {
        let ContactForm {
            name,
            email,
            subject,
            message,
            website,
        } = form;
        Self {
            name,
            email,
            subject,
            message,
            website,
            created_at,
        }
    }
}

/// Server-assigned identifier; backends hand out either numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactId {
    Number(i64),
    Text(String),
}

/// A submission as returned by `GET /api/contact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredContactMessage {
    pub id: ContactId,
    #[serde(flatten)]
    pub message: ContactMessage,
}

/// `2024-05-01T12:30:00.000Z`: UTC, millisecond precision, `Z` suffix.
fn iso_millis<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
