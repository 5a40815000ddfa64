//! Contact API service: the two calls the contact page makes against the backend.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::api_client::{ApiClient, ApiError, Payload};
use crate::models::contact::{ContactForm, ContactMessage, StoredContactMessage};

pub const CONTACT_PATH: &str = "/api/contact";

/// The send operation a submission controller drives. `ContactService` is the
/// production implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, form: ContactForm) -> Result<Payload, ApiError>;
}

#[derive(Clone)]
pub struct ContactService {
    client: ApiClient,
}

impl ContactService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// GET /api/contact
    pub async fn get_messages(&self) -> Result<Vec<StoredContactMessage>, ApiError> {
        let messages: Vec<StoredContactMessage> =
            self.client.get(CONTACT_PATH).await?.into_typed()?;
        info!("Fetched {} contact submissions", messages.len());
        Ok(messages)
    }
}

#[async_trait]
impl MessageSender for ContactService {
    /// POST /api/contact, stamped with the current time.
    async fn send_message(&self, form: ContactForm) -> Result<Payload, ApiError> {
        let payload = ContactMessage::new(form, Utc::now());
        self.client.post(CONTACT_PATH, &payload).await
    }
}
