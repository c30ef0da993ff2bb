//! Microsoft Teams incoming webhook client.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::DeliveryError;
use crate::models::MessageCard;

/// Posts MessageCards to one webhook. A single attempt per call; no retry.
pub struct TeamsWebhook<'a> {
    http_client: &'a reqwest::Client,
    url: SecretString,
}

impl<'a> TeamsWebhook<'a> {
    pub fn new(http_client: &'a reqwest::Client, url: SecretString) -> Self {
        Self { http_client, url }
    }

    pub async fn send(&self, card: &MessageCard) -> Result<(), DeliveryError> {
        let response = self
            .http_client
            .post(self.url.expose_secret())
            .json(card)
            .send()
            .await
            // The webhook URL is the credential; keep it out of error text
            .map_err(|e| DeliveryError::Transport(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DeliveryError::Rejected { status, body });
        }

        debug!("Teams webhook answered {}", status);
        Ok(())
    }
}
