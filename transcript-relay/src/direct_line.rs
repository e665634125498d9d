use std::time::Duration;

use async_trait::async_trait;
use common::{error::AppError, utils::config::AppConfig};
use reqwest::Client;
use tracing::debug;

use crate::{
    envelope::ActivityEnvelope,
    error::TransportError,
    transport::{BotTransport, TransportResponse},
};

/// `BotTransport` over the Direct Line REST API.
#[derive(Clone)]
pub struct DirectLineClient {
    http: Client,
    base_url: String,
}

impl DirectLineClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            config.direct_line_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn conversations_url(&self) -> String {
        format!("{}/conversations", self.base_url)
    }

    pub fn activities_url(&self, conversation_id: &str) -> String {
        format!("{}/conversations/{}/activities", self.base_url, conversation_id)
    }

    async fn into_response(response: reqwest::Response) -> Result<TransportResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl BotTransport for DirectLineClient {
    async fn start_conversation(&self, secret: &str) -> Result<TransportResponse, TransportError> {
        let response = self
            .http
            .post(self.conversations_url())
            .bearer_auth(secret)
            .send()
            .await?;
        debug!(status = response.status().as_u16(), "Conversation start responded");
        Self::into_response(response).await
    }

    async fn post_activity(
        &self,
        conversation_id: &str,
        token: &str,
        envelope: &ActivityEnvelope,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .http
            .post(self.activities_url(conversation_id))
            .bearer_auth(token)
            .json(envelope)
            .send()
            .await?;
        Self::into_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_urls_from_configured_base() {
        let client = DirectLineClient::new("http://localhost:3978/v3/directline/", Duration::from_secs(1))
            .expect("client");
        assert_eq!(client.conversations_url(), "http://localhost:3978/v3/directline/conversations");
        assert_eq!(
            client.activities_url("conv-1"),
            "http://localhost:3978/v3/directline/conversations/conv-1/activities"
        );
    }

    #[test]
    fn default_config_targets_public_endpoint() {
        let client = DirectLineClient::from_config(&AppConfig::default()).expect("client");
        assert_eq!(
            client.conversations_url(),
            "https://directline.botframework.com/v3/directline/conversations"
        );
    }
}
