//! HTTP client for the Zendesk REST API v2.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{
    CommentPayload, CreateTicketResponse, CreatedTicket, TicketPayload, UserSearchResponse,
    ZendeskApi, ZendeskError, ZendeskUser,
};
use crate::config::ZendeskConfig;

/// HTTP request timeout for a single Zendesk call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Token-authenticated client for one Zendesk account.
pub struct ZendeskClient {
    client: reqwest::Client,
    api_url: String,
    api_user: String,
    api_token: String,
}

impl ZendeskClient {
    /// Create a client from the account settings.
    pub fn new(config: &ZendeskConfig) -> Result<Self, ZendeskError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &ZendeskConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_user: config.api_user.clone(),
            api_token: config.api_token.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(format!("{}/token", self.api_user), Some(&self.api_token))
    }

    /// Ensure the response has a success status code.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ZendeskError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ZendeskError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ZendeskError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ZendeskError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ZendeskApi for ZendeskClient {
    async fn search_users(&self, query: &str) -> Result<Vec<ZendeskUser>, ZendeskError> {
        let response = self
            .authorize(self.client.get(self.endpoint("users/search.json")))
            .query(&[("query", query)])
            .send()
            .await?;

        let parsed: UserSearchResponse = Self::parse_response(response).await?;
        Ok(parsed.users)
    }

    async fn create_ticket(&self, payload: &TicketPayload) -> Result<CreatedTicket, ZendeskError> {
        let response = self
            .authorize(self.client.post(self.endpoint("tickets.json")))
            .json(payload)
            .send()
            .await?;

        let parsed: CreateTicketResponse = Self::parse_response(response).await?;
        Ok(parsed.ticket)
    }

    async fn create_comment(
        &self,
        ticket_id: &str,
        payload: &CommentPayload,
    ) -> Result<(), ZendeskError> {
        let response = self
            .authorize(
                self.client
                    .put(self.endpoint(&format!("tickets/{}.json", ticket_id))),
            )
            .json(payload)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}
