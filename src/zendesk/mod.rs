//! Zendesk REST API integration.
//!
//! The [`ZendeskApi`] trait is the seam the sync routine talks to;
//! [`ZendeskClient`] is the HTTP implementation used in production.

mod client;
#[cfg(test)]
pub mod fake;
mod payload;

pub use client::*;
pub use payload::*;

use async_trait::async_trait;

/// Errors from the Zendesk API layer.
#[derive(Debug, thiserror::Error)]
pub enum ZendeskError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Zendesk returned a non-2xx status code.
    #[error("Zendesk API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected Zendesk response: {0}")]
    Decode(String),
}

/// Operations the sync routine needs from Zendesk.
#[async_trait]
pub trait ZendeskApi: Send + Sync {
    /// Search the user directory. An empty list means no match.
    async fn search_users(&self, query: &str) -> Result<Vec<ZendeskUser>, ZendeskError>;

    /// Create a ticket and return the created record.
    async fn create_ticket(&self, payload: &TicketPayload) -> Result<CreatedTicket, ZendeskError>;

    /// Append a comment to an existing ticket.
    async fn create_comment(
        &self,
        ticket_id: &str,
        payload: &CommentPayload,
    ) -> Result<(), ZendeskError>;
}
