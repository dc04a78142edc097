//! In-memory [`ZendeskApi`] that records every call.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    CommentPayload, CreatedTicket, TicketPayload, ZendeskApi, ZendeskError, ZendeskUser,
};

#[derive(Default)]
pub struct FakeZendesk {
    users: Mutex<HashMap<String, Vec<String>>>,
    next_ticket_id: Mutex<u64>,
    fail_create: Mutex<bool>,
    pub searches: Mutex<Vec<String>>,
    pub created: Mutex<Vec<TicketPayload>>,
    pub comments: Mutex<Vec<(String, CommentPayload)>>,
}

impl FakeZendesk {
    /// Remote ticket ids are handed out from `first_ticket_id` upwards.
    pub fn new(first_ticket_id: u64) -> Self {
        Self {
            next_ticket_id: Mutex::new(first_ticket_id),
            ..Default::default()
        }
    }

    pub fn with_user(self, query: &str, user_id: &str) -> Self {
        self.users
            .lock()
            .unwrap()
            .entry(query.to_string())
            .or_default()
            .push(user_id.to_string());
        self
    }

    pub fn failing_create(self) -> Self {
        *self.fail_create.lock().unwrap() = true;
        self
    }

    pub fn created(&self) -> Vec<TicketPayload> {
        self.created.lock().unwrap().clone()
    }

    pub fn comments(&self) -> Vec<(String, CommentPayload)> {
        self.comments.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ZendeskApi for FakeZendesk {
    async fn search_users(&self, query: &str) -> Result<Vec<ZendeskUser>, ZendeskError> {
        self.searches.lock().unwrap().push(query.to_string());
        let users = self.users.lock().unwrap();
        Ok(users
            .get(query)
            .map(|ids| ids.iter().map(|id| ZendeskUser { id: id.clone() }).collect())
            .unwrap_or_default())
    }

    async fn create_ticket(&self, payload: &TicketPayload) -> Result<CreatedTicket, ZendeskError> {
        if *self.fail_create.lock().unwrap() {
            return Err(ZendeskError::Api {
                status: 500,
                body: "Internal Server Error".to_string(),
            });
        }
        self.created.lock().unwrap().push(payload.clone());
        let mut next = self.next_ticket_id.lock().unwrap();
        let id = *next;
        *next += 1;
        Ok(CreatedTicket { id: id.to_string() })
    }

    async fn create_comment(
        &self,
        ticket_id: &str,
        payload: &CommentPayload,
    ) -> Result<(), ZendeskError> {
        self.comments
            .lock()
            .unwrap()
            .push((ticket_id.to_string(), payload.clone()));
        Ok(())
    }
}
