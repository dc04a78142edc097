//! Request and response bodies of the Zendesk tickets and users endpoints.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /tickets.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketPayload {
    pub ticket: NewZendeskTicket,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewZendeskTicket {
    pub subject: String,
    pub comment: TicketComment,
    pub requester_id: String,
    pub assignee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(rename = "type")]
    pub ticket_type: String,
    /// RFC 3339 timestamp, or empty when the ticket has no due date
    pub due_at: String,
    pub priority: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketComment {
    pub body: String,
    pub author_id: String,
}

/// Body of `PUT /tickets/{id}.json` that appends a comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentPayload {
    pub ticket: CommentUpdate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentUpdate {
    pub comment: NewComment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    pub author_id: String,
    pub body: String,
    pub public: bool,
}

impl CommentPayload {
    /// Internal note visible to agents only.
    pub fn private(author_id: &str, body: &str) -> Self {
        Self {
            ticket: CommentUpdate {
                comment: NewComment {
                    author_id: author_id.to_string(),
                    body: body.to_string(),
                    public: false,
                },
            },
        }
    }
}

/// A user returned by the directory search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZendeskUser {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
}

/// Response of `GET /users/search.json`.
#[derive(Debug, Deserialize)]
pub struct UserSearchResponse {
    #[serde(default)]
    pub users: Vec<ZendeskUser>,
}

/// The part of a created ticket the sync routine uses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedTicket {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
}

/// Response of `POST /tickets.json`.
#[derive(Debug, Deserialize)]
pub struct CreateTicketResponse {
    pub ticket: CreatedTicket,
}

/// Zendesk sends ids as JSON numbers; accept strings as well.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
