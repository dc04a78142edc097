//! Draft ticket model and its request bodies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{max_length, require};
use crate::errors::AppError;

/// Zendesk ticket type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    #[default]
    Question,
    Incident,
    Problem,
    Task,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Question => "question",
            TicketType::Incident => "incident",
            TicketType::Problem => "problem",
            TicketType::Task => "task",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "question" => Some(TicketType::Question),
            "incident" => Some(TicketType::Incident),
            "problem" => Some(TicketType::Problem),
            "task" => Some(TicketType::Task),
            _ => None,
        }
    }
}

/// Zendesk ticket priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Normal => "normal",
            TicketPriority::High => "high",
            TicketPriority::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TicketPriority::Low),
            "normal" => Some(TicketPriority::Normal),
            "high" => Some(TicketPriority::High),
            "urgent" => Some(TicketPriority::Urgent),
            _ => None,
        }
    }
}

pub const SUBJECT_MAX: usize = 300;
pub const COMMENT_MAX: usize = 500;
pub const REQUESTER_MAX: usize = 100;
pub const TAGS_MAX: usize = 300;
pub const PRIVATE_COMMENT_MAX: usize = 500;
pub const EXTERNAL_ID_MAX: usize = 50;

/// A local draft of a support request destined for Zendesk.
///
/// `zendesk_ticket_id` is `None` until the ticket has been created remotely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub subject: String,
    pub comment: String,
    pub requester: String,
    pub requester_id: Option<String>,
    pub assignee_id: Option<String>,
    pub created_by_id: Option<String>,
    pub group_id: Option<String>,
    pub ticket_type: TicketType,
    pub due_at: Option<DateTime<Utc>>,
    pub priority: TicketPriority,
    pub tags: String,
    pub private_comment: String,
    pub zendesk_ticket_id: Option<String>,
    pub is_active: bool,
    pub board_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Ticket {
    pub fn tag_list(&self) -> Vec<String> {
        split_tags(&self.tags)
    }
}

/// Split a comma-joined tag string into trimmed, non-empty tags.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Treat empty or blank ids as absent.
pub fn normalize_id(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a due date given either as RFC 3339 or as a plain `YYYY-MM-DD` date
/// (midnight UTC). Blank input means no due date.
pub fn parse_due_at(value: &str) -> Result<Option<DateTime<Utc>>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Some(dt.and_utc()))
        .ok_or_else(|| AppError::Validation(format!("Invalid due date: {}", value)))
}

/// Request body for creating a ticket on a board.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub subject: String,
    pub comment: String,
    pub requester: String,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub created_by_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub ticket_type: TicketType,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub priority: TicketPriority,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub private_comment: String,
    #[serde(default)]
    pub zendesk_ticket_id: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Validated, normalised field values for a new ticket.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub subject: String,
    pub comment: String,
    pub requester: String,
    pub assignee_id: Option<String>,
    pub created_by_id: Option<String>,
    pub group_id: Option<String>,
    pub ticket_type: TicketType,
    pub due_at: Option<DateTime<Utc>>,
    pub priority: TicketPriority,
    pub tags: String,
    pub private_comment: String,
    pub zendesk_ticket_id: Option<String>,
    pub is_active: bool,
    pub board_id: Option<String>,
}

impl CreateTicketRequest {
    /// Validate field constraints and normalise optional ids.
    pub fn into_new_ticket(self, board_id: Option<String>) -> Result<NewTicket, AppError> {
        require("Subject", &self.subject)?;
        max_length("Subject", &self.subject, SUBJECT_MAX)?;
        require("Comment", &self.comment)?;
        max_length("Comment", &self.comment, COMMENT_MAX)?;
        require("Requester", &self.requester)?;
        max_length("Requester", &self.requester, REQUESTER_MAX)?;
        max_length("Tags", &self.tags, TAGS_MAX)?;
        max_length("Private comment", &self.private_comment, PRIVATE_COMMENT_MAX)?;

        let zendesk_ticket_id = normalize_id(self.zendesk_ticket_id.as_deref());
        if let Some(id) = &zendesk_ticket_id {
            max_length("Zendesk ticket ID", id, EXTERNAL_ID_MAX)?;
        }
        let due_at = match self.due_at.as_deref() {
            Some(value) => parse_due_at(value)?,
            None => None,
        };

        Ok(NewTicket {
            subject: self.subject,
            comment: self.comment,
            requester: self.requester.trim().to_string(),
            assignee_id: normalize_id(self.assignee_id.as_deref()),
            created_by_id: normalize_id(self.created_by_id.as_deref()),
            group_id: normalize_id(self.group_id.as_deref()),
            ticket_type: self.ticket_type,
            due_at,
            priority: self.priority,
            tags: self.tags,
            private_comment: self.private_comment,
            zendesk_ticket_id,
            is_active: self.is_active,
            board_id,
        })
    }
}

/// Request body for updating a ticket.
///
/// Absent fields keep their value. For nullable fields an empty string
/// clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub requester: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub created_by_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub ticket_type: Option<TicketType>,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub private_comment: Option<String>,
    #[serde(default)]
    pub zendesk_ticket_id: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub board_id: Option<String>,
}

impl UpdateTicketRequest {
    /// Merge the request onto an existing ticket, validating every changed field.
    pub fn apply_to(&self, existing: &Ticket) -> Result<NewTicket, AppError> {
        if let Some(subject) = &self.subject {
            require("Subject", subject)?;
            max_length("Subject", subject, SUBJECT_MAX)?;
        }
        if let Some(comment) = &self.comment {
            require("Comment", comment)?;
            max_length("Comment", comment, COMMENT_MAX)?;
        }
        if let Some(requester) = &self.requester {
            require("Requester", requester)?;
            max_length("Requester", requester, REQUESTER_MAX)?;
        }
        if let Some(tags) = &self.tags {
            max_length("Tags", tags, TAGS_MAX)?;
        }
        if let Some(private_comment) = &self.private_comment {
            max_length("Private comment", private_comment, PRIVATE_COMMENT_MAX)?;
        }
        if let Some(id) = normalize_id(self.zendesk_ticket_id.as_deref()) {
            max_length("Zendesk ticket ID", &id, EXTERNAL_ID_MAX)?;
        }

        let due_at = match self.due_at.as_deref() {
            Some(value) => parse_due_at(value)?,
            None => existing.due_at,
        };

        Ok(NewTicket {
            subject: self.subject.clone().unwrap_or_else(|| existing.subject.clone()),
            comment: self.comment.clone().unwrap_or_else(|| existing.comment.clone()),
            requester: self
                .requester
                .as_deref()
                .map(|r| r.trim().to_string())
                .unwrap_or_else(|| existing.requester.clone()),
            assignee_id: clearable(&self.assignee_id, &existing.assignee_id),
            created_by_id: clearable(&self.created_by_id, &existing.created_by_id),
            group_id: clearable(&self.group_id, &existing.group_id),
            ticket_type: self.ticket_type.unwrap_or(existing.ticket_type),
            due_at,
            priority: self.priority.unwrap_or(existing.priority),
            tags: self.tags.clone().unwrap_or_else(|| existing.tags.clone()),
            private_comment: self
                .private_comment
                .clone()
                .unwrap_or_else(|| existing.private_comment.clone()),
            zendesk_ticket_id: clearable(&self.zendesk_ticket_id, &existing.zendesk_ticket_id),
            is_active: self.is_active.unwrap_or(existing.is_active),
            board_id: normalize_id(self.board_id.as_deref()).or_else(|| existing.board_id.clone()),
        })
    }
}

fn clearable(update: &Option<String>, existing: &Option<String>) -> Option<String> {
    match update {
        Some(value) => normalize_id(Some(value)),
        None => existing.clone(),
    }
}

/// Request body for editing several tickets at once.
///
/// Only non-empty fields are applied.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEditRequest {
    pub ids: Vec<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub requester: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
}

/// Field changes extracted from a [`BulkEditRequest`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkEdit {
    pub tags: Option<String>,
    pub requester: Option<String>,
    pub subject: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub assignee_id: Option<String>,
}

impl BulkEdit {
    pub fn is_empty(&self) -> bool {
        *self == BulkEdit::default()
    }
}

impl BulkEditRequest {
    pub fn changes(&self) -> Result<BulkEdit, AppError> {
        let non_empty = |v: &Option<String>| normalize_id(v.as_deref());

        let tags = non_empty(&self.tags);
        if let Some(tags) = &tags {
            max_length("Tags", tags, TAGS_MAX)?;
        }
        let requester = non_empty(&self.requester);
        if let Some(requester) = &requester {
            max_length("Requester", requester, REQUESTER_MAX)?;
        }
        let subject = non_empty(&self.subject);
        if let Some(subject) = &subject {
            max_length("Subject", subject, SUBJECT_MAX)?;
        }
        let due_at = match non_empty(&self.due_at) {
            Some(value) => parse_due_at(&value)?,
            None => None,
        };

        Ok(BulkEdit {
            tags,
            requester,
            subject,
            due_at,
            assignee_id: non_empty(&self.assignee_id),
        })
    }
}

/// An unsynced ticket joined with the Zendesk ids of its referenced agents
/// and group.
#[derive(Debug, Clone)]
pub struct SyncCandidate {
    pub ticket: Ticket,
    pub assignee_zendesk_id: Option<String>,
    pub created_by_zendesk_id: Option<String>,
    pub group_zendesk_id: Option<String>,
}
