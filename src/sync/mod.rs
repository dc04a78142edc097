//! Board-to-Zendesk ticket synchronization.
//!
//! Walks the unsynced tickets of one board in insertion order and creates
//! each of them in Zendesk, followed by a private comment. Tickets without an
//! assignee, without a requester, or whose requester has no Zendesk account
//! are skipped and stay unsynced. The first failure of any other kind aborts
//! the batch; tickets synced before it keep their Zendesk ids.

use std::time::Duration;

use serde::Serialize;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::SyncCandidate;
use crate::zendesk::{CommentPayload, NewZendeskTicket, TicketComment, TicketPayload, ZendeskApi};

/// Knobs for one sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Pause between two submitted tickets; `None` disables it.
    pub delay: Option<Duration>,
}

/// Outcome of a completed sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub created: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    NoAssignee,
    NoRequester,
    RequesterNotFound,
}

/// Submit every active, unsynced ticket of `board_id` to Zendesk.
pub async fn sync_board(
    repo: &Repository,
    zendesk: &dyn ZendeskApi,
    board_id: &str,
    options: &SyncOptions,
) -> Result<SyncSummary, AppError> {
    let candidates = repo.list_sync_candidates(board_id).await?;
    let total = candidates.len();
    tracing::info!(board_id, pending = total, "Starting Zendesk sync");

    let mut summary = SyncSummary::default();

    for (index, candidate) in candidates.iter().enumerate() {
        let ticket = &candidate.ticket;

        let Some(assignee_zendesk_id) = candidate.assignee_zendesk_id.as_deref() else {
            log_skip(&ticket.id, SkipReason::NoAssignee);
            summary.skipped += 1;
            continue;
        };
        if ticket.requester.trim().is_empty() {
            log_skip(&ticket.id, SkipReason::NoRequester);
            summary.skipped += 1;
            continue;
        }

        let users = zendesk.search_users(&ticket.requester).await?;
        match users.first() {
            None => {
                log_skip(&ticket.id, SkipReason::RequesterNotFound);
                summary.skipped += 1;
            }
            Some(user) => {
                let payload = build_ticket_payload(candidate, assignee_zendesk_id, &user.id);
                let created = zendesk.create_ticket(&payload).await?;

                repo.record_zendesk_ids(&ticket.id, &created.id, &user.id)
                    .await?;
                repo.get_or_create_requester(&ticket.requester, &user.id)
                    .await?;

                let comment = CommentPayload::private(assignee_zendesk_id, &ticket.private_comment);
                zendesk.create_comment(&created.id, &comment).await?;

                tracing::info!(
                    ticket_id = %ticket.id,
                    zendesk_ticket_id = %created.id,
                    "Created Zendesk ticket"
                );
                summary.created += 1;
            }
        }

        if let Some(delay) = options.delay {
            if index + 1 < total {
                tokio::time::sleep(delay).await;
            }
        }
    }

    tracing::info!(
        board_id,
        created = summary.created,
        skipped = summary.skipped,
        "Zendesk sync finished"
    );
    Ok(summary)
}

/// Build the Zendesk ticket body for a candidate whose requester resolved to
/// `requester_id`.
fn build_ticket_payload(
    candidate: &SyncCandidate,
    assignee_zendesk_id: &str,
    requester_id: &str,
) -> TicketPayload {
    let ticket = &candidate.ticket;
    let author_id = candidate
        .created_by_zendesk_id
        .as_deref()
        .unwrap_or(assignee_zendesk_id);

    TicketPayload {
        ticket: NewZendeskTicket {
            subject: ticket.subject.clone(),
            comment: TicketComment {
                body: ticket.comment.clone(),
                author_id: author_id.to_string(),
            },
            requester_id: requester_id.to_string(),
            assignee_id: assignee_zendesk_id.to_string(),
            group_id: candidate.group_zendesk_id.clone(),
            ticket_type: ticket.ticket_type.as_str().to_string(),
            due_at: ticket
                .due_at
                .map(|d| d.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
                .unwrap_or_default(),
            priority: ticket.priority.as_str().to_string(),
            tags: ticket.tag_list(),
        },
    }
}

fn log_skip(ticket_id: &str, reason: SkipReason) {
    tracing::debug!(ticket_id, ?reason, "Skipping ticket");
}
