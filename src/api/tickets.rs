//! Ticket endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult, UpdatedCount};
use crate::errors::AppError;
use crate::models::{BulkEditRequest, CreateTicketRequest, Ticket, UpdateTicketRequest};
use crate::AppState;

/// POST /api/boards/:slug/tickets - Create a ticket on a board.
pub async fn create_ticket(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<CreateTicketRequest>,
) -> ApiResult<Ticket> {
    let board = state.repo.require_board(&slug).await?;
    let new_ticket = request.into_new_ticket(Some(board.id))?;
    success(state.repo.create_ticket(&new_ticket).await?)
}

/// GET /api/tickets/:id - Get a single ticket.
pub async fn get_ticket(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Ticket> {
    match state.repo.get_ticket(&id).await? {
        Some(ticket) => success(ticket),
        None => Err(AppError::NotFound(format!("Ticket {} not found", id))),
    }
}

/// PUT /api/tickets/:id - Update a ticket.
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTicketRequest>,
) -> ApiResult<Ticket> {
    let existing = state
        .repo
        .get_ticket(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", id)))?;

    let merged = request.apply_to(&existing)?;
    success(state.repo.update_ticket(&id, &merged).await?)
}

/// DELETE /api/tickets/:id - Delete a ticket.
pub async fn delete_ticket(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.repo.delete_ticket(&id).await?;
    success(())
}

/// POST /api/tickets/bulk-edit - Apply the same changes to several tickets.
pub async fn bulk_edit_tickets(
    State(state): State<AppState>,
    Json(request): Json<BulkEditRequest>,
) -> ApiResult<UpdatedCount> {
    if request.ids.is_empty() {
        return Err(AppError::Validation("No tickets selected".to_string()));
    }
    let changes = request.changes()?;
    if changes.is_empty() {
        return success(UpdatedCount { updated: 0 });
    }

    let updated = state.repo.bulk_edit_tickets(&request.ids, &changes).await?;
    success(UpdatedCount { updated })
}

/// POST /api/boards/:slug/reset-tickets - Forget the Zendesk ids of a board's tickets.
pub async fn reset_board_tickets(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<UpdatedCount> {
    let board = state.repo.require_board(&slug).await?;
    let updated = state.repo.reset_zendesk_ticket_ids(&board.id).await?;
    tracing::info!(slug = %board.slug, updated, "Reset Zendesk ticket ids");
    success(UpdatedCount { updated })
}

/// POST /api/boards/:slug/reset-requesters - Clear the requester of a board's tickets.
pub async fn reset_board_requesters(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<UpdatedCount> {
    let board = state.repo.require_board(&slug).await?;
    let updated = state.repo.reset_requesters(&board.id).await?;
    tracing::info!(slug = %board.slug, updated, "Reset requesters");
    success(UpdatedCount { updated })
}
