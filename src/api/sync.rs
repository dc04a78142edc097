//! Zendesk sync endpoint.

use axum::extract::{Path, State};

use super::{success, ApiResult};
use crate::sync::{sync_board, SyncOptions, SyncSummary};
use crate::AppState;

/// POST /api/boards/:slug/sync - Create the board's pending tickets in Zendesk.
pub async fn sync_board_tickets(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<SyncSummary> {
    let board = state.repo.require_board(&slug).await?;
    let options = SyncOptions {
        delay: state.config.submission_delay(),
    };

    let summary = sync_board(&state.repo, state.zendesk.as_ref(), &board.id, &options).await?;
    success(summary)
}
