//! Board and board group endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::models::{
    Board, BoardDetail, BoardGroup, BoardIndex, CreateBoardGroupRequest, CreateBoardRequest,
    UpdateBoardRequest,
};
use crate::AppState;

/// GET /api/boards - List boards and board groups.
pub async fn list_boards(State(state): State<AppState>) -> ApiResult<BoardIndex> {
    let board_groups = state.repo.list_board_groups().await?;
    let boards = state.repo.list_boards().await?;

    success(BoardIndex {
        board_groups,
        boards,
    })
}

/// GET /api/boards/:slug - A board with its active tickets.
pub async fn get_board(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<BoardDetail> {
    let board = state.repo.require_board(&slug).await?;
    let tickets = state.repo.list_board_tickets(&board.id).await?;

    success(BoardDetail {
        board,
        tickets,
        zendesk_ticket_url: state.config.zendesk.agent_ticket_url(),
    })
}

/// POST /api/boards - Create a new board.
pub async fn create_board(
    State(state): State<AppState>,
    Json(request): Json<CreateBoardRequest>,
) -> ApiResult<Board> {
    request.validate()?;
    let board = state.repo.create_board(&request).await?;
    tracing::info!(slug = %board.slug, "Created board");
    success(board)
}

/// PUT /api/boards/:slug - Rename a board or change its group.
pub async fn update_board(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<UpdateBoardRequest>,
) -> ApiResult<Board> {
    request.validate()?;
    success(state.repo.update_board(&slug, &request).await?)
}

/// DELETE /api/boards/:slug - Delete a board and its tickets.
pub async fn delete_board(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<()> {
    state.repo.delete_board(&slug).await?;
    success(())
}

/// GET /api/board-groups - List board groups.
pub async fn list_board_groups(State(state): State<AppState>) -> ApiResult<Vec<BoardGroup>> {
    success(state.repo.list_board_groups().await?)
}

/// POST /api/board-groups - Create a board group.
pub async fn create_board_group(
    State(state): State<AppState>,
    Json(request): Json<CreateBoardGroupRequest>,
) -> ApiResult<BoardGroup> {
    request.validate()?;
    success(state.repo.create_board_group(&request).await?)
}

/// DELETE /api/board-groups/:id - Delete a board group.
pub async fn delete_board_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.repo.delete_board_group(&id).await?;
    success(())
}
