//! Requester cache endpoint.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::Requester;
use crate::AppState;

/// GET /api/requesters - List requesters resolved so far.
pub async fn list_requesters(State(state): State<AppState>) -> ApiResult<Vec<Requester>> {
    success(state.repo.list_requesters().await?)
}
