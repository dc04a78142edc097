//! Agent and agent group endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::models::{
    Agent, AgentGroup, CreateAgentGroupRequest, CreateAgentRequest, UpdateAgentGroupRequest,
    UpdateAgentRequest,
};
use crate::AppState;

/// GET /api/agents - List all agents.
pub async fn list_agents(State(state): State<AppState>) -> ApiResult<Vec<Agent>> {
    success(state.repo.list_agents().await?)
}

/// POST /api/agents - Create a new agent.
pub async fn create_agent(
    State(state): State<AppState>,
    Json(request): Json<CreateAgentRequest>,
) -> ApiResult<Agent> {
    request.validate()?;
    success(state.repo.create_agent(&request).await?)
}

/// PUT /api/agents/:id - Update an agent.
pub async fn update_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAgentRequest>,
) -> ApiResult<Agent> {
    request.validate()?;
    success(state.repo.update_agent(&id, &request).await?)
}

/// DELETE /api/agents/:id - Delete an agent.
pub async fn delete_agent(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.repo.delete_agent(&id).await?;
    success(())
}

/// GET /api/agent-groups - List all agent groups.
pub async fn list_agent_groups(State(state): State<AppState>) -> ApiResult<Vec<AgentGroup>> {
    success(state.repo.list_agent_groups().await?)
}

/// POST /api/agent-groups - Create a new agent group.
pub async fn create_agent_group(
    State(state): State<AppState>,
    Json(request): Json<CreateAgentGroupRequest>,
) -> ApiResult<AgentGroup> {
    request.validate()?;
    success(state.repo.create_agent_group(&request).await?)
}

/// PUT /api/agent-groups/:id - Update an agent group.
pub async fn update_agent_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAgentGroupRequest>,
) -> ApiResult<AgentGroup> {
    request.validate()?;
    success(state.repo.update_agent_group(&id, &request).await?)
}

/// DELETE /api/agent-groups/:id - Delete an agent group.
pub async fn delete_agent_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.repo.delete_agent_group(&id).await?;
    success(())
}
