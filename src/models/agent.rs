//! Zendesk agents and agent groups.

use serde::{Deserialize, Serialize};

use super::{max_length, require};
use crate::errors::AppError;

/// A Zendesk agent that tickets can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub zendesk_user_id: String,
}

/// Request body for creating an agent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    pub name: String,
    pub zendesk_user_id: String,
}

impl CreateAgentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require("Name", &self.name)?;
        max_length("Name", &self.name, 100)?;
        require("Zendesk user ID", &self.zendesk_user_id)?;
        max_length("Zendesk user ID", &self.zendesk_user_id, 50)
    }
}

/// Request body for updating an agent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub zendesk_user_id: Option<String>,
}

/// A Zendesk group that tickets are routed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentGroup {
    pub id: String,
    pub name: String,
    pub zendesk_group_id: String,
}

/// Request body for creating an agent group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentGroupRequest {
    pub name: String,
    pub zendesk_group_id: String,
}

impl CreateAgentGroupRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require("Name", &self.name)?;
        max_length("Name", &self.name, 100)?;
        require("Zendesk group ID", &self.zendesk_group_id)?;
        max_length("Zendesk group ID", &self.zendesk_group_id, 50)
    }
}

/// Request body for updating an agent group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgentGroupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub zendesk_group_id: Option<String>,
}

impl UpdateAgentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            require("Name", name)?;
            max_length("Name", name, 100)?;
        }
        if let Some(user_id) = &self.zendesk_user_id {
            require("Zendesk user ID", user_id)?;
            max_length("Zendesk user ID", user_id, 50)?;
        }
        Ok(())
    }
}

impl UpdateAgentGroupRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            require("Name", name)?;
            max_length("Name", name, 100)?;
        }
        if let Some(group_id) = &self.zendesk_group_id {
            require("Zendesk group ID", group_id)?;
            max_length("Zendesk group ID", group_id, 50)?;
        }
        Ok(())
    }
}
