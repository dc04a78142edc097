//! Requester cache model.

use serde::{Deserialize, Serialize};

/// A requester email already resolved against the Zendesk user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    pub id: String,
    pub email: String,
    pub zendesk_user_id: String,
}
