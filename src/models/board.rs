//! Boards and board groups.

use serde::{Deserialize, Serialize};

use super::{max_length, require, Ticket};
use crate::errors::AppError;

/// A named bucket of draft tickets, addressed by its slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_group_id: Option<String>,
    pub created_at: String,
}

/// A display grouping of boards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardGroup {
    pub id: String,
    pub name: String,
}

/// Board index: every group and every board.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardIndex {
    pub board_groups: Vec<BoardGroup>,
    pub boards: Vec<Board>,
}

/// A board with its active tickets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDetail {
    pub board: Board,
    pub tickets: Vec<Ticket>,
    /// Prefix for links to synced tickets in the Zendesk agent interface
    pub zendesk_ticket_url: String,
}

/// Request body for creating a board.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    pub name: String,
    #[serde(default)]
    pub board_group_id: Option<String>,
}

impl CreateBoardRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require("Board name", &self.name)?;
        max_length("Board name", &self.name, 300)?;
        if slugify(&self.name).is_empty() {
            return Err(AppError::Validation(
                "Board name must contain at least one letter or digit".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request body for updating a board. The slug is kept stable on rename.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// Empty string detaches the board from its group
    #[serde(default)]
    pub board_group_id: Option<String>,
}

impl UpdateBoardRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            require("Board name", name)?;
            max_length("Board name", name, 300)?;
        }
        Ok(())
    }
}

/// Request body for creating a board group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardGroupRequest {
    pub name: String,
}

impl CreateBoardGroupRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require("Board group name", &self.name)?;
        max_length("Board group name", &self.name, 300)
    }
}

/// Derive a URL-safe slug from a board name.
///
/// Lowercases, maps every run of non-alphanumeric characters to a single
/// hyphen and trims hyphens at both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut prev_hyphen = true;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Pre-Production"), "pre-production");
        assert_eq!(slugify("Monthly Newsletter"), "monthly-newsletter");
        assert_eq!(slugify("  Q3 -- Renewals!  "), "q3-renewals");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_create_board_validation() {
        let ok = CreateBoardRequest {
            name: "Onboarding".to_string(),
            board_group_id: None,
        };
        assert!(ok.validate().is_ok());

        let empty = CreateBoardRequest {
            name: "   ".to_string(),
            board_group_id: None,
        };
        assert!(matches!(empty.validate(), Err(AppError::Validation(_))));

        let no_slug = CreateBoardRequest {
            name: "???".to_string(),
            board_group_id: None,
        };
        assert!(no_slug.validate().is_err());
    }
}
