//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    normalize_id, slugify, Agent, AgentGroup, Board, BoardGroup, BulkEdit,
    CreateAgentGroupRequest, CreateAgentRequest, CreateBoardGroupRequest, CreateBoardRequest,
    NewTicket, Requester, SyncCandidate, Ticket, TicketPriority, TicketType, UpdateAgentGroupRequest,
    UpdateAgentRequest, UpdateBoardRequest,
};

const TICKET_COLUMNS: &str = r#"t.id, t.subject, t.comment, t.requester, t.requester_id,
    t.assignee_id, t.created_by_id, t.group_id, t.ticket_type, t.due_at, t.priority,
    t.tags, t.private_comment, t.zendesk_ticket_id, t.is_active, t.board_id,
    t.created_at, t.updated_at"#;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== BOARD GROUP OPERATIONS ====================

    /// List all board groups.
    pub async fn list_board_groups(&self) -> Result<Vec<BoardGroup>, AppError> {
        let rows = sqlx::query("SELECT id, name FROM board_groups ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| BoardGroup {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    /// Create a new board group.
    pub async fn create_board_group(
        &self,
        request: &CreateBoardGroupRequest,
    ) -> Result<BoardGroup, AppError> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO board_groups (id, name) VALUES (?, ?)")
            .bind(&id)
            .bind(request.name.trim())
            .execute(&self.pool)
            .await?;

        Ok(BoardGroup {
            id,
            name: request.name.trim().to_string(),
        })
    }

    /// Delete a board group. Its boards stay, ungrouped.
    pub async fn delete_board_group(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM board_groups WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Board group {} not found", id)));
        }
        Ok(())
    }

    // ==================== BOARD OPERATIONS ====================

    /// List all boards.
    pub async fn list_boards(&self) -> Result<Vec<Board>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, slug, board_group_id, created_at FROM boards ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(board_from_row).collect())
    }

    /// Get a board by slug.
    pub async fn get_board_by_slug(&self, slug: &str) -> Result<Option<Board>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, slug, board_group_id, created_at FROM boards WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(board_from_row))
    }

    /// Get a board by slug or fail with `NotFound`.
    pub async fn require_board(&self, slug: &str) -> Result<Board, AppError> {
        self.get_board_by_slug(slug).await?.ok_or_else(|| {
            tracing::debug!(slug, "Board lookup missed");
            AppError::NotFound("The board you are looking for no longer exists".to_string())
        })
    }

    /// Create a new board with a slug derived from its name.
    ///
    /// Clashing slugs get a numeric suffix (`name-2`, `name-3`, ...).
    pub async fn create_board(&self, request: &CreateBoardRequest) -> Result<Board, AppError> {
        let board_group_id = normalize_id(request.board_group_id.as_deref());
        if let Some(group_id) = &board_group_id {
            self.ensure_exists("board_groups", group_id, "Board group")
                .await?;
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let name = request.name.trim().to_string();
        let slug = self.unique_slug(&slugify(&name)).await?;

        sqlx::query(
            "INSERT INTO boards (id, name, slug, board_group_id, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&name)
        .bind(&slug)
        .bind(&board_group_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Board {
            id,
            name,
            slug,
            board_group_id,
            created_at: now,
        })
    }

    /// Update a board's name or group.
    pub async fn update_board(
        &self,
        slug: &str,
        request: &UpdateBoardRequest,
    ) -> Result<Board, AppError> {
        let existing = self.require_board(slug).await?;

        let name = request
            .name
            .as_deref()
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.name);
        let board_group_id = match request.board_group_id.as_deref() {
            Some(value) => normalize_id(Some(value)),
            None => existing.board_group_id,
        };
        if let Some(group_id) = &board_group_id {
            self.ensure_exists("board_groups", group_id, "Board group")
                .await?;
        }

        sqlx::query("UPDATE boards SET name = ?, board_group_id = ? WHERE id = ?")
            .bind(&name)
            .bind(&board_group_id)
            .bind(&existing.id)
            .execute(&self.pool)
            .await?;

        Ok(Board {
            id: existing.id,
            name,
            slug: existing.slug,
            board_group_id,
            created_at: existing.created_at,
        })
    }

    /// Delete a board and its tickets.
    pub async fn delete_board(&self, slug: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM boards WHERE slug = ?")
            .bind(slug)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Board {} not found", slug)));
        }
        Ok(())
    }

    async fn unique_slug(&self, base: &str) -> Result<String, AppError> {
        let mut candidate = base.to_string();
        let mut suffix = 2;
        while self.get_board_by_slug(&candidate).await?.is_some() {
            candidate = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        Ok(candidate)
    }

    // ==================== AGENT OPERATIONS ====================

    /// List all agents.
    pub async fn list_agents(&self) -> Result<Vec<Agent>, AppError> {
        let rows = sqlx::query("SELECT id, name, zendesk_user_id FROM agents ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(agent_from_row).collect())
    }

    /// Get an agent by ID.
    pub async fn get_agent(&self, id: &str) -> Result<Option<Agent>, AppError> {
        let row = sqlx::query("SELECT id, name, zendesk_user_id FROM agents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(agent_from_row))
    }

    /// Create a new agent.
    pub async fn create_agent(&self, request: &CreateAgentRequest) -> Result<Agent, AppError> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO agents (id, name, zendesk_user_id) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(request.name.trim())
            .bind(request.zendesk_user_id.trim())
            .execute(&self.pool)
            .await?;

        Ok(Agent {
            id,
            name: request.name.trim().to_string(),
            zendesk_user_id: request.zendesk_user_id.trim().to_string(),
        })
    }

    /// Update an agent.
    pub async fn update_agent(
        &self,
        id: &str,
        request: &UpdateAgentRequest,
    ) -> Result<Agent, AppError> {
        let existing = self
            .get_agent(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Agent {} not found", id)))?;

        let name = request
            .name
            .as_deref()
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.name);
        let zendesk_user_id = request
            .zendesk_user_id
            .as_deref()
            .map(|z| z.trim().to_string())
            .unwrap_or(existing.zendesk_user_id);

        sqlx::query("UPDATE agents SET name = ?, zendesk_user_id = ? WHERE id = ?")
            .bind(&name)
            .bind(&zendesk_user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Agent {
            id: id.to_string(),
            name,
            zendesk_user_id,
        })
    }

    /// Delete an agent. Tickets assigned to it become unassigned.
    pub async fn delete_agent(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Agent {} not found", id)));
        }
        Ok(())
    }

    // ==================== AGENT GROUP OPERATIONS ====================

    /// List all agent groups.
    pub async fn list_agent_groups(&self) -> Result<Vec<AgentGroup>, AppError> {
        let rows =
            sqlx::query("SELECT id, name, zendesk_group_id FROM agent_groups ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.iter().map(agent_group_from_row).collect())
    }

    /// Get an agent group by ID.
    pub async fn get_agent_group(&self, id: &str) -> Result<Option<AgentGroup>, AppError> {
        let row = sqlx::query("SELECT id, name, zendesk_group_id FROM agent_groups WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(agent_group_from_row))
    }

    /// Create a new agent group.
    pub async fn create_agent_group(
        &self,
        request: &CreateAgentGroupRequest,
    ) -> Result<AgentGroup, AppError> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO agent_groups (id, name, zendesk_group_id) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(request.name.trim())
            .bind(request.zendesk_group_id.trim())
            .execute(&self.pool)
            .await?;

        Ok(AgentGroup {
            id,
            name: request.name.trim().to_string(),
            zendesk_group_id: request.zendesk_group_id.trim().to_string(),
        })
    }

    /// Update an agent group.
    pub async fn update_agent_group(
        &self,
        id: &str,
        request: &UpdateAgentGroupRequest,
    ) -> Result<AgentGroup, AppError> {
        let existing = self
            .get_agent_group(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Agent group {} not found", id)))?;

        let name = request
            .name
            .as_deref()
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.name);
        let zendesk_group_id = request
            .zendesk_group_id
            .as_deref()
            .map(|z| z.trim().to_string())
            .unwrap_or(existing.zendesk_group_id);

        sqlx::query("UPDATE agent_groups SET name = ?, zendesk_group_id = ? WHERE id = ?")
            .bind(&name)
            .bind(&zendesk_group_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(AgentGroup {
            id: id.to_string(),
            name,
            zendesk_group_id,
        })
    }

    /// Delete an agent group. Tickets routed to it lose their group.
    pub async fn delete_agent_group(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM agent_groups WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Agent group {} not found", id)));
        }
        Ok(())
    }

    // ==================== REQUESTER OPERATIONS ====================

    /// List all cached requesters.
    pub async fn list_requesters(&self) -> Result<Vec<Requester>, AppError> {
        let rows =
            sqlx::query("SELECT id, email, zendesk_user_id FROM requesters ORDER BY email")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.iter().map(requester_from_row).collect())
    }

    /// Record a resolved requester unless the same (email, user id) pair
    /// is already cached. Existing rows are never overwritten.
    pub async fn get_or_create_requester(
        &self,
        email: &str,
        zendesk_user_id: &str,
    ) -> Result<Requester, AppError> {
        sqlx::query(
            "INSERT OR IGNORE INTO requesters (id, email, zendesk_user_id) VALUES (?, ?, ?)",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(email)
        .bind(zendesk_user_id)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(
            "SELECT id, email, zendesk_user_id FROM requesters WHERE email = ? AND zendesk_user_id = ?",
        )
        .bind(email)
        .bind(zendesk_user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(requester_from_row(&row))
    }

    // ==================== TICKET OPERATIONS ====================

    /// List the active tickets of a board in insertion order.
    pub async fn list_board_tickets(&self, board_id: &str) -> Result<Vec<Ticket>, AppError> {
        let sql = format!(
            "SELECT {} FROM tickets t WHERE t.board_id = ? AND t.is_active = 1 ORDER BY t.rowid",
            TICKET_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(board_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(ticket_from_row).collect())
    }

    /// Get a ticket by ID.
    pub async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, AppError> {
        let sql = format!("SELECT {} FROM tickets t WHERE t.id = ?", TICKET_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(ticket_from_row))
    }

    /// Create a new ticket.
    pub async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, AppError> {
        self.ensure_ticket_references(ticket).await?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO tickets (
                id, subject, comment, requester, requester_id, assignee_id, created_by_id,
                group_id, ticket_type, due_at, priority, tags, private_comment,
                zendesk_ticket_id, is_active, board_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, NULL, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&ticket.subject)
        .bind(&ticket.comment)
        .bind(&ticket.requester)
        .bind(&ticket.assignee_id)
        .bind(&ticket.created_by_id)
        .bind(&ticket.group_id)
        .bind(ticket.ticket_type.as_str())
        .bind(ticket.due_at.map(|d| d.to_rfc3339()))
        .bind(ticket.priority.as_str())
        .bind(&ticket.tags)
        .bind(&ticket.private_comment)
        .bind(&ticket.zendesk_ticket_id)
        .bind(ticket.is_active as i32)
        .bind(&ticket.board_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Ticket {
            id,
            subject: ticket.subject.clone(),
            comment: ticket.comment.clone(),
            requester: ticket.requester.clone(),
            requester_id: None,
            assignee_id: ticket.assignee_id.clone(),
            created_by_id: ticket.created_by_id.clone(),
            group_id: ticket.group_id.clone(),
            ticket_type: ticket.ticket_type,
            due_at: ticket.due_at,
            priority: ticket.priority,
            tags: ticket.tags.clone(),
            private_comment: ticket.private_comment.clone(),
            zendesk_ticket_id: ticket.zendesk_ticket_id.clone(),
            is_active: ticket.is_active,
            board_id: ticket.board_id.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Overwrite a ticket's editable fields.
    pub async fn update_ticket(&self, id: &str, ticket: &NewTicket) -> Result<Ticket, AppError> {
        self.ensure_ticket_references(ticket).await?;

        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"UPDATE tickets SET
                subject = ?, comment = ?, requester = ?, assignee_id = ?, created_by_id = ?,
                group_id = ?, ticket_type = ?, due_at = ?, priority = ?, tags = ?,
                private_comment = ?, zendesk_ticket_id = ?, is_active = ?, board_id = ?,
                updated_at = ?
            WHERE id = ?"#,
        )
        .bind(&ticket.subject)
        .bind(&ticket.comment)
        .bind(&ticket.requester)
        .bind(&ticket.assignee_id)
        .bind(&ticket.created_by_id)
        .bind(&ticket.group_id)
        .bind(ticket.ticket_type.as_str())
        .bind(ticket.due_at.map(|d| d.to_rfc3339()))
        .bind(ticket.priority.as_str())
        .bind(&ticket.tags)
        .bind(&ticket.private_comment)
        .bind(&ticket.zendesk_ticket_id)
        .bind(ticket.is_active as i32)
        .bind(&ticket.board_id)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Ticket {} not found", id)));
        }

        self.get_ticket(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", id)))
    }

    /// Delete a ticket.
    pub async fn delete_ticket(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Ticket {} not found", id)));
        }
        Ok(())
    }

    /// Active, not yet synced tickets of a board, in insertion order, joined
    /// with the Zendesk ids of their agents and group.
    pub async fn list_sync_candidates(
        &self,
        board_id: &str,
    ) -> Result<Vec<SyncCandidate>, AppError> {
        let sql = format!(
            r#"SELECT {},
                      a.zendesk_user_id AS assignee_zendesk_id,
                      c.zendesk_user_id AS created_by_zendesk_id,
                      g.zendesk_group_id AS group_zendesk_id
               FROM tickets t
               LEFT JOIN agents a ON a.id = t.assignee_id
               LEFT JOIN agents c ON c.id = t.created_by_id
               LEFT JOIN agent_groups g ON g.id = t.group_id
               WHERE t.board_id = ? AND t.is_active = 1 AND t.zendesk_ticket_id IS NULL
               ORDER BY t.rowid"#,
            TICKET_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(board_id).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| SyncCandidate {
                ticket: ticket_from_row(row),
                assignee_zendesk_id: row.get("assignee_zendesk_id"),
                created_by_zendesk_id: row.get("created_by_zendesk_id"),
                group_zendesk_id: row.get("group_zendesk_id"),
            })
            .collect())
    }

    /// Store the Zendesk ids obtained for a ticket.
    pub async fn record_zendesk_ids(
        &self,
        ticket_id: &str,
        zendesk_ticket_id: &str,
        requester_id: &str,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE tickets SET zendesk_ticket_id = ?, requester_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(zendesk_ticket_id)
        .bind(requester_id)
        .bind(Utc::now().to_rfc3339())
        .bind(ticket_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Ticket {} not found", ticket_id)));
        }
        Ok(())
    }

    /// Clear the Zendesk ticket id of every ticket on a board.
    pub async fn reset_zendesk_ticket_ids(&self, board_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE tickets SET zendesk_ticket_id = NULL, updated_at = ? WHERE board_id = ?",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(board_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Clear the requester of every ticket on a board.
    pub async fn reset_requesters(&self, board_id: &str) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE tickets SET requester = '', updated_at = ? WHERE board_id = ?")
                .bind(Utc::now().to_rfc3339())
                .bind(board_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    /// Apply the same changes to several tickets in one transaction.
    pub async fn bulk_edit_tickets(&self, ids: &[String], edit: &BulkEdit) -> Result<u64, AppError> {
        if let Some(assignee_id) = &edit.assignee_id {
            self.ensure_exists("agents", assignee_id, "Agent").await?;
        }

        let now = Utc::now().to_rfc3339();
        let due_at = edit.due_at.map(|d| d.to_rfc3339());
        let mut updated = 0;

        let mut tx = self.pool.begin().await?;
        for id in ids {
            let result = sqlx::query(
                r#"UPDATE tickets SET
                    tags = COALESCE(?, tags),
                    requester = COALESCE(?, requester),
                    subject = COALESCE(?, subject),
                    due_at = COALESCE(?, due_at),
                    assignee_id = COALESCE(?, assignee_id),
                    updated_at = ?
                WHERE id = ?"#,
            )
            .bind(&edit.tags)
            .bind(&edit.requester)
            .bind(&edit.subject)
            .bind(&due_at)
            .bind(&edit.assignee_id)
            .bind(&now)
            .bind(id)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }
        tx.commit().await?;

        Ok(updated)
    }

    async fn ensure_ticket_references(&self, ticket: &NewTicket) -> Result<(), AppError> {
        if let Some(id) = &ticket.assignee_id {
            self.ensure_exists("agents", id, "Assignee").await?;
        }
        if let Some(id) = &ticket.created_by_id {
            self.ensure_exists("agents", id, "Creator").await?;
        }
        if let Some(id) = &ticket.group_id {
            self.ensure_exists("agent_groups", id, "Group").await?;
        }
        if let Some(id) = &ticket.board_id {
            self.ensure_exists("boards", id, "Board").await?;
        }
        Ok(())
    }

    /// `table` is always one of our own table names, never user input.
    async fn ensure_exists(&self, table: &str, id: &str, label: &str) -> Result<(), AppError> {
        let sql = format!("SELECT 1 FROM {} WHERE id = ?", table);
        let found = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if found.is_none() {
            return Err(AppError::Validation(format!("{} {} does not exist", label, id)));
        }
        Ok(())
    }
}

// Helper functions for row conversion

fn board_from_row(row: &sqlx::sqlite::SqliteRow) -> Board {
    Board {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        board_group_id: row.get("board_group_id"),
        created_at: row.get("created_at"),
    }
}

fn agent_from_row(row: &sqlx::sqlite::SqliteRow) -> Agent {
    Agent {
        id: row.get("id"),
        name: row.get("name"),
        zendesk_user_id: row.get("zendesk_user_id"),
    }
}

fn agent_group_from_row(row: &sqlx::sqlite::SqliteRow) -> AgentGroup {
    AgentGroup {
        id: row.get("id"),
        name: row.get("name"),
        zendesk_group_id: row.get("zendesk_group_id"),
    }
}

fn requester_from_row(row: &sqlx::sqlite::SqliteRow) -> Requester {
    Requester {
        id: row.get("id"),
        email: row.get("email"),
        zendesk_user_id: row.get("zendesk_user_id"),
    }
}

fn ticket_from_row(row: &sqlx::sqlite::SqliteRow) -> Ticket {
    let id: String = row.get("id");
    let is_active: i32 = row.get("is_active");
    let ticket_type: String = row.get("ticket_type");
    let priority: String = row.get("priority");
    let due_at: Option<String> = row.get("due_at");

    let ticket_type = TicketType::parse(&ticket_type).unwrap_or_else(|| {
        tracing::warn!(ticket_id = %id, value = %ticket_type, "Unknown ticket type, using default");
        TicketType::default()
    });
    let priority = TicketPriority::parse(&priority).unwrap_or_else(|| {
        tracing::warn!(ticket_id = %id, value = %priority, "Unknown ticket priority, using default");
        TicketPriority::default()
    });

    Ticket {
        id,
        subject: row.get("subject"),
        comment: row.get("comment"),
        requester: row.get("requester"),
        requester_id: row.get("requester_id"),
        assignee_id: row.get("assignee_id"),
        created_by_id: row.get("created_by_id"),
        group_id: row.get("group_id"),
        ticket_type,
        due_at: due_at.and_then(|s| parse_timestamp(&s)),
        priority,
        tags: row.get("tags"),
        private_comment: row.get("private_comment"),
        zendesk_ticket_id: row.get("zendesk_ticket_id"),
        is_active: is_active != 0,
        board_id: row.get("board_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
