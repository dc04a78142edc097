//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for boards, tickets and the Zendesk lookups.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS board_groups (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS boards (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            board_group_id TEXT REFERENCES board_groups(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS agents (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            zendesk_user_id TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS agent_groups (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            zendesk_group_id TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS requesters (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL,
            zendesk_user_id TEXT NOT NULL,
            UNIQUE (email, zendesk_user_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tickets (
            id TEXT PRIMARY KEY,
            subject TEXT NOT NULL,
            comment TEXT NOT NULL,
            requester TEXT NOT NULL DEFAULT '',
            requester_id TEXT,
            assignee_id TEXT REFERENCES agents(id) ON DELETE SET NULL,
            created_by_id TEXT REFERENCES agents(id) ON DELETE SET NULL,
            group_id TEXT REFERENCES agent_groups(id) ON DELETE SET NULL,
            ticket_type TEXT NOT NULL
                CHECK (ticket_type IN ('question', 'incident', 'problem', 'task')),
            due_at TEXT,
            priority TEXT NOT NULL
                CHECK (priority IN ('low', 'normal', 'high', 'urgent')),
            tags TEXT NOT NULL DEFAULT '',
            private_comment TEXT NOT NULL DEFAULT '',
            zendesk_ticket_id TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            board_id TEXT REFERENCES boards(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_boards_name ON boards(name);
        CREATE INDEX IF NOT EXISTS idx_tickets_board ON tickets(board_id, is_active);
        CREATE INDEX IF NOT EXISTS idx_tickets_zendesk_id ON tickets(zendesk_ticket_id);
        CREATE INDEX IF NOT EXISTS idx_agents_name ON agents(name);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
