//! Zendesk Tickets Machine
//!
//! Prepares batches of support tickets on boards and submits them to Zendesk.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod sync;
mod zendesk;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use zendesk::{ZendeskApi, ZendeskClient};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub zendesk: Arc<dyn ZendeskApi>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Zendesk Tickets Machine");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (ZTM_API_PSK). Authentication is disabled!");
    }
    if config.zendesk.api_url.is_empty() {
        tracing::warn!("ZENDESK_API_URL is not set; syncing boards will fail");
    }
    if config.debug {
        tracing::info!("Debug mode: no pause between Zendesk submissions");
    }

    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let zendesk: Arc<dyn ZendeskApi> = Arc::new(ZendeskClient::new(&config.zendesk)?);

    let state = AppState {
        repo,
        zendesk,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    let api_routes = Router::new()
        // Boards
        .route("/boards", get(api::list_boards).post(api::create_board))
        .route(
            "/boards/{slug}",
            get(api::get_board)
                .put(api::update_board)
                .delete(api::delete_board),
        )
        .route("/boards/{slug}/tickets", post(api::create_ticket))
        .route("/boards/{slug}/sync", post(api::sync_board_tickets))
        .route("/boards/{slug}/reset-tickets", post(api::reset_board_tickets))
        .route(
            "/boards/{slug}/reset-requesters",
            post(api::reset_board_requesters),
        )
        // Board groups
        .route(
            "/board-groups",
            get(api::list_board_groups).post(api::create_board_group),
        )
        .route(
            "/board-groups/{id}",
            delete(api::delete_board_group),
        )
        // Tickets
        .route("/tickets/bulk-edit", post(api::bulk_edit_tickets))
        .route(
            "/tickets/{id}",
            get(api::get_ticket)
                .put(api::update_ticket)
                .delete(api::delete_ticket),
        )
        // Agents
        .route("/agents", get(api::list_agents).post(api::create_agent))
        .route(
            "/agents/{id}",
            put(api::update_agent).delete(api::delete_agent),
        )
        // Agent groups
        .route(
            "/agent-groups",
            get(api::list_agent_groups).post(api::create_agent_group),
        )
        .route(
            "/agent-groups/{id}",
            put(api::update_agent_group).delete(api::delete_agent_group),
        )
        // Requesters
        .route("/requesters", get(api::list_requesters))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
