//! Integration tests for the tickets machine API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::{Config, ZendeskConfig};
use crate::db::{init_database, Repository};
use crate::zendesk::fake::FakeZendesk;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    zendesk: Arc<FakeZendesk>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::build(Some("test-api-key".to_string()), FakeZendesk::new(16)).await
    }

    async fn with_zendesk(zendesk: FakeZendesk) -> Self {
        Self::build(Some("test-api-key".to_string()), zendesk).await
    }

    async fn build(psk: Option<String>, zendesk: FakeZendesk) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let zendesk = Arc::new(zendesk);
        let base_url = spawn_app(&temp_dir, psk.clone(), zendesk.clone()).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            zendesk,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn put(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (u16, Value) {
        let resp = self.client.delete(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    /// Create a board and return its slug.
    async fn create_board(&self, name: &str) -> String {
        let (status, body) = self.post("/api/boards", json!({ "name": name })).await;
        assert_eq!(status, 200, "{body}");
        body["data"]["slug"].as_str().unwrap().to_string()
    }

    async fn create_agent(&self, name: &str, zendesk_user_id: &str) -> String {
        let (status, body) = self
            .post(
                "/api/agents",
                json!({ "name": name, "zendeskUserId": zendesk_user_id }),
            )
            .await;
        assert_eq!(status, 200, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_agent_group(&self, name: &str, zendesk_group_id: &str) -> String {
        let (status, body) = self
            .post(
                "/api/agent-groups",
                json!({ "name": name, "zendeskGroupId": zendesk_group_id }),
            )
            .await;
        assert_eq!(status, 200, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_ticket(&self, slug: &str, body: Value) -> Value {
        let (status, body) = self
            .post(&format!("/api/boards/{}/tickets", slug), body)
            .await;
        assert_eq!(status, 200, "{body}");
        body["data"].clone()
    }
}

async fn spawn_app(temp_dir: &TempDir, psk: Option<String>, zendesk: Arc<FakeZendesk>) -> String {
    let db_path = temp_dir.path().join("test.sqlite");
    let pool = init_database(&db_path).await.expect("Failed to init DB");
    let repo = Arc::new(Repository::new(pool));

    let config = Config {
        api_psk: psk,
        db_path,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        debug: true,
        sync_delay: Duration::from_millis(1000),
        zendesk: ZendeskConfig {
            url: "https://pronto.zendesk.com".to_string(),
            api_url: "https://pronto.zendesk.com/api/v2".to_string(),
            api_user: "agent@pronto.com".to_string(),
            api_token: "token".to_string(),
        },
    };

    let state = AppState {
        repo,
        zendesk,
        config: Arc::new(config),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    format!("http://{}", addr)
}

fn ticket_body(subject: &str, requester: &str, assignee_id: &str) -> Value {
    json!({
        "subject": subject,
        "comment": format!("{} comment", subject),
        "requester": requester,
        "assigneeId": assignee_id,
        "ticketType": "question",
        "priority": "urgent",
        "tags": "welcome",
        "privateComment": "Private comment"
    })
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let temp_dir = TempDir::new().unwrap();
    let base_url = spawn_app(
        &temp_dir,
        Some("secret-key".to_string()),
        Arc::new(FakeZendesk::new(1)),
    )
    .await;

    let resp = Client::new()
        .get(format!("{}/api/boards", base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_invalid_psk() {
    let temp_dir = TempDir::new().unwrap();
    let base_url = spawn_app(
        &temp_dir,
        Some("correct-key".to_string()),
        Arc::new(FakeZendesk::new(1)),
    )
    .await;

    let client = Client::new();
    let resp = client
        .get(format!("{}/api/boards", base_url))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Bearer token is accepted as well
    let resp = client
        .get(format!("{}/api/boards", base_url))
        .header("authorization", "Bearer correct-key")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_auth_valid_psk() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/boards").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["boards"], json!([]));
}

#[tokio::test]
async fn test_board_crud() {
    let fixture = TestFixture::new().await;

    let (status, group) = fixture
        .post("/api/board-groups", json!({ "name": "Production" }))
        .await;
    assert_eq!(status, 200);
    let group_id = group["data"]["id"].as_str().unwrap().to_string();

    let (status, created) = fixture
        .post(
            "/api/boards",
            json!({ "name": "Pre-Production", "boardGroupId": &group_id }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(created["data"]["slug"], "pre-production");
    assert_eq!(created["data"]["boardGroupId"], group_id.as_str());

    // Same name yields a distinct slug
    let second = fixture.create_board("Pre Production").await;
    assert_eq!(second, "pre-production-2");

    let (status, index) = fixture.get("/api/boards").await;
    assert_eq!(status, 200);
    assert_eq!(index["data"]["boards"].as_array().unwrap().len(), 2);
    assert_eq!(index["data"]["boardGroups"][0]["name"], "Production");

    let (status, detail) = fixture.get("/api/boards/pre-production").await;
    assert_eq!(status, 200);
    assert_eq!(detail["data"]["board"]["name"], "Pre-Production");
    assert_eq!(detail["data"]["tickets"], json!([]));
    assert_eq!(
        detail["data"]["zendeskTicketUrl"],
        "https://pronto.zendesk.com/agent/tickets/"
    );

    // Rename keeps the slug, empty group id detaches
    let (status, updated) = fixture
        .put(
            "/api/boards/pre-production",
            json!({ "name": "Staging", "boardGroupId": "" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["name"], "Staging");
    assert_eq!(updated["data"]["slug"], "pre-production");
    assert!(updated["data"].get("boardGroupId").is_none());

    let (status, _) = fixture.delete("/api/boards/pre-production").await;
    assert_eq!(status, 200);

    let (status, _) = fixture.delete(&format!("/api/board-groups/{}", group_id)).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_missing_board_returns_not_found() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/boards/nope").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(
        body["error"]["message"],
        "The board you are looking for no longer exists"
    );

    let (status, _) = fixture.post("/api/boards/nope/sync", json!({})).await;
    assert_eq!(status, 404);
    assert!(fixture.zendesk.searches().is_empty());
}

#[tokio::test]
async fn test_board_validation() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.post("/api/boards", json!({ "name": "  " })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = fixture.post("/api/boards", json!({ "name": "!!!" })).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_agent_and_group_crud() {
    let fixture = TestFixture::new().await;

    let agent_id = fixture.create_agent("Kan", "123").await;
    let group_id = fixture.create_agent_group("Development", "456").await;

    let (status, updated) = fixture
        .put(
            &format!("/api/agents/{}", agent_id),
            json!({ "zendeskUserId": "789" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["name"], "Kan");
    assert_eq!(updated["data"]["zendeskUserId"], "789");

    let (status, updated) = fixture
        .put(
            &format!("/api/agent-groups/{}", group_id),
            json!({ "name": "Support" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["name"], "Support");
    assert_eq!(updated["data"]["zendeskGroupId"], "456");

    let (_, agents) = fixture.get("/api/agents").await;
    assert_eq!(agents["data"].as_array().unwrap().len(), 1);
    let (_, groups) = fixture.get("/api/agent-groups").await;
    assert_eq!(groups["data"].as_array().unwrap().len(), 1);

    let (status, _) = fixture.delete(&format!("/api/agents/{}", agent_id)).await;
    assert_eq!(status, 200);
    let (status, _) = fixture
        .delete(&format!("/api/agent-groups/{}", group_id))
        .await;
    assert_eq!(status, 200);

    let (status, body) = fixture.delete(&format!("/api/agents/{}", agent_id)).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = fixture
        .post("/api/agents", json!({ "name": "Kan", "zendeskUserId": "" }))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_ticket_crud() {
    let fixture = TestFixture::new().await;
    let slug = fixture.create_board("Pre-Production").await;
    let agent_id = fixture.create_agent("Kan", "123").await;

    let mut body = ticket_body("Ticket 1", "client@hisotech.com", &agent_id);
    body["zendeskTicketId"] = json!("   ");
    body["dueAt"] = json!("2017-01-01");
    let ticket = fixture.create_ticket(&slug, body).await;
    let ticket_id = ticket["id"].as_str().unwrap().to_string();

    assert_eq!(ticket["subject"], "Ticket 1");
    assert!(ticket["zendeskTicketId"].is_null());
    assert_eq!(ticket["ticketType"], "question");
    assert_eq!(ticket["priority"], "urgent");
    assert_eq!(ticket["isActive"], true);
    assert!(ticket["dueAt"].as_str().unwrap().starts_with("2017-01-01T00:00:00"));

    let (status, fetched) = fixture.get(&format!("/api/tickets/{}", ticket_id)).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["data"]["requester"], "client@hisotech.com");

    let (status, updated) = fixture
        .put(
            &format!("/api/tickets/{}", ticket_id),
            json!({ "subject": "Ticket 1 (edited)", "zendeskTicketId": "24328", "priority": "low" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["subject"], "Ticket 1 (edited)");
    assert_eq!(updated["data"]["zendeskTicketId"], "24328");
    assert_eq!(updated["data"]["priority"], "low");
    assert_eq!(updated["data"]["comment"], "Ticket 1 comment");

    // Clearing the assignee
    let (status, updated) = fixture
        .put(
            &format!("/api/tickets/{}", ticket_id),
            json!({ "assigneeId": "" }),
        )
        .await;
    assert_eq!(status, 200);
    assert!(updated["data"]["assigneeId"].is_null());

    let (_, detail) = fixture.get(&format!("/api/boards/{}", slug)).await;
    assert_eq!(detail["data"]["tickets"].as_array().unwrap().len(), 1);

    let (status, _) = fixture.delete(&format!("/api/tickets/{}", ticket_id)).await;
    assert_eq!(status, 200);
    let (status, _) = fixture.get(&format!("/api/tickets/{}", ticket_id)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_ticket_validation() {
    let fixture = TestFixture::new().await;
    let slug = fixture.create_board("Pre-Production").await;

    let mut body = ticket_body("", "client@hisotech.com", "");
    let (status, resp) = fixture
        .post(&format!("/api/boards/{}/tickets", slug), body.clone())
        .await;
    assert_eq!(status, 400);
    assert_eq!(resp["error"]["code"], "VALIDATION_ERROR");

    body["subject"] = json!("x".repeat(301));
    let (status, _) = fixture
        .post(&format!("/api/boards/{}/tickets", slug), body.clone())
        .await;
    assert_eq!(status, 400);

    // Unknown assignee
    body["subject"] = json!("Ticket 1");
    body["assigneeId"] = json!("no-such-agent");
    let (status, _) = fixture
        .post(&format!("/api/boards/{}/tickets", slug), body)
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_inactive_tickets_hidden_from_board() {
    let fixture = TestFixture::new().await;
    let slug = fixture.create_board("Pre-Production").await;

    let mut body = ticket_body("Hidden", "client@hisotech.com", "");
    body["isActive"] = json!(false);
    fixture.create_ticket(&slug, body).await;
    fixture
        .create_ticket(&slug, ticket_body("Shown", "client@hisotech.com", ""))
        .await;

    let (_, detail) = fixture.get(&format!("/api/boards/{}", slug)).await;
    let tickets = detail["data"]["tickets"].as_array().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["subject"], "Shown");
}

#[tokio::test]
async fn test_sync_board_end_to_end() {
    let fixture =
        TestFixture::with_zendesk(FakeZendesk::new(16).with_user("client@hisotech.com", "1095195473"))
            .await;
    let slug = fixture.create_board("Pre-Production").await;
    let agent_id = fixture.create_agent("Kan", "123").await;
    let group_id = fixture.create_agent_group("Development", "456").await;

    let mut body = ticket_body("Ticket 1", "client@hisotech.com", &agent_id);
    body["groupId"] = json!(group_id);
    let first = fixture.create_ticket(&slug, body).await;
    fixture
        .create_ticket(&slug, ticket_body("Ticket 2", "unknown@example.com", &agent_id))
        .await;
    fixture
        .create_ticket(&slug, ticket_body("Ticket 3", "client@hisotech.com", ""))
        .await;

    let (status, body) = fixture
        .post(&format!("/api/boards/{}/sync", slug), json!({}))
        .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["data"], json!({ "created": 1, "skipped": 2 }));

    let created = fixture.zendesk.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].ticket.subject, "Ticket 1");
    assert_eq!(created[0].ticket.requester_id, "1095195473");
    assert_eq!(created[0].ticket.assignee_id, "123");
    assert_eq!(created[0].ticket.group_id.as_deref(), Some("456"));

    let comments = fixture.zendesk.comments();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].0, "16");

    let (_, ticket) = fixture
        .get(&format!("/api/tickets/{}", first["id"].as_str().unwrap()))
        .await;
    assert_eq!(ticket["data"]["zendeskTicketId"], "16");
    assert_eq!(ticket["data"]["requesterId"], "1095195473");

    let (_, requesters) = fixture.get("/api/requesters").await;
    assert_eq!(requesters["data"].as_array().unwrap().len(), 1);
    assert_eq!(requesters["data"][0]["email"], "client@hisotech.com");

    // Nothing left to send
    let (status, body) = fixture
        .post(&format!("/api/boards/{}/sync", slug), json!({}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["created"], 0);
    assert_eq!(fixture.zendesk.created().len(), 1);
}

#[tokio::test]
async fn test_sync_zendesk_failure_is_bad_gateway() {
    let fixture = TestFixture::with_zendesk(
        FakeZendesk::new(16)
            .with_user("client@hisotech.com", "1095195473")
            .failing_create(),
    )
    .await;
    let slug = fixture.create_board("Pre-Production").await;
    let agent_id = fixture.create_agent("Kan", "123").await;
    let ticket = fixture
        .create_ticket(&slug, ticket_body("Ticket 1", "client@hisotech.com", &agent_id))
        .await;

    let (status, body) = fixture
        .post(&format!("/api/boards/{}/sync", slug), json!({}))
        .await;
    assert_eq!(status, 502);
    assert_eq!(body["error"]["code"], "ZENDESK_ERROR");

    let (_, fetched) = fixture
        .get(&format!("/api/tickets/{}", ticket["id"].as_str().unwrap()))
        .await;
    assert!(fetched["data"]["zendeskTicketId"].is_null());
}

#[tokio::test]
async fn test_reset_tickets_is_scoped_to_board() {
    let fixture = TestFixture::new().await;
    let pre = fixture.create_board("Pre-Production").await;
    let prod = fixture.create_board("Production").await;

    let mut body = ticket_body("Ticket 1", "client@hisotech.com", "");
    body["zendeskTicketId"] = json!("1");
    let on_pre = fixture.create_ticket(&pre, body.clone()).await;
    body["zendeskTicketId"] = json!("2");
    let on_prod = fixture.create_ticket(&prod, body).await;

    let (status, resp) = fixture
        .post(&format!("/api/boards/{}/reset-tickets", pre), json!({}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(resp["data"]["updated"], 1);

    let (_, ticket) = fixture
        .get(&format!("/api/tickets/{}", on_pre["id"].as_str().unwrap()))
        .await;
    assert!(ticket["data"]["zendeskTicketId"].is_null());

    let (_, ticket) = fixture
        .get(&format!("/api/tickets/{}", on_prod["id"].as_str().unwrap()))
        .await;
    assert_eq!(ticket["data"]["zendeskTicketId"], "2");
}

#[tokio::test]
async fn test_reset_requesters() {
    let fixture = TestFixture::new().await;
    let slug = fixture.create_board("Pre-Production").await;
    let ticket = fixture
        .create_ticket(&slug, ticket_body("Ticket 1", "client@hisotech.com", ""))
        .await;

    let (status, resp) = fixture
        .post(&format!("/api/boards/{}/reset-requesters", slug), json!({}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(resp["data"]["updated"], 1);

    let (_, fetched) = fixture
        .get(&format!("/api/tickets/{}", ticket["id"].as_str().unwrap()))
        .await;
    assert_eq!(fetched["data"]["requester"], "");
}

#[tokio::test]
async fn test_bulk_edit() {
    let fixture = TestFixture::new().await;
    let slug = fixture.create_board("Pre-Production").await;
    let agent_id = fixture.create_agent("Kan", "123").await;

    let a = fixture
        .create_ticket(&slug, ticket_body("Ticket 1", "client@hisotech.com", ""))
        .await;
    let b = fixture
        .create_ticket(&slug, ticket_body("Ticket 2", "client@hisotech.com", ""))
        .await;
    let untouched = fixture
        .create_ticket(&slug, ticket_body("Ticket 3", "client@hisotech.com", ""))
        .await;

    let (status, resp) = fixture
        .post(
            "/api/tickets/bulk-edit",
            json!({
                "ids": [a["id"], b["id"]],
                "tags": "migration",
                "requester": "",
                "assigneeId": &agent_id
            }),
        )
        .await;
    assert_eq!(status, 200, "{resp}");
    assert_eq!(resp["data"]["updated"], 2);

    for ticket in [&a, &b] {
        let (_, fetched) = fixture
            .get(&format!("/api/tickets/{}", ticket["id"].as_str().unwrap()))
            .await;
        assert_eq!(fetched["data"]["tags"], "migration");
        assert_eq!(fetched["data"]["requester"], "client@hisotech.com");
        assert_eq!(fetched["data"]["assigneeId"], agent_id.as_str());
        assert_eq!(fetched["data"]["subject"], ticket["subject"]);
    }

    let (_, fetched) = fixture
        .get(&format!("/api/tickets/{}", untouched["id"].as_str().unwrap()))
        .await;
    assert_eq!(fetched["data"]["tags"], "welcome");

    let (status, _) = fixture
        .post("/api/tickets/bulk-edit", json!({ "ids": [], "tags": "x" }))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_deleting_agent_detaches_tickets() {
    let fixture = TestFixture::new().await;
    let slug = fixture.create_board("Pre-Production").await;
    let agent_id = fixture.create_agent("Kan", "123").await;
    let ticket = fixture
        .create_ticket(&slug, ticket_body("Ticket 1", "client@hisotech.com", &agent_id))
        .await;

    let (status, _) = fixture.delete(&format!("/api/agents/{}", agent_id)).await;
    assert_eq!(status, 200);

    let (status, fetched) = fixture
        .get(&format!("/api/tickets/{}", ticket["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, 200);
    assert!(fetched["data"]["assigneeId"].is_null());
}

#[tokio::test]
async fn test_deleting_board_removes_tickets() {
    let fixture = TestFixture::new().await;
    let slug = fixture.create_board("Pre-Production").await;
    let ticket = fixture
        .create_ticket(&slug, ticket_body("Ticket 1", "client@hisotech.com", ""))
        .await;

    let (status, _) = fixture.delete(&format!("/api/boards/{}", slug)).await;
    assert_eq!(status, 200);

    let (status, _) = fixture
        .get(&format!("/api/tickets/{}", ticket["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, 404);
}
