use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn spawn_server() -> std::net::SocketAddr {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();

    let engine = engine::Engine::new(db.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    server::spawn_with_listener(engine, db, listener).unwrap()
}

async fn request(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    auth: Option<(&str, &str)>,
    body: Option<Value>,
) -> (u16, Value) {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();

    let body = body.map(|value| value.to_string());
    let mut raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
    if let Some((username, password)) = auth {
        let token = STANDARD.encode(format!("{username}:{password}"));
        raw.push_str(&format!("Authorization: Basic {token}\r\n"));
    }
    if let Some(body) = &body {
        raw.push_str("Content-Type: application/json\r\n");
        raw.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    raw.push_str("\r\n");
    if let Some(body) = &body {
        raw.push_str(body);
    }

    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8(response).unwrap();

    let status: u16 = response
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    let payload = response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or("");
    let payload = if payload.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(payload).unwrap_or(Value::Null)
    };

    (status, payload)
}

const ALICE: Option<(&str, &str)> = Some(("alice", "password"));

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let addr = spawn_server().await;

    let (status, _) = request(addr, "GET", "/transactions", None, None).await;
    assert_eq!(status, 401);

    let (status, _) = request(
        addr,
        "GET",
        "/transactions",
        Some(("alice", "wrong")),
        None,
    )
    .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn transaction_crud_roundtrip() {
    let addr = spawn_server().await;

    let (status, created) = request(
        addr,
        "POST",
        "/transactions",
        ALICE,
        Some(json!({
            "date": "2024-01-05",
            "amount": 30.0,
            "category": {"name": "Food", "type": "expense"},
            "paymentMode": "Cash",
            "note": "lunch"
        })),
    )
    .await;
    assert_eq!(status, 201);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = request(addr, "GET", "/transactions", ALICE, None).await;
    assert_eq!(status, 200);
    let transactions = listed["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["amount"], json!(30.0));
    assert_eq!(transactions[0]["category"]["type"], json!("expense"));

    let (status, _) = request(
        addr,
        "DELETE",
        &format!("/transactions/{id}"),
        ALICE,
        None,
    )
    .await;
    assert_eq!(status, 204);

    let (status, listed) = request(addr, "GET", "/transactions", ALICE, None).await;
    assert_eq!(status, 200);
    assert!(listed["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deleting_unknown_transaction_is_404() {
    let addr = spawn_server().await;

    let (status, body) = request(
        addr,
        "DELETE",
        "/transactions/00000000-0000-0000-0000-000000000000",
        ALICE,
        None,
    )
    .await;
    assert_eq!(status, 404);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn filtered_listing_respects_query() {
    let addr = spawn_server().await;

    for (date, mode) in [("2024-01-05", "Cash"), ("2024-02-10", "Credit Card")] {
        let (status, _) = request(
            addr,
            "POST",
            "/transactions",
            ALICE,
            Some(json!({"date": date, "amount": 10.0, "paymentMode": mode})),
        )
        .await;
        assert_eq!(status, 201);
    }

    let (status, listed) = request(
        addr,
        "GET",
        "/transactions/filtered?month=1&year=2024",
        ALICE,
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(listed["transactions"].as_array().unwrap().len(), 1);

    let (status, listed) = request(
        addr,
        "GET",
        "/transactions/filtered?paymentMode=cash",
        ALICE,
        None,
    )
    .await;
    assert_eq!(status, 200);
    let transactions = listed["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["paymentMode"], json!("Cash"));
}

#[tokio::test]
async fn parse_endpoint_reads_seeded_registries() {
    let addr = spawn_server().await;

    let (status, parsed) = request(
        addr,
        "POST",
        "/parse",
        ALICE,
        Some(json!({"text": "spent 50 rupees on groceries today with cash"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(parsed["amount"], json!(50.0));
    assert_eq!(parsed["currency"], json!("INR"));
    assert_eq!(parsed["category"], json!("Grocery"));
    assert_eq!(parsed["paymentMode"], json!("Cash"));
}

#[tokio::test]
async fn trend_report_over_http() {
    let addr = spawn_server().await;

    let payloads = [
        json!({"date": "2024-01-05", "amount": 100.0, "category": {"name": "Salary", "type": "income"}}),
        json!({"date": "2024-01-05", "amount": 30.0, "category": {"name": "Food", "type": "expense"}}),
        json!({"date": "2024-02-10", "amount": 20.0, "category": {"name": "Food", "type": "expense"}}),
    ];
    for payload in payloads {
        let (status, _) = request(addr, "POST", "/transactions", ALICE, Some(payload)).await;
        assert_eq!(status, 201);
    }

    let (status, report) = request(addr, "GET", "/stats/trend", ALICE, None).await;
    assert_eq!(status, 200);
    assert_eq!(report["keys"], json!(["2024-01", "2024-02"]));
    assert_eq!(report["income"], json!([100.0, 0.0]));
    assert_eq!(report["expense"], json!([30.0, 20.0]));
    assert_eq!(report["balance"], json!([70.0, 50.0]));
}

#[tokio::test]
async fn settings_roundtrip_over_http() {
    let addr = spawn_server().await;

    let (status, settings) = request(addr, "GET", "/settings", ALICE, None).await;
    assert_eq!(status, 200);
    assert_eq!(settings["currency"], json!("INR"));

    let (status, updated) = request(
        addr,
        "POST",
        "/settings",
        ALICE,
        Some(json!({"currency": "USD", "darkMode": true, "theme": "green"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["currency"], json!("USD"));

    let (status, settings) = request(addr, "GET", "/settings", ALICE, None).await;
    assert_eq!(status, 200);
    assert_eq!(settings["darkMode"], json!(true));
}

#[tokio::test]
async fn seeded_categories_are_listed() {
    let addr = spawn_server().await;

    let (status, listed) = request(addr, "GET", "/categories", ALICE, None).await;
    assert_eq!(status, 200);
    let categories = listed["categories"].as_array().unwrap();
    assert!(categories.iter().any(|c| c["name"] == json!("Grocery")));

    let (status, listed) = request(addr, "GET", "/paymentModes", ALICE, None).await;
    assert_eq!(status, 200);
    let modes = listed["paymentModes"].as_array().unwrap();
    assert_eq!(modes.len(), 5);
    assert_eq!(modes[0]["name"], json!("Cash"));
}
