use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;

use sheetbot_channels::{WhatsAppClient, WhatsAppClientConfig};
use sheetbot_commands::LookupDispatcher;
use sheetbot_core::{
    BotError, BotResult, InventoryRecord, MessageSender, OrderRecord, RecordSource,
};
use sheetbot_gateway::{build_router, GatewayState};
use sheetbot_sheets::{http_client, SheetRecordSource, SheetsAuth, SheetsClient};

const WEBHOOK: &str = "/api/whatsapp";
const VERIFY_TOKEN: &str = "verify-me";

struct StaticSource {
    fail: bool,
}

#[async_trait]
impl RecordSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn find_order(&self, order_id: &str) -> BotResult<Option<OrderRecord>> {
        if self.fail {
            return Err(BotError::Sheets {
                status: 500,
                message: "backend error".into(),
            });
        }
        Ok((order_id == "1001").then(|| OrderRecord {
            order_id: "1001".into(),
            status: "Shipped".into(),
            ..Default::default()
        }))
    }

    async fn find_inventory(&self, _sku: &str) -> BotResult<Option<InventoryRecord>> {
        Ok(None)
    }
}

#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

#[async_trait]
impl MessageSender for RecordingSender {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send_text(&self, to: &str, body: &str) -> BotResult<()> {
        if self.fail {
            return Err(BotError::WhatsApp {
                status: 401,
                message: "bad token".into(),
            });
        }
        self.sent.lock().await.push((to.into(), body.into()));
        Ok(())
    }
}

fn app(source: impl RecordSource + 'static, sender: Arc<RecordingSender>) -> Router {
    let dispatcher = LookupDispatcher::new(Arc::new(source), sender);
    build_router(GatewayState::new(VERIFY_TOKEN, WEBHOOK, Arc::new(dispatcher)))
}

fn delivery(from: &str, text: &str) -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "WABA",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "messages": [{
                        "from": from,
                        "id": "wamid.IN",
                        "type": "text",
                        "text": { "body": text }
                    }]
                }
            }]
        }]
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(WEBHOOK)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn handshake_echoes_challenge() {
    let sender = Arc::new(RecordingSender::default());
    let (status, body) = send(
        app(StaticSource { fail: false }, sender),
        get("/api/whatsapp?hub.mode=subscribe&hub.verify_token=verify-me&hub.challenge=1158201444"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "1158201444");
}

#[tokio::test]
async fn handshake_without_challenge_returns_empty_body() {
    let sender = Arc::new(RecordingSender::default());
    let (status, body) = send(
        app(StaticSource { fail: false }, sender),
        get("/api/whatsapp?hub.mode=subscribe&hub.verify_token=verify-me"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "");
}

#[tokio::test]
async fn handshake_rejects_wrong_token_and_missing_params() {
    for uri in [
        "/api/whatsapp?hub.mode=subscribe&hub.verify_token=nope&hub.challenge=1",
        "/api/whatsapp?hub.mode=unsubscribe&hub.verify_token=verify-me&hub.challenge=1",
        "/api/whatsapp",
    ] {
        let sender = Arc::new(RecordingSender::default());
        let (status, body) = send(app(StaticSource { fail: false }, sender), get(uri)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body, "Forbidden");
    }
}

#[tokio::test]
async fn order_lookup_replies_to_sender() {
    let sender = Arc::new(RecordingSender::default());
    let (status, body) = send(
        app(StaticSource { fail: false }, sender.clone()),
        post(delivery("15551234567", "Order #1001").to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    assert_eq!(
        sender.sent.lock().await.as_slice(),
        &[(
            "15551234567".to_string(),
            "Order 1001\nStatus: Shipped".to_string()
        )]
    );
}

#[tokio::test]
async fn unknown_text_gets_usage_hint() {
    let sender = Arc::new(RecordingSender::default());
    send(
        app(StaticSource { fail: false }, sender.clone()),
        post(delivery("1555", "hello").to_string()),
    )
    .await;
    assert_eq!(
        sender.sent.lock().await[0].1,
        "Send \"order 12345\" or \"inventory SKU123\" to get details."
    );
}

#[tokio::test]
async fn garbage_and_status_callbacks_are_acknowledged() {
    let status_callback = json!({
        "entry": [{ "changes": [{ "value": { "statuses": [{ "status": "read" }] } }] }]
    });
    for body in [
        "not json".to_string(),
        "{}".to_string(),
        status_callback.to_string(),
    ] {
        let sender = Arc::new(RecordingSender::default());
        let (status, text) = send(app(StaticSource { fail: false }, sender.clone()), post(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "ok");
        assert!(sender.sent.lock().await.is_empty());
    }
}

#[tokio::test]
async fn lookup_and_reply_failures_still_return_ok() {
    let sender = Arc::new(RecordingSender::default());
    let (status, body) = send(
        app(StaticSource { fail: true }, sender.clone()),
        post(delivery("1555", "order 1001").to_string()),
    )
    .await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ok"));
    assert!(sender.sent.lock().await.is_empty());

    let failing = Arc::new(RecordingSender {
        fail: true,
        ..Default::default()
    });
    let (status, body) = send(
        app(StaticSource { fail: false }, failing),
        post(delivery("1555", "order 1001").to_string()),
    )
    .await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ok"));
}

#[tokio::test]
async fn health_reports_service() {
    let sender = Arc::new(RecordingSender::default());
    let (status, body) = send(app(StaticSource { fail: false }, sender), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "sheetbot");
    assert!(json["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn landing_page_names_webhook() {
    let sender = Arc::new(RecordingSender::default());
    let (status, body) = send(app(StaticSource { fail: false }, sender), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/api/whatsapp"));
}

#[tokio::test]
async fn inventory_lookup_end_to_end() {
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    let google = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path_regex(r"/v4/spreadsheets/sheet-1/values/Inventory"))
        .and(matchers::query_param("key", "AIzaTest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [
                ["SKU", "Name", "In Stock", "Location"],
                ["SKU123", "Widget", "12", "Aisle 4"]
            ]
        })))
        .expect(1)
        .mount(&google)
        .await;

    let graph = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/v21.0/1098/messages"))
        .and(matchers::header("authorization", "Bearer EAAtoken"))
        .and(matchers::body_partial_json(json!({
            "to": "15551234567",
            "text": { "body": "SKU SKU123\nName: Widget\nIn Stock: 12\nLocation: Aisle 4" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "messages": [{ "id": "wamid.OUT" }] })))
        .expect(1)
        .mount(&graph)
        .await;

    let sheets = SheetsClient::new(
        http_client().unwrap(),
        google.uri(),
        "sheet-1",
        SheetsAuth::api_key("AIzaTest"),
    );
    let source = SheetRecordSource::new(sheets, "Orders!A:Z", "Inventory!A:Z");
    let whatsapp = WhatsAppClient::new(WhatsAppClientConfig {
        graph_base_url: graph.uri(),
        api_version: "v21.0".into(),
        phone_number_id: "1098".into(),
        access_token: "EAAtoken".into(),
    })
    .unwrap();
    let dispatcher = LookupDispatcher::new(Arc::new(source), Arc::new(whatsapp));
    let app = build_router(GatewayState::new(VERIFY_TOKEN, WEBHOOK, Arc::new(dispatcher)));

    let (status, body) = send(app, post(delivery("15551234567", "inventory sku123").to_string())).await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ok"));
}
