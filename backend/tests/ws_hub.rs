//! End-to-end test: saving a note over HTTP pushes a hub message to
//! connected WebSocket clients.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::header;
use actix_web::{App, HttpServer, web};
use awc::ws::Frame;
use futures_util::StreamExt;
use notes_backend::domain::notes::NoteEventsNotifier;
use notes_backend::domain::ports::{PasswordHashError, PasswordHasher, TokenError, TokenProvider};
use notes_backend::domain::{
    Dispatcher, DispatcherPorts, EventBus, PasswordHash, Salt, Username,
};
use notes_backend::inbound::http::configure;
use notes_backend::inbound::http::state::HttpState;
use notes_backend::inbound::ws;
use notes_backend::inbound::ws::state::WsState;
use notes_backend::outbound::hub::BroadcastHub;
use notes_backend::outbound::memory::InMemoryStore;
use rstest::rstest;
use serde_json::{Value, json};
use url::Url;

const ORIGIN: &str = "http://localhost:4200";

struct FixedTokens;

impl TokenProvider for FixedTokens {
    fn issue(&self, identity: &Username) -> Result<String, TokenError> {
        Ok(identity.to_string())
    }

    fn verify(&self, token: &str) -> Result<Username, TokenError> {
        Username::new(token).map_err(|err| TokenError::invalid(err.to_string()))
    }
}

struct NoHashing;

impl PasswordHasher for NoHashing {
    fn hash(&self, _salt: &Salt, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(plaintext))
    }
}

fn start_server() -> String {
    let store = InMemoryStore::new();
    let hub = BroadcastHub::default();
    let bus = Arc::new(NoteEventsNotifier::new(Arc::new(hub.clone())).register(EventBus::new()));
    let tokens: Arc<dyn TokenProvider> = Arc::new(FixedTokens);
    let dispatcher = Dispatcher::new(DispatcherPorts {
        notes: Arc::new(store.clone()),
        tags: Arc::new(store.clone()),
        users: Arc::new(store),
        hasher: Arc::new(NoHashing),
        tokens: Arc::clone(&tokens),
        bus,
    });
    let http_state = web::Data::new(HttpState::new(Arc::new(dispatcher), tokens));
    let ws_state = web::Data::new(WsState::new(hub, [Url::parse(ORIGIN).expect("origin")]));

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_state.clone())
            .app_data(ws_state.clone())
            .service(web::scope("/api/v1").configure(configure))
            .service(ws::ws_entry)
    })
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    actix_web::rt::spawn(server);
    format!("http://{addr}")
}

#[rstest]
#[actix_rt::test]
async fn saved_notes_reach_every_client() {
    let base = start_server();
    let client = awc::Client::default();

    let mut sockets = Vec::new();
    for _ in 0..2 {
        let (_resp, socket) = client
            .ws(format!("{base}/hub"))
            .set_header(header::ORIGIN, ORIGIN)
            .connect()
            .await
            .expect("websocket connect");
        sockets.push(socket);
    }

    let mut response = client
        .post(format!("{base}/api/v1/notes"))
        .insert_header((header::AUTHORIZATION, "Bearer tester"))
        .send_json(&json!({ "title": "Pushed", "body": "hello" }))
        .await
        .expect("save request");
    let saved: Value = response.json().await.expect("json body");

    for socket in &mut sockets {
        let text = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                match socket.next().await.expect("frame").expect("valid frame") {
                    Frame::Text(bytes) => return bytes,
                    Frame::Ping(_) | Frame::Pong(_) => continue,
                    other => panic!("unexpected frame: {other:?}"),
                }
            }
        })
        .await
        .expect("hub message within timeout");
        let value: Value = serde_json::from_slice(&text).expect("json");
        assert_eq!(
            value,
            json!({ "type": "NoteSaved", "payload": { "noteId": saved["noteId"] } })
        );
    }
}
