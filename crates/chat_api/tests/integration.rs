use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use assert_matches::assert_matches;
use chat_api::{ChatApiClient, ChatApiConfig, ChatApiError, ChatRequest};
use reply_source::ProviderMessage;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};

fn allow_local_integration() -> bool {
    std::env::var("CHAT_API_ALLOW_LOCAL_INTEGRATION")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}

#[derive(Clone)]
enum ScriptedResponse {
    Respond { status: u16, body: &'static str },
    Reset,
}

struct ScriptedServer {
    endpoint: String,
    request_count: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl ScriptedServer {
    async fn new(scripts: Vec<ScriptedResponse>) -> Self {
        let scripts = Arc::new(scripts);
        let request_count = Arc::new(AtomicUsize::new(0));
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("local TCP listener should bind");
        let addr = listener
            .local_addr()
            .expect("resolved local listener address");
        let endpoint = format!("http://{addr}/chat");

        let handle = tokio::spawn({
            let scripts = Arc::clone(&scripts);
            let request_count = Arc::clone(&request_count);
            let bodies = Arc::clone(&bodies);

            async move {
                loop {
                    let (socket, _) = match listener.accept().await {
                        Ok(pair) => pair,
                        Err(_) => break,
                    };
                    let scripts = Arc::clone(&scripts);
                    let request_count = Arc::clone(&request_count);
                    let bodies = Arc::clone(&bodies);
                    tokio::spawn(async move {
                        serve_one(socket, scripts, request_count, bodies).await;
                    });
                }
            }
        });

        Self {
            endpoint,
            request_count,
            bodies,
            handle,
        }
    }

    fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Acquire)
    }

    fn bodies(&self) -> Vec<String> {
        self.bodies.lock().expect("bodies lock").clone()
    }

    fn shutdown(&self) {
        self.handle.abort();
    }
}

fn client_for(server: &ScriptedServer) -> ChatApiClient {
    ChatApiClient::new(
        ChatApiConfig::new(&server.endpoint).with_timeout(Duration::from_secs(5)),
    )
    .expect("client")
}

#[tokio::test]
async fn send_integration_success_decodes_response_and_posts_contract_body() {
    if !allow_local_integration() {
        return;
    }

    let server = ScriptedServer::new(vec![ScriptedResponse::Respond {
        status: 200,
        body: r#"{"response":"hello Alice"}"#,
    }])
    .await;
    let client = client_for(&server);
    let request = ChatRequest::new(
        "hello",
        vec![
            ProviderMessage::user("earlier"),
            ProviderMessage::assistant("answer"),
        ],
        "Alice",
    );

    let response = client.send(&request).await.expect("send should succeed");

    assert_eq!(response.response, "hello Alice");
    assert_eq!(server.request_count(), 1);
    let body: serde_json::Value =
        serde_json::from_str(&server.bodies()[0]).expect("server captured json body");
    assert_eq!(
        body,
        json!({
            "message": "hello",
            "chat_history": [
                { "role": "user", "content": [{ "text": "earlier" }] },
                { "role": "assistant", "content": [{ "text": "answer" }] }
            ],
            "user_name": "Alice"
        })
    );

    server.shutdown();
}

#[tokio::test]
async fn send_integration_server_error_fails_without_retry() {
    if !allow_local_integration() {
        return;
    }

    let server = ScriptedServer::new(vec![
        ScriptedResponse::Respond {
            status: 500,
            body: r#"{"detail":"model offline"}"#,
        },
        ScriptedResponse::Respond {
            status: 200,
            body: r#"{"response":"never reached"}"#,
        },
    ])
    .await;
    let client = client_for(&server);

    let error = client
        .send(&ChatRequest::new("hi", Vec::new(), "You"))
        .await
        .expect_err("500 should fail");

    assert_matches!(
        error,
        ChatApiError::Status { status, message }
            if status.as_u16() == 500 && message == "model offline"
    );
    assert_eq!(server.request_count(), 1);

    server.shutdown();
}

#[tokio::test]
async fn send_integration_malformed_success_body_fails_decode() {
    if !allow_local_integration() {
        return;
    }

    let server = ScriptedServer::new(vec![ScriptedResponse::Respond {
        status: 200,
        body: r#"{"answer":"wrong shape"}"#,
    }])
    .await;
    let client = client_for(&server);

    let error = client
        .send(&ChatRequest::new("hi", Vec::new(), "You"))
        .await
        .expect_err("missing response field should fail");
    assert_matches!(error, ChatApiError::Decode(_));

    server.shutdown();
}

#[tokio::test]
async fn send_integration_connection_reset_surfaces_request_error() {
    if !allow_local_integration() {
        return;
    }

    let server = ScriptedServer::new(vec![ScriptedResponse::Reset]).await;
    let client = client_for(&server);

    let error = timeout(
        Duration::from_secs(10),
        client.send(&ChatRequest::new("hi", Vec::new(), "You")),
    )
    .await
    .expect("reset should resolve")
    .expect_err("reset should fail");

    assert_matches!(error, ChatApiError::Request(_));
    assert_eq!(server.request_count(), 1);

    server.shutdown();
}

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Error",
    }
}

async fn serve_one(
    mut socket: TcpStream,
    scripts: Arc<Vec<ScriptedResponse>>,
    request_count: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<String>>>,
) {
    let Ok(body) = read_request(&mut socket).await else {
        return;
    };
    bodies.lock().expect("bodies lock").push(body);

    let index = request_count.fetch_add(1, Ordering::AcqRel);
    let response = scripts
        .get(index)
        .cloned()
        .unwrap_or(ScriptedResponse::Respond {
            status: 500,
            body: r#"{"error":"unexpected request"}"#,
        });

    match response {
        ScriptedResponse::Reset => {}
        ScriptedResponse::Respond { status, body } => {
            let response = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                status_reason(status),
                body.len(),
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    }
}

async fn read_request(socket: &mut TcpStream) -> std::io::Result<String> {
    let mut request = Vec::new();
    let mut buffer = [0_u8; 2048];

    let header_end = loop {
        let n = socket.read(&mut buffer).await?;
        if n == 0 {
            return Ok(String::new());
        }
        request.extend_from_slice(&buffer[..n]);
        if let Some(position) = request.windows(4).position(|window| window == b"\r\n\r\n") {
            break position + 4;
        }
    };

    let head = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while request.len() < header_end + content_length {
        let n = socket.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buffer[..n]);
    }

    Ok(String::from_utf8_lossy(&request[header_end..]).into_owned())
}
