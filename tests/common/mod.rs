//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use employee_directory::config::DirectoryConfig;
use employee_directory::EmployeeDirectory;

pub const FIXTURE: &str = include_str!("../fixtures/employees.json");

/// A request as seen by the mock upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// What the mock upstream answers with.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
    pub location: Option<String>,
    pub delay: Option<Duration>,
    /// Content-Length to announce instead of the real body length.
    pub declared_length: Option<usize>,
}

impl MockReply {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            location: None,
            delay: None,
            declared_length: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            location: None,
            delay: None,
            declared_length: None,
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            location: Some(location.to_string()),
            ..Self::status(302)
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Announce `declared_length` bytes but close after the real body.
    pub fn truncated(mut self, declared_length: usize) -> Self {
        self.declared_length = Some(declared_length);
        self
    }
}

/// Handle on a running mock upstream.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a programmable mock upstream on an ephemeral port. `reply` sees
/// every request and decides the answer.
pub async fn start_programmable_upstream<F>(reply: F) -> MockUpstream
where
    F: Fn(&RecordedRequest) -> MockReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let reply = Arc::new(reply);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let reply = reply.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        handle(socket, reply.as_ref(), &recorded).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockUpstream { addr, requests }
}

/// Mock upstream that answers every request the same way.
pub async fn start_mock_upstream(reply: MockReply) -> MockUpstream {
    start_programmable_upstream(move |_| reply.clone()).await
}

async fn handle<F>(mut socket: TcpStream, reply: &F, recorded: &Mutex<Vec<RecordedRequest>>)
where
    F: Fn(&RecordedRequest) -> MockReply,
{
    let Some(request) = read_request(&mut socket).await else {
        return;
    };
    recorded.lock().unwrap().push(request.clone());
    let answer = reply(&request);

    if let Some(delay) = answer.delay {
        tokio::time::sleep(delay).await;
    }

    let mut head = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
        answer.status,
        answer.declared_length.unwrap_or(answer.body.len())
    );
    if let Some(location) = &answer.location {
        head.push_str(&format!("Location: {}\r\n", location));
    }
    head.push_str("\r\n");

    let _ = socket.write_all(head.as_bytes()).await;
    let _ = socket.write_all(answer.body.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).into_owned();

    Some(RecordedRequest { method, path, body })
}

/// Config pointing at `base_url` with fast retries and a one second deadline.
pub fn test_config(base_url: &str) -> DirectoryConfig {
    let mut config = DirectoryConfig::default();
    config.upstream.base_url = base_url.to_string();
    config.upstream.timeout_secs = 1;
    config.upstream.connect_timeout_secs = 1;
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 40;
    config
}

/// Directory over the real `reqwest` transport, talking to `upstream`.
pub fn directory_for(upstream: &MockUpstream) -> EmployeeDirectory {
    EmployeeDirectory::from_config(&test_config(&upstream.base_url())).unwrap()
}

/// Standard upstream: fixture list, Quinn Flynn at id 12, null data for any
/// other id, echo on create and the id on delete.
pub async fn start_fixture_upstream() -> MockUpstream {
    start_programmable_upstream(|request| {
        match (request.method.as_str(), request.path.as_str()) {
            ("GET", "/api/v1/employees") => MockReply::json(FIXTURE),
            ("GET", "/api/v1/employee/12") => MockReply::json(
                r#"{"status":"success","message":"ok","data":{"id":12,"employee_name":"Quinn Flynn","employee_salary":342000,"employee_age":22,"profile_image":""}}"#,
            ),
            ("GET", _) => MockReply::json(r#"{"status":"success","message":"ok","data":null}"#),
            ("POST", "/api/v1/create") => {
                let mut data: serde_json::Value = serde_json::from_str(&request.body).unwrap();
                data["id"] = serde_json::json!(4711);
                MockReply::json(
                    serde_json::json!({"status": "success", "message": "created", "data": data})
                        .to_string(),
                )
            }
            ("DELETE", path) => {
                let id = path.rsplit('/').next().unwrap_or_default();
                MockReply::json(
                    serde_json::json!({"status": "success", "message": "deleted", "data": id})
                        .to_string(),
                )
            }
            _ => MockReply::status(404),
        }
    })
    .await
}
