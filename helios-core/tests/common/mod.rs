//! In-process mock of the backend REST API
//!
//! A std `TcpListener` on an ephemeral port, one thread per connection,
//! every response sent with `Connection: close`. Tests script the backend
//! with a handler closure and inspect the recorded requests afterwards.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use helios_core::adapters::MemoryStore;
use helios_core::config::Config;
use helios_core::domain::StorageKey;
use helios_core::ports::{SessionListener, SessionStore};
use helios_core::HeliosContext;

/// A request as the backend saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path without the `/api` prefix, query string included
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn bearer(&self) -> Option<&str> {
        self.header("authorization")
            .and_then(|v| v.strip_prefix("Bearer "))
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }

    /// Path without its query string
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }
}

/// What the backend answers
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Reply {
    /// 200 with `{ "data": data }`
    pub fn data(data: serde_json::Value) -> Self {
        Self::json(200, serde_json::json!({ "data": data, "success": true }))
    }

    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json".to_string(),
            body: body.to_string().into_bytes(),
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "message": message }))
    }

    pub fn bytes(content_type: &str, body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: content_type.to_string(),
            body: body.to_vec(),
        }
    }
}

type Handler = dyn Fn(&Recorded) -> Reply + Send + Sync;

pub struct MockBackend {
    port: u16,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock backend");
        let port = listener.local_addr().expect("local addr").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let handler = Arc::clone(&handler);
                let recorded = Arc::clone(&recorded);
                thread::spawn(move || serve(stream, handler.as_ref(), &recorded));
            }
        });

        Self { port, requests }
    }

    /// Base URL to configure the client with
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/api", self.port)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose route is `route`
    pub fn hits(&self, route: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.route() == route)
            .count()
    }
}

fn serve(stream: TcpStream, handler: &Handler, recorded: &Mutex<Vec<Recorded>>) {
    let Some(request) = read_request(&stream) else {
        return;
    };
    recorded.lock().unwrap().push(request.clone());
    let reply = handler(&request);
    let _ = write_reply(stream, &reply);
}

fn read_request(stream: &TcpStream) -> Option<Recorded> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).ok()?;

    Some(Recorded {
        method,
        path: target.strip_prefix("/api").unwrap_or(&target).to_string(),
        headers,
        body,
    })
}

fn write_reply(mut stream: TcpStream, reply: &Reply) -> std::io::Result<()> {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason(reply.status),
        reply.content_type,
        reply.body.len()
    );
    stream.write_all(head.as_bytes())?;
    stream.write_all(&reply.body)?;
    stream.flush()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        _ => "Internal Server Error",
    }
}

// ============================================================================
// Session fixtures
// ============================================================================

/// Listener that records every expiry redirect
#[derive(Default)]
pub struct RedirectRecorder {
    pub redirects: Mutex<Vec<String>>,
}

impl RedirectRecorder {
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl SessionListener for RedirectRecorder {
    fn session_expired(&self, login_path: &str) {
        self.redirects.lock().unwrap().push(login_path.to_string());
    }
}

/// Context over an in-memory store pointed at `base_url`
pub fn context(
    base_url: &str,
    store: Arc<MemoryStore>,
    listener: Arc<RedirectRecorder>,
) -> HeliosContext {
    HeliosContext::with_store(Config::with_api_url(base_url), store, listener)
        .expect("build context")
}

/// Store pre-seeded with a signed-in session
pub fn seeded_store(access: &str, refresh: Option<&str>) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.set(StorageKey::AccessToken, access).unwrap();
    if let Some(refresh) = refresh {
        store.set(StorageKey::RefreshToken, refresh).unwrap();
    }
    store
        .set(StorageKey::User, &user_json("u-1", "user").to_string())
        .unwrap();
    store
}

pub fn user_json(id: &str, role: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": "Ana Souza",
        "email": "ana@example.com",
        "role": role,
        "createdAt": "2024-01-10T12:00:00Z"
    })
}

/// `/auth/login` style payload
pub fn auth_payload(access: &str, refresh: &str) -> serde_json::Value {
    serde_json::json!({
        "user": user_json("u-1", "admin"),
        "tokens": { "accessToken": access, "refreshToken": refresh }
    })
}
