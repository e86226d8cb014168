// Local HTTP responder for client tests.
// Answers each request with a canned reply and records the request targets.

use std::sync::{Arc, Mutex};

use reqwest::{Client, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::cache::ResponseCache;

use super::client::GitHubClient;

/// Canned HTTP response.
pub struct Reply {
    status: u16,
    headers: Vec<(&'static str, String)>,
    body: String,
}

impl Reply {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(mut self, name: &'static str, value: impl ToString) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    fn to_http(&self) -> String {
        let reason = StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown");
        let mut out = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            reason,
            self.body.len()
        );
        for (name, value) in &self.headers {
            out.push_str(&format!("{}: {}\r\n", name, value));
        }
        out.push_str("\r\n");
        out.push_str(&self.body);
        out
    }
}

pub struct TestServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Serve requests one at a time. `handler` gets the 0-based request index
    /// and the request target (path and query).
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(usize, &str) -> Reply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let Some(target) = read_target(&mut stream).await else {
                    continue;
                };
                let index = {
                    let mut seen = seen.lock().unwrap();
                    seen.push(target.clone());
                    seen.len() - 1
                };
                let reply = handler(index, &target);
                let _ = stream.write_all(reply.to_http().as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self { base_url, requests }
    }

    /// Anonymous client pointed at this server, bypassing any system proxy.
    pub fn client(&self) -> GitHubClient {
        GitHubClient::with_builder(
            Client::builder().no_proxy(),
            None,
            &self.base_url,
            ResponseCache::new(),
        )
        .unwrap()
    }

    /// Request targets received so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_target(stream: &mut TcpStream) -> Option<String> {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        head.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&head);
    head.lines()
        .next()?
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
}

/// Body of `GET /users/{login}`.
pub fn user_json(login: &str, followers: u64) -> String {
    serde_json::json!({
        "id": 1,
        "login": login,
        "name": null,
        "avatar_url": format!("https://avatars.example/{}", login),
        "html_url": format!("https://github.com/{}", login),
        "bio": null,
        "location": null,
        "company": null,
        "blog": "",
        "twitter_username": null,
        "followers": followers,
        "following": 0,
        "public_repos": 0,
        "created_at": "2020-01-01T00:00:00Z",
    })
    .to_string()
}

/// Body of one repos page holding `count` repositories.
pub fn repos_json(count: usize) -> String {
    let repos: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": i,
                "name": format!("repo-{}", i),
                "full_name": format!("octocat/repo-{}", i),
                "description": null,
                "html_url": format!("https://github.com/octocat/repo-{}", i),
                "language": null,
                "updated_at": "2024-01-01T00:00:00Z",
            })
        })
        .collect();
    serde_json::Value::Array(repos).to_string()
}

/// Value of `name` in a request target's query string.
pub fn query_param<'a>(target: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = target.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}
