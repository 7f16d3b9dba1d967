//! In-process stand-in for the remote REST endpoint.
//!
//! `GET /posts` returns post objects shaped like a typical placeholder API
//! (`userId`, `id`, `title`, `body`); `POST /posts` accepts the full quote
//! collection and records it. Used by `quoteboard serve-mock` and the sync
//! integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::models::Quote;

const SAMPLE_TITLES: &[&str] = &[
    "sunt aut facere repellat provident occaecati excepturi optio reprehenderit",
    "qui est esse",
    "ea molestias quasi exercitationem repellat qui ipsa sit aut",
    "eum et est occaecati",
    "nesciunt quas odio",
    "dolorem eum magni eos aperiam quia",
];

#[derive(Debug, Default)]
struct MockState {
    posts: Vec<Value>,
    pushed: Vec<Vec<Quote>>,
    fail_reads: bool,
    fail_writes: bool,
    read_delay: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct MockRemote {
    inner: Arc<Mutex<MockState>>,
}

impl MockRemote {
    /// Seeded with a handful of sample posts
    pub fn new() -> Self {
        Self::with_titles(SAMPLE_TITLES.iter().copied())
    }

    pub fn with_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let remote = Self::default();
        for title in titles {
            remote.add_post(title);
        }
        remote
    }

    pub fn failing_reads(self) -> Self {
        self.inner.lock().fail_reads = true;
        self
    }

    pub fn failing_writes(self) -> Self {
        self.inner.lock().fail_writes = true;
        self
    }

    pub fn read_delay(self, delay: Duration) -> Self {
        self.inner.lock().read_delay = delay;
        self
    }

    pub fn add_post(&self, title: impl Into<String>) {
        let mut state = self.inner.lock();
        let id = state.posts.len() + 1;
        state.posts.push(json!({
            "userId": 1,
            "id": id,
            "title": title.into(),
            "body": "",
        }));
    }

    /// Every payload received via POST, oldest first
    pub fn pushed(&self) -> Vec<Vec<Quote>> {
        self.inner.lock().pushed.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/posts", get(list_posts).post(receive_quotes))
            .with_state(self.clone())
    }
}

async fn list_posts(State(remote): State<MockRemote>) -> Result<Json<Vec<Value>>, StatusCode> {
    let (delay, fail, posts) = {
        let state = remote.inner.lock();
        (state.read_delay, state.fail_reads, state.posts.clone())
    };

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    if fail {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(posts))
}

async fn receive_quotes(
    State(remote): State<MockRemote>,
    Json(quotes): Json<Vec<Quote>>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut state = remote.inner.lock();
    if state.fail_writes {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let received = quotes.len();
    state.pushed.push(quotes);
    tracing::debug!("mock_remote: received {} quotes", received);
    Ok((StatusCode::CREATED, Json(json!({ "received": received }))))
}

/// Serve until the process exits
pub async fn serve(bind_addr: &str, remote: MockRemote) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(
        "mock_remote: listening on http://{}/posts",
        listener.local_addr()?
    );
    axum::serve(listener, remote.router()).await
}

/// Bind an ephemeral loopback port and serve in the background.
/// Returns the address; the endpoint is `http://<addr>/posts`.
pub async fn spawn_local(remote: MockRemote) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let router = remote.router();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("mock_remote: server error: {}", e);
        }
    });
    Ok(addr)
}

pub fn endpoint_for(addr: SocketAddr) -> String {
    format!("http://{addr}/posts")
}
