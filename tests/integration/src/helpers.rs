//! Test helpers for integration tests
//!
//! Provides a relay server bound to an ephemeral port, HTTP helpers, and
//! WebSocket client helpers for pairing peers.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use mirror_common::AppConfig;
use mirror_relay::{create_app, create_relay_state, run_server, RelayState};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};

/// WebSocket client connected to the relay
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for a message before giving up
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a test waits to be sure nothing arrives
pub const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: RelayState,
    assets: TempDir,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with default configuration
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::default()).await
    }

    /// Start a test server with custom config.
    ///
    /// The asset root is always replaced by a fresh temporary directory.
    pub async fn start_with_config(mut config: AppConfig) -> Result<Self> {
        let assets = tempfile::tempdir()?;
        config.relay.asset_root = assets.path().join("public");
        std::fs::create_dir(&config.relay.asset_root)?;

        let state = create_relay_state(config);
        let app = create_app(state.clone());

        let listener = mirror_relay::server::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            run_server(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            assets,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the WebSocket URL for a path and query
    pub fn ws_url(&self, path_and_query: &str) -> String {
        format!("ws://{}{}", self.addr, path_and_query)
    }

    /// Directory the server serves static assets from
    pub fn asset_root(&self) -> std::path::PathBuf {
        self.assets.path().join("public")
    }

    /// Directory containing the asset root, outside what the server may read
    pub fn asset_parent(&self) -> &Path {
        self.assets.path()
    }

    /// Write a file under the asset root
    pub fn write_asset(&self, relative: &str, contents: &str) -> Result<()> {
        let path = self.asset_root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a request with an arbitrary method
    pub async fn request(&self, method: reqwest::Method, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.request(method, &url).send().await?)
    }

    /// Create a session and return its id
    pub async fn create_session(&self) -> Result<String> {
        let response = self.get("/create").await?;
        let body: serde_json::Value = assert_json(response, StatusCode::OK).await?;
        body["session_id"]
            .as_str()
            .map(String::from)
            .context("session_id missing from response")
    }

    /// Connect a peer to a session under a role
    pub async fn connect(&self, session_id: &str, role: &str) -> Result<WsClient> {
        self.connect_at("/", session_id, role).await
    }

    /// Connect a peer through an arbitrary request path
    pub async fn connect_at(&self, path: &str, session_id: &str, role: &str) -> Result<WsClient> {
        let url = self.ws_url(&format!("{path}?id={session_id}&role={role}"));
        let (ws, _) = connect_async(url).await?;
        Ok(ws)
    }

    /// Connect and wait until the relay has bound the role
    pub async fn connect_bound(&self, session_id: &str, role: &str) -> Result<WsClient> {
        let ws = self.connect(session_id, role).await?;
        self.wait_for_binding(session_id, role, true).await?;
        Ok(ws)
    }

    /// Poll the registry until a role's slot reaches the wanted state
    pub async fn wait_for_binding(&self, session_id: &str, role: &str, bound: bool) -> Result<()> {
        let role = mirror_core::Role::from_param(Some(role));
        let session = self
            .state
            .registry()
            .lookup_raw(session_id)
            .context("session not registered")?;

        tokio::time::timeout(RECV_TIMEOUT, async {
            while session.is_bound(role) != bound {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .context("timed out waiting for slot state")
    }
}

/// Receive the next data message, skipping control frames
pub async fn recv_data(ws: &mut WsClient) -> Result<Message> {
    let next = tokio::time::timeout(RECV_TIMEOUT, async {
        while let Some(msg) = ws.next().await {
            match msg? {
                Message::Ping(_) | Message::Pong(_) => {}
                other => return Ok(Some(other)),
            }
        }
        Ok::<_, anyhow::Error>(None)
    })
    .await
    .context("timed out waiting for message")??;

    next.context("connection ended")
}

/// Assert that no data message arrives within the quiet period
pub async fn assert_silent(ws: &mut WsClient) -> Result<()> {
    match tokio::time::timeout(QUIET_PERIOD, ws.next()).await {
        Err(_) => Ok(()),
        Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => Ok(()),
        Ok(other) => anyhow::bail!("expected silence, got {other:?}"),
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status and return the body text
pub async fn assert_text(response: Response, expected_status: StatusCode) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if status != expected_status {
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(body)
}
