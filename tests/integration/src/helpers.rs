//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and driving WebSocket
//! clients against them.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chat_common::AppConfig;
use chat_core::MessageStore;
use chat_db::MemoryMessageStore;
use chat_gateway::GatewayState;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long a client waits for a single frame
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: GatewayState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Start a gateway on an ephemeral port with an in-memory store
    pub async fn start() -> Result<Self> {
        Self::start_with_store(Arc::new(MemoryMessageStore::new())).await
    }

    /// Start a gateway around a custom message store
    pub async fn start_with_store(store: Arc<dyn MessageStore>) -> Result<Self> {
        Self::start_with_config(test_config()?, store).await
    }

    /// Start a gateway with custom config and store
    pub async fn start_with_config(config: AppConfig, store: Arc<dyn MessageStore>) -> Result<Self> {
        let state = GatewayState::with_store(config, store)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server_state = state.clone();
        let handle = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.await;
            };
            chat_gateway::serve(listener, server_state, shutdown).await.ok();
        });

        Ok(Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Base HTTP URL
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Gateway WebSocket URL
    pub fn gateway_url(&self) -> String {
        format!("ws://{}/gateway", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(reqwest::Client::new().get(&url).send().await?)
    }

    /// Open a WebSocket and consume the Hello frame
    pub async fn connect(&self) -> Result<WsClient> {
        let mut client = WsClient::connect(&self.gateway_url()).await?;
        let hello = client.recv().await?;
        if hello["op"] != 10 {
            bail!("Expected Hello, got {hello}");
        }
        client.hello = hello;
        Ok(client)
    }

    /// Open a WebSocket subscribed to `topics`
    pub async fn connect_subscribed(&self, topics: &[&str]) -> Result<WsClient> {
        let mut client = self.connect().await?;
        for topic in topics {
            client.subscribe(topic).await?;
        }
        client.sync().await?;
        Ok(client)
    }

    /// Shut the server down and wait for it to stop
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Minimal gateway client
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// The Hello frame received on connect
    pub hello: Value,
}

impl WsClient {
    /// Connect without reading anything
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url).await.context("WebSocket connect failed")?;
        Ok(Self {
            stream,
            hello: Value::Null,
        })
    }

    /// Send a raw text frame
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Send a frame with the given op and data
    pub async fn send_op(&mut self, op: u8, d: Value) -> Result<()> {
        let frame = serde_json::json!({ "op": op, "d": d });
        self.send_text(frame.to_string()).await
    }

    /// Subscribe to a topic
    pub async fn subscribe(&mut self, topic: &str) -> Result<()> {
        self.send_op(2, serde_json::json!({ "topic": topic })).await
    }

    /// Send a heartbeat and wait for its ACK
    ///
    /// Frames are handled in order, so once the ACK arrives every earlier
    /// frame on this socket has been processed.
    pub async fn sync(&mut self) -> Result<()> {
        self.send_op(1, Value::Null).await?;
        let frame = self.recv().await?;
        if frame["op"] != 11 {
            bail!("Unexpected frame while syncing: {frame}");
        }
        Ok(())
    }

    /// Receive the next JSON frame
    pub async fn recv(&mut self) -> Result<Value> {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .context("Timed out waiting for a frame")?
                .context("Stream ended")??;

            match msg {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Ping(_) | Message::Pong(_) => continue,
                other => bail!("Unexpected message: {other:?}"),
            }
        }
    }

    /// Receive the next Dispatch frame on `topic`
    pub async fn recv_dispatch(&mut self, topic: &str) -> Result<Value> {
        let frame = self.recv().await?;
        if frame["op"] != 0 || frame["t"] != topic {
            bail!("Expected dispatch on {topic}, got {frame}");
        }
        Ok(frame)
    }

    /// Wait for the server to close the socket and return the close code
    pub async fn recv_close(&mut self) -> Result<u16> {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .context("Timed out waiting for close")?;

            match msg {
                Some(Ok(Message::Close(Some(frame)))) => return Ok(u16::from(frame.code)),
                Some(Ok(Message::Close(None))) => return Ok(u16::from(WsCloseCode::Status)),
                Some(Ok(_)) => continue,
                Some(Err(e)) => bail!("WebSocket error before close: {e}"),
                None => bail!("Stream ended without a close frame"),
            }
        }
    }

    /// Close the socket from the client side
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        // Drain until the server acknowledges
        while let Ok(Some(Ok(_))) = tokio::time::timeout(RECV_TIMEOUT, self.stream.next()).await {}
        Ok(())
    }
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    AppConfig::from_lookup(|_| None).map_err(|e| anyhow::anyhow!("Config error: {e}"))
}
