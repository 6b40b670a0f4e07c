//! Shared fixtures for the LSP end-to-end tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::StreamExt;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower_lsp::jsonrpc::Request;
use tower_lsp::{ClientSocket, LspService};

use erlang_ls::config::ServerConfig;
use erlang_ls::lsp::backend::Backend;
use erlang_ls::lsp::handshake::HandshakeService;
use erlang_ls::runtime::{Indexer, NodeManager, NodeName};
use erlang_ls::session::SessionConfig;

/// Indexer that only counts how often it was triggered.
#[derive(Default)]
pub struct CountingIndexer {
    calls: AtomicUsize,
}

impl CountingIndexer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Indexer for CountingIndexer {
    fn maybe_start(&self, _session: &SessionConfig) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Node manager that records the names it was asked to start.
#[derive(Default)]
pub struct RecordingNodeManager {
    started: Mutex<Vec<String>>,
}

impl RecordingNodeManager {
    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

impl NodeManager for RecordingNodeManager {
    fn start(&self, name: &NodeName) {
        self.started.lock().unwrap().push(name.to_string());
    }
}

pub struct TestServer {
    pub service: HandshakeService,
    pub indexer: Arc<CountingIndexer>,
    pub node_manager: Arc<RecordingNodeManager>,
    pub messages: mpsc::UnboundedReceiver<Request>,
}

pub fn create_test_server(config: ServerConfig) -> TestServer {
    let indexer = Arc::new(CountingIndexer::default());
    let node_manager = Arc::new(RecordingNodeManager::default());

    let backend_indexer: Arc<dyn Indexer> = indexer.clone();
    let backend_node_manager: Arc<dyn NodeManager> = node_manager.clone();
    let (service, socket) = LspService::build(|client| {
        Backend::build(client, &config, backend_indexer, backend_node_manager)
    })
    .finish();

    TestServer {
        service: HandshakeService::new(service),
        indexer,
        node_manager,
        messages: spawn_message_collector(socket),
    }
}

pub fn create_initialize_request(id: i64, root_uri: Value, capabilities: Value) -> Request {
    Request::build("initialize")
        .id(id)
        .params(json!({
            "processId": null,
            "rootUri": root_uri,
            "capabilities": capabilities
        }))
        .finish()
}

pub fn create_initialized_notification() -> Request {
    Request::build("initialized").params(json!({})).finish()
}

pub fn create_shutdown_request(id: i64) -> Request {
    Request::build("shutdown").id(id).finish()
}

pub fn create_exit_notification() -> Request {
    Request::build("exit").finish()
}

/// Forwards every client-bound message (requests and notifications) into a channel.
pub fn spawn_message_collector(mut socket: ClientSocket) -> mpsc::UnboundedReceiver<Request> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(message) = socket.next().await {
            if tx.send(message).is_err() {
                break;
            }
        }
    });
    rx
}

/// Waits for the next client-bound message with the given method.
pub async fn wait_for_message(
    rx: &mut mpsc::UnboundedReceiver<Request>,
    method: &str,
) -> Option<Request> {
    tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(message) = rx.recv().await {
            if message.method() == method {
                return Some(message);
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}

/// Drains what has been sent so far and reports whether `method` was among it.
pub async fn received_message(rx: &mut mpsc::UnboundedReceiver<Request>, method: &str) -> bool {
    tokio::time::sleep(Duration::from_millis(200)).await;
    let mut found = false;
    while let Ok(message) = rx.try_recv() {
        found |= message.method() == method;
    }
    found
}
