use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tower_lsp::jsonrpc::{self, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{error, warn};

use crate::capability::{CapabilityAggregator, default_providers};
use crate::config::ServerConfig;
use crate::lsp::handshake::RawInitialize;
use crate::registration::RegistrationSink;
use crate::runtime::{Indexer, NodeManager};
use crate::session::{self, Collaborators, SessionController};

/// Controller shared between the LSP backend and the host loop that
/// performs the final `exit`.
pub type SharedSession = Arc<Mutex<SessionController>>;

/// Sends `client/registerCapability` without waiting for the client's answer.
pub struct ClientRegistrationSink {
    client: Client,
}

impl ClientRegistrationSink {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl RegistrationSink for ClientRegistrationSink {
    fn register(&self, registrations: Vec<Registration>) {
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.register_capability(registrations).await {
                warn!("Client rejected capability registration: {}", e);
            }
        });
    }
}

pub struct Backend {
    client: Client,
    session: SharedSession,
    raw_initialize: RawInitialize,
}

impl Backend {
    pub fn build(
        client: Client,
        config: &ServerConfig,
        indexer: Arc<dyn Indexer>,
        node_manager: Arc<dyn NodeManager>,
    ) -> Self {
        let aggregator = CapabilityAggregator::new(default_providers(), config.overrides.clone());
        let collaborators = Collaborators {
            indexer,
            node_manager,
            registration_sink: Arc::new(ClientRegistrationSink::new(client.clone())),
        };

        Self {
            client,
            session: Arc::new(Mutex::new(SessionController::new(aggregator, collaborators))),
            raw_initialize: RawInitialize::default(),
        }
    }

    pub fn session(&self) -> SharedSession {
        Arc::clone(&self.session)
    }

    pub fn raw_initialize(&self) -> RawInitialize {
        self.raw_initialize.clone()
    }

    fn controller(&self) -> MutexGuard<'_, SessionController> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        self.client
            .log_message(MessageType::INFO, "LSP server initializing")
            .await;

        // Prefer the params as sent; the typed ones have been normalised.
        let raw = match self.raw_initialize.take() {
            Some(raw) => raw,
            None => serde_json::to_value(&params).map_err(|e| {
                error!("Failed to encode initialize params: {}", e);
                jsonrpc::Error::internal_error()
            })?,
        };
        let request = session::Request::from_method("initialize", raw)?;
        let reply = self.controller().handle(request)?;

        serde_json::from_value(reply.result).map_err(|e| {
            error!("Failed to encode initialize result: {}", e);
            jsonrpc::Error::internal_error()
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        let result = self.controller().initialized();
        if let Err(e) = result {
            warn!("Rejected initialized notification: {}", e);
            return;
        }

        self.client
            .log_message(MessageType::INFO, "LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.controller().shutdown();
        self.client
            .log_message(MessageType::INFO, "LSP server shutting down")
            .await;
        Ok(())
    }
}
