use std::sync::{Arc, PoisonError};

use tower_lsp::{LspService, Server};
use tracing::info;

use crate::config::ServerConfig;
use crate::lsp::backend::{Backend, SharedSession};
use crate::lsp::handshake::HandshakeService;
use crate::runtime::{CommandNodeManager, Indexer, NodeManager, WorkspaceIndexer};
use crate::session::{Effect, ExitParams};

/// Serves LSP over stdio until the client exits or disconnects, then
/// returns the process exit code. The caller performs the actual exit.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<i32> {
    info!("Starting erlang-ls server");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let indexer: Arc<dyn Indexer> = Arc::new(WorkspaceIndexer::new());
    let node_manager: Arc<dyn NodeManager> =
        Arc::from(CommandNodeManager::from_config(&config.node));

    let (service, socket) = LspService::build(|client| {
        Backend::build(client, &config, indexer, Arc::clone(&node_manager))
    })
    .finish();
    let service = HandshakeService::new(service);
    let session = service.inner().session();

    Server::new(stdin, stdout, socket).serve(service).await;

    node_manager.stop();
    Ok(exit_code(&session))
}

/// Feeds the final `exit` into the controller and extracts the exit code
/// from the terminate effect it hands back.
pub fn exit_code(session: &SharedSession) -> i32 {
    let mut controller = session.lock().unwrap_or_else(PoisonError::into_inner);
    let status = controller.exit_status();
    let reply = controller.exit(ExitParams { status });

    match reply.effect {
        Some(Effect::Terminate { code }) => code,
        None => 1,
    }
}
