//! Handshake state machine
//!
//! `SessionController` owns the session record and is the only component
//! that moves the session through its states:
//!
//! ```text
//! Uninitialized --initialize--> Initializing --initialized--> Initialized
//!     --shutdown--> ShuttingDown --exit--> Exited
//! ```
//!
//! `shutdown` and `exit` are accepted from any state. `exit` never halts the
//! process itself; it hands an [`Effect::Terminate`] back to the host.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::capability::{CapabilityAggregator, initialize_result};
use crate::config::APP_ID;
use crate::registration::{RegistrationSink, register_dynamic_capabilities};
use crate::runtime::{Indexer, NodeManager, NodeName};
use crate::session::config::SessionConfig;
use crate::session::error::SessionError;
use crate::session::request::{ExitParams, ExitStatus, InitializeRequest, Reply, Request};
use crate::session::root;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Initialized,
    ShuttingDown,
    Exited,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Initializing => "initializing",
            SessionState::Initialized => "initialized",
            SessionState::ShuttingDown => "shutting_down",
            SessionState::Exited => "exited",
        };
        f.write_str(name)
    }
}

/// External subsystems the controller triggers once the handshake completes.
#[derive(Clone)]
pub struct Collaborators {
    pub indexer: Arc<dyn Indexer>,
    pub node_manager: Arc<dyn NodeManager>,
    pub registration_sink: Arc<dyn RegistrationSink>,
}

pub struct SessionController {
    state: SessionState,
    session: Option<SessionConfig>,
    aggregator: CapabilityAggregator,
    collaborators: Collaborators,
}

impl SessionController {
    pub fn new(aggregator: CapabilityAggregator, collaborators: Collaborators) -> Self {
        Self {
            state: SessionState::Uninitialized,
            session: None,
            aggregator,
            collaborators,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Session record, available once `initialize` has succeeded.
    pub fn session(&self) -> Option<&SessionConfig> {
        self.session.as_ref()
    }

    pub fn handle(&mut self, request: Request) -> Result<Reply, SessionError> {
        debug!("Handling {} in state {}", request.method(), self.state);
        match request {
            Request::Initialize(params) => self.initialize(params),
            Request::Initialized => self.initialized(),
            Request::Shutdown => Ok(self.shutdown()),
            Request::Exit(params) => Ok(self.exit(params)),
        }
    }

    pub fn initialize(&mut self, params: InitializeRequest) -> Result<Reply, SessionError> {
        if self.state != SessionState::Uninitialized {
            return Err(SessionError::InvalidRequest(format!(
                "initialize received while {}",
                self.state
            )));
        }

        let root_uri = root::resolve(params.root_uri)?;
        info!("Initializing session for {}", root_uri);

        self.session = Some(SessionConfig::new(
            root_uri,
            params.capabilities,
            params.initialization_options,
        ));
        self.state = SessionState::Initializing;

        Ok(Reply::with_result(initialize_result(&self.aggregator.build())))
    }

    pub fn initialized(&mut self) -> Result<Reply, SessionError> {
        match self.state {
            SessionState::Uninitialized => return Err(SessionError::ServerNotInitialized),
            SessionState::Initializing => {}
            state => {
                warn!("Ignoring initialized while {}", state);
                return Ok(Reply::null());
            }
        }

        let Some(session) = self.session.as_ref() else {
            return Err(SessionError::Internal("session record missing".to_string()));
        };

        let reply = Reply::null();
        let node_name = NodeName::for_root(APP_ID, &session.root_uri);

        register_dynamic_capabilities(session, self.collaborators.registration_sink.as_ref());

        self.collaborators.node_manager.start(&node_name);
        info!("Started secondary node {}", node_name);

        self.collaborators.indexer.maybe_start(session);

        self.state = SessionState::Initialized;
        Ok(reply)
    }

    pub fn shutdown(&mut self) -> Reply {
        if self.state == SessionState::ShuttingDown {
            debug!("Shutdown already requested");
        }
        info!("Shutting down from state {}", self.state);
        self.state = SessionState::ShuttingDown;
        Reply::null()
    }

    pub fn exit(&mut self, params: ExitParams) -> Reply {
        let code = params.status.code();
        info!("Stopping erlang-ls (status: {:?}, exit code: {})", params.status, code);
        self.state = SessionState::Exited;
        Reply::terminate(code)
    }

    /// Status to pass to `exit` when the transport reports the client left:
    /// `shutdown` only if a shutdown request was accepted first.
    pub fn exit_status(&self) -> ExitStatus {
        match self.state {
            SessionState::ShuttingDown => ExitStatus::Shutdown,
            state => ExitStatus::Other(state.to_string()),
        }
    }
}
