//! Session layer
//! - controller.rs: Handshake state machine
//! - config.rs: Per-connection session record
//! - request.rs: Handshake requests, replies and host effects
//! - root.rs: Workspace root resolution
//! - error.rs: Session errors and their JSON-RPC mapping

pub mod config;
pub mod controller;
pub mod error;
pub mod request;
pub mod root;

pub use config::SessionConfig;
pub use controller::{Collaborators, SessionController, SessionState};
pub use error::SessionError;
pub use request::{Effect, ExitParams, ExitStatus, InitializeRequest, Reply, Request};
