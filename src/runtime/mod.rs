//! Long-lived subsystems triggered after the handshake
//! - indexer.rs: Background workspace indexer
//! - node.rs: Secondary analysis node naming and start-up

pub mod indexer;
pub mod node;

pub use indexer::{Indexer, WorkspaceIndexer};
pub use node::{CommandNodeManager, NodeManager, NodeName, NoopNodeManager};
