pub mod capability;
pub mod cli;
pub mod config;
pub mod log;
pub mod lsp;
pub mod registration;
pub mod runtime;
pub mod session;
