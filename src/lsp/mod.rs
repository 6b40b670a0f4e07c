// LSP protocol layer
// - server.rs: stdio server loop and final exit
// - backend.rs: LanguageServer trait implementation over the session controller
// - handshake.rs: raw initialize params capture wrapping the service
pub mod backend;
pub mod handshake;
pub mod server;
