//! Dynamic registration layer
//! - registrar.rs: Client capability checks and registration requests

pub mod registrar;

pub use registrar::{RegistrationSink, register_dynamic_capabilities};
