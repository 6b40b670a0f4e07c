//! Dynamic capability registration issued after `initialized`

use serde_json::{Value, json};
use tower_lsp::lsp_types::Registration;
use tracing::info;

use crate::session::config::SessionConfig;

/// Workspace capabilities the server registers for when the client lets it.
pub const DYNAMIC_METHODS: [&str; 1] = ["didChangeWatchedFiles"];

/// Files watched under the workspace root: Erlang sources and headers.
pub const SOURCE_GLOB: &str = "**/*.{e,h}rl";

/// Where outbound `client/registerCapability` requests go.
#[cfg_attr(test, mockall::automock)]
pub trait RegistrationSink: Send + Sync {
    /// Sends one request bundling all `registrations`. Must not block on the
    /// client's answer.
    fn register(&self, registrations: Vec<Registration>);
}

/// Whether the client declares `workspace.<method>.dynamicRegistration: true`.
pub fn supports_dynamic_registration(session: &SessionConfig, method: &str) -> bool {
    session
        .client_capability(&["workspace", method, "dynamicRegistration"])
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Glob covering every source and header file below the workspace root.
pub fn source_glob_pattern(session: &SessionConfig) -> String {
    let prefix = match session.root_path() {
        Some(path) => path.to_string_lossy().into_owned(),
        None => session.root_uri.clone(),
    };
    format!("{}/{}", prefix.trim_end_matches('/'), SOURCE_GLOB)
}

fn registration(session: &SessionConfig, method: &str) -> Registration {
    let method = format!("workspace/{}", method);
    Registration {
        id: method.clone(),
        method,
        register_options: Some(json!({
            "watchers": [{ "globPattern": source_glob_pattern(session) }]
        })),
    }
}

/// Registrations the client qualifies for, in `DYNAMIC_METHODS` order.
pub fn registrations(session: &SessionConfig) -> Vec<Registration> {
    DYNAMIC_METHODS
        .iter()
        .filter(|method| supports_dynamic_registration(session, method))
        .map(|method| registration(session, method))
        .collect()
}

/// Sends the qualifying registrations as one request, or nothing at all.
/// Returns how many registrations were sent.
pub fn register_dynamic_capabilities(session: &SessionConfig, sink: &dyn RegistrationSink) -> usize {
    let registrations = registrations(session);

    if registrations.is_empty() {
        info!("Skipping dynamic capability registration");
        return 0;
    }

    let count = registrations.len();
    info!("Registering {} dynamic capabilities", count);
    sink.register(registrations);
    count
}
