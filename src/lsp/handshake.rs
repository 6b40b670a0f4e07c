//! Raw `initialize` params capture in front of the LSP service

use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use serde_json::{Map, Value};
use tower::Service;
use tower_lsp::LspService;
use tower_lsp::jsonrpc::Request;

use crate::lsp::backend::Backend;

/// `initialize` params exactly as they arrived on the wire, handed from the
/// transport to the backend.
#[derive(Debug, Clone, Default)]
pub struct RawInitialize(Arc<Mutex<Option<Value>>>);

impl RawInitialize {
    pub fn store(&self, params: Value) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(params);
    }

    pub fn take(&self) -> Option<Value> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Wraps the tower-lsp service so the session sees the client's `rootUri`
/// and `capabilities` untouched.
///
/// tower-lsp decodes `initialize` into typed params before the backend runs,
/// which rewrites the root through `Url` and rejects capability values of an
/// unexpected type. The raw params are stashed here first and the typed
/// decoder only gets a neutral copy of those two fields.
pub struct HandshakeService {
    inner: LspService<Backend>,
    raw_initialize: RawInitialize,
}

impl HandshakeService {
    pub fn new(inner: LspService<Backend>) -> Self {
        let raw_initialize = inner.inner().raw_initialize();
        Self {
            inner,
            raw_initialize,
        }
    }

    pub fn inner(&self) -> &Backend {
        self.inner.inner()
    }
}

impl Service<Request> for HandshakeService {
    type Response = <LspService<Backend> as Service<Request>>::Response;
    type Error = <LspService<Backend> as Service<Request>>::Error;
    type Future = <LspService<Backend> as Service<Request>>::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        if request.method() != "initialize" {
            return self.inner.call(request);
        }

        let (method, id, params) = request.into_parts();
        let mut builder = Request::build(method);
        if let Some(id) = id {
            builder = builder.id(id);
        }
        if let Some(params) = params {
            builder = builder.params(neutral_initialize_params(&params));
            self.raw_initialize.store(params);
        }

        self.inner.call(builder.finish())
    }
}

/// Copy of the params that the typed decoder always accepts for the fields
/// the session reads raw. Missing fields stay missing so tower-lsp still
/// answers `InvalidParams` for them.
fn neutral_initialize_params(params: &Value) -> Value {
    let mut neutral = params.clone();
    if let Some(fields) = neutral.as_object_mut() {
        if fields.get("rootUri").is_some_and(|root| !root.is_null()) {
            fields.insert("rootUri".to_string(), Value::Null);
        }
        if fields.get("capabilities").is_some_and(|caps| !caps.is_null()) {
            fields.insert("capabilities".to_string(), Value::Object(Map::new()));
        }
    }
    neutral
}
