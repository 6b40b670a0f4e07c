//! Handshake requests accepted by the session controller and its replies

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::session::error::SessionError;

/// Why the session is ending, as carried by `exit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    /// `shutdown` was acknowledged before `exit`.
    Shutdown,
    /// Anything else, kept for logging.
    Other(String),
}

impl ExitStatus {
    /// Process exit code for this status.
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Shutdown => 0,
            ExitStatus::Other(_) => 1,
        }
    }
}

impl<'de> Deserialize<'de> for ExitStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) if s == "shutdown" => ExitStatus::Shutdown,
            Value::String(s) => ExitStatus::Other(s),
            other => ExitStatus::Other(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExitParams {
    pub status: ExitStatus,
}

/// The parts of `initialize` the session keeps, taken from the raw params
/// without reinterpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct InitializeRequest {
    pub root_uri: Option<String>,
    pub capabilities: Value,
    pub initialization_options: Option<Value>,
}

impl InitializeRequest {
    fn from_params(params: Value) -> Result<Self, SessionError> {
        let Value::Object(mut params) = params else {
            return Err(SessionError::InvalidParams(
                "initialize params must be an object".to_string(),
            ));
        };

        let capabilities = match params.remove("capabilities") {
            None | Some(Value::Null) => {
                return Err(SessionError::InvalidParams(
                    "missing field `capabilities`".to_string(),
                ));
            }
            Some(capabilities) => capabilities,
        };

        let root_uri = match params.remove("rootUri") {
            None | Some(Value::Null) => None,
            Some(Value::String(uri)) => Some(uri),
            Some(other) => {
                return Err(SessionError::InvalidParams(format!(
                    "rootUri must be a string or null, got {}",
                    other
                )));
            }
        };

        Ok(Self {
            root_uri,
            capabilities,
            initialization_options: params.remove("initializationOptions"),
        })
    }
}

#[derive(Debug, Clone)]
pub enum Request {
    Initialize(InitializeRequest),
    Initialized,
    Shutdown,
    Exit(ExitParams),
}

impl Request {
    /// Decodes a handshake request from its method name and raw params.
    pub fn from_method(method: &str, params: Value) -> Result<Self, SessionError> {
        match method {
            "initialize" => Ok(Request::Initialize(InitializeRequest::from_params(params)?)),
            "initialized" => Ok(Request::Initialized),
            "shutdown" => Ok(Request::Shutdown),
            "exit" => Ok(Request::Exit(decode(params)?)),
            other => Err(SessionError::MethodNotFound(other.to_string())),
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Request::Initialize(_) => "initialize",
            Request::Initialized => "initialized",
            Request::Shutdown => "shutdown",
            Request::Exit(_) => "exit",
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, SessionError> {
    serde_json::from_value(params).map_err(|e| SessionError::InvalidParams(e.to_string()))
}

/// Side effect the host must carry out after delivering a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Halt the host process with this exit code.
    Terminate { code: i32 },
}

/// Controller answer: the JSON-RPC result plus an optional host effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub result: Value,
    pub effect: Option<Effect>,
}

impl Reply {
    pub fn null() -> Self {
        Self {
            result: Value::Null,
            effect: None,
        }
    }

    pub fn with_result(result: Value) -> Self {
        Self {
            result,
            effect: None,
        }
    }

    pub fn terminate(code: i32) -> Self {
        Self {
            result: Value::Null,
            effect: Some(Effect::Terminate { code }),
        }
    }
}
