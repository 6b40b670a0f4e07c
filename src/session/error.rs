use thiserror::Error;
use tower_lsp::jsonrpc;

/// JSON-RPC code for requests arriving before `initialize` (LSP-defined).
const SERVER_NOT_INITIALIZED: i64 = -32002;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Server not initialized")]
    ServerNotInitialized,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Failed to resolve workspace root: {0}")]
    RootResolution(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SessionError> for jsonrpc::Error {
    fn from(error: SessionError) -> Self {
        let code = match &error {
            SessionError::ServerNotInitialized => {
                jsonrpc::ErrorCode::ServerError(SERVER_NOT_INITIALIZED)
            }
            SessionError::InvalidRequest(_) => jsonrpc::ErrorCode::InvalidRequest,
            SessionError::InvalidParams(_) => jsonrpc::ErrorCode::InvalidParams,
            SessionError::MethodNotFound(_) => jsonrpc::ErrorCode::MethodNotFound,
            SessionError::RootResolution(_) | SessionError::Internal(_) => {
                jsonrpc::ErrorCode::InternalError
            }
        };

        jsonrpc::Error {
            code,
            message: error.to_string().into(),
            data: None,
        }
    }
}
