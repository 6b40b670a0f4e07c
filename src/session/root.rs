use std::path::{Path, PathBuf};

use tower_lsp::lsp_types::Url;

use crate::session::error::SessionError;

/// Resolves the workspace root for `initialize`.
///
/// A client-supplied root is returned as the exact string the client sent;
/// without one the current working directory is used. Nothing checks that
/// the directory exists.
pub fn resolve(root_uri: Option<String>) -> Result<String, SessionError> {
    resolve_with(root_uri, std::env::current_dir)
}

fn resolve_with(
    root_uri: Option<String>,
    current_dir: impl FnOnce() -> std::io::Result<PathBuf>,
) -> Result<String, SessionError> {
    if let Some(uri) = root_uri {
        return Ok(uri);
    }

    let cwd = current_dir()?;
    Url::from_file_path(&cwd)
        .map(String::from)
        .map_err(|()| SessionError::Internal(format!("{:?} is not an absolute path", cwd)))
}

/// Local directory named by a root string.
///
/// `file:` URIs are decoded; a bare absolute path is taken as is. Other
/// schemes have no local path.
pub fn to_file_path(root_uri: &str) -> Option<PathBuf> {
    match Url::parse(root_uri) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().ok(),
        Ok(_) => None,
        Err(_) if Path::new(root_uri).is_absolute() => Some(PathBuf::from(root_uri)),
        Err(_) => None,
    }
}
