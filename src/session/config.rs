//! Per-connection session record

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::session::root;

/// Values captured during `initialize` and read by everything that runs
/// afterwards. Set once; collaborators only ever see a shared reference.
///
/// `root_uri` and `client_capabilities` are kept exactly as the client sent
/// them; only the views derived from them are interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub root_uri: String,
    pub client_capabilities: Value,
    pub initialization_options: Map<String, Value>,
}

impl SessionConfig {
    pub fn new(
        root_uri: impl Into<String>,
        client_capabilities: Value,
        initialization_options: Option<Value>,
    ) -> Self {
        Self {
            root_uri: root_uri.into(),
            client_capabilities,
            initialization_options: normalize_initialization_options(initialization_options),
        }
    }

    /// Filesystem path of the root, when it names a local directory.
    pub fn root_path(&self) -> Option<PathBuf> {
        root::to_file_path(&self.root_uri)
    }

    /// Whether the client allows background indexing (`indexingEnabled`,
    /// on unless explicitly set to `false`).
    pub fn indexing_enabled(&self) -> bool {
        self.initialization_options
            .get("indexingEnabled")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Looks up a nested client capability, e.g. `["workspace", "didChangeWatchedFiles"]`.
    pub fn client_capability(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(&self.client_capabilities, |value, key| value.get(key))
    }
}

/// Anything but a JSON object becomes an empty mapping.
pub fn normalize_initialization_options(options: Option<Value>) -> Map<String, Value> {
    match options {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn config_with(options: Option<Value>) -> SessionConfig {
        SessionConfig::new(
            "file:///tmp/project",
            json!({"workspace": {"didChangeWatchedFiles": {"dynamicRegistration": true}}}),
            options,
        )
    }

    #[rstest]
    #[case(None)]
    #[case(Some(Value::Null))]
    #[case(Some(json!([1, 2])))]
    #[case(Some(json!("verbose")))]
    fn non_object_options_become_empty(#[case] options: Option<Value>) {
        assert!(config_with(options).initialization_options.is_empty());
    }

    #[test]
    fn object_options_are_kept() {
        let config = config_with(Some(json!({"indexingEnabled": false, "other": 1})));
        assert_eq!(config.initialization_options.len(), 2);
        assert!(!config.indexing_enabled());
    }

    #[test]
    fn indexing_enabled_by_default() {
        assert!(config_with(None).indexing_enabled());
        assert!(config_with(Some(json!({"indexingEnabled": "no"}))).indexing_enabled());
    }

    #[test]
    fn client_capability_walks_nested_keys() {
        let config = config_with(None);
        assert_eq!(
            config.client_capability(&["workspace", "didChangeWatchedFiles", "dynamicRegistration"]),
            Some(&Value::Bool(true))
        );
        assert_eq!(config.client_capability(&["textDocument", "hover"]), None);
    }

    #[test]
    fn root_path_only_for_file_uris() {
        assert_eq!(
            config_with(None).root_path(),
            Some(PathBuf::from("/tmp/project"))
        );

        let remote = SessionConfig::new("untitled:project", json!({}), None);
        assert_eq!(remote.root_path(), None);
    }

    #[test]
    fn client_capabilities_are_kept_verbatim() {
        let capabilities = json!({
            "workspace": {"didChangeWatchedFiles": {"dynamicRegistration": "yes"}},
            "custom": {"x": 1}
        });
        let config = SessionConfig::new("file:///p", capabilities.clone(), None);

        assert_eq!(config.client_capabilities, capabilities);
        assert_eq!(config.client_capability(&["custom", "x"]), Some(&json!(1)));
    }
}
