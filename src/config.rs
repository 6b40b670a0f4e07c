use std::path::PathBuf;

use crate::capability::CapabilityOverrides;

/// Application identifier used for the log file and for secondary node names.
pub const APP_ID: &str = "erlang_ls";

/// Name reported to clients in `serverInfo`.
pub const SERVER_NAME: &str = "erlang-ls";

/// Program used to bring up the secondary analysis node.
pub const DEFAULT_NODE_PROGRAM: &str = "erl";

/// Returns the path to the data directory for erlang-ls.
/// Uses $XDG_DATA_HOME/erlang-ls if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/erlang-ls,
/// or ./erlang-ls if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file inside `log_dir`, or inside the data
/// directory when no explicit directory is given.
pub fn log_path(log_dir: Option<PathBuf>) -> PathBuf {
    log_dir.unwrap_or_else(data_dir).join("erlang-ls.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("erlang-ls")
}

/// How the secondary analysis node is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub enabled: bool,
    pub program: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: DEFAULT_NODE_PROGRAM.to_string(),
        }
    }
}

/// Server-wide settings fixed at startup, before any client connects.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub overrides: CapabilityOverrides,
    pub node: NodeConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/erlang-ls"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/erlang-ls"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./erlang-ls"));
    }

    #[test]
    fn log_path_prefers_explicit_directory() {
        let path = log_path(Some(PathBuf::from("/var/log/els")));
        assert_eq!(path, PathBuf::from("/var/log/els/erlang-ls.log"));
    }

    #[test]
    fn default_server_config_disables_signature_help() {
        let config = ServerConfig::default();
        assert_eq!(
            config.overrides.get(crate::capability::Feature::SignatureHelp),
            Some(false)
        );
        assert!(config.node.enabled);
        assert_eq!(config.node.program, "erl");
    }
}
