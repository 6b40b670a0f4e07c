//! Secondary analysis node bring-up

use std::fmt;
use std::process::Stdio;
use std::sync::{LazyLock, Mutex, PoisonError};

use regex::Regex;
use tokio::process::{Child, Command};
use tower_lsp::lsp_types::Url;
use tracing::{error, info, warn};

use crate::config::NodeConfig;
use crate::session::root;

static INVALID_NODE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("Invalid node name pattern"));

/// Short name of the secondary node, derived from the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName(String);

impl NodeName {
    /// `<app_id>_<root basename>`, with every character outside
    /// `[A-Za-z0-9_]` replaced by `_`.
    pub fn for_root(app_id: &str, root_uri: &str) -> Self {
        let basename = root_basename(root_uri);
        let basename = if basename.is_empty() {
            "workspace".to_string()
        } else {
            basename
        };
        let raw = format!("{}_{}", app_id, basename);
        Self(INVALID_NODE_CHARS.replace_all(&raw, "_").into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn root_basename(root_uri: &str) -> String {
    if let Some(name) = root::to_file_path(root_uri)
        .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
    {
        return name;
    }

    let path = match Url::parse(root_uri) {
        Ok(url) => url.path().to_string(),
        Err(_) => root_uri.to_string(),
    };
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Starts and stops the secondary analysis node.
#[cfg_attr(test, mockall::automock)]
pub trait NodeManager: Send + Sync {
    /// Triggers node start-up; returns without waiting for the node.
    fn start(&self, name: &NodeName);

    /// Stops a node started by this manager, if any.
    fn stop(&self) {}
}

/// Manager for hosts that run without a secondary node.
#[derive(Debug, Default)]
pub struct NoopNodeManager;

impl NodeManager for NoopNodeManager {
    fn start(&self, name: &NodeName) {
        info!("Secondary node disabled, not starting {}", name);
    }
}

/// Spawns the node as an OS process: `<program> -sname <name> -hidden -noinput`.
///
/// Uses `tokio::process`, so `start` must be called from within a Tokio
/// runtime.
pub struct CommandNodeManager {
    program: String,
    child: Mutex<Option<Child>>,
}

impl CommandNodeManager {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            child: Mutex::new(None),
        }
    }

    pub fn from_config(config: &NodeConfig) -> Box<dyn NodeManager> {
        if config.enabled {
            Box::new(Self::new(config.program.clone()))
        } else {
            Box::new(NoopNodeManager)
        }
    }

    pub fn args(name: &NodeName) -> [String; 4] {
        [
            "-sname".to_string(),
            name.to_string(),
            "-hidden".to_string(),
            "-noinput".to_string(),
        ]
    }

    pub fn is_running(&self) -> bool {
        self.child
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl NodeManager for CommandNodeManager {
    fn start(&self, name: &NodeName) {
        let mut child = self.child.lock().unwrap_or_else(PoisonError::into_inner);
        if child.is_some() {
            warn!("Secondary node already started, ignoring start of {}", name);
            return;
        }

        match Command::new(&self.program)
            .args(Self::args(name))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(spawned) => {
                info!("Spawned secondary node {} (pid {:?})", name, spawned.id());
                *child = Some(spawned);
            }
            Err(e) => error!("Failed to start secondary node {}: {}", name, e),
        }
    }

    fn stop(&self) {
        let Some(mut child) = self
            .child
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            return;
        };

        if let Err(e) = child.start_kill() {
            warn!("Failed to stop secondary node: {}", e);
        }
    }
}
