use std::path::PathBuf;

use clap::Parser;

use crate::capability::{CapabilityOverrides, Feature};
use crate::config::{DEFAULT_NODE_PROGRAM, NodeConfig, ServerConfig};

/// Erlang language server
#[derive(Debug, Parser)]
#[command(name = "erlang-ls", version, about)]
pub struct Cli {
    /// Directory for the log file (defaults to the data directory)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Do not start the secondary analysis node
    #[arg(long)]
    pub no_node: bool,

    /// Program used to start the secondary analysis node
    #[arg(long, value_name = "PATH", default_value = DEFAULT_NODE_PROGRAM)]
    pub node_program: String,

    /// Advertise signature help to clients
    #[arg(long)]
    pub enable_signature_help: bool,
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        let mut overrides = CapabilityOverrides::default();
        if self.enable_signature_help {
            overrides.set(Feature::SignatureHelp, true);
        }

        ServerConfig {
            overrides,
            node: NodeConfig {
                enabled: !self.no_node,
                program: self.node_program.clone(),
            },
        }
    }
}
