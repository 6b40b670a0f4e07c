use clap::Parser;
use tracing::info;

use erlang_ls::cli::Cli;
use erlang_ls::log;
use erlang_ls::lsp::server::run_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let guard = log::init(cli.log_dir.clone(), cli.log_level.as_deref())?;

    let code = run_server(cli.server_config()).await?;
    info!("erlang-ls exiting with code {}", code);

    // Flush the log writer; process::exit skips destructors.
    drop(guard);
    std::process::exit(code);
}
