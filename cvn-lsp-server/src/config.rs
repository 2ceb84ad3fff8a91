use clap::Parser;
use std::path::PathBuf;

/// Language server for CVN visual novel scripts.
#[derive(Debug, Clone, Parser)]
#[command(name = "cvn-lsp", version, about)]
pub struct Args {
    /// Log filter directive, e.g. `debug` or `cvn_lsp_core=trace`. Takes precedence over RUST_LOG.
    #[arg(long, env = "CVN_LSP_LOG")]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr.
    #[arg(long, env = "CVN_LSP_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Communicate over stdin/stdout. This is the only transport.
    #[arg(long)]
    pub stdio: bool,
}
