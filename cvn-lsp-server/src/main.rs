use anyhow::Result;
use clap::Parser;
use cvn_lsp_server::{logging, Args, CvnLanguageServer};
use tower_lsp::{LspService, Server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = logging::init(args.log_level.as_deref(), args.log_file.as_deref())?;

    info!("Starting CVN Language Server {}", env!("CARGO_PKG_VERSION"));

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(CvnLanguageServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("Server stopped");
    Ok(())
}
