use cvn_lsp_protocol::{Handlers, Workspace};
use lsp_types::*;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::{Client, LanguageServer};
use tracing::{error, info};

pub const TRIGGER_CHARACTERS: &[&str] = &[" ", ".", "(", "{"];

pub struct CvnLanguageServer {
    client: Client,
    workspace: Arc<RwLock<Workspace>>,
    handlers: Handlers,
}

impl CvnLanguageServer {
    pub fn new(client: Client) -> Self {
        info!("Initializing language server");
        let workspace = Arc::new(RwLock::new(Workspace::new()));

        Self {
            client,
            handlers: Handlers::new(Arc::clone(&workspace)),
            workspace,
        }
    }

    pub fn workspace(&self) -> Arc<RwLock<Workspace>> {
        Arc::clone(&self.workspace)
    }

    pub fn capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(
                TextDocumentSyncKind::INCREMENTAL,
            )),
            completion_provider: Some(CompletionOptions {
                resolve_provider: Some(true),
                trigger_characters: Some(
                    TRIGGER_CHARACTERS.iter().map(|c| c.to_string()).collect(),
                ),
                ..Default::default()
            }),
            definition_provider: Some(OneOf::Left(true)),
            references_provider: Some(OneOf::Left(true)),
            document_symbol_provider: Some(OneOf::Left(true)),
            ..Default::default()
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for CvnLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Initialize request received");

        if let Some(root_uri) = params.root_uri {
            self.workspace.write().await.set_root(root_uri);
        }

        Ok(InitializeResult {
            capabilities: Self::capabilities(),
            server_info: Some(ServerInfo {
                name: "cvn-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("Server initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutdown request received");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        info!("Document opened: {}", uri);

        let (diagnostics, version) = {
            let mut workspace = self.workspace.write().await;
            workspace.open_document(params.text_document);
            let version = workspace.get_document(&uri).map(|d| d.version());
            (workspace.get_diagnostics(&uri), version)
        };

        info!("Found {} diagnostics for document: {}", diagnostics.len(), uri);
        self.client.publish_diagnostics(uri, diagnostics, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        let version = params.text_document.version;
        info!("Document changed: {} (version {})", uri, version);

        let diagnostics = {
            let mut workspace = self.workspace.write().await;
            if let Err(e) = workspace.update_document(params) {
                error!("Failed to update document {}: {}", uri, e);
                return;
            }
            workspace.get_diagnostics(&uri)
        };

        self.client
            .publish_diagnostics(uri, diagnostics, Some(version))
            .await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        info!("Document closed: {}", uri);

        let stats = {
            let mut workspace = self.workspace.write().await;
            if !workspace.close_document(&uri) {
                error!("Closed a document that was not open: {}", uri);
            }
            workspace.stats()
        };
        info!("Workspace stats: {} documents open", stats.document_count);

        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        self.handlers.completion(params).await
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        self.handlers.completion_resolve(item).await
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        self.handlers.goto_definition(params).await
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        self.handlers.find_references(params).await
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        self.handlers.document_symbols(params).await
    }
}
