use crate::convert::to_lsp_diagnostic;
use crate::document::Document;
use anyhow::{anyhow, Result};
use cvn_lsp_core::{Engine, Symbol};
use lsp_types::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Open documents and the analysis engine that tracks them.
pub struct Workspace {
    root_uri: Option<Url>,
    documents: HashMap<Url, Document>,
    engine: Engine,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            root_uri: None,
            documents: HashMap::new(),
            engine: Engine::new(),
        }
    }

    pub fn set_root(&mut self, root_uri: Url) {
        info!("Setting workspace root: {}", root_uri);
        self.root_uri = Some(root_uri);
    }

    pub fn open_document(&mut self, text_document: TextDocumentItem) {
        let uri = text_document.uri.clone();
        info!("Opening document: {}", uri);

        let mut document = Document::new(text_document);
        Self::reanalyze(&mut self.engine, &mut document);
        self.documents.insert(uri, document);
    }

    pub fn update_document(&mut self, params: DidChangeTextDocumentParams) -> Result<()> {
        let uri = params.text_document.uri;

        let Some(document) = self.documents.get_mut(&uri) else {
            return Err(anyhow!("Attempted to update non-existent document: {}", uri));
        };

        document.apply_changes(params.text_document.version, params.content_changes)?;
        Self::reanalyze(&mut self.engine, document);

        info!("Updated document: {} (version {})", uri, document.version());
        Ok(())
    }

    /// Forget the document and its cached symbols. Returns whether it was open.
    pub fn close_document(&mut self, uri: &Url) -> bool {
        info!("Closing document: {}", uri);
        self.engine.close(uri.as_str());
        self.documents.remove(uri).is_some()
    }

    pub fn get_document(&self, uri: &Url) -> Option<&Document> {
        self.documents.get(uri)
    }

    pub fn is_document_open(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    pub fn symbols(&self, uri: &Url) -> Option<Arc<[Symbol]>> {
        self.engine.symbols(uri.as_str())
    }

    /// Diagnostics from the last analysis, in LSP coordinates.
    pub fn get_diagnostics(&self, uri: &Url) -> Vec<Diagnostic> {
        match self.documents.get(uri) {
            Some(document) => document
                .diagnostics()
                .iter()
                .map(|diagnostic| to_lsp_diagnostic(document, diagnostic))
                .collect(),
            None => {
                warn!("Document not found for diagnostics: {}", uri);
                Vec::new()
            }
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn stats(&self) -> WorkspaceStats {
        WorkspaceStats {
            document_count: self.documents.len(),
            cached_symbol_tables: self.engine.cached_documents(),
            root_uri: self.root_uri.clone(),
        }
    }

    fn reanalyze(engine: &mut Engine, document: &mut Document) {
        let analysis = engine.analyze(document.uri().as_str(), document.text());
        document.set_diagnostics(analysis.diagnostics);
    }
}

#[derive(Debug, Clone)]
pub struct WorkspaceStats {
    pub document_count: usize,
    pub cached_symbol_tables: usize,
    pub root_uri: Option<Url>,
}
