use crate::convert::{apply_detail, detail_tag, to_completion_item, to_document_symbol};
use crate::document::Document;
use crate::error::HandlerError;
use crate::workspace::Workspace;
use cvn_lsp_core::{find_references, text::word_at};
use lsp_types::*;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tracing::{debug, warn};

/// Request handlers over the shared workspace.
pub struct Handlers {
    workspace: Arc<RwLock<Workspace>>,
}

impl Handlers {
    pub fn new(workspace: Arc<RwLock<Workspace>>) -> Self {
        Self { workspace }
    }

    pub async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position;
        let workspace = self.workspace.read().await;
        let Some(document) = workspace.get_document(&position.text_document.uri) else {
            warn!(
                "Completion requested for a document that is not open: {}",
                position.text_document.uri
            );
            return Ok(None);
        };

        let offset = document.position_to_offset(position.position);
        let candidates = workspace
            .engine()
            .complete(document.uri().as_str(), document.text(), offset);

        if candidates.is_empty() {
            return Ok(None);
        }

        let items = candidates.into_iter().map(to_completion_item).collect();
        Ok(Some(CompletionResponse::Array(items)))
    }

    /// Fill in the long documentation for a previewed item.
    pub async fn completion_resolve(&self, mut item: CompletionItem) -> Result<CompletionItem> {
        match detail_tag(&item) {
            Ok(Some(tag)) => {
                let detail = self.workspace.read().await.engine().resolve(tag);
                if let Some(detail) = detail {
                    apply_detail(&mut item, detail);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Leaving completion item '{}' unresolved: {}", item.label, e),
        }
        Ok(item)
    }

    pub async fn document_symbols(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;
        let workspace = self.workspace.read().await;
        let document = open_document(&workspace, &uri)?;

        let Some(symbols) = workspace.symbols(&uri) else {
            return Ok(None);
        };

        let symbols = symbols
            .iter()
            .map(|symbol| to_document_symbol(document, symbol))
            .collect();
        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    /// Whole-word occurrences of the identifier under the cursor.
    pub async fn find_references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let position = params.text_document_position;
        let uri = position.text_document.uri;
        let workspace = self.workspace.read().await;
        let document = open_document(&workspace, &uri)?;

        let offset = document.position_to_offset(position.position);
        let Some(word) = word_at(document.text(), offset) else {
            return Ok(None);
        };
        let name = word.slice(document.text());

        let declarations: Vec<_> = workspace
            .symbols(&uri)
            .map(|symbols| {
                symbols
                    .iter()
                    .filter(|symbol| symbol.name == name)
                    .map(|symbol| symbol.name_range())
                    .collect()
            })
            .unwrap_or_default();

        let locations: Vec<Location> = find_references(document.text(), name)
            .into_iter()
            .filter(|range| params.context.include_declaration || !declarations.contains(range))
            .map(|range| Location::new(uri.clone(), document.range_of(range)))
            .collect();

        debug!("Found {} references to '{}' in {}", locations.len(), name, uri);
        Ok(Some(locations))
    }

    /// Jump to the first declaration named like the identifier under the cursor.
    pub async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let position = params.text_document_position_params;
        let uri = position.text_document.uri;
        let workspace = self.workspace.read().await;
        let document = open_document(&workspace, &uri)?;

        let offset = document.position_to_offset(position.position);
        let Some(word) = word_at(document.text(), offset) else {
            return Ok(None);
        };
        let name = word.slice(document.text());

        let definition = workspace.symbols(&uri).and_then(|symbols| {
            symbols
                .iter()
                .find(|symbol| symbol.name == name)
                .map(|symbol| Location::new(uri.clone(), document.range_of(symbol.name_range())))
        });

        Ok(definition.map(GotoDefinitionResponse::Scalar))
    }
}

fn open_document<'a>(
    workspace: &'a Workspace,
    uri: &Url,
) -> std::result::Result<&'a Document, HandlerError> {
    workspace
        .get_document(uri)
        .ok_or_else(|| HandlerError::DocumentNotOpen(uri.clone()))
}
