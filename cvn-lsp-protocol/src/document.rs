use anyhow::{anyhow, Result};
use cvn_lsp_core::{Diagnostic, TextRange};
use lsp_textdocument::FullTextDocument;
use lsp_types::*;

pub struct Document {
    text_document: FullTextDocument,
    uri: Url,
    diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub fn new(text_document_item: TextDocumentItem) -> Self {
        let uri = text_document_item.uri.clone();
        let text_document = FullTextDocument::new(
            text_document_item.language_id,
            text_document_item.version,
            text_document_item.text,
        );

        Self {
            text_document,
            uri,
            diagnostics: Vec::new(),
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn version(&self) -> i32 {
        self.text_document.version()
    }

    pub fn text(&self) -> &str {
        self.text_document.get_content(None)
    }

    /// Get the size in bytes of the document
    pub fn size(&self) -> usize {
        self.text().len()
    }

    /// Apply full or incremental edits, moving the document to `version`.
    pub fn apply_changes(
        &mut self,
        version: i32,
        changes: Vec<TextDocumentContentChangeEvent>,
    ) -> Result<()> {
        if version <= self.version() {
            return Err(anyhow!(
                "Invalid document version ordering for {}. Expected version > {}, received {}",
                self.uri,
                self.version(),
                version
            ));
        }

        self.text_document.update(&changes, version);
        Ok(())
    }

    pub fn position_to_offset(&self, position: Position) -> usize {
        self.text_document.offset_at(position) as usize
    }

    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.size());
        self.text_document.position_at(offset as u32)
    }

    pub fn range_of(&self, range: TextRange) -> Range {
        Range::new(
            self.offset_to_position(range.start),
            self.offset_to_position(range.end),
        )
    }

    /// Diagnostics from the last analysis of this document.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn set_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics = diagnostics;
    }
}
