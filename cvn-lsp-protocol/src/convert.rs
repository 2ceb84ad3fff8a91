//! Conversions from core analysis values to LSP wire types.

use crate::document::Document;
use crate::error::HandlerError;
use cvn_lsp_core::{Candidate, CandidateKind, Detail, DetailTag, Severity, Symbol, SymbolKind};
use lsp_types::{
    CompletionItem, CompletionItemKind, Diagnostic, DiagnosticSeverity, DocumentSymbol,
    Documentation, InsertTextFormat,
};

pub fn to_lsp_diagnostic(document: &Document, diagnostic: &cvn_lsp_core::Diagnostic) -> Diagnostic {
    let severity = match diagnostic.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    Diagnostic::new(
        document.range_of(diagnostic.range),
        Some(severity),
        None,
        Some(diagnostic.source.to_string()),
        diagnostic.message.clone(),
        None,
        None,
    )
}

pub fn completion_item_kind(kind: CandidateKind) -> CompletionItemKind {
    match kind {
        CandidateKind::Keyword => CompletionItemKind::KEYWORD,
        CandidateKind::Command | CandidateKind::Transition => CompletionItemKind::FUNCTION,
        CandidateKind::AssetSubtype => CompletionItemKind::ENUM_MEMBER,
        CandidateKind::Character => CompletionItemKind::CLASS,
        CandidateKind::Asset => CompletionItemKind::VALUE,
        CandidateKind::Style => CompletionItemKind::STRUCT,
        CandidateKind::Property => CompletionItemKind::PROPERTY,
    }
}

/// Candidate to completion item; the detail tag travels in `data` until resolve.
pub fn to_completion_item(candidate: Candidate) -> CompletionItem {
    let insert_text_format = candidate
        .template
        .as_ref()
        .map(|_| InsertTextFormat::SNIPPET);

    CompletionItem {
        label: candidate.label,
        kind: Some(completion_item_kind(candidate.kind)),
        detail: candidate.detail,
        insert_text: candidate.template,
        insert_text_format,
        data: candidate
            .detail_tag
            .map(|tag| serde_json::Value::String(tag.as_str().to_string())),
        ..Default::default()
    }
}

/// Detail tag carried by a completion item echoed back by the client.
pub fn detail_tag(item: &CompletionItem) -> Result<Option<DetailTag>, HandlerError> {
    match &item.data {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(tag)) => Ok(Some(tag.parse()?)),
        Some(other) => Err(HandlerError::UnexpectedCompletionData(other.clone())),
    }
}

pub fn apply_detail(item: &mut CompletionItem, detail: Detail) {
    item.detail = Some(detail.title.to_string());
    item.documentation = Some(Documentation::String(detail.documentation.to_string()));
}

pub fn lsp_symbol_kind(kind: SymbolKind) -> lsp_types::SymbolKind {
    match kind {
        SymbolKind::Character => lsp_types::SymbolKind::CLASS,
        SymbolKind::Asset => lsp_types::SymbolKind::FILE,
        SymbolKind::Style => lsp_types::SymbolKind::STRUCT,
        SymbolKind::Start => lsp_types::SymbolKind::FUNCTION,
    }
}

#[allow(deprecated)]
pub fn to_document_symbol(document: &Document, symbol: &Symbol) -> DocumentSymbol {
    let name_range = symbol.name_range();
    let full_range = cvn_lsp_core::TextRange::new(symbol.offset, name_range.end);

    DocumentSymbol {
        name: symbol.name.clone(),
        detail: symbol.asset_subtype.map(|subtype| subtype.to_string()),
        kind: lsp_symbol_kind(symbol.kind),
        tags: None,
        deprecated: None,
        range: document.range_of(full_range),
        selection_range: document.range_of(name_range),
        children: None,
    }
}
