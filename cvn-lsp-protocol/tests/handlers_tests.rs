use cvn_lsp_protocol::{Handlers, Workspace};
use lsp_types::*;
use std::sync::Arc;
use tokio::sync::RwLock;

const STORY: &str = r#"character Alice {
  display_name: "Alice";
}
asset bg forest = "bg/forest.png";
style left {
  x: 0.2;
}
start {
  scene bg forest;
  say(Alice, "Hello");
  show Alice use left;
}"#;

const STORY_URI: &str = "file:///story.cvn";

/// Create a shared workspace with one open document
async fn workspace_with(uri: &str, text: &str) -> Arc<RwLock<Workspace>> {
    let workspace = Arc::new(RwLock::new(Workspace::new()));
    workspace.write().await.open_document(TextDocumentItem {
        uri: Url::parse(uri).unwrap(),
        language_id: "cvn".to_string(),
        version: 1,
        text: text.to_string(),
    });
    workspace
}

fn position_params(uri: &str, line: u32, character: u32) -> TextDocumentPositionParams {
    TextDocumentPositionParams {
        text_document: TextDocumentIdentifier {
            uri: Url::parse(uri).unwrap(),
        },
        position: Position { line, character },
    }
}

fn completion_params(uri: &str, line: u32, character: u32) -> CompletionParams {
    CompletionParams {
        text_document_position: position_params(uri, line, character),
        work_done_progress_params: WorkDoneProgressParams::default(),
        partial_result_params: PartialResultParams::default(),
        context: None,
    }
}

fn reference_params(line: u32, character: u32, include_declaration: bool) -> ReferenceParams {
    ReferenceParams {
        text_document_position: position_params(STORY_URI, line, character),
        work_done_progress_params: WorkDoneProgressParams::default(),
        partial_result_params: PartialResultParams::default(),
        context: ReferenceContext {
            include_declaration,
        },
    }
}

fn labels(response: Option<CompletionResponse>) -> Vec<String> {
    match response {
        Some(CompletionResponse::Array(items)) => items.into_iter().map(|i| i.label).collect(),
        Some(CompletionResponse::List(list)) => list.items.into_iter().map(|i| i.label).collect(),
        None => Vec::new(),
    }
}

/// Test: textDocument/completion after `say(`
/// Purpose: Speaker position offers the declared characters only
#[tokio::test]
async fn test_completion_offers_characters_after_say() {
    let text = "character Alice { display_name: \"A\"; }\nstart {\n  say(";
    let workspace = workspace_with("file:///say.cvn", text).await;
    let handlers = Handlers::new(workspace);

    let response = handlers
        .completion(completion_params("file:///say.cvn", 2, 6))
        .await
        .unwrap();

    assert_eq!(labels(response), vec!["Alice".to_string()]);
}

/// Test: textDocument/completion on an empty line
/// Purpose: Statement keywords are offered as snippets
#[tokio::test]
async fn test_completion_offers_statements_on_empty_document() {
    let workspace = workspace_with("file:///empty.cvn", "").await;
    let handlers = Handlers::new(workspace);

    let response = handlers
        .completion(completion_params("file:///empty.cvn", 0, 0))
        .await
        .unwrap();

    let Some(CompletionResponse::Array(items)) = response else {
        panic!("expected completion items");
    };
    assert_eq!(items.len(), 12);
    assert_eq!(items[0].label, "character");
    assert_eq!(items[0].insert_text_format, Some(InsertTextFormat::SNIPPET));
    assert!(items.iter().all(|item| item.documentation.is_none()));
}

/// Test: textDocument/completion for a document that is not open
/// Purpose: A completion racing didOpen yields no items instead of an error
#[tokio::test]
async fn test_completion_for_unknown_document_is_empty() {
    let workspace = workspace_with(STORY_URI, STORY).await;
    let handlers = Handlers::new(workspace);

    let response = handlers
        .completion(completion_params("file:///missing.cvn", 0, 0))
        .await
        .unwrap();

    assert!(response.is_none());
}

/// Test: textDocument/documentSymbol for a document that is not open
/// Purpose: Navigation requests against unknown documents are rejected with InvalidParams
#[tokio::test]
async fn test_document_symbols_for_unknown_document_is_an_error() {
    let workspace = workspace_with(STORY_URI, STORY).await;
    let handlers = Handlers::new(workspace);

    let error = handlers
        .document_symbols(DocumentSymbolParams {
            text_document: TextDocumentIdentifier {
                uri: Url::parse("file:///missing.cvn").unwrap(),
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        })
        .await
        .unwrap_err();

    assert_eq!(error.code, tower_lsp::jsonrpc::ErrorCode::InvalidParams);
}

/// Test: completionItem/resolve
/// Purpose: Tagged items gain a title and documentation
#[tokio::test]
async fn test_completion_resolve_adds_documentation() {
    let workspace = workspace_with("file:///empty.cvn", "").await;
    let handlers = Handlers::new(workspace);

    let Some(CompletionResponse::Array(items)) = handlers
        .completion(completion_params("file:///empty.cvn", 0, 0))
        .await
        .unwrap()
    else {
        panic!("expected completion items");
    };
    let say = items.into_iter().find(|item| item.label == "say").unwrap();

    let resolved = handlers.completion_resolve(say).await.unwrap();
    assert_eq!(resolved.detail.as_deref(), Some("Say Command"));
    assert_eq!(
        resolved.documentation,
        Some(Documentation::String(
            "Character dialogue: say(Character, \"text\")".to_string()
        ))
    );
}

/// Test: completionItem/resolve with foreign data
/// Purpose: Unknown data leaves the item untouched instead of failing
#[tokio::test]
async fn test_completion_resolve_ignores_malformed_data() {
    let workspace = Arc::new(RwLock::new(Workspace::new()));
    let handlers = Handlers::new(workspace);
    let item = CompletionItem {
        label: "mystery".to_string(),
        data: Some(serde_json::json!({ "id": 7 })),
        ..Default::default()
    };

    let resolved = handlers.completion_resolve(item.clone()).await.unwrap();
    assert_eq!(resolved, item);
}

/// Test: textDocument/documentSymbol
/// Purpose: Every declaration is listed with its name as selection range
#[tokio::test]
async fn test_document_symbols() {
    let workspace = workspace_with(STORY_URI, STORY).await;
    let handlers = Handlers::new(workspace);

    let response = handlers
        .document_symbols(DocumentSymbolParams {
            text_document: TextDocumentIdentifier {
                uri: Url::parse(STORY_URI).unwrap(),
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        })
        .await
        .unwrap();

    let Some(DocumentSymbolResponse::Nested(symbols)) = response else {
        panic!("expected nested document symbols");
    };
    let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "forest", "left", "start"]);

    assert_eq!(symbols[0].kind, SymbolKind::CLASS);
    assert_eq!(
        symbols[0].selection_range,
        Range::new(Position::new(0, 10), Position::new(0, 15))
    );
    assert_eq!(symbols[1].detail.as_deref(), Some("bg"));
    assert_eq!(symbols[2].kind, SymbolKind::STRUCT);
}

/// Test: textDocument/references
/// Purpose: Whole-word occurrences, with and without the declaration
#[tokio::test]
async fn test_find_references() {
    let workspace = workspace_with(STORY_URI, STORY).await;
    let handlers = Handlers::new(workspace);

    // Cursor on `Alice` inside say(...)
    let all = handlers
        .find_references(reference_params(9, 7, true))
        .await
        .unwrap()
        .unwrap();
    let lines: Vec<u32> = all.iter().map(|l| l.range.start.line).collect();
    assert_eq!(lines, vec![0, 1, 9, 10]);

    let usages = handlers
        .find_references(reference_params(9, 7, false))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(usages.len(), 3);
    assert!(usages.iter().all(|l| l.range.start != Position::new(0, 10)));
}

/// Test: textDocument/references on whitespace
/// Purpose: No identifier under the cursor means no result
#[tokio::test]
async fn test_find_references_on_whitespace() {
    let workspace = workspace_with(STORY_URI, STORY).await;
    let handlers = Handlers::new(workspace);

    let response = handlers
        .find_references(reference_params(8, 0, true))
        .await
        .unwrap();
    assert!(response.is_none());
}

/// Test: textDocument/definition
/// Purpose: Jump from a style usage to its declaration
#[tokio::test]
async fn test_goto_definition() {
    let workspace = workspace_with(STORY_URI, STORY).await;
    let handlers = Handlers::new(workspace);

    let response = handlers
        .goto_definition(GotoDefinitionParams {
            text_document_position_params: position_params(STORY_URI, 10, 18),
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        })
        .await
        .unwrap();

    let Some(GotoDefinitionResponse::Scalar(location)) = response else {
        panic!("expected a single definition");
    };
    assert_eq!(location.uri.as_str(), STORY_URI);
    assert_eq!(
        location.range,
        Range::new(Position::new(4, 6), Position::new(4, 10))
    );
}

/// Test: textDocument/definition on an undeclared word
/// Purpose: Keywords and unknown names have no definition
#[tokio::test]
async fn test_goto_definition_without_declaration() {
    let workspace = workspace_with(STORY_URI, STORY).await;
    let handlers = Handlers::new(workspace);

    let response = handlers
        .goto_definition(GotoDefinitionParams {
            text_document_position_params: position_params(STORY_URI, 8, 3),
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        })
        .await
        .unwrap();

    assert!(response.is_none());
}
