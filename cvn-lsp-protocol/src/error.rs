use cvn_lsp_core::VocabularyError;
use lsp_types::Url;
use thiserror::Error;
use tower_lsp::jsonrpc::{Error as RpcError, ErrorCode};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("document is not open: {0}")]
    DocumentNotOpen(Url),

    #[error("invalid completion item data: {0}")]
    InvalidCompletionData(#[from] VocabularyError),

    #[error("completion item data is not a detail tag: {0}")]
    UnexpectedCompletionData(serde_json::Value),
}

impl From<HandlerError> for RpcError {
    fn from(error: HandlerError) -> Self {
        RpcError {
            code: ErrorCode::InvalidParams,
            message: error.to_string().into(),
            data: None,
        }
    }
}
