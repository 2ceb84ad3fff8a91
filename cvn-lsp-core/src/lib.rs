pub mod completion;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod scope;
pub mod symbol;
pub mod text;
pub mod vocabulary;

pub use completion::{compute_candidates, resolve_detail, Candidate, CandidateKind, Detail};
pub use diagnostics::{validate, Diagnostic, Severity, DIAGNOSTIC_SOURCE};
pub use engine::{Analysis, Engine};
pub use error::VocabularyError;
pub use scope::{containing_block, is_inside_block, Block, BlockKind};
pub use symbol::{extract_symbols, find_references, Symbol, SymbolKind};
pub use text::TextRange;
pub use vocabulary::{AssetSubtype, DetailTag};
