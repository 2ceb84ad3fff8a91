use thiserror::Error;

/// Errors raised when converting free text into vocabulary tokens.
///
/// Analysis itself never fails; these only surface at API boundaries that
/// accept tokens from outside, such as a completion payload echoed back by a
/// client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyError {
    #[error("unknown asset subtype '{0}'")]
    UnknownAssetSubtype(String),

    #[error("unknown completion detail tag '{0}'")]
    UnknownDetailTag(String),
}
