use crate::text::clamp_offset;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// How many characters before an opening brace are inspected to classify it.
pub const LOOKBACK_CHARS: usize = 100;

static CHARACTER_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)character\s+[A-Za-z0-9_]+\s*$").expect("character header pattern")
});

static STYLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)style\s+[A-Za-z0-9_]+\s*$").expect("style header pattern")
});

static SHOW_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)show\s+.*$").expect("show header pattern"));

static START_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)start\s*$").expect("start header pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Character,
    Style,
    Show,
    Start,
    Unknown,
}

/// A brace-delimited region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    /// Offset of the opening brace.
    pub start_offset: usize,
    /// Offset of the matching closing brace, `None` while the block is still open.
    pub end_offset: Option<usize>,
}

/// Whether more braces have been opened than closed before `offset`.
pub fn is_inside_block(text: &str, offset: usize) -> bool {
    let offset = clamp_offset(text, offset);
    let depth = text[..offset].bytes().fold(0i64, |depth, b| match b {
        b'{' => depth + 1,
        b'}' => depth - 1,
        _ => depth,
    });
    depth > 0
}

/// The innermost block whose opening brace precedes `offset` and is not closed before it.
pub fn containing_block(text: &str, offset: usize) -> Option<Block> {
    let offset = clamp_offset(text, offset);
    let bytes = text.as_bytes();

    let mut open = Vec::new();
    for (idx, b) in bytes[..offset].iter().enumerate() {
        match b {
            b'{' => open.push(idx),
            b'}' => {
                open.pop();
            }
            _ => {}
        }
    }
    let start_offset = *open.last()?;

    let mut depth = 0usize;
    let mut end_offset = None;
    for (idx, b) in bytes.iter().enumerate().skip(start_offset) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    end_offset = Some(idx);
                    break;
                }
            }
            _ => {}
        }
    }

    Some(Block {
        kind: classify_header(text, start_offset),
        start_offset,
        end_offset,
    })
}

/// Classify the block opened at `brace` from the text just before it.
///
/// Only the last [`LOOKBACK_CHARS`] characters are considered, so a header
/// longer than that reads as [`BlockKind::Unknown`].
pub fn classify_header(text: &str, brace: usize) -> BlockKind {
    let brace = clamp_offset(text, brace);
    let before = &text[..brace];
    let window_start = before
        .char_indices()
        .rev()
        .nth(LOOKBACK_CHARS - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let header = &before[window_start..];

    if CHARACTER_HEADER.is_match(header) {
        BlockKind::Character
    } else if STYLE_HEADER.is_match(header) {
        BlockKind::Style
    } else if SHOW_HEADER.is_match(header) {
        BlockKind::Show
    } else if START_HEADER.is_match(header) {
        BlockKind::Start
    } else {
        BlockKind::Unknown
    }
}
