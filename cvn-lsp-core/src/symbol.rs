use crate::text::{LineIndex, TextRange};
use crate::vocabulary::AssetSubtype;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::warn;

static CHARACTER_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)character\s+([A-Za-z0-9_]+)").expect("character declaration pattern")
});

static ASSET_DECL: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?-u:\b)asset\s+({})\s+([A-Za-z0-9_]+)",
        AssetSubtype::alternation()
    );
    Regex::new(&pattern).expect("asset declaration pattern")
});

static STYLE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)style\s+([A-Za-z0-9_]+)").expect("style declaration pattern")
});

static START_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)start\s*\{").expect("start block pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Character,
    Asset,
    Style,
    Start,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Character => "character",
            SymbolKind::Asset => "asset",
            SymbolKind::Style => "style",
            SymbolKind::Start => "start",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declaration found in a CVN document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Set for asset declarations only.
    pub asset_subtype: Option<AssetSubtype>,
    /// Zero-indexed line of the declaring keyword.
    pub line: usize,
    /// Byte offset of the declaring keyword.
    pub offset: usize,
    /// Byte offset of the declared name.
    pub name_offset: usize,
}

impl Symbol {
    pub fn name_range(&self) -> TextRange {
        TextRange::at(self.name_offset, self.name.len())
    }

    pub fn is_asset_of(&self, subtype: AssetSubtype) -> bool {
        self.kind == SymbolKind::Asset && self.asset_subtype == Some(subtype)
    }
}

/// Scan `text` for declarations.
///
/// Characters come first, then assets, styles and start blocks; within each
/// group symbols appear in source order. The scan is lexical, so a
/// declaration spelled inside a string literal or comment is reported too.
pub fn extract_symbols(text: &str) -> Vec<Symbol> {
    let lines = LineIndex::new(text);
    let mut symbols = Vec::new();

    for captures in CHARACTER_DECL.captures_iter(text) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        symbols.push(Symbol {
            name: name.as_str().to_string(),
            kind: SymbolKind::Character,
            asset_subtype: None,
            line: lines.line_of(whole.start()),
            offset: whole.start(),
            name_offset: name.start(),
        });
    }

    for captures in ASSET_DECL.captures_iter(text) {
        let (Some(whole), Some(subtype), Some(name)) =
            (captures.get(0), captures.get(1), captures.get(2))
        else {
            continue;
        };
        let subtype = match subtype.as_str().parse::<AssetSubtype>() {
            Ok(subtype) => subtype,
            Err(e) => {
                warn!("Skipping asset declaration: {}", e);
                continue;
            }
        };
        symbols.push(Symbol {
            name: name.as_str().to_string(),
            kind: SymbolKind::Asset,
            asset_subtype: Some(subtype),
            line: lines.line_of(whole.start()),
            offset: whole.start(),
            name_offset: name.start(),
        });
    }

    for captures in STYLE_DECL.captures_iter(text) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        symbols.push(Symbol {
            name: name.as_str().to_string(),
            kind: SymbolKind::Style,
            asset_subtype: None,
            line: lines.line_of(whole.start()),
            offset: whole.start(),
            name_offset: name.start(),
        });
    }

    for found in START_BLOCK.find_iter(text) {
        symbols.push(Symbol {
            name: SymbolKind::Start.as_str().to_string(),
            kind: SymbolKind::Start,
            asset_subtype: None,
            line: lines.line_of(found.start()),
            offset: found.start(),
            name_offset: found.start(),
        });
    }

    symbols
}

/// Every whole-word occurrence of `name` in `text`.
pub fn find_references(text: &str, name: &str) -> Vec<TextRange> {
    if name.is_empty() {
        return Vec::new();
    }

    let pattern = format!(r"(?-u:\b){}(?-u:\b)", regex::escape(name));
    match Regex::new(&pattern) {
        Ok(regex) => regex
            .find_iter(text)
            .map(|found| TextRange::new(found.start(), found.end()))
            .collect(),
        Err(e) => {
            warn!("Cannot search references of '{}': {}", name, e);
            Vec::new()
        }
    }
}
