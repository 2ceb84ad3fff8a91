//! Semantic and syntactic checks over a CVN document.
//!
//! [`validate`] runs four independent passes and concatenates their output:
//! duplicate declarations, undefined references, brace/literal syntax, and
//! recommended character properties. Each pass is total; malformed input only
//! ever produces more diagnostics.

use crate::symbol::{Symbol, SymbolKind};
use crate::text::TextRange;
use crate::vocabulary::{AssetSubtype, REQUIRED_CHARACTER_PROPERTY};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::warn;

/// Source tag carried by every diagnostic this crate produces.
pub const DIAGNOSTIC_SOURCE: &str = "cvn";

static SAY_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)say\s*\(\s*([A-Za-z0-9_]+)\s*,").expect("say call pattern")
});

static SCENE_BG: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?-u:\b)scene\s+{}\s+([A-Za-z0-9_]+)",
        AssetSubtype::Bg.as_str()
    );
    Regex::new(&pattern).expect("scene background pattern")
});

static USE_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)use\s+([A-Za-z0-9_]+)").expect("use style pattern")
});

// ASCII word boundaries: a non-ASCII letter next to a literal does not extend it.
static HEX_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)0x([0-9a-fA-F]+)(?-u:\b)").expect("hex literal pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub range: TextRange,
    pub message: String,
    pub source: &'static str,
}

impl Diagnostic {
    pub fn error(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            range,
            message: message.into(),
            source: DIAGNOSTIC_SOURCE,
        }
    }

    pub fn warning(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            range,
            message: message.into(),
            source: DIAGNOSTIC_SOURCE,
        }
    }
}

/// Run every check over `text` and the symbols extracted from it.
pub fn validate(text: &str, symbols: &[Symbol]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    check_duplicates(symbols, &mut diagnostics);
    check_undefined_references(text, symbols, &mut diagnostics);
    check_syntax(text, &mut diagnostics);
    check_required_properties(text, symbols, &mut diagnostics);
    diagnostics
}

/// Flag every declaration whose kind and name were already declared.
pub fn check_duplicates(symbols: &[Symbol], diagnostics: &mut Vec<Diagnostic>) {
    let mut seen: HashMap<(SymbolKind, &str), &Symbol> = HashMap::new();

    for symbol in symbols {
        match seen.get(&(symbol.kind, symbol.name.as_str())) {
            Some(first) => diagnostics.push(Diagnostic::error(
                symbol.name_range(),
                format!(
                    "Duplicate {} '{}' (first defined on line {})",
                    symbol.kind, symbol.name, first.line
                ),
            )),
            None => {
                seen.insert((symbol.kind, symbol.name.as_str()), symbol);
            }
        }
    }
}

/// Flag dialogue speakers, scene backgrounds and styles that were never declared.
pub fn check_undefined_references(
    text: &str,
    symbols: &[Symbol],
    diagnostics: &mut Vec<Diagnostic>,
) {
    let characters: HashSet<&str> = symbols
        .iter()
        .filter(|s| s.kind == SymbolKind::Character)
        .map(|s| s.name.as_str())
        .collect();
    report_unknown(text, &SAY_CALL, &characters, "character", diagnostics);

    let backgrounds: HashSet<&str> = symbols
        .iter()
        .filter(|s| s.is_asset_of(AssetSubtype::Bg))
        .map(|s| s.name.as_str())
        .collect();
    report_unknown(text, &SCENE_BG, &backgrounds, "background asset", diagnostics);

    let styles: HashSet<&str> = symbols
        .iter()
        .filter(|s| s.kind == SymbolKind::Style)
        .map(|s| s.name.as_str())
        .collect();
    report_unknown(text, &USE_STYLE, &styles, "style", diagnostics);
}

fn report_unknown(
    text: &str,
    pattern: &Regex,
    known: &HashSet<&str>,
    what: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for captures in pattern.captures_iter(text) {
        let Some(name) = captures.get(1) else {
            continue;
        };
        if !known.contains(name.as_str()) {
            diagnostics.push(Diagnostic::error(
                TextRange::new(name.start(), name.end()),
                format!("Undefined {} '{}'", what, name.as_str()),
            ));
        }
    }
}

/// Brace balance and colour literal checks.
pub fn check_syntax(text: &str, diagnostics: &mut Vec<Diagnostic>) {
    let mut open = Vec::new();

    for (idx, b) in text.bytes().enumerate() {
        match b {
            b'{' => open.push(idx),
            b'}' => {
                // Depth stays at zero, so later braces are checked afresh.
                if open.pop().is_none() {
                    diagnostics.push(Diagnostic::error(
                        TextRange::at(idx, 1),
                        "Unmatched closing brace",
                    ));
                }
            }
            _ => {}
        }
    }

    if let Some(&last) = open.last() {
        diagnostics.push(Diagnostic::error(TextRange::at(last, 1), "Unclosed brace"));
    }

    for captures in HEX_LITERAL.captures_iter(text) {
        let (Some(literal), Some(digits)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let count = digits.as_str().len();
        if count != 6 && count != 8 {
            diagnostics.push(Diagnostic::warning(
                TextRange::new(literal.start(), literal.end()),
                format!(
                    "Color literal should be 6 hex digits (0xRRGGBB) or 8 for alpha (0xRRGGBBAA), got {}",
                    count
                ),
            ));
        }
    }
}

/// Warn about character blocks that omit the recommended property.
pub fn check_required_properties(
    text: &str,
    symbols: &[Symbol],
    diagnostics: &mut Vec<Diagnostic>,
) {
    let required = format!("{}:", REQUIRED_CHARACTER_PROPERTY);
    let mut bodies: HashMap<&str, Option<Regex>> = HashMap::new();

    for symbol in symbols.iter().filter(|s| s.kind == SymbolKind::Character) {
        let body_pattern = bodies
            .entry(symbol.name.as_str())
            .or_insert_with(|| character_body_pattern(&symbol.name));
        let Some(body_pattern) = body_pattern else {
            continue;
        };
        let Some(body) = body_pattern.captures(text).and_then(|c| c.get(1)) else {
            continue;
        };

        if !body.as_str().contains(&required) {
            diagnostics.push(Diagnostic::warning(
                symbol.name_range(),
                format!(
                    "Character '{}' missing recommended property '{}'",
                    symbol.name, REQUIRED_CHARACTER_PROPERTY
                ),
            ));
        }
    }
}

fn character_body_pattern(name: &str) -> Option<Regex> {
    let pattern = format!(r"character\s+{}\s*\{{([^}}]*)\}}", regex::escape(name));
    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!("Cannot locate body of character '{}': {}", name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::extract_symbols;

    fn run(text: &str) -> Vec<Diagnostic> {
        validate(text, &extract_symbols(text))
    }

    #[test]
    fn test_clean_document_has_no_diagnostics() {
        let text = r#"character Alice {
    display_name: "Alice";
    name_color: 0xff8800;
}
asset bg forest = "forest.png";
style left { x: 0.2; tint: 0xffffffcc; }
start {
    scene bg forest;
    show Alice sprite happy as "a" use left;
    say(Alice, "Hello!");
}"#;
        assert_eq!(run(text), vec![]);
    }

    #[test]
    fn test_duplicate_ranges_over_name() {
        let text = "style s {}\nstyle s {}";
        let diagnostics = run(text);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Duplicate style 's' (first defined on line 0)");
        assert_eq!(diagnostics[0].range.slice(text), "s");
        assert_eq!(diagnostics[0].range.start, 17);
    }

    #[test]
    fn test_same_name_different_kind_is_not_duplicate() {
        let text = "character hero { display_name: \"H\"; }\nstyle hero {}";
        assert!(run(text).is_empty());
    }

    #[test]
    fn test_undefined_scene_background_and_style() {
        let text = "asset sprite forest = \"x\";\nscene bg forest;\nshow A use missing;";
        let messages: Vec<_> = run(text).into_iter().map(|d| d.message).collect();
        assert_eq!(
            messages,
            vec![
                "Undefined background asset 'forest'".to_string(),
                "Undefined style 'missing'".to_string(),
            ]
        );
    }

    #[test]
    fn test_undefined_range_covers_identifier() {
        let text = "say(s, \"x\");";
        let diagnostics = run(text);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range, TextRange::new(4, 5));
    }

    #[test]
    fn test_every_unclosed_reports_once_at_last_open() {
        let text = "start { style s {";
        let diagnostics = run(text);
        let unclosed: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.message == "Unclosed brace")
            .collect();
        assert_eq!(unclosed.len(), 1);
        assert_eq!(unclosed[0].range, TextRange::new(16, 17));
    }

    #[test]
    fn test_hex_warning_message() {
        let diagnostics = run("tint: 0xFFF;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].range, TextRange::new(6, 11));
        assert!(diagnostics[0].message.ends_with("got 3"));
    }

    #[test]
    fn test_missing_display_name_warns_at_name() {
        let text = "character Bob {\n  name_color: 0x00ff00;\n}";
        let diagnostics = run(text);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Character 'Bob' missing recommended property 'display_name'"
        );
        assert_eq!(diagnostics[0].range.slice(text), "Bob");
    }

    #[test]
    fn test_character_without_body_is_not_checked() {
        assert!(run("character Bob;").is_empty());
    }

    #[test]
    fn test_every_diagnostic_carries_source() {
        let diagnostics = run("}\nsay(X, \"\");\n0x1\ncharacter Y {}");
        assert!(!diagnostics.is_empty());
        assert!(diagnostics.iter().all(|d| d.source == DIAGNOSTIC_SOURCE));
    }
}
