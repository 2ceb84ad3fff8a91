//! Context-sensitive completion for CVN documents.
//!
//! Completion is two-phase. [`compute_candidates`] builds a cheap list of
//! labels, kinds and snippet templates; [`resolve_detail`] produces the longer
//! documentation for a single candidate once the editor previews it.

use crate::scope::{containing_block, is_inside_block};
use crate::symbol::{Symbol, SymbolKind};
use crate::vocabulary::{
    block_properties, AssetSubtype, DetailTag, DETAILS, STATEMENTS, TRANSITIONS,
    TRANSITION_ARGUMENT,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static AFTER_ASSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)asset\s+$").expect("asset context pattern"));

static AFTER_SAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)say\s*\(\s*$").expect("say context pattern"));

static AFTER_SHOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)show\s+$").expect("show context pattern"));

static AFTER_SUBTYPE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?-u:\b)({})\s+$", AssetSubtype::alternation());
    Regex::new(&pattern).expect("asset subtype context pattern")
});

static AFTER_USE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)use\s+$").expect("use context pattern"));

static AFTER_WITH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)with\s+$").expect("with context pattern"));

/// What a candidate inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateKind {
    /// Declaration keyword (`character`, `asset`, ...)
    Keyword,
    /// Scene command (`scene`, `say`, ...)
    Command,
    AssetSubtype,
    Character,
    Asset,
    Style,
    Transition,
    Property,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
    pub kind: CandidateKind,
    /// Short one-line description, cheap enough to compute eagerly.
    pub detail: Option<String>,
    /// Snippet with `${n:...}` placeholders.
    pub template: Option<String>,
    /// Set when [`resolve_detail`] has documentation for this candidate.
    pub detail_tag: Option<DetailTag>,
}

impl Candidate {
    fn plain(label: impl Into<String>, kind: CandidateKind, detail: String) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: Some(detail),
            template: None,
            detail_tag: None,
        }
    }

    fn templated(label: impl Into<String>, kind: CandidateKind, template: String) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            template: Some(template),
            detail_tag: None,
        }
    }
}

/// Documentation resolved for a previewed candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    pub title: &'static str,
    pub documentation: &'static str,
}

/// Candidates for a cursor at `cursor_offset` whose line reads `line_prefix` so far.
///
/// Contexts are not exclusive: every matching context contributes its
/// candidates, in a fixed order.
pub fn compute_candidates(
    line_prefix: &str,
    full_text: &str,
    cursor_offset: usize,
    symbols: &[Symbol],
) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    if is_statement_start(line_prefix) {
        candidates.extend(STATEMENTS.iter().map(|statement| Candidate {
            label: statement.label.to_string(),
            kind: statement.kind,
            detail: None,
            template: Some(statement.template.to_string()),
            detail_tag: statement.detail_tag,
        }));
    }

    if AFTER_ASSET.is_match(line_prefix) {
        candidates.extend(AssetSubtype::ALL.iter().map(|subtype| {
            Candidate::plain(
                subtype.as_str(),
                CandidateKind::AssetSubtype,
                format!("Asset type: {}", subtype),
            )
        }));
    }

    if AFTER_SAY.is_match(line_prefix) || AFTER_SHOW.is_match(line_prefix) {
        candidates.extend(symbols_of(symbols, SymbolKind::Character).map(|symbol| {
            Candidate::plain(
                &symbol.name,
                CandidateKind::Character,
                format!("Character: {}", symbol.name),
            )
        }));
    }

    if let Some(subtype) = AFTER_SUBTYPE
        .captures(line_prefix)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<AssetSubtype>().ok())
    {
        candidates.extend(
            symbols
                .iter()
                .filter(|symbol| symbol.is_asset_of(subtype))
                .map(|symbol| {
                    Candidate::plain(
                        &symbol.name,
                        CandidateKind::Asset,
                        format!("{}: {}", subtype, symbol.name),
                    )
                }),
        );
    }

    if AFTER_USE.is_match(line_prefix) {
        candidates.extend(symbols_of(symbols, SymbolKind::Style).map(|symbol| {
            Candidate::plain(
                &symbol.name,
                CandidateKind::Style,
                format!("Style: {}", symbol.name),
            )
        }));
    }

    if AFTER_WITH.is_match(line_prefix) {
        candidates.extend(TRANSITIONS.iter().map(|transition| {
            Candidate::templated(
                *transition,
                CandidateKind::Transition,
                format!("{}({})", transition, TRANSITION_ARGUMENT),
            )
        }));
    }

    if is_inside_block(full_text, cursor_offset) {
        if let Some(block) = containing_block(full_text, cursor_offset) {
            candidates.extend(block_properties(block.kind).iter().map(|property| {
                Candidate::templated(
                    *property,
                    CandidateKind::Property,
                    format!("{}: ${{1}};", property),
                )
            }));
        }
    }

    candidates
}

/// Documentation for `candidate`, if its tag has any.
pub fn resolve_detail(candidate: &Candidate) -> Option<Detail> {
    candidate.detail_tag.and_then(detail_for)
}

pub(crate) fn detail_for(tag: DetailTag) -> Option<Detail> {
    DETAILS
        .iter()
        .find(|entry| entry.tag == tag)
        .map(|entry| Detail {
            title: entry.title,
            documentation: entry.documentation,
        })
}

/// Empty, or the last meaningful character closes a statement or opens a block.
pub fn is_statement_start(line_prefix: &str) -> bool {
    let trimmed = line_prefix.trim();
    trimmed.is_empty() || trimmed.ends_with('{') || trimmed.ends_with(';')
}

fn symbols_of(symbols: &[Symbol], kind: SymbolKind) -> impl Iterator<Item = &Symbol> {
    symbols.iter().filter(move |symbol| symbol.kind == kind)
}
