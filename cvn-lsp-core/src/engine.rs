use crate::completion::{compute_candidates, detail_for, Candidate, Detail};
use crate::diagnostics::{validate, Diagnostic};
use crate::symbol::{extract_symbols, Symbol};
use crate::text::{clamp_offset, line_prefix};
use crate::vocabulary::DetailTag;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Result of a full reanalysis of one document revision.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub symbols: Arc<[Symbol]>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Owns the per-document symbol cache and sequences the analysis passes.
///
/// The cache starts empty, is replaced wholesale by [`Engine::analyze`] and
/// loses its entry on [`Engine::close`]. Entries are shared snapshots, so a
/// reader holding an older list keeps it intact when a newer one is stored.
#[derive(Debug, Default)]
pub struct Engine {
    symbols: HashMap<String, Arc<[Symbol]>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract symbols and diagnostics for `text`, caching the symbols under `document`.
    pub fn analyze(&mut self, document: &str, text: &str) -> Analysis {
        let symbols: Arc<[Symbol]> = extract_symbols(text).into();
        let diagnostics = validate(text, &symbols);

        debug!(
            "Analyzed {}: {} symbols, {} diagnostics",
            document,
            symbols.len(),
            diagnostics.len()
        );

        self.symbols.insert(document.to_string(), Arc::clone(&symbols));

        Analysis {
            symbols,
            diagnostics,
        }
    }

    /// Last symbol list computed for `document`.
    pub fn symbols(&self, document: &str) -> Option<Arc<[Symbol]>> {
        self.symbols.get(document).cloned()
    }

    /// Completion candidates at `offset` using the cached symbols of `document`.
    ///
    /// A document that was never analyzed completes against an empty symbol list.
    pub fn complete(&self, document: &str, text: &str, offset: usize) -> Vec<Candidate> {
        let offset = clamp_offset(text, offset);
        let prefix = line_prefix(text, offset);
        let symbols = self.symbols(document).unwrap_or_else(|| Arc::from(Vec::new()));

        let candidates = compute_candidates(prefix, text, offset, &symbols);
        trace!(
            "Completion in {} at {} ({:?}): {} candidates",
            document,
            offset,
            prefix,
            candidates.len()
        );
        candidates
    }

    /// Documentation for the candidate the host is previewing, by its detail tag.
    pub fn resolve(&self, tag: DetailTag) -> Option<Detail> {
        let detail = detail_for(tag);
        if detail.is_none() {
            debug!("No documentation for detail tag '{}'", tag.as_str());
        }
        detail
    }

    /// Drop the cached symbols of a closed document.
    pub fn close(&mut self, document: &str) -> bool {
        let removed = self.symbols.remove(document).is_some();
        debug!("Closed {} (cached: {})", document, removed);
        removed
    }

    pub fn cached_documents(&self) -> usize {
        self.symbols.len()
    }
}
