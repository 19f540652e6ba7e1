//! Syntax highlighting module
//!
//! Provides tree-sitter based highlighting for fenced code blocks with:
//! - An allow-list of fence identifiers and their aliases
//! - A grammar cache that shares one fetch between concurrent requests
//! - A scheduler that highlights rendered output once grammars settle
//!
//! ## Flow
//!
//! ```text
//! render → RenderedContainer → HighlightScheduler::apply_to_container
//!        → GrammarCache::ensure_loaded (per distinct id, concurrently)
//!        → Grammar::highlight (per element whose grammar Loaded)
//! ```

mod cache;
mod grammar;
mod highlights;
mod languages;
mod scheduler;

pub use cache::{GrammarCache, GrammarState};
pub use grammar::{builtin_query, BuiltinGrammars, Grammar, GrammarError, GrammarSource};
pub use highlights::{
    css_class, highlight_id_for_name, spans_to_html, HighlightId, HighlightSpan, HIGHLIGHT_NAMES,
};
pub use languages::LanguageId;
pub use scheduler::{HighlightReport, HighlightScheduler};
