//! Compiled grammars and the sources they are fetched from

use std::borrow::Cow;
use std::path::PathBuf;

use async_trait::async_trait;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Parser, Query, QueryCursor};

use super::highlights::{highlight_id_for_name, spans_to_html, HighlightId, HighlightSpan};
use super::languages::LanguageId;

/// Why a grammar could not be made available
///
/// `Clone` so one failed fetch can be handed to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("language '{0}' is not supported")]
    Unsupported(String),
    #[error("failed to fetch grammar for {language}: {message}")]
    Fetch { language: LanguageId, message: String },
    #[error("highlight query for {language} is invalid: {message}")]
    Query { language: LanguageId, message: String },
    #[error("grammar fetch for {language} timed out after {timeout_ms}ms")]
    Timeout { language: LanguageId, timeout_ms: u64 },
}

/// A parser language plus its compiled highlight query
pub struct Grammar {
    language: LanguageId,
    ts_language: Language,
    query: Query,
    /// Capture index -> highlight, resolved once at compile time
    capture_highlights: Vec<Option<HighlightId>>,
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("language", &self.language)
            .field("captures", &self.capture_highlights.len())
            .finish()
    }
}

// Grammar crates that ship no usable highlight query
const YAML_HIGHLIGHTS: &str = include_str!("../../queries/yaml/highlights.scm");
const MARKDOWN_HIGHLIGHTS: &str = include_str!("../../queries/markdown/highlights.scm");

fn ts_language(language: LanguageId) -> Language {
    match language {
        LanguageId::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        LanguageId::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        LanguageId::Python => tree_sitter_python::LANGUAGE.into(),
        LanguageId::Rust => tree_sitter_rust::LANGUAGE.into(),
        LanguageId::Bash => tree_sitter_bash::LANGUAGE.into(),
        LanguageId::Json => tree_sitter_json::LANGUAGE.into(),
        LanguageId::Go => tree_sitter_go::LANGUAGE.into(),
        LanguageId::Java => tree_sitter_java::LANGUAGE.into(),
        LanguageId::C => tree_sitter_c::LANGUAGE.into(),
        LanguageId::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        LanguageId::Css => tree_sitter_css::LANGUAGE.into(),
        LanguageId::Html => tree_sitter_html::LANGUAGE.into(),
        LanguageId::Yaml => tree_sitter_yaml::language(),
        LanguageId::Markdown => tree_sitter_md::LANGUAGE.into(),
    }
}

/// The highlight query bundled with each grammar crate
pub fn builtin_query(language: LanguageId) -> Cow<'static, str> {
    match language {
        LanguageId::JavaScript => Cow::Borrowed(tree_sitter_javascript::HIGHLIGHT_QUERY),
        // TypeScript queries extend the JavaScript ones
        LanguageId::TypeScript => Cow::Owned(format!(
            "{}\n{}",
            tree_sitter_javascript::HIGHLIGHT_QUERY,
            tree_sitter_typescript::HIGHLIGHTS_QUERY
        )),
        LanguageId::Python => Cow::Borrowed(tree_sitter_python::HIGHLIGHTS_QUERY),
        LanguageId::Rust => Cow::Borrowed(tree_sitter_rust::HIGHLIGHTS_QUERY),
        LanguageId::Bash => Cow::Borrowed(tree_sitter_bash::HIGHLIGHT_QUERY),
        LanguageId::Json => Cow::Borrowed(tree_sitter_json::HIGHLIGHTS_QUERY),
        LanguageId::Go => Cow::Borrowed(tree_sitter_go::HIGHLIGHTS_QUERY),
        LanguageId::Java => Cow::Borrowed(tree_sitter_java::HIGHLIGHTS_QUERY),
        LanguageId::C => Cow::Borrowed(tree_sitter_c::HIGHLIGHT_QUERY),
        LanguageId::Cpp => Cow::Borrowed(tree_sitter_cpp::HIGHLIGHT_QUERY),
        LanguageId::Css => Cow::Borrowed(tree_sitter_css::HIGHLIGHTS_QUERY),
        LanguageId::Html => Cow::Borrowed(tree_sitter_html::HIGHLIGHTS_QUERY),
        LanguageId::Yaml => Cow::Borrowed(YAML_HIGHLIGHTS),
        LanguageId::Markdown => Cow::Borrowed(MARKDOWN_HIGHLIGHTS),
    }
}

impl Grammar {
    /// Compile `query_source` against the language's parser
    pub fn compile(language: LanguageId, query_source: &str) -> Result<Self, GrammarError> {
        let ts_language = ts_language(language);
        let query = Query::new(&ts_language, query_source).map_err(|e| GrammarError::Query {
            language,
            message: e.to_string(),
        })?;

        let capture_highlights = query
            .capture_names()
            .iter()
            .map(|name| highlight_id_for_name(name))
            .collect();

        Ok(Self {
            language,
            ts_language,
            query,
            capture_highlights,
        })
    }

    pub fn builtin(language: LanguageId) -> Result<Self, GrammarError> {
        Self::compile(language, &builtin_query(language))
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// Collect highlight spans for `source`, or None if it could not be parsed
    pub fn spans(&self, source: &str) -> Option<Vec<HighlightSpan>> {
        let mut parser = Parser::new();
        parser.set_language(&self.ts_language).ok()?;
        let tree = parser.parse(source, None)?;

        let mut spans = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut captures = cursor.captures(&self.query, tree.root_node(), source.as_bytes());
        while let Some((query_match, capture_idx)) = captures.next() {
            let capture = &query_match.captures[*capture_idx];
            let Some(Some(highlight)) = self.capture_highlights.get(capture.index as usize)
            else {
                continue;
            };
            let node = capture.node;
            spans.push(HighlightSpan {
                start: node.start_byte(),
                end: node.end_byte(),
                highlight: *highlight,
            });
        }

        Some(spans)
    }

    /// Highlight `source` into escaped HTML with span markup
    pub fn highlight(&self, source: &str) -> Option<String> {
        let spans = self.spans(source)?;
        Some(spans_to_html(source, &spans))
    }
}

/// Where grammars come from
///
/// Fetches may suspend; the cache bounds each one with a timeout.
#[async_trait]
pub trait GrammarSource: Send + Sync {
    async fn fetch(&self, language: LanguageId) -> Result<Grammar, GrammarError>;
}

/// Grammars linked into the binary, with optional per-user query overrides
///
/// An override lives at `<config>/queries/<id>/highlights.scm` and replaces
/// the bundled query for that language.
#[derive(Debug, Clone, Default)]
pub struct BuiltinGrammars {
    override_root: Option<PathBuf>,
}

impl BuiltinGrammars {
    pub fn new(override_root: Option<PathBuf>) -> Self {
        Self { override_root }
    }

    /// Overrides from the user config directory
    pub fn with_user_overrides() -> Self {
        Self::new(crate::config_paths::config_dir())
    }

    async fn read_override(&self, language: LanguageId) -> Option<String> {
        let path = self.override_root.as_ref()?.join(language.query_resource());
        match tokio::fs::read_to_string(&path).await {
            Ok(source) => {
                tracing::info!("Using highlight query override {}", path.display());
                Some(source)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable query override {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[async_trait]
impl GrammarSource for BuiltinGrammars {
    async fn fetch(&self, language: LanguageId) -> Result<Grammar, GrammarError> {
        let query_source = match self.read_override(language).await {
            Some(source) => Cow::Owned(source),
            None => builtin_query(language),
        };
        let query_source = query_source.into_owned();

        tokio::task::spawn_blocking(move || Grammar::compile(language, &query_source))
            .await
            .map_err(|e| GrammarError::Fetch {
                language,
                message: e.to_string(),
            })?
    }
}
