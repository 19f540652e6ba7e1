//! Language identification for fenced code blocks
//!
//! Maps the identifier after a code fence (`language-<id>` once rendered) to a
//! supported grammar. Anything not listed here is rejected before a fetch starts.

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    JavaScript,
    TypeScript,
    Python,
    Rust,
    Bash,
    Json,
    Go,
    Java,
    C,
    Cpp,
    Css,
    Html,
    Yaml,
    Markdown,
}

impl LanguageId {
    /// Every language with a grammar, in allow-list order
    pub const ALL: [LanguageId; 14] = [
        LanguageId::JavaScript,
        LanguageId::TypeScript,
        LanguageId::Python,
        LanguageId::Rust,
        LanguageId::Bash,
        LanguageId::Json,
        LanguageId::Go,
        LanguageId::Java,
        LanguageId::C,
        LanguageId::Cpp,
        LanguageId::Css,
        LanguageId::Html,
        LanguageId::Yaml,
        LanguageId::Markdown,
    ];

    /// Resolve a fence identifier, accepting common aliases
    pub fn from_identifier(id: &str) -> Option<Self> {
        let lang = match id.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" | "jsx" | "mjs" => LanguageId::JavaScript,
            "typescript" | "ts" => LanguageId::TypeScript,
            "python" | "py" => LanguageId::Python,
            "rust" | "rs" => LanguageId::Rust,
            "bash" | "sh" | "shell" | "zsh" => LanguageId::Bash,
            "json" => LanguageId::Json,
            "go" | "golang" => LanguageId::Go,
            "java" => LanguageId::Java,
            "c" | "h" => LanguageId::C,
            "cpp" | "c++" | "cc" | "cxx" | "hpp" => LanguageId::Cpp,
            "css" => LanguageId::Css,
            "html" | "htm" | "markup" => LanguageId::Html,
            "yaml" | "yml" => LanguageId::Yaml,
            "markdown" | "md" => LanguageId::Markdown,
            _ => return None,
        };
        Some(lang)
    }

    /// Canonical identifier, used for resource naming and logs
    pub fn identifier(&self) -> &'static str {
        match self {
            LanguageId::JavaScript => "javascript",
            LanguageId::TypeScript => "typescript",
            LanguageId::Python => "python",
            LanguageId::Rust => "rust",
            LanguageId::Bash => "bash",
            LanguageId::Json => "json",
            LanguageId::Go => "go",
            LanguageId::Java => "java",
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
            LanguageId::Css => "css",
            LanguageId::Html => "html",
            LanguageId::Yaml => "yaml",
            LanguageId::Markdown => "markdown",
        }
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::JavaScript => "JavaScript",
            LanguageId::TypeScript => "TypeScript",
            LanguageId::Python => "Python",
            LanguageId::Rust => "Rust",
            LanguageId::Bash => "Bash",
            LanguageId::Json => "JSON",
            LanguageId::Go => "Go",
            LanguageId::Java => "Java",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
            LanguageId::Css => "CSS",
            LanguageId::Html => "HTML",
            LanguageId::Yaml => "YAML",
            LanguageId::Markdown => "Markdown",
        }
    }

    /// Relative resource path of the highlight query: `queries/<id>/highlights.scm`
    pub fn query_resource(&self) -> String {
        format!("queries/{}/highlights.scm", self.identifier())
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}
