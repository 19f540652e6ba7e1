//! Preview theme - colors for the rendered page

use crate::model::ThemeMode;

/// Theme colors for the preview page (CSS-formatted)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTheme {
    pub background: String,
    pub text: String,
    pub heading: String,
    pub link: String,
    pub code_background: String,
    pub border: String,
    pub accent: String,
    pub muted: String,
    pub error: String,
    pub syntax: SyntaxColors,
}

/// Colors for the `hl-*` highlight classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxColors {
    pub keyword: String,
    pub string: String,
    pub comment: String,
    pub function: String,
    pub number: String,
    pub type_name: String,
    pub variable: String,
    pub constant: String,
    pub tag: String,
    pub attribute: String,
    pub operator: String,
    pub punctuation: String,
}

impl PreviewTheme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    pub fn light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#24292f".to_string(),
            heading: "#1f2328".to_string(),
            link: "#0969da".to_string(),
            code_background: "#f6f8fa".to_string(),
            border: "#d0d7de".to_string(),
            accent: "#007acc".to_string(),
            muted: "#57606a".to_string(),
            error: "#cf222e".to_string(),
            syntax: SyntaxColors {
                keyword: "#cf222e".to_string(),
                string: "#0a3069".to_string(),
                comment: "#6e7781".to_string(),
                function: "#8250df".to_string(),
                number: "#0550ae".to_string(),
                type_name: "#953800".to_string(),
                variable: "#24292f".to_string(),
                constant: "#0550ae".to_string(),
                tag: "#116329".to_string(),
                attribute: "#0550ae".to_string(),
                operator: "#cf222e".to_string(),
                punctuation: "#57606a".to_string(),
            },
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#1e1e1e".to_string(),
            text: "#d4d4d4".to_string(),
            heading: "#569cd6".to_string(),
            link: "#ce9178".to_string(),
            code_background: "#252526".to_string(),
            border: "#3c3c3c".to_string(),
            accent: "#dcdcaa".to_string(),
            muted: "#858585".to_string(),
            error: "#f48771".to_string(),
            syntax: SyntaxColors {
                keyword: "#569cd6".to_string(),
                string: "#ce9178".to_string(),
                comment: "#6a9955".to_string(),
                function: "#dcdcaa".to_string(),
                number: "#b5cea8".to_string(),
                type_name: "#4ec9b0".to_string(),
                variable: "#9cdcfe".to_string(),
                constant: "#4fc1ff".to_string(),
                tag: "#569cd6".to_string(),
                attribute: "#9cdcfe".to_string(),
                operator: "#d4d4d4".to_string(),
                punctuation: "#808080".to_string(),
            },
        }
    }
}

impl Default for PreviewTheme {
    fn default() -> Self {
        Self::light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_differ() {
        let light = PreviewTheme::for_mode(ThemeMode::Light);
        let dark = PreviewTheme::for_mode(ThemeMode::Dark);
        assert_ne!(light.background, dark.background);
        assert!(light.background.starts_with('#'));
        assert_eq!(PreviewTheme::default(), light);
    }
}
