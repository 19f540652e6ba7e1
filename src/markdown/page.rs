//! Standalone HTML page around rendered content

use super::PreviewTheme;
use crate::model::Settings;

/// Seconds between automatic page reloads in the browser
const REFRESH_SECS: u32 = 2;

const SYSTEM_FONT_STACK: &str =
    r#"-apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif"#;

/// Everything that varies between page writes
#[derive(Debug, Clone, Default)]
pub struct PageContent<'a> {
    /// Plain text for `<title>`
    pub title: &'a str,
    /// Inline HTML for the header line; empty hides the header
    pub header_html: &'a str,
    /// Plain text tooltip for the header (the full path)
    pub header_tooltip: &'a str,
    pub body_html: &'a str,
    /// Panels drawn above the content (shortcuts, about)
    pub overlay_html: &'a str,
}

/// Convert content to a complete HTML document with styling
pub fn page_html(content: &PageContent<'_>, settings: &Settings) -> String {
    let theme = PreviewTheme::for_mode(settings.theme);
    let header = if content.header_html.is_empty() {
        String::new()
    } else {
        format!(
            r#"<header class="file-header" title="{}">{}</header>"#,
            html_escape::encode_double_quoted_attribute(content.header_tooltip),
            content.header_html
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta http-equiv="refresh" content="{refresh}">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    {header}
    <main id="markdown-content">{body}</main>
    {overlay}
    <script>{script}</script>
</body>
</html>"#,
        refresh = REFRESH_SECS,
        title = html_escape::encode_text(content.title),
        css = generate_css(&theme, settings),
        header = header,
        body = content.body_html,
        overlay = content.overlay_html,
        script = PANEL_JS,
    )
}

fn font_stack(font_family: &str) -> String {
    if font_family.is_empty() || font_family.eq_ignore_ascii_case("system") {
        SYSTEM_FONT_STACK.to_string()
    } else {
        format!(
            "\"{}\", {}",
            font_family.replace(['"', '<', '>', ';', '{', '}'], ""),
            SYSTEM_FONT_STACK
        )
    }
}

/// Generate CSS from theme colors and user settings
pub fn generate_css(theme: &PreviewTheme, settings: &Settings) -> String {
    let syntax = &theme.syntax;
    format!(
        r#"
* {{
    box-sizing: border-box;
}}

body {{
    font-family: {font_family};
    font-size: {font_size}px;
    line-height: 1.6;
    color: {text};
    background: {background};
    padding: 20px;
    max-width: 860px;
    margin: 0 auto;
}}

.file-header {{
    color: {muted};
    font-size: 0.85em;
    border-bottom: 1px solid {border};
    padding-bottom: 8px;
    margin-bottom: 16px;
}}

h1, h2, h3, h4, h5, h6 {{
    color: {heading};
    margin-top: 24px;
    margin-bottom: 16px;
    font-weight: 600;
    line-height: 1.25;
}}

h1 {{
    font-size: 2em;
    border-bottom: 1px solid {border};
    padding-bottom: 0.3em;
}}

h2 {{
    font-size: 1.5em;
    border-bottom: 1px solid {border};
    padding-bottom: 0.3em;
}}

p {{
    margin-top: 0;
    margin-bottom: 16px;
}}

code {{
    background: {code_background};
    padding: 0.2em 0.4em;
    border-radius: 3px;
    font-family: "SF Mono", "Fira Code", Consolas, "Liberation Mono", Menlo, Courier, monospace;
    font-size: 0.9em;
}}

pre {{
    background: {code_background};
    padding: 16px;
    border-radius: 6px;
    overflow-x: auto;
    margin-top: 0;
    margin-bottom: 16px;
}}

pre code {{
    background: none;
    padding: 0;
    font-size: 0.875em;
    line-height: 1.45;
}}

blockquote {{
    border-left: 4px solid {accent};
    margin: 0 0 16px 0;
    padding: 0 16px;
    color: {muted};
}}

a {{
    color: {link};
    text-decoration: none;
}}

a:hover {{
    text-decoration: underline;
}}

ul, ol {{
    padding-left: 2em;
    margin-top: 0;
    margin-bottom: 16px;
}}

hr {{
    height: 0.25em;
    padding: 0;
    margin: 24px 0;
    background-color: {border};
    border: 0;
}}

table {{
    border-collapse: collapse;
    margin-bottom: 16px;
    width: 100%;
}}

th, td {{
    padding: 6px 13px;
    border: 1px solid {border};
}}

th, tr:nth-child(2n) {{
    background: {code_background};
}}

img {{
    max-width: 100%;
}}

del {{
    color: {muted};
}}

.welcome-message, .loading {{
    text-align: center;
    color: {muted};
    margin-top: 20vh;
}}

.error, .error-message {{
    color: {error};
    border: 1px solid {error};
    border-radius: 6px;
    padding: 12px 16px;
}}

.shortcuts-info {{
    position: fixed;
    bottom: 20px;
    right: 20px;
    background: {code_background};
    border: 1px solid {border};
    border-radius: 6px;
    padding: 12px 16px;
    font-size: 0.85em;
    opacity: 0;
    transition: opacity 0.3s;
}}

.shortcuts-info.show {{
    opacity: 1;
}}

.about-overlay {{
    position: fixed;
    inset: 0;
    background: rgba(0, 0, 0, 0.7);
    display: flex;
    align-items: center;
    justify-content: center;
}}

.about-dialog {{
    background: {background};
    padding: 30px;
    border-radius: 8px;
    max-width: 400px;
    text-align: center;
}}

.hl-keyword, .hl-keyword-return, .hl-keyword-function, .hl-keyword-operator {{ color: {keyword}; }}
.hl-string, .hl-string-special, .hl-escape {{ color: {string}; }}
.hl-comment {{ color: {comment}; font-style: italic; }}
.hl-function, .hl-function-builtin, .hl-function-method, .hl-constructor {{ color: {function}; }}
.hl-number, .hl-boolean {{ color: {number}; }}
.hl-type, .hl-type-builtin {{ color: {type_name}; }}
.hl-variable, .hl-variable-parameter, .hl-property, .hl-label {{ color: {variable}; }}
.hl-variable-builtin, .hl-constant, .hl-constant-builtin {{ color: {constant}; }}
.hl-tag {{ color: {tag}; }}
.hl-attribute, .hl-tag-attribute {{ color: {attribute}; }}
.hl-operator {{ color: {operator}; }}
.hl-punctuation, .hl-punctuation-bracket, .hl-punctuation-delimiter, .hl-punctuation-special {{ color: {punctuation}; }}
"#,
        font_family = font_stack(&settings.font_family),
        font_size = settings.font_size,
        text = theme.text,
        background = theme.background,
        heading = theme.heading,
        link = theme.link,
        code_background = theme.code_background,
        border = theme.border,
        accent = theme.accent,
        muted = theme.muted,
        error = theme.error,
        keyword = syntax.keyword,
        string = syntax.string,
        comment = syntax.comment,
        function = syntax.function,
        number = syntax.number,
        type_name = syntax.type_name,
        variable = syntax.variable,
        constant = syntax.constant,
        tag = syntax.tag,
        attribute = syntax.attribute,
        operator = syntax.operator,
        punctuation = syntax.punctuation,
    )
}

/// Fades a freshly shown shortcuts panel out after three seconds
const PANEL_JS: &str = r#"
const shortcuts = document.querySelector('.shortcuts-info.show');
if (shortcuts) {
    const shownAt = parseInt(shortcuts.getAttribute('data-shown-at') || '0', 10);
    const remaining = Math.max(0, 3000 - (Date.now() - shownAt));
    setTimeout(function() {
        shortcuts.classList.remove('show');
    }, remaining);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ThemeMode;

    #[test]
    fn test_page_carries_title_and_body() {
        let page = page_html(
            &PageContent {
                title: "a<b>.md - Markdown Viewer",
                body_html: "<h1>Hi</h1>",
                ..Default::default()
            },
            &Settings::default(),
        );
        assert!(page.contains("<title>a&lt;b&gt;.md - Markdown Viewer</title>"));
        assert!(page.contains("<main id=\"markdown-content\"><h1>Hi</h1></main>"));
        assert!(!page.contains("file-header\""));
    }

    #[test]
    fn test_header_tooltip_is_escaped() {
        let page = page_html(
            &PageContent {
                header_html: "notes.md",
                header_tooltip: "/tmp/\"x\"/notes.md",
                ..Default::default()
            },
            &Settings::default(),
        );
        assert!(page.contains("title=\"/tmp/&quot;x&quot;/notes.md\""));
    }

    #[test]
    fn test_settings_feed_css() {
        let settings = Settings {
            theme: ThemeMode::Dark,
            font_size: 20,
            font_family: "Georgia".to_string(),
            always_on_top: false,
        };
        let css = generate_css(&PreviewTheme::for_mode(settings.theme), &settings);
        assert!(css.contains("font-size: 20px;"));
        assert!(css.contains("font-family: \"Georgia\", -apple-system"));
        assert!(css.contains(&PreviewTheme::dark().background));
    }

    #[test]
    fn test_system_font_uses_default_stack() {
        assert_eq!(font_stack("system"), SYSTEM_FONT_STACK);
    }
}
