//! Rendered output split into markup and highlightable code elements

use std::sync::OnceLock;

use regex::Regex;

fn code_element_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?s)<pre class="language-([^"]+)"><code class="language-([^"]+)">(.*?)</code></pre>"#,
        )
        .expect("code element pattern is a valid regex")
    })
}

/// A `<pre><code class="language-...">` block found in rendered output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeElement {
    /// Class token as written in the markup (still attribute-escaped)
    class_token: String,
    /// Fence identifier, e.g. `javascript` or `js`
    pub language: String,
    /// Escaped body exactly as rendered
    escaped: String,
    /// Decoded source text for the highlighter
    pub source: String,
    pub highlighted: Option<String>,
}

impl CodeElement {
    pub fn is_highlighted(&self) -> bool {
        self.highlighted.is_some()
    }

    fn write_html(&self, out: &mut String) {
        let body = self.highlighted.as_deref().unwrap_or(&self.escaped);
        out.push_str("<pre class=\"language-");
        out.push_str(&self.class_token);
        out.push_str("\"><code class=\"language-");
        out.push_str(&self.class_token);
        out.push_str("\">");
        out.push_str(body);
        out.push_str("</code></pre>");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Markup(String),
    Code(CodeElement),
}

/// The highlight pass works on this instead of a DOM
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedContainer {
    segments: Vec<Segment>,
}

impl RenderedContainer {
    pub fn parse(html: &str) -> Self {
        let mut segments = Vec::new();
        let mut last_end = 0;

        for caps in code_element_pattern().captures_iter(html) {
            let (Some(whole), Some(pre_class), Some(code_class), Some(body)) =
                (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };
            // Only the exact shape the renderer emits
            if pre_class.as_str() != code_class.as_str() {
                continue;
            }

            if whole.start() > last_end {
                segments.push(Segment::Markup(html[last_end..whole.start()].to_string()));
            }

            let class_token = code_class.as_str().to_string();
            segments.push(Segment::Code(CodeElement {
                language: html_escape::decode_html_entities(&class_token).into_owned(),
                class_token,
                escaped: body.as_str().to_string(),
                source: html_escape::decode_html_entities(body.as_str()).into_owned(),
                highlighted: None,
            }));
            last_end = whole.end();
        }

        if last_end < html.len() {
            segments.push(Segment::Markup(html[last_end..].to_string()));
        }

        Self { segments }
    }

    pub fn code_elements(&self) -> impl Iterator<Item = &CodeElement> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Code(code) => Some(code),
            Segment::Markup(_) => None,
        })
    }

    pub fn code_elements_mut(&mut self) -> impl Iterator<Item = &mut CodeElement> {
        self.segments.iter_mut().filter_map(|s| match s {
            Segment::Code(code) => Some(code),
            Segment::Markup(_) => None,
        })
    }

    /// Distinct fence identifiers in document order
    pub fn language_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for code in self.code_elements() {
            if !ids.contains(&code.language) {
                ids.push(code.language.clone());
            }
        }
        ids
    }

    pub fn highlighted_count(&self) -> usize {
        self.code_elements().filter(|c| c.is_highlighted()).count()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Markup(markup) => out.push_str(markup),
                Segment::Code(code) => code.write_html(&mut out),
            }
        }
        out
    }
}
