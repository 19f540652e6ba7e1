//! Highlight names and span emission
//!
//! Capture names from the grammar queries are folded onto a fixed set of
//! highlight classes, then written out as `<span class="hl-...">` runs over
//! escaped source text.

/// Standard tree-sitter capture names mapped to CSS classes.
/// Index into this array is the HighlightId.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",             // @attribute
    "boolean",               // @boolean (true, false)
    "comment",               // @comment
    "constant",              // @constant
    "constant.builtin",      // @constant.builtin (null, nil)
    "constructor",           // @constructor (new Foo)
    "escape",                // @escape (string escapes)
    "function",              // @function
    "function.builtin",      // @function.builtin (echo, print)
    "function.method",       // @function.method
    "keyword",               // @keyword
    "keyword.return",        // @keyword.return
    "keyword.function",      // @keyword.function (function, fn)
    "keyword.operator",      // @keyword.operator (and, or)
    "label",                 // @label
    "number",                // @number
    "operator",              // @operator
    "property",              // @property
    "punctuation",           // @punctuation (general)
    "punctuation.bracket",   // @punctuation.bracket
    "punctuation.delimiter", // @punctuation.delimiter
    "punctuation.special",   // @punctuation.special
    "string",                // @string
    "string.special",        // @string.special (regex, heredoc)
    "tag",                   // @tag (HTML tags)
    "tag.attribute",         // @tag.attribute
    "type",                  // @type
    "type.builtin",          // @type.builtin (int, string, bool)
    "variable",              // @variable
    "variable.builtin",      // @variable.builtin (this, self)
    "variable.parameter",    // @variable.parameter
];

/// Index into HIGHLIGHT_NAMES
pub type HighlightId = u16;

/// A captured byte range of the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub highlight: HighlightId,
}

/// Look up highlight ID by capture name
pub fn highlight_id_for_name(name: &str) -> Option<HighlightId> {
    // Handle hierarchical names: try exact match first, then progressively shorter
    // parents (e.g. "keyword.control.import" -> "keyword.control" -> "keyword").
    let mut current = name;
    loop {
        if let Some(pos) = HIGHLIGHT_NAMES.iter().position(|&n| n == current) {
            return Some(pos as HighlightId);
        }

        let Some(dot_pos) = current.rfind('.') else {
            break;
        };
        current = &current[..dot_pos];
    }

    None
}

/// CSS class for a highlight, e.g. `hl-keyword-function`
pub fn css_class(id: HighlightId) -> String {
    let name = HIGHLIGHT_NAMES.get(id as usize).copied().unwrap_or("text");
    format!("hl-{}", name.replace('.', "-"))
}

/// Escape `& < > " '` the same way the renderer does for code regions
pub fn escape_code(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

/// Write `source` as escaped HTML with one `<span>` per highlighted run
///
/// Spans may overlap or nest; the innermost capture wins, and for identical
/// ranges the first capture wins. Uncaptured text is emitted escaped.
pub fn spans_to_html(source: &str, spans: &[HighlightSpan]) -> String {
    let mut paint: Vec<Option<HighlightId>> = vec![None; source.len()];

    let mut ordered: Vec<&HighlightSpan> = spans
        .iter()
        .filter(|s| s.start < s.end && s.end <= source.len())
        .collect();
    // Outer spans first so inner ones overwrite them
    ordered.sort_by_key(|s| (s.start, std::cmp::Reverse(s.end)));
    ordered.dedup_by_key(|s| (s.start, s.end));

    for span in ordered {
        for slot in &mut paint[span.start..span.end] {
            *slot = Some(span.highlight);
        }
    }

    let mut html = String::with_capacity(source.len() * 2);
    let mut run_start = 0;
    while run_start < source.len() {
        let current = paint[run_start];
        let mut run_end = run_start + 1;
        while run_end < source.len()
            && (paint[run_end] == current || !source.is_char_boundary(run_end))
        {
            run_end += 1;
        }

        let text = escape_code(&source[run_start..run_end]);
        match current {
            Some(id) => {
                html.push_str("<span class=\"");
                html.push_str(&css_class(id));
                html.push_str("\">");
                html.push_str(&text);
                html.push_str("</span>");
            }
            None => html.push_str(&text),
        }
        run_start = run_end;
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_id_lookup() {
        assert!(highlight_id_for_name("keyword").is_some());
        assert!(highlight_id_for_name("keyword.function").is_some());
        assert!(highlight_id_for_name("keyword.control.import").is_some());
        assert!(highlight_id_for_name("string").is_some());
        assert!(highlight_id_for_name("nonexistent").is_none());
    }

    #[test]
    fn test_css_class_uses_dashes() {
        let id = highlight_id_for_name("keyword.function").unwrap();
        assert_eq!(css_class(id), "hl-keyword-function");
    }

    #[test]
    fn test_spans_to_html_escapes_everything() {
        let html = spans_to_html("a < b && \"c\"", &[]);
        assert_eq!(html, "a &lt; b &amp;&amp; &quot;c&quot;");
    }

    #[test]
    fn test_inner_span_wins() {
        let string = highlight_id_for_name("string").unwrap();
        let escape = highlight_id_for_name("escape").unwrap();
        let source = "\"a\\nb\"";
        let spans = [
            HighlightSpan { start: 0, end: 6, highlight: string },
            HighlightSpan { start: 2, end: 4, highlight: escape },
        ];
        let html = spans_to_html(source, &spans);
        assert_eq!(
            html,
            "<span class=\"hl-string\">&quot;a</span>\
             <span class=\"hl-escape\">\\n</span>\
             <span class=\"hl-string\">b&quot;</span>"
        );
    }

    #[test]
    fn test_first_capture_wins_for_same_range() {
        let function = highlight_id_for_name("function").unwrap();
        let variable = highlight_id_for_name("variable").unwrap();
        let spans = [
            HighlightSpan { start: 0, end: 3, highlight: function },
            HighlightSpan { start: 0, end: 3, highlight: variable },
        ];
        assert_eq!(
            spans_to_html("foo", &spans),
            "<span class=\"hl-function\">foo</span>"
        );
    }

    #[test]
    fn test_multibyte_text_stays_intact() {
        let string = highlight_id_for_name("string").unwrap();
        let spans = [HighlightSpan { start: 0, end: 4, highlight: string }];
        let html = spans_to_html("\"é\" ü", &spans);
        assert_eq!(html, "<span class=\"hl-string\">&quot;é&quot;</span> ü");
    }
}
