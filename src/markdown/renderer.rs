//! Markdown to HTML renderer using pulldown-cmark
//!
//! Fenced code is taken out of the converter's hands: its text is escaped here
//! and wrapped so the fence identifier survives as a `language-<id>` class for
//! the highlight pass. Bare URLs and email addresses in prose become links.

use std::panic::{self, AssertUnwindSafe};

use linkify::{LinkFinder, LinkKind};
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
}

/// Render markdown to an HTML fragment
///
/// Never fails: a converter panic becomes an inline error block.
pub fn render(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    guarded(|| render_blocks(text))
}

/// Render markdown without block wrappers, for titles and headers
pub fn render_inline(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    guarded(|| render_inline_events(text))
}

fn guarded(render: impl FnOnce() -> String) -> String {
    match panic::catch_unwind(AssertUnwindSafe(render)) {
        Ok(html) => html,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown error".to_string());
            tracing::error!("Error rendering markdown: {}", message);
            error_fragment(&message)
        }
    }
}

/// The inline block shown in place of content that failed to render
pub fn error_fragment(message: &str) -> String {
    format!(
        "<div class=\"error\">Error rendering markdown: {}</div>",
        html_escape::encode_text(message)
    )
}

/// `<pre class="language-x"><code class="language-x">...</code></pre>`
pub fn code_block_html(language: Option<&str>, code: &str) -> String {
    let code = html_escape::encode_quoted_attribute(code);
    match language {
        Some(lang) => {
            let lang = html_escape::encode_double_quoted_attribute(lang);
            format!(
                "<pre class=\"language-{lang}\"><code class=\"language-{lang}\">{code}</code></pre>\n"
            )
        }
        None => format!("<pre><code>{code}</code></pre>\n"),
    }
}

fn fence_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        // Only the first word of the info string names the language
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}

/// Link bare URLs and emails in text that is not already inside a link
fn linkify<'a>(events: impl IntoIterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let finder = LinkFinder::new();
    let mut out = Vec::new();
    // Links, images and raw `<a>` elements
    let mut nested = 0usize;

    for event in events {
        match event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => {
                nested += 1;
                out.push(event);
            }
            Event::End(TagEnd::Link | TagEnd::Image) => {
                nested = nested.saturating_sub(1);
                out.push(event);
            }
            Event::InlineHtml(ref tag) => {
                let tag = tag.trim_start().to_ascii_lowercase();
                if tag.starts_with("<a ") || tag.starts_with("<a>") {
                    nested += 1;
                } else if tag.starts_with("</a") {
                    nested = nested.saturating_sub(1);
                }
                out.push(event);
            }
            Event::Text(text) if nested == 0 => push_linkified(&finder, text, &mut out),
            other => out.push(other),
        }
    }
    out
}

fn push_linkified<'a>(finder: &LinkFinder, text: CowStr<'a>, out: &mut Vec<Event<'a>>) {
    if finder.links(&text).next().is_none() {
        out.push(Event::Text(text));
        return;
    }

    for span in finder.spans(&text) {
        let piece = span.as_str().to_string();
        let link_type = match span.kind() {
            None => {
                out.push(Event::Text(piece.into()));
                continue;
            }
            Some(LinkKind::Email) => LinkType::Email,
            Some(_) => LinkType::Autolink,
        };
        out.push(Event::Start(Tag::Link {
            link_type,
            dest_url: piece.clone().into(),
            title: "".into(),
            id: "".into(),
        }));
        out.push(Event::Text(piece.into()));
        out.push(Event::End(TagEnd::Link));
    }
}

fn render_blocks(text: &str) -> String {
    let parser = TextMergeStream::new(Parser::new_ext(text, options()));

    let mut events = Vec::new();
    let mut code_block: Option<(Option<String>, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                code_block = Some((fence_language(&kind), String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, code)) = code_block.take() {
                    events.push(Event::Html(
                        code_block_html(language.as_deref(), &code).into(),
                    ));
                }
            }
            Event::Text(t) if code_block.is_some() => {
                if let Some((_, code)) = code_block.as_mut() {
                    code.push_str(&t);
                }
            }
            other => events.push(other),
        }
    }

    let mut html_output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut html_output, linkify(events).into_iter());
    html_output
}

fn is_inline_tag(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

fn is_inline_tag_end(tag: &TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image
    )
}

fn render_inline_events(text: &str) -> String {
    let events = TextMergeStream::new(Parser::new_ext(text, options())).filter(|event| match event {
        Event::Start(tag) => is_inline_tag(tag),
        Event::End(tag) => is_inline_tag_end(tag),
        Event::Rule | Event::TaskListMarker(_) => false,
        _ => true,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, linkify(events).into_iter());
    html_output.trim_end().to_string()
}
