//! Markdown rendering module
//!
//! Converts documents to HTML fragments, exposes the fragments' code blocks to
//! the highlight pass, and wraps the result in a themed page.

mod container;
mod page;
mod renderer;
mod theme;

pub use container::{CodeElement, RenderedContainer};
pub use page::{generate_css, page_html, PageContent};
pub use renderer::{code_block_html, error_fragment, render, render_inline};
pub use theme::{PreviewTheme, SyntaxColors};
