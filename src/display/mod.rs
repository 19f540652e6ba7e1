//! What the user sees
//!
//! The controller hands complete [`View`]s to a [`Display`]; every call to
//! [`Display::show`] replaces whatever was shown before.

mod html;

pub use html::{view_body, HtmlPageDisplay};

use crate::model::FileInfo;

pub const EMPTY_DOCUMENT_MESSAGE: &str = "This file appears to be empty.";
pub const LOADING_MESSAGE: &str = "Loading file...";
pub const WELCOME_MESSAGE: &str = "Press Ctrl+O to open a markdown file";

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Welcome,
    Loading {
        path: String,
    },
    Document {
        file: FileInfo,
        html: String,
        /// Whether code blocks already carry highlight markup
        highlighted: bool,
    },
    /// A document that is blank after trimming
    Empty {
        file: FileInfo,
    },
    Error {
        message: String,
    },
}

impl View {
    /// The file this view is about, if any
    pub fn file(&self) -> Option<&FileInfo> {
        match self {
            View::Document { file, .. } | View::Empty { file } => Some(file),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, View::Loading { .. })
    }
}

pub trait Display: Send + Sync {
    /// Replace the current view
    fn show(&self, view: View);

    fn toggle_shortcuts(&self);

    fn show_about(&self);

    /// Bring the display to the front (activation request from another instance)
    fn raise(&self);
}
