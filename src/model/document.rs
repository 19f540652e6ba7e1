//! Document model - one load cycle's worth of content

use std::time::SystemTime;

use crate::markdown;

/// Name shown when a path has no usable final segment
pub const UNKNOWN_FILE_NAME: &str = "Unknown file";

/// Extract the display name from a path string
///
/// Splits on both `/` and `\` regardless of platform, since paths can arrive
/// from another host or from manual entry.
pub fn get_file_name(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_FILE_NAME)
}

/// Read-only projection of a path used by the header and window title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: String,
    pub name: String,
    /// When this projection was taken (the load time, not file metadata)
    pub last_modified: SystemTime,
}

impl FileInfo {
    pub fn from_path(path: &str) -> Self {
        Self {
            path: path.to_string(),
            name: get_file_name(path).to_string(),
            last_modified: SystemTime::now(),
        }
    }

    /// Window title, e.g. `readme.md - Markdown Viewer`
    pub fn window_title(&self) -> String {
        format!("{} - Markdown Viewer", self.name)
    }
}

/// A loaded document; created per load cycle and dropped on the next one
#[derive(Debug, Clone)]
pub struct Document {
    pub path: String,
    pub raw_content: String,
    pub rendered_html: String,
}

impl Document {
    /// Render `raw_content` and bundle it with its path
    pub fn render(path: impl Into<String>, raw_content: String) -> Self {
        let rendered_html = markdown::render(&raw_content);
        Self {
            path: path.into(),
            raw_content,
            rendered_html,
        }
    }

    /// Blank documents get a placeholder instead of rendered output
    pub fn is_blank(&self) -> bool {
        self.raw_content.trim().is_empty()
    }

    pub fn file_info(&self) -> FileInfo {
        FileInfo::from_path(&self.path)
    }
}
