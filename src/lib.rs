//! mdview - a lightweight markdown viewer
//!
//! Documents are acquired through a host bridge, rendered to HTML and then
//! progressively syntax highlighted. Running instances coordinate so a file
//! is only ever open in one window.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod controller;
pub mod dedupe;
pub mod display;
pub mod host;
pub mod keymap;
pub mod markdown;
pub mod messages;
pub mod model;
pub mod prompt;
pub mod runtime;
pub mod syntax;
pub mod tracing;

pub use config::ViewerConfig;
pub use controller::{AcquisitionController, LoadError, LoadOutcome, LoadTarget};
pub use messages::Msg;
pub use model::AppState;
