//! Runtime module - terminal and host integration
//!
//! - `app` - the event loop multiplexing keys, host events and controller work
//! - `input` - terminal key events to messages

pub mod app;
pub mod input;

pub use app::App;

use std::sync::Arc;

use anyhow::Result;

use crate::cli::StartupConfig;
use crate::controller::AcquisitionController;
use crate::display::HtmlPageDisplay;
use crate::host::{Bridge, NativeConnector};
use crate::keymap::{load_default_keymap, Keymap};
use crate::prompt::TerminalPrompt;
use crate::syntax::{BuiltinGrammars, GrammarCache, HighlightScheduler};
use input::InputGate;

/// Negotiate the host, wire every component together and run until quit
pub async fn run(startup: StartupConfig) -> Result<()> {
    let config = startup.config.clone();

    let bridge = if startup.host_enabled {
        let connector = NativeConnector::from_config_dir(startup.cli_args());
        Bridge::negotiate(&connector, &config.host.retry_policy()).await
    } else {
        tracing::info!("Host disabled on the command line");
        Bridge::Unavailable
    };
    let bridge = Arc::new(bridge);
    let host_events = bridge.take_events();

    let cache = Arc::new(GrammarCache::new(
        Arc::new(BuiltinGrammars::with_user_overrides()),
        config.highlight.fetch_timeout(),
    ));

    let keymap = Keymap::with_bindings(load_default_keymap());
    let page_display =
        HtmlPageDisplay::for_process(config.settings.clone(), keymap.shortcut_rows())
            .map_err(anyhow::Error::msg)?;
    let page_path = page_display.page_path().to_path_buf();
    tracing::info!("Preview page at {}", page_path.display());

    let gate = InputGate::new();
    let prompt = Arc::new(TerminalPrompt::new(Arc::clone(&gate)));

    let controller = Arc::new(AcquisitionController::new(
        bridge,
        HighlightScheduler::new(Arc::clone(&cache)),
        Arc::new(page_display),
        prompt.clone(),
        config.settings.clone(),
    ));

    App::new(controller, prompt, gate, keymap, host_events)
        .with_warmup(cache, config.highlight.preload.clone())
        .run()
        .await
}
