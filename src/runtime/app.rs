//! The viewer's event loop
//!
//! Keys, host events and in-flight controller work are multiplexed on one
//! current-thread runtime. Every message becomes its own task, so a slow load
//! never blocks a later keypress and overlapping loads run side by side.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Result;
use crossterm::terminal;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::input::{spawn_key_reader, InputGate};
use crate::controller::{AcquisitionController, Flow};
use crate::host::HostEvent;
use crate::keymap::Keymap;
use crate::messages::Msg;
use crate::prompt::TerminalPrompt;
use crate::syntax::GrammarCache;

type Task = LocalBoxFuture<'static, Flow>;

pub struct App {
    controller: Arc<AcquisitionController>,
    prompt: Arc<TerminalPrompt>,
    gate: Arc<InputGate>,
    keymap: Keymap,
    host_events: Option<UnboundedReceiver<HostEvent>>,
    /// Grammars to request before anything asks for them
    warm: Option<(Arc<GrammarCache>, Vec<String>)>,
}

impl App {
    pub fn new(
        controller: Arc<AcquisitionController>,
        prompt: Arc<TerminalPrompt>,
        gate: Arc<InputGate>,
        keymap: Keymap,
        host_events: Option<UnboundedReceiver<HostEvent>>,
    ) -> Self {
        Self {
            controller,
            prompt,
            gate,
            keymap,
            host_events,
            warm: None,
        }
    }

    pub fn with_warmup(mut self, cache: Arc<GrammarCache>, languages: Vec<String>) -> Self {
        self.warm = Some((cache, languages));
        self
    }

    fn dispatch(&self, msg: Msg) -> Option<Task> {
        match msg {
            Msg::Quit => None,
            Msg::ShowMenu => {
                let prompt = Arc::clone(&self.prompt);
                let controller = Arc::clone(&self.controller);
                Some(
                    async move {
                        match prompt.menu().await {
                            Some(event) => controller.handle(event.into()).await,
                            None => Flow::Continue,
                        }
                    }
                    .boxed_local(),
                )
            }
            msg => {
                let controller = Arc::clone(&self.controller);
                Some(async move { controller.handle(msg).await }.boxed_local())
            }
        }
    }

    /// Run until the user quits or every input source is gone
    pub async fn run(mut self) -> Result<()> {
        let mut tasks: FuturesUnordered<Task> = FuturesUnordered::new();

        if let Some((cache, languages)) = self.warm.take() {
            tasks.push(
                async move {
                    cache.warm(&languages).await;
                    Flow::Continue
                }
                .boxed_local(),
            );
        }

        let controller = Arc::clone(&self.controller);
        tasks.push(
            async move {
                if let Some(Err(e)) = controller.startup().await {
                    tracing::debug!("Startup load failed: {}", e);
                }
                Flow::Continue
            }
            .boxed_local(),
        );

        let (key_tx, mut key_rx) = mpsc::unbounded_channel();
        let interactive = std::io::stdin().is_terminal();
        let mut keys_open = false;
        let mut reader = None;
        if interactive {
            terminal::enable_raw_mode()?;
            reader = Some(spawn_key_reader(
                self.keymap.clone(),
                Arc::clone(&self.gate),
                key_tx,
            )?);
            keys_open = true;
        } else {
            tracing::info!("stdin is not a terminal, keyboard shortcuts are off");
            drop(key_tx);
        }

        let mut host_events = self.host_events.take();
        let mut host_open = host_events.is_some();

        loop {
            tokio::select! {
                msg = key_rx.recv(), if keys_open => match msg {
                    Some(msg) => match self.dispatch(msg) {
                        Some(task) => tasks.push(task),
                        None => break,
                    },
                    None => keys_open = false,
                },
                event = recv_host_event(&mut host_events), if host_open => match event {
                    Some(event) => {
                        tracing::debug!("Host event: {:?}", event);
                        if let Some(task) = self.dispatch(event.into()) {
                            tasks.push(task);
                        }
                    }
                    None => host_open = false,
                },
                Some(flow) = tasks.next(), if !tasks.is_empty() => {
                    if flow == Flow::Quit {
                        break;
                    }
                }
                else => break,
            }
        }

        self.gate.stop();
        if interactive {
            let _ = terminal::disable_raw_mode();
            println!();
        }
        if let Some(reader) = reader {
            let _ = reader.join();
        }

        // Pending loads are dropped; only the committed document is released
        drop(tasks);
        self.controller.shutdown().await;
        tracing::info!("Viewer shut down");
        Ok(())
    }
}

async fn recv_host_event(rx: &mut Option<UnboundedReceiver<HostEvent>>) -> Option<HostEvent> {
    match rx {
        Some(rx) => rx.recv().await,
        None => None,
    }
}
