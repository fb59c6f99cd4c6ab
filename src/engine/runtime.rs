// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::compile::TemplateCompiler;
use crate::errors::Result;

use super::dispatcher::{CompileStatus, Dispatcher};
use super::RuntimeEvent;

/// Single-consumer event loop around a [`Dispatcher`].
///
/// Events are handled strictly one at a time in arrival order; the next
/// event is not read until every compile for the current one has finished.
pub struct Runtime<C: TemplateCompiler> {
    dispatcher: Dispatcher<C>,
    event_rx: mpsc::Receiver<RuntimeEvent>,
}

impl<C: TemplateCompiler> fmt::Debug for Runtime<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl<C: TemplateCompiler> Runtime<C> {
    pub fn new(dispatcher: Dispatcher<C>, event_rx: mpsc::Receiver<RuntimeEvent>) -> Self {
        Self {
            dispatcher,
            event_rx,
        }
    }

    /// Main event loop.
    ///
    /// Runs until shutdown is requested or every sender is dropped.
    pub async fn run(mut self) -> Result<()> {
        info!("pugwatch runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            match event {
                RuntimeEvent::FileChanged { path, kind } => {
                    let reports = self.dispatcher.on_event(&path, kind).await;
                    let failed = reports
                        .iter()
                        .filter(|r| matches!(r.status, CompileStatus::Failed { .. }))
                        .count();
                    debug!(?path, targets = reports.len(), failed, "change handled");
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping runtime");
                    break;
                }
            }
        }

        info!("runtime exiting");
        Ok(())
    }
}
