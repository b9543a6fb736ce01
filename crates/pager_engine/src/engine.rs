use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use pager_core::{FetchError, FetchTicket, Page, PageRequest};
use pager_logging::{pager_debug, pager_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::CollectionEndpoint;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent<T> {
    PageFetched {
        ticket: FetchTicket,
        result: Result<Page<T>, FetchError>,
    },
}

pub trait EventSink<T>: Send + Sync {
    fn emit(&self, event: EngineEvent<T>);
}

pub struct ChannelEventSink<T> {
    tx: mpsc::Sender<EngineEvent<T>>,
}

impl<T> ChannelEventSink<T> {
    pub fn new(tx: mpsc::Sender<EngineEvent<T>>) -> Self {
        Self { tx }
    }
}

impl<T: Send> EventSink<T> for ChannelEventSink<T> {
    fn emit(&self, event: EngineEvent<T>) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] io::Error),
}

enum EngineCommand {
    Fetch(PageRequest),
    Cancel(FetchTicket),
}

/// Runs fetch effects for one list on a background tokio runtime.
///
/// A list has at most one request in flight, so the engine tracks a single
/// cancellation token; a new fetch cancels whatever was still running.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new<T>(
        endpoint: Arc<dyn CollectionEndpoint<T>>,
        sink: Arc<dyn EventSink<T>>,
    ) -> Result<Self, EngineError>
    where
        T: Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("pager-engine".to_string())
            .spawn(move || {
                let mut in_flight: Option<(FetchTicket, CancellationToken)> = None;
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Fetch(request) => {
                            if let Some((previous, token)) = in_flight.take() {
                                pager_debug!("superseding {}", previous.cursor);
                                token.cancel();
                            }
                            let token = CancellationToken::new();
                            in_flight = Some((request.ticket.clone(), token.clone()));
                            let endpoint = endpoint.clone();
                            let sink = sink.clone();
                            runtime.spawn(async move {
                                run_fetch(endpoint.as_ref(), request, token, sink.as_ref()).await;
                            });
                        }
                        EngineCommand::Cancel(ticket) => {
                            if in_flight.as_ref().is_some_and(|(current, _)| *current == ticket) {
                                if let Some((_, token)) = in_flight.take() {
                                    token.cancel();
                                }
                            }
                        }
                    }
                }
                // Dropping the runtime here drops any fetch still running.
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn fetch(&self, request: PageRequest) {
        if self.cmd_tx.send(EngineCommand::Fetch(request)).is_err() {
            pager_warn!("engine thread is gone; fetch dropped");
        }
    }

    pub fn cancel(&self, ticket: FetchTicket) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel(ticket));
    }
}

async fn run_fetch<T>(
    endpoint: &dyn CollectionEndpoint<T>,
    request: PageRequest,
    token: CancellationToken,
    sink: &dyn EventSink<T>,
) {
    let PageRequest { ticket, key } = request;
    let result = tokio::select! {
        _ = token.cancelled() => Err(FetchError::cancelled()),
        result = endpoint.fetch(&key, &ticket.cursor) => result,
    };
    sink.emit(EngineEvent::PageFetched { ticket, result });
}
