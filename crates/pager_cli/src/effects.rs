use std::sync::{mpsc, Arc};

use pager_core::{Effect, Msg};
use pager_engine::{CollectionEndpoint, EngineError, EngineEvent, EngineHandle, EventSink};
use pager_logging::{pager_debug, pager_info, pager_warn};

use crate::app::Inbox;
use crate::movie::MovieSummary;

/// Executes core effects against the engine.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        endpoint: Arc<dyn CollectionEndpoint<MovieSummary>>,
        inbox: mpsc::Sender<Inbox>,
    ) -> Result<Self, EngineError> {
        let sink = Arc::new(InboxSink { tx: inbox });
        let engine = EngineHandle::new(endpoint, sink)?;
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage(request) => {
                    pager_info!(
                        "FetchPage generation={} {} query={}",
                        request.ticket.generation,
                        request.cursor(),
                        request.key
                    );
                    self.engine.fetch(request);
                }
                Effect::CancelFetch { ticket } => {
                    pager_debug!("CancelFetch generation={}", ticket.generation);
                    self.engine.cancel(ticket);
                }
            }
        }
    }
}

/// Feeds engine results back into the update loop.
struct InboxSink {
    tx: mpsc::Sender<Inbox>,
}

impl EventSink<MovieSummary> for InboxSink {
    fn emit(&self, event: EngineEvent<MovieSummary>) {
        match event {
            EngineEvent::PageFetched { ticket, result } => {
                match &result {
                    Ok(page) => pager_info!(
                        "Fetched {} items for {} generation={}",
                        page.items.len(),
                        ticket.cursor,
                        ticket.generation
                    ),
                    Err(err) if err.is_cancelled() => {
                        pager_debug!("Fetch of {} cancelled", ticket.cursor)
                    }
                    Err(err) => pager_warn!("Fetch of {} failed: {}", ticket.cursor, err),
                }
                let _ = self
                    .tx
                    .send(Inbox::Engine(Msg::PageFetched { ticket, result }));
            }
        }
    }
}
