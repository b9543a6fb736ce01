use crate::{Cursor, QueryKey};

/// Tags a request with the generation that issued it and the cursor it asks for.
///
/// A response is only applied when its ticket equals the one the list is
/// waiting on; anything else belongs to a superseded request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub generation: u64,
    pub cursor: Cursor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub ticket: FetchTicket,
    pub key: QueryKey,
}

impl PageRequest {
    pub fn cursor(&self) -> &Cursor {
        &self.ticket.cursor
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the collection endpoint for one page.
    FetchPage(PageRequest),
    /// Best-effort transport cancellation of a request nobody waits for anymore.
    CancelFetch { ticket: FetchTicket },
}
