use crate::{FetchError, FetchTicket, ListMode, Page, QueryKey};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg<T> {
    /// Consumer mounted the list, or switched it to another query or mode.
    Initialize { key: QueryKey, mode: ListMode },
    /// User asked for the next page (or more items in accumulate mode).
    AdvanceRequested,
    /// User asked for the previous page. Replace mode only.
    RetractRequested,
    /// User asked to replay the request that failed.
    RetryRequested,
    /// Endpoint answered a request.
    PageFetched {
        ticket: FetchTicket,
        result: Result<Page<T>, FetchError>,
    },
    /// Consumer went away; late responses must not touch the list.
    Unmounted,
}
