use crate::{FetchError, ListMode, QueryKey, Status};

/// Snapshot of a list for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<T> {
    pub query: Option<QueryKey>,
    pub mode: ListMode,
    pub status: Status,
    pub items: Vec<T>,
    /// Cause of the last failure; only set while `status` is `Error`.
    pub error: Option<FetchError>,
    /// `advance()` would fetch more right now.
    pub has_more: bool,
    pub has_previous: bool,
    /// First page of a search came back empty.
    pub no_results: bool,
    /// Page number of the page last merged, for numbered collections.
    pub page: Option<u32>,
    pub total_pages: Option<u32>,
}
