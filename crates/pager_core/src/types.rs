use std::fmt;

use thiserror::Error;

/// Page number every collection starts at.
pub const FIRST_PAGE: u32 = 1;

/// Identifies a logical remote collection: an endpoint path plus an optional search term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub path: String,
    pub search: Option<String>,
}

impl QueryKey {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            search: None,
        }
    }

    /// Attach a search term. Blank terms are treated as no search at all.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let trimmed = term.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// The search term, if one is set and not blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.search_term() {
            Some(term) => write!(f, "{} \"{}\"", self.path, term),
            None => write!(f, "{}", self.path),
        }
    }
}

/// Position marker used to request a page of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Numbered page, starting at [`FIRST_PAGE`].
    Page(u32),
    /// Opaque continuation token handed out by the endpoint.
    Token(String),
}

impl Cursor {
    pub fn first() -> Self {
        Cursor::Page(FIRST_PAGE)
    }

    pub fn is_first(&self) -> bool {
        matches!(self, Cursor::Page(page) if *page <= FIRST_PAGE)
    }

    pub fn page_number(&self) -> Option<u32> {
        match self {
            Cursor::Page(page) => Some(*page),
            Cursor::Token(_) => None,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::first()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::Page(page) => write!(f, "page {page}"),
            Cursor::Token(token) => write!(f, "token {token}"),
        }
    }
}

/// One page as returned by a collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<Cursor>,
    pub total_pages: Option<u32>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<Cursor>, total_pages: Option<u32>) -> Self {
        Self {
            items,
            next_cursor,
            total_pages,
        }
    }
}

/// How successive pages are merged into the visible result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    /// Classic pagination: each page replaces the previous one.
    #[default]
    Replace,
    /// Infinite scroll: each page is appended.
    Accumulate,
}

impl fmt::Display for ListMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListMode::Replace => write!(f, "replace"),
            ListMode::Accumulate => write!(f, "accumulate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
    /// Fetching more items while the already fetched ones stay visible.
    LoadingMore,
}

impl Status {
    pub fn is_fetching(self) -> bool {
        matches!(self, Status::Loading | Status::LoadingMore)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Idle => "idle",
            Status::Loading => "loading",
            Status::Loaded => "loaded",
            Status::Error => "error",
            Status::LoadingMore => "loading-more",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, "request superseded")
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == FailureKind::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Network,
    Timeout,
    /// Endpoint answered with a non-success status code.
    HttpStatus(u16),
    /// Body did not match the expected page shape.
    Decode,
    /// Superseded request; never shown to the consumer.
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_terms_are_dropped() {
        let key = QueryKey::new("search/movie").with_search("   ");
        assert_eq!(key.search, None);
        assert_eq!(key.search_term(), None);

        let key = QueryKey::new("search/movie").with_search("  dune ");
        assert_eq!(key.search_term(), Some("dune"));
        assert_eq!(key.to_string(), "search/movie \"dune\"");
    }

    #[test]
    fn only_page_one_is_first() {
        assert!(Cursor::first().is_first());
        assert!(!Cursor::Page(2).is_first());
        assert!(!Cursor::Token("abc".into()).is_first());
    }
}
