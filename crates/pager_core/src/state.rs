use std::collections::HashSet;

use pager_logging::{pager_debug, pager_info, pager_warn};

use crate::view_model::ListView;
use crate::{
    Cursor, Effect, FetchError, FetchTicket, ListMode, Page, PageRequest, QueryKey, Status,
};

/// State of one paginated list.
///
/// Owns its result set and cursor bookkeeping exclusively; the only way to
/// change it from outside the crate is [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState<T> {
    query: Option<QueryKey>,
    mode: ListMode,
    status: Status,
    /// Bumped on every initialize/unmount; older responses are stale.
    generation: u64,
    items: Vec<T>,
    /// Cursor of the page last merged into `items`.
    current: Option<Cursor>,
    next: Option<Cursor>,
    total_pages: Option<u32>,
    /// Replace mode: cursors of the pages shown before `current`.
    history: Vec<Cursor>,
    /// Accumulate mode: cursors already merged into `items`.
    applied: HashSet<Cursor>,
    pending: Option<FetchTicket>,
    /// Where to go back to if `pending` comes back cancelled.
    resume: Option<Resume>,
    failed: Option<Cursor>,
    error: Option<FetchError>,
    no_results: bool,
    dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Resume {
    status: Status,
    history: Vec<Cursor>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            query: None,
            mode: ListMode::default(),
            status: Status::Idle,
            generation: 0,
            items: Vec::new(),
            current: None,
            next: None,
            total_pages: None,
            history: Vec::new(),
            applied: HashSet::new(),
            pending: None,
            resume: None,
            failed: None,
            error: None,
            no_results: false,
            dirty: false,
        }
    }
}

impl<T> ListState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn mode(&self) -> ListMode {
        self.mode
    }

    pub fn query(&self) -> Option<&QueryKey> {
        self.query.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The request the list is currently waiting on, if any.
    pub fn pending(&self) -> Option<&FetchTicket> {
        self.pending.as_ref()
    }

    /// Whether `advance()` would fetch anything right now.
    pub fn has_more(&self) -> bool {
        self.can_advance()
    }

    pub fn view(&self) -> ListView<T>
    where
        T: Clone,
    {
        ListView {
            query: self.query.clone(),
            mode: self.mode,
            status: self.status,
            items: self.items.clone(),
            error: self.error.clone(),
            has_more: self.has_more(),
            has_previous: self.can_retract(),
            no_results: self.no_results,
            page: self.current.as_ref().and_then(Cursor::page_number),
            total_pages: self.total_pages,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn initialize(&mut self, key: QueryKey, mode: ListMode) -> Vec<Effect> {
        let mut effects = self.reset();
        pager_info!(
            "initialize query={} mode={} generation={}",
            key,
            mode,
            self.generation
        );
        self.mode = mode;
        self.status = Status::Loading;
        let resume = Resume {
            status: Status::Idle,
            history: Vec::new(),
        };
        effects.push(self.issue_fetch(key.clone(), Cursor::first(), resume));
        self.query = Some(key);
        effects
    }

    pub(crate) fn unmount(&mut self) -> Vec<Effect> {
        let effects = self.reset();
        self.query = None;
        self.status = Status::Idle;
        effects
    }

    pub(crate) fn can_advance(&self) -> bool {
        self.status == Status::Loaded && self.pending.is_none() && self.next.is_some()
    }

    pub(crate) fn advance(&mut self) -> Vec<Effect> {
        if !self.can_advance() {
            return Vec::new();
        }
        let (Some(key), Some(next)) = (self.query.clone(), self.next.clone()) else {
            return Vec::new();
        };
        let resume = self.checkpoint();
        match self.mode {
            ListMode::Replace => {
                if let Some(current) = self.current.clone() {
                    self.history.push(current);
                }
                self.status = Status::Loading;
            }
            ListMode::Accumulate => self.status = Status::LoadingMore,
        }
        vec![self.issue_fetch(key, next, resume)]
    }

    pub(crate) fn can_retract(&self) -> bool {
        self.mode == ListMode::Replace
            && self.pending.is_none()
            && matches!(self.status, Status::Loaded | Status::Error)
            && !self.history.is_empty()
    }

    pub(crate) fn retract(&mut self) -> Vec<Effect> {
        if !self.can_retract() {
            return Vec::new();
        }
        let Some(key) = self.query.clone() else {
            return Vec::new();
        };
        let resume = self.checkpoint();
        let Some(previous) = self.history.pop() else {
            return Vec::new();
        };
        self.status = Status::Loading;
        vec![self.issue_fetch(key, previous, resume)]
    }

    pub(crate) fn retry(&mut self) -> Vec<Effect> {
        if self.status != Status::Error || self.pending.is_some() {
            return Vec::new();
        }
        let (Some(key), Some(cursor)) = (self.query.clone(), self.failed.clone()) else {
            return Vec::new();
        };
        let resume = self.checkpoint();
        self.status = Status::Loading;
        vec![self.issue_fetch(key, cursor, resume)]
    }

    pub(crate) fn apply_fetched(&mut self, ticket: FetchTicket, result: Result<Page<T>, FetchError>) {
        if self.pending.as_ref() != Some(&ticket) {
            pager_debug!(
                "dropping stale response generation={} {} (current generation={})",
                ticket.generation,
                ticket.cursor,
                self.generation
            );
            return;
        }
        self.pending = None;
        let resume = self.resume.take();

        match result {
            Ok(page) => self.apply_page(ticket.cursor, page),
            Err(err) if err.is_cancelled() => self.resume_after_cancel(ticket.cursor, resume),
            Err(err) => {
                pager_warn!("fetch of {} failed: {}", ticket.cursor, err);
                self.failed = Some(ticket.cursor);
                self.error = Some(err);
                self.status = Status::Error;
            }
        }
        self.dirty = true;
    }

    fn apply_page(&mut self, cursor: Cursor, page: Page<T>) {
        let Page {
            items,
            next_cursor,
            total_pages,
        } = page;

        match self.mode {
            ListMode::Replace => self.items = items,
            ListMode::Accumulate => {
                if self.applied.insert(cursor.clone()) {
                    self.items.extend(items);
                } else {
                    pager_debug!("{} already merged; keeping result set as is", cursor);
                }
            }
        }

        self.next = self.checked_next(&cursor, next_cursor, total_pages);
        self.total_pages = total_pages;
        self.no_results = cursor.is_first()
            && self.items.is_empty()
            && self
                .query
                .as_ref()
                .is_some_and(|key| key.search_term().is_some());
        self.current = Some(cursor);
        self.failed = None;
        self.error = None;
        self.status = Status::Loaded;
    }

    /// Puts the list back where it was before the cancelled request. Without
    /// a merged page to fall back on, the list becomes retriable instead; the
    /// cancellation itself is never exposed as an error detail.
    fn resume_after_cancel(&mut self, cursor: Cursor, resume: Option<Resume>) {
        pager_debug!("fetch of {} cancelled; resuming", cursor);
        if let Some(resume) = resume {
            self.history = resume.history;
            match resume.status {
                Status::Loaded if self.current.is_some() => {
                    self.status = Status::Loaded;
                    return;
                }
                // Retry or retract out of an error: the earlier failed cursor still applies.
                Status::Error if self.failed.is_some() => {
                    self.status = Status::Error;
                    return;
                }
                _ => {}
            }
        }
        self.failed = Some(cursor);
        self.error = None;
        self.status = Status::Error;
    }

    fn checkpoint(&self) -> Resume {
        Resume {
            status: self.status,
            history: self.history.clone(),
        }
    }

    /// Drops next cursors that point past the reported total, backwards, or at
    /// a page that is already merged.
    fn checked_next(
        &self,
        requested: &Cursor,
        next: Option<Cursor>,
        total_pages: Option<u32>,
    ) -> Option<Cursor> {
        let next = next?;
        if let Cursor::Page(page) = next {
            if total_pages.is_some_and(|total| page > total) {
                return None;
            }
            if requested.page_number().is_some_and(|current| page <= current) {
                return None;
            }
        }
        if self.mode == ListMode::Accumulate && self.applied.contains(&next) {
            return None;
        }
        Some(next)
    }

    fn issue_fetch(&mut self, key: QueryKey, cursor: Cursor, resume: Resume) -> Effect {
        debug_assert!(self.pending.is_none(), "at most one fetch in flight");
        let ticket = FetchTicket {
            generation: self.generation,
            cursor,
        };
        self.pending = Some(ticket.clone());
        self.resume = Some(resume);
        self.error = None;
        self.dirty = true;
        Effect::FetchPage(PageRequest { ticket, key })
    }

    /// Starts a new generation with an empty result set. Returns a cancel
    /// effect for the request that is now stale, if there was one.
    fn reset(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.resume = None;
        if let Some(ticket) = self.pending.take() {
            pager_debug!(
                "abandoning in-flight {} of generation {}",
                ticket.cursor,
                ticket.generation
            );
            effects.push(Effect::CancelFetch { ticket });
        }
        self.generation += 1;
        self.items.clear();
        self.current = None;
        self.next = None;
        self.total_pages = None;
        self.history.clear();
        self.applied.clear();
        self.failed = None;
        self.error = None;
        self.no_results = false;
        self.dirty = true;
        effects
    }
}
