//! Cursor bookkeeping for incremental "load more" pagination.
//!
//! `LoaderState` is pure: it decides whether a request may start, which query
//! to send, and how the cursor moves once the server answers. Rendering and
//! network I/O live in the frontend.

use crate::{QueryError, SearchQuery, DEFAULT_PER_PAGE, FIRST_LOADABLE_PAGE};

/// Why a load request was ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No search term on the page
    EmptyTerm,
    /// A previous request has not completed yet
    InFlight,
    /// The last page has already been loaded
    Exhausted,
    /// The cursor could not be turned into a valid query
    InvalidQuery(QueryError),
}

/// Cursor movement after a successful page load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAdvance {
    /// More pages remain; this is the page that will be requested next
    Next(u32),
    /// No pages remain; the trigger must be retired
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderState {
    next_page: u32,
    per_page: u32,
    in_flight: bool,
    exhausted: bool,
}

impl LoaderState {
    /// Out-of-range values are clamped: the cursor never points before page 2
    /// and the page size is never zero.
    pub fn new(next_page: u32, per_page: u32) -> Self {
        Self {
            next_page: next_page.max(FIRST_LOADABLE_PAGE),
            per_page: if per_page == 0 { DEFAULT_PER_PAGE } else { per_page },
            in_flight: false,
            exhausted: false,
        }
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Start a request for the current cursor.
    ///
    /// On success the state is marked in flight and the query to send is
    /// returned. A skipped request leaves the state untouched.
    pub fn begin(&mut self, term: &str, source: &str) -> Result<SearchQuery, SkipReason> {
        if term.trim().is_empty() {
            return Err(SkipReason::EmptyTerm);
        }
        if self.exhausted {
            return Err(SkipReason::Exhausted);
        }
        if self.in_flight {
            return Err(SkipReason::InFlight);
        }

        let query = SearchQuery::new(term, source, self.next_page, self.per_page).map_err(
            |err| match err {
                QueryError::EmptyTerm => SkipReason::EmptyTerm,
                other => SkipReason::InvalidQuery(other),
            },
        )?;
        self.in_flight = true;
        Ok(query)
    }

    /// Apply a successful response. `total_pages` is authoritative even when
    /// it shrinks below what earlier responses reported.
    pub fn complete(&mut self, total_pages: u32) -> PageAdvance {
        self.in_flight = false;

        let candidate = self.next_page.saturating_add(1);
        if candidate > total_pages {
            self.exhausted = true;
            PageAdvance::Exhausted
        } else {
            self.next_page = candidate;
            PageAdvance::Next(candidate)
        }
    }

    /// Apply a failed request; the cursor stays where it was so the same page
    /// can be retried.
    pub fn fail(&mut self) {
        self.in_flight = false;
    }
}

impl Default for LoaderState {
    fn default() -> Self {
        Self::new(FIRST_LOADABLE_PAGE, DEFAULT_PER_PAGE)
    }
}
