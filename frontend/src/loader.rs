use std::cell::RefCell;

use shared::{LoadError, LoaderState, PageAdvance, PageResponse, ResultItem, SkipReason};

use crate::services::api::SearchApi;
use crate::services::logging::Logger;

const COMPONENT: &str = "load-more";

/// Search inputs read from the form at the moment the trigger is activated
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchContext {
    pub term: String,
    pub source: String,
}

/// The control whose activation requests the next page
pub trait TriggerControl {
    fn set_enabled(&self, enabled: bool);
    /// Record the page the next activation will request
    fn set_next_page(&self, page: u32);
    /// Hide the control for good once every page has been loaded
    fn retire(&self);
}

/// Append-only list of rendered results
pub trait ResultsSurface {
    fn append(&self, item: ResultItem);
}

/// What a single `request_next_page` call did
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Nothing was requested and no state changed
    Skipped(SkipReason),
    /// Items were appended and more pages remain
    Advanced { appended: usize, next_page: u32 },
    /// Items were appended and the trigger has been retired
    Exhausted { appended: usize },
    /// The request failed; the same page will be requested on retry
    Failed(LoadError),
}

/// Fetches further result pages on demand and appends them below the
/// server-rendered ones.
///
/// State is only borrowed between suspension points, so one loader can be
/// shared through an `Rc` by every click handler on the page.
pub struct IncrementalLoader<A, T, S> {
    api: A,
    trigger: T,
    surface: S,
    state: RefCell<LoaderState>,
}

impl<A, T, S> IncrementalLoader<A, T, S>
where
    A: SearchApi,
    T: TriggerControl,
    S: ResultsSurface,
{
    pub fn new(api: A, trigger: T, surface: S, state: LoaderState) -> Self {
        Self {
            api,
            trigger,
            surface,
            state: RefCell::new(state),
        }
    }

    /// Snapshot of the cursor state
    pub fn state(&self) -> LoaderState {
        *self.state.borrow()
    }

    /// Load and append the page under the cursor.
    ///
    /// Blank terms, an outstanding request, or an exhausted cursor make this a
    /// no-op. Otherwise the trigger is disabled before the request starts and
    /// restored (or retired) once it completes.
    pub async fn request_next_page(&self, context: &SearchContext) -> LoadOutcome {
        let begun = self.state.borrow_mut().begin(&context.term, &context.source);
        let query = match begun {
            Ok(query) => query,
            Err(reason) => {
                Logger::debug_with_component(COMPONENT, &format!("Load skipped: {:?}", reason));
                return LoadOutcome::Skipped(reason);
            }
        };

        self.trigger.set_enabled(false);
        Logger::info_with_component(
            COMPONENT,
            &format!("Requesting page {} ({} per page)", query.page, query.per_page),
        );

        match self.api.search(&query).await {
            Ok(page) => self.apply_page(page),
            Err(err) => {
                Logger::error_with_component(
                    COMPONENT,
                    &format!("Failed to load page {}: {}", query.page, err),
                );
                self.state.borrow_mut().fail();
                self.trigger.set_enabled(true);
                LoadOutcome::Failed(err)
            }
        }
    }

    fn apply_page(&self, page: PageResponse) -> LoadOutcome {
        for warning in &page.shape_warnings {
            Logger::warn_with_component(COMPONENT, &format!("Rendering with fallbacks: {}", warning));
        }

        let appended = page.results.len();
        for item in page.results {
            self.surface.append(item);
        }

        let advance = self.state.borrow_mut().complete(page.total_pages);
        match advance {
            PageAdvance::Next(next_page) => {
                self.trigger.set_next_page(next_page);
                self.trigger.set_enabled(true);
                LoadOutcome::Advanced { appended, next_page }
            }
            PageAdvance::Exhausted => {
                Logger::info_with_component(
                    COMPONENT,
                    &format!("All {} pages loaded", page.total_pages),
                );
                self.trigger.retire();
                LoadOutcome::Exhausted { appended }
            }
        }
    }
}
