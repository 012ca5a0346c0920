//! Pagination/filter state for one remote list, kept in step with the
//! navigation history and the paginated endpoint.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    error::{ListError, ListResult},
    history::NavigationHistory,
    page::ListPage,
    query::ListQuery,
    resource::ListResource,
    source::ListSource,
    window::PageWindow,
};

/// Notifications for whatever renders the list.
#[derive(Debug, Clone)]
pub enum ListEvent<T> {
    /// Form controls should show this query.
    QueryResolved(ListQuery),
    Loading(ListQuery),
    PageLoaded { query: ListQuery, page: ListPage<T> },
    LoadFailed { query: ListQuery, error: ListError },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    /// The page is now the rendered page.
    Applied(ListPage<T>),
    /// A later load was dispatched before this one settled; its result was
    /// dropped.
    Superseded,
    /// The request was refused locally and nothing was sent.
    Ignored,
}

impl<T> LoadOutcome<T> {
    pub fn page(&self) -> Option<&ListPage<T>> {
        match self {
            Self::Applied(page) => Some(page),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Rendered<T> {
    query: ListQuery,
    page: ListPage<T>,
}

struct ControllerState<T> {
    defaults: ListQuery,
    query: ListQuery,
    rendered: Option<Rendered<T>>,
    last_error: Option<ListError>,
    latest_dispatch: u64,
    in_flight: usize,
}

pub struct PagedListController<T> {
    resource: ListResource,
    source: Arc<dyn ListSource<T>>,
    history: Arc<dyn NavigationHistory>,
    inner: Mutex<ControllerState<T>>,
    events: broadcast::Sender<ListEvent<T>>,
}

impl<T> PagedListController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        resource: ListResource,
        source: Arc<dyn ListSource<T>>,
        history: Arc<dyn NavigationHistory>,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        let defaults = resource.default_query();
        Self {
            resource,
            source,
            history,
            inner: Mutex::new(ControllerState {
                query: defaults.clone(),
                defaults,
                rendered: None,
                last_error: None,
                latest_dispatch: 0,
                in_flight: 0,
            }),
            events,
        }
    }

    fn state(&self) -> MutexGuard<'_, ControllerState<T>> {
        lock_state(&self.inner)
    }

    fn emit(&self, event: ListEvent<T>) {
        let _ = self.events.send(event);
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ListEvent<T>> {
        self.events.subscribe()
    }

    pub fn resource(&self) -> &ListResource {
        &self.resource
    }

    /// Resolves the starting query from the history's query string, falling
    /// back to `defaults` for anything missing or malformed. Nothing is
    /// fetched.
    pub fn initialize(&self, defaults: ListQuery) -> ListQuery {
        let url_query = self.history.current_query();
        let query =
            ListQuery::from_url_query(&url_query, &defaults, self.resource.filter_keys());
        {
            let mut state = self.state();
            state.defaults = defaults;
            state.query = query.clone();
        }
        info!(
            resource = self.resource.name(),
            url_query = %url_query,
            page = query.page(),
            size = query.page_size(),
            "list controller initialized"
        );
        self.emit(ListEvent::QueryResolved(query.clone()));
        query
    }

    pub fn current_query(&self) -> ListQuery {
        self.state().query.clone()
    }

    pub fn defaults(&self) -> ListQuery {
        self.state().defaults.clone()
    }

    /// The last successfully applied page, if any.
    pub fn last_page(&self) -> Option<ListPage<T>> {
        self.state().rendered.as_ref().map(|r| r.page.clone())
    }

    /// The query that produced [`Self::last_page`].
    pub fn rendered_query(&self) -> Option<ListQuery> {
        self.state().rendered.as_ref().map(|r| r.query.clone())
    }

    /// Error from the most recent settled load, cleared by the next success.
    pub fn last_error(&self) -> Option<ListError> {
        self.state().last_error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().in_flight > 0
    }

    /// Page-number window for the rendered page.
    pub fn window(&self, width: u32) -> Option<PageWindow> {
        self.state()
            .rendered
            .as_ref()
            .map(|r| PageWindow::compute(r.page.current_page, r.page.total_pages, width))
    }

    /// Fetches the page for the current query without touching the history.
    pub async fn load(&self) -> ListResult<LoadOutcome<T>> {
        self.dispatch(false).await
    }

    pub async fn set_filter(&self, name: &str, value: &str) -> ListResult<LoadOutcome<T>> {
        if !self.resource.recognizes(name) {
            return Err(ListError::InvalidArgument(format!(
                "unknown filter '{name}' for {}",
                self.resource.name()
            )));
        }
        {
            let mut state = self.state();
            let value = value.trim();
            let value = if value.is_empty() {
                state.defaults.filter(name).unwrap_or_default().to_string()
            } else {
                value.to_string()
            };
            if !value.is_empty() && !self.resource.accepts(name, &value) {
                return Err(ListError::InvalidArgument(format!(
                    "unsupported value '{value}' for filter '{name}'"
                )));
            }
            state.query = state.query.with_filter(name, value).with_page(0);
        }
        self.after_mutation().await
    }

    pub async fn set_page_size(&self, page_size: u32) -> ListResult<LoadOutcome<T>> {
        if page_size == 0 {
            return Err(ListError::InvalidArgument(
                "page size must be positive".into(),
            ));
        }
        {
            let mut state = self.state();
            state.query = state.query.with_page_size(page_size).with_page(0);
        }
        self.after_mutation().await
    }

    /// Restores every filter to its default.
    pub async fn clear_filters(&self) -> ListResult<LoadOutcome<T>> {
        {
            let mut state = self.state();
            let filters = state.defaults.filters().clone();
            state.query = state.query.with_filters(filters).with_page(0);
        }
        self.after_mutation().await
    }

    /// Navigates to `page`. Pages outside `[0, total_pages)` of the rendered
    /// page (or any page before the first load) are ignored without a
    /// request.
    pub async fn go_to_page(&self, page: u32) -> ListResult<LoadOutcome<T>> {
        {
            let mut state = self.state();
            let in_range = state
                .rendered
                .as_ref()
                .is_some_and(|r| r.page.contains_page(page));
            if !in_range {
                debug!(resource = self.resource.name(), page, "ignoring out-of-range page");
                return Ok(LoadOutcome::Ignored);
            }
            state.query = state.query.with_page(page);
        }
        self.after_mutation().await
    }

    /// Re-reads the history's query string after back/forward navigation
    /// and loads it. The history is not pushed.
    pub async fn restore_from_history(&self) -> ListResult<LoadOutcome<T>> {
        let url_query = self.history.current_query();
        let query = {
            let mut state = self.state();
            let query =
                ListQuery::from_url_query(&url_query, &state.defaults, self.resource.filter_keys());
            state.query = query.clone();
            query
        };
        debug!(resource = self.resource.name(), url_query = %url_query, "restoring from history");
        self.emit(ListEvent::QueryResolved(query));
        self.dispatch(false).await
    }

    async fn after_mutation(&self) -> ListResult<LoadOutcome<T>> {
        self.emit(ListEvent::QueryResolved(self.current_query()));
        self.dispatch(true).await
    }

    async fn dispatch(&self, push_history: bool) -> ListResult<LoadOutcome<T>> {
        let (seq, query) = {
            let mut state = self.state();
            state.latest_dispatch += 1;
            state.in_flight += 1;
            (state.latest_dispatch, state.query.clone())
        };
        let in_flight = InFlight { state: &self.inner };
        debug!(resource = self.resource.name(), seq, page = query.page(), "dispatching list load");
        self.emit(ListEvent::Loading(query.clone()));

        let result = self.source.fetch_page(&query).await;

        // Released before relocking; the guard takes the same lock.
        drop(in_flight);
        let mut state = self.state();
        if seq != state.latest_dispatch {
            debug!(
                resource = self.resource.name(),
                seq,
                latest = state.latest_dispatch,
                "discarding superseded list response"
            );
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(page) => {
                // The backend is authoritative for position and size.
                let applied = query
                    .with_page(page.current_page)
                    .with_page_size(page.page_size);
                state.query = applied.clone();
                state.rendered = Some(Rendered {
                    query: applied.clone(),
                    page: page.clone(),
                });
                state.last_error = None;
                if push_history {
                    self.history.push(&applied.to_url_query(&state.defaults));
                }
                drop(state);

                info!(
                    resource = self.resource.name(),
                    page = page.current_page,
                    rows = page.items.len(),
                    total = page.total_items,
                    "list page applied"
                );
                self.emit(ListEvent::PageLoaded {
                    query: applied,
                    page: page.clone(),
                });
                Ok(LoadOutcome::Applied(page))
            }
            Err(error) => {
                state.last_error = Some(error.clone());
                let restored = state.rendered.as_ref().map(|r| r.query.clone());
                if let Some(restored) = &restored {
                    state.query = restored.clone();
                }
                drop(state);

                warn!(
                    resource = self.resource.name(),
                    error = %error,
                    "list load failed; keeping last rendered page"
                );
                if let Some(restored) = restored {
                    self.emit(ListEvent::QueryResolved(restored));
                }
                self.emit(ListEvent::LoadFailed {
                    query,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }
}

fn lock_state<T>(inner: &Mutex<ControllerState<T>>) -> MutexGuard<'_, ControllerState<T>> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Counts one dispatch as loading until it settles or its future is dropped.
struct InFlight<'a, T> {
    state: &'a Mutex<ControllerState<T>>,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
