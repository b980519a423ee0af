use crate::model::{FilterPatch, ListQuery, QueryState};
use tracing::debug;

/// Owns the [`QueryState`] of one paginated view and turns each state change into the
/// request descriptor for the store.
///
/// Every method that changes the result set returns the [`ListQuery`] to fetch. Methods
/// that return `None` changed nothing and must not trigger a fetch.
#[derive(Debug, Clone, Default)]
pub struct QueryComposer {
    state: QueryState,
}

impl QueryComposer {
    pub fn new(page_size: u32) -> Self {
        Self {
            state: QueryState::new(page_size),
        }
    }

    /// Applies a resolved (already debounced) search term.
    ///
    /// Returns `None` when the term equals the previously resolved one.
    pub fn set_search(&mut self, term: impl Into<String>) -> Option<ListQuery> {
        let term = term.into();
        if term == self.state.search_term {
            debug!(%term, "Search unchanged");
            return None;
        }
        self.state.search_term = term;
        self.state.page = 1;
        Some(self.state.to_list_query())
    }

    /// Merges a partial filter update and goes back to the first page.
    pub fn set_filters(&mut self, patch: FilterPatch) -> ListQuery {
        self.state.filters.merge(patch);
        self.state.page = 1;
        self.state.to_list_query()
    }

    pub fn next_page(&mut self) -> ListQuery {
        self.state.page += 1;
        self.state.to_list_query()
    }

    /// Steps back one page. Returns `None` on the first page.
    pub fn previous_page(&mut self) -> Option<ListQuery> {
        if self.state.page <= 1 {
            return None;
        }
        self.state.page -= 1;
        Some(self.state.to_list_query())
    }

    pub fn current_query(&self) -> &QueryState {
        &self.state
    }

    /// Descriptor for the current state, without changing it.
    pub fn list_query(&self) -> ListQuery {
        self.state.to_list_query()
    }
}
