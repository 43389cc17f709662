use std::fmt;
use std::sync::Arc;

use gridcore::{set_current_page, set_page_size};

use crate::plugin::{Plugin, PluginDefinition, PluginRegistration};
use crate::state::Controllable;

use super::{Reducer, names, with_state};

const DEFAULT_PAGE_SIZE: usize = 10;

/// Owns the `currentPage` and `pageSize` fields.
///
/// Both actions take a `usize` payload. A page size of 0 shows every row.
#[derive(Clone)]
pub struct PagingState {
    current_page: Controllable<usize>,
    page_size: Controllable<usize>,
    current_page_reducer: Reducer<usize, usize>,
    page_size_reducer: Reducer<usize, usize>,
}

impl PagingState {
    pub const NAME: &'static str = "PagingState";

    pub fn new() -> Self {
        Self {
            current_page: Controllable::new(),
            page_size: Controllable::new().default_value(DEFAULT_PAGE_SIZE),
            current_page_reducer: Arc::new(|current: &usize, page: &usize| {
                set_current_page(*current, *page)
            }),
            page_size_reducer: Arc::new(|size: &usize, next: &usize| set_page_size(*size, *next)),
        }
    }

    pub fn current_page(mut self, page: usize) -> Self {
        self.current_page = self.current_page.value(page);
        self
    }

    pub fn default_current_page(mut self, page: usize) -> Self {
        self.current_page = self.current_page.default_value(page);
        self
    }

    pub fn on_current_page_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Arc<usize>) + Send + Sync + 'static,
    {
        self.current_page = self.current_page.on_change(callback);
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = self.page_size.value(size);
        self
    }

    pub fn default_page_size(mut self, size: usize) -> Self {
        self.page_size = self.page_size.default_value(size);
        self
    }

    pub fn on_page_size_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Arc<usize>) + Send + Sync + 'static,
    {
        self.page_size = self.page_size.on_change(callback);
        self
    }

    pub fn current_page_reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&usize, &usize) -> usize + Send + Sync + 'static,
    {
        self.current_page_reducer = Arc::new(reducer);
        self
    }

    pub fn page_size_reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&usize, &usize) -> usize + Send + Sync + 'static,
    {
        self.page_size_reducer = Arc::new(reducer);
        self
    }
}

impl Default for PagingState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PagingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagingState")
            .field("current_page", &self.current_page)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl Plugin for PagingState {
    fn definition(&self) -> PluginDefinition {
        let definition = with_state(
            PluginDefinition::new(Self::NAME),
            names::CURRENT_PAGE,
            names::SET_CURRENT_PAGE,
            &self.current_page,
            Arc::clone(&self.current_page_reducer),
        );
        with_state(
            definition,
            names::PAGE_SIZE,
            names::SET_PAGE_SIZE,
            &self.page_size,
            Arc::clone(&self.page_size_reducer),
        )
    }
}

fn default_definition() -> PluginDefinition {
    PagingState::new().definition()
}

inventory::submit! {
    PluginRegistration::new(PagingState::NAME, default_definition)
}
