//! Pagination, sort and filter state of one list view.
//!
//! Pure state transitions; `DataFetching` wraps a `ListState` in a signal and
//! refetches whenever [`ListState::query_params`] changes.

use std::collections::BTreeMap;

use contracts::shared::api::PaginatedResponse;

use crate::shared::list_utils::{toggle_sort, SortDirection};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Scalar filter value.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl FilterValue {
    /// Empty text filters are kept in state but never sent.
    pub fn is_empty(&self) -> bool {
        matches!(self, FilterValue::Text(s) if s.is_empty())
    }

    pub fn to_param(&self) -> String {
        match self {
            FilterValue::Text(s) => s.clone(),
            FilterValue::Number(n) => n.to_string(),
            FilterValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value as f64)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

/// `total_pages` is whatever the server reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationState {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            total: 0,
            total_pages: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryState {
    pub sort_by: Option<String>,
    pub sort_direction: SortDirection,
    pub filters: BTreeMap<String, FilterValue>,
}

/// Parameters a request was issued with.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestTicket {
    seq: u64,
    pub params: Vec<(String, String)>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListState {
    pub pagination: PaginationState,
    pub query: QueryState,
    seq: u64,
}

impl ListState {
    pub fn with_limit(limit: u32) -> Self {
        let mut state = Self::default();
        state.pagination.limit = limit.max(1);
        state
    }

    pub fn set_page(&mut self, page: u32) {
        self.pagination.page = page.max(1);
    }

    /// Changing the page size starts over from page 1.
    pub fn set_limit(&mut self, limit: u32) {
        self.pagination.limit = limit.max(1);
        self.pagination.page = 1;
    }

    pub fn toggle_sort(&mut self, field: &str) {
        toggle_sort(&mut self.query.sort_by, &mut self.query.sort_direction, field);
    }

    /// Merge into the current filters. Always resets to page 1.
    pub fn merge_filters<I, K, V>(&mut self, filters: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FilterValue>,
    {
        for (key, value) in filters {
            self.query.filters.insert(key.into(), value.into());
        }
        self.pagination.page = 1;
    }

    pub fn reset_filters(&mut self) {
        self.query.filters.clear();
        self.pagination.page = 1;
    }

    /// `page`, `limit`, then `sortBy`/`sortDirection` when sorting, then the
    /// non-empty filters in key order.
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.pagination.page.to_string()),
            ("limit".to_string(), self.pagination.limit.to_string()),
        ];
        if let Some(sort_by) = &self.query.sort_by {
            params.push(("sortBy".to_string(), sort_by.clone()));
            params.push((
                "sortDirection".to_string(),
                self.query.sort_direction.as_str().to_string(),
            ));
        }
        params.extend(
            self.query
                .filters
                .iter()
                .filter(|(_, v)| !v.is_empty())
                .map(|(k, v)| (k.clone(), v.to_param())),
        );
        params
    }

    /// Start a request with the parameters valid right now. Any earlier
    /// ticket stops being current.
    pub fn begin_request(&mut self) -> RequestTicket {
        self.seq += 1;
        RequestTicket {
            seq: self.seq,
            params: self.query_params(),
        }
    }

    /// False once a newer request started or the parameters moved on; the
    /// response of a non-current ticket must be dropped.
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.seq == self.seq && ticket.params == self.query_params()
    }

    pub fn apply_response<T>(&mut self, response: &PaginatedResponse<T>) {
        self.pagination = PaginationState {
            page: response.page.max(1),
            limit: response.limit.max(1),
            total: response.total,
            total_pages: response.total_pages,
        };
    }
}
