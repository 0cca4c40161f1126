//! Paginated, sortable, filterable list of one REST resource.

use contracts::shared::api::PaginatedResponse;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;

use super::list_state::{FilterValue, ListState, PaginationState, QueryState};
use super::query_cache::{use_api_client, use_query_client, QueryClient, QueryKey};
use crate::shared::api::ApiClient;
use crate::shared::api_utils::with_query;

const MSG_LOAD_FAILED: &str = "Failed to load data";

pub struct DataFetching<T: 'static> {
    pub data: RwSignal<Vec<T>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    pub state: RwSignal<ListState>,
    endpoint: StoredValue<String>,
    key: StoredValue<QueryKey>,
    client: StoredValue<ApiClient>,
    queries: QueryClient,
}

impl<T: 'static> Clone for DataFetching<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for DataFetching<T> {}

impl<T> DataFetching<T>
where
    T: Clone + DeserializeOwned + Send + Sync + 'static,
{
    /// The list registers under the key derived from `endpoint`
    /// (`/admin/users` becomes `[admin, users]`), so invalidating that key
    /// or a prefix of it refetches the list.
    pub fn new(endpoint: impl Into<String>, client: ApiClient, queries: QueryClient) -> Self {
        let endpoint = endpoint.into();
        let key = endpoint_key(&endpoint);
        queries.register(&key);
        Self {
            data: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            state: RwSignal::new(ListState::default()),
            endpoint: StoredValue::new(endpoint),
            key: StoredValue::new(key),
            client: StoredValue::new(client),
            queries,
        }
    }

    pub fn key(&self) -> QueryKey {
        self.key.get_value()
    }

    /// Tracked read of the list's cache generation.
    pub fn generation(&self) -> u64 {
        self.key.with_value(|key| self.queries.generation(key))
    }

    pub fn pagination(&self) -> Signal<PaginationState> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.pagination))
    }

    pub fn query(&self) -> Signal<QueryState> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.query.clone()))
    }

    pub fn handle_page_change(&self, page: u32) {
        self.state.update(|s| s.set_page(page));
    }

    pub fn handle_limit_change(&self, limit: u32) {
        self.state.update(|s| s.set_limit(limit));
    }

    pub fn handle_sort(&self, field: &str) {
        self.state.update(|s| s.toggle_sort(field));
    }

    pub fn handle_filter_change<I, K, V>(&self, filters: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FilterValue>,
    {
        self.state.update(|s| s.merge_filters(filters));
    }

    pub fn handle_filter_reset(&self) {
        self.state.update(|s| s.reset_filters());
    }

    /// Request the current page. A response that arrives after the
    /// parameters moved on is dropped.
    pub async fn fetch_data(&self) {
        let Some(ticket) = self.state.try_update_untracked(|s| s.begin_request()) else {
            return;
        };
        self.loading.set(true);
        self.error.set(None);

        let url = with_query(&self.endpoint.get_value(), &ticket.params);
        let client = self.client.get_value();
        let result = client.get::<PaginatedResponse<T>>(&url).await;

        if !self.state.with_untracked(|s| s.is_current(&ticket)) {
            log::debug!("dropping stale response for {}", url);
            return;
        }
        match result {
            Ok(response) => {
                self.state.update(|s| s.apply_response(&response));
                self.data.set(response.data);
            }
            Err(e) => {
                log::error!("Error fetching {}: {}", url, e);
                self.error.set(Some(e.to_string()));
                client.notifier().error(MSG_LOAD_FAILED);
            }
        }
        self.loading.set(false);
    }

    pub fn refetch(&self) {
        let this = *self;
        spawn_local(async move { this.fetch_data().await });
    }
}

pub fn endpoint_key(endpoint: &str) -> QueryKey {
    QueryKey::new(endpoint.split('/').filter(|segment| !segment.is_empty()))
}

/// List hook for `endpoint`. Refetches whenever page, limit, sort or
/// filters change, and when its key is invalidated.
pub fn use_data_fetching<T>(endpoint: impl Into<String>) -> DataFetching<T>
where
    T: Clone + DeserializeOwned + Send + Sync + 'static,
{
    let fetching = DataFetching::new(endpoint, use_api_client(), use_query_client());

    let state = fetching.state;
    let current = Memo::new(move |_| (state.with(|s| s.query_params()), fetching.generation()));
    Effect::new(move |_| {
        current.track();
        fetching.refetch();
    });

    fetching
}
