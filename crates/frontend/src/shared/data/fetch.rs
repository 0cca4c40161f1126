//! Cached queries: `use_fetch` and `use_paginated_fetch`.

use contracts::shared::api::{ApiResponse, PaginatedResponse};
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::query_cache::{use_api_client, use_query_client, QueryClient, QueryKey};
use crate::shared::api::ApiClient;
use crate::shared::api_utils::with_query;

/// Reactive result of one query.
pub struct Query<R: 'static> {
    pub data: RwSignal<Option<R>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    key: RwSignal<QueryKey>,
    queries: QueryClient,
}

impl<R: 'static> Clone for Query<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: 'static> Copy for Query<R> {}

impl<R> Query<R>
where
    R: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(key: QueryKey, queries: QueryClient) -> Self {
        Self {
            data: RwSignal::new(None),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            key: RwSignal::new(key),
            queries,
        }
    }

    pub fn key(&self) -> QueryKey {
        self.key.get_untracked()
    }

    /// Mark this query stale; a mounted query refetches.
    pub fn refetch(&self) {
        self.queries.invalidate(&self.key());
    }

    /// One load cycle: cache or network (with retry), then publish.
    pub async fn load(&self, client: &ApiClient, key: QueryKey, url: &str) {
        self.key.set(key.clone());
        self.loading.set(true);
        self.error.set(None);

        let result = self.queries.fetch(&key, || client.get::<R>(url)).await;

        // a newer cycle owns the signals now
        if self.key.get_untracked() != key {
            return;
        }
        match result {
            Ok(value) => self.data.set(Some(value)),
            Err(e) => {
                log::error!("Fetch error: {}", e);
                self.error.set(Some(e.to_string()));
            }
        }
        self.loading.set(false);
    }
}

/// Mount `query`: load now and again whenever the key changes or is
/// invalidated.
fn watch<R>(query: Query<R>, client: ApiClient, target: impl Fn() -> (QueryKey, String) + Send + Sync + 'static)
where
    R: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let queries = query.queries;
    let current = Memo::new(move |_| {
        let (key, url) = target();
        let generation = queries.generation(&key);
        (key, url, generation)
    });

    Effect::new(move |_| {
        let (key, url, _) = current.get();
        queries.register(&key);
        let client = client.clone();
        spawn_local(async move {
            query.load(&client, key, &url).await;
        });
    });
}

/// Fetch one `{ data, message }` envelope from `url`.
pub fn use_fetch<T>(key: QueryKey, url: impl Into<String>) -> Query<ApiResponse<T>>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let url = url.into();
    let query = Query::new(key.clone(), use_query_client());
    watch(query, use_api_client(), move || (key.clone(), url.clone()));
    query
}

/// Fetch one page of `url`. The key is extended with `page` and `limit`.
pub fn use_paginated_fetch<T>(
    key: QueryKey,
    url: impl Into<String>,
    page: impl Into<Signal<u32>>,
    limit: impl Into<Signal<u32>>,
) -> Query<PaginatedResponse<T>>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let url = url.into();
    let page = page.into();
    let limit = limit.into();
    let query = Query::new(key.clone(), use_query_client());
    watch(query, use_api_client(), move || {
        let (page, limit) = (page.get(), limit.get());
        (
            paginated_key(&key, page, limit),
            paginated_url(&url, page, limit),
        )
    });
    query
}

pub fn paginated_key(key: &QueryKey, page: u32, limit: u32) -> QueryKey {
    key.clone().with(page).with(limit)
}

pub fn paginated_url(url: &str, page: u32, limit: u32) -> String {
    with_query(
        url,
        &[
            ("page".to_string(), page.to_string()),
            ("limit".to_string(), limit.to_string()),
        ],
    )
}
