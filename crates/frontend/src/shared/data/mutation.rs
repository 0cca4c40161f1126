//! Create/update/delete mutations against a REST resource.
//!
//! Each success reports the server's `message` (or a default) and
//! invalidates the configured query key so dependent lists refetch.

use std::fmt::Display;
use std::future::Future;

use contracts::shared::api::ApiResponse;
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::query_cache::{use_api_client, use_query_client, QueryClient, QueryKey};
use crate::shared::api::{ApiClient, ApiError};
use crate::shared::api_utils::item_path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    fn success_message(&self) -> &'static str {
        match self {
            MutationKind::Create => "Successfully created",
            MutationKind::Update => "Successfully updated",
            MutationKind::Delete => "Successfully deleted",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            MutationKind::Create => "Failed to create",
            MutationKind::Update => "Failed to update",
            MutationKind::Delete => "Failed to delete",
        }
    }
}

/// Shared status and side effects of a mutation hook.
#[derive(Clone)]
pub struct MutationState {
    pub pending: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    client: ApiClient,
    queries: QueryClient,
    invalidates: Option<QueryKey>,
}

impl MutationState {
    pub fn new(client: ApiClient, queries: QueryClient, invalidates: Option<QueryKey>) -> Self {
        Self {
            pending: RwSignal::new(false),
            error: RwSignal::new(None),
            client,
            queries,
            invalidates,
        }
    }

    async fn settle<T, Fut>(&self, kind: MutationKind, call: Fut) -> Result<ApiResponse<T>, ApiError>
    where
        Fut: Future<Output = Result<ApiResponse<T>, ApiError>>,
    {
        self.pending.set(true);
        self.error.set(None);
        let result = call.await;
        self.pending.set(false);

        let notifier = self.client.notifier();
        match &result {
            Ok(response) => {
                if let Some(key) = &self.invalidates {
                    self.queries.invalidate(key);
                }
                notifier.success(
                    response
                        .message
                        .clone()
                        .unwrap_or_else(|| kind.success_message().to_string()),
                );
            }
            Err(e) => {
                log::error!("{:?} error: {}", kind, e);
                self.error.set(Some(e.to_string()));
                notifier.error(
                    e.server_message()
                        .unwrap_or_else(|| kind.failure_message().to_string()),
                );
            }
        }
        result
    }
}

/// `POST {url}`
#[derive(Clone)]
pub struct CreateMutation {
    pub state: MutationState,
    url: String,
}

impl CreateMutation {
    pub fn new(url: impl Into<String>, state: MutationState) -> Self {
        Self { state, url: url.into() }
    }

    pub async fn mutate<T, D>(&self, data: &D) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        self.state
            .settle(MutationKind::Create, self.state.client.post(&self.url, data))
            .await
    }
}

/// `PUT {url}/{id}`
#[derive(Clone)]
pub struct UpdateMutation {
    pub state: MutationState,
    url: String,
}

impl UpdateMutation {
    pub fn new(url: impl Into<String>, state: MutationState) -> Self {
        Self { state, url: url.into() }
    }

    pub async fn mutate<T, D>(&self, id: impl Display, data: &D) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let path = item_path(&self.url, &id.to_string());
        self.state
            .settle(MutationKind::Update, self.state.client.put(&path, data))
            .await
    }
}

/// `DELETE {url}/{id}`
#[derive(Clone)]
pub struct DeleteMutation {
    pub state: MutationState,
    url: String,
}

impl DeleteMutation {
    pub fn new(url: impl Into<String>, state: MutationState) -> Self {
        Self { state, url: url.into() }
    }

    pub async fn mutate<T>(&self, id: impl Display) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let path = item_path(&self.url, &id.to_string());
        self.state
            .settle(MutationKind::Delete, self.state.client.delete(&path))
            .await
    }
}

fn mutation_state(invalidates: Option<QueryKey>) -> MutationState {
    let client = use_api_client();
    MutationState::new(client, use_query_client(), invalidates)
}

/// Pass a key to refresh dependent lists after creation.
pub fn use_create(url: impl Into<String>, invalidates: Option<QueryKey>) -> CreateMutation {
    CreateMutation::new(url, mutation_state(invalidates))
}

pub fn use_update(url: impl Into<String>, invalidates: QueryKey) -> UpdateMutation {
    UpdateMutation::new(url, mutation_state(Some(invalidates)))
}

pub fn use_delete(url: impl Into<String>, invalidates: QueryKey) -> DeleteMutation {
    DeleteMutation::new(url, mutation_state(Some(invalidates)))
}
