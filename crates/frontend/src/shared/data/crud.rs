//! Single-item CRUD over one REST resource, with loading/error tracked per
//! operation.

use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;

use contracts::shared::api::ApiResponse;
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::query_cache::{use_api_client, use_query_client, QueryClient, QueryKey};
use crate::shared::api::{ApiClient, ApiError};
use crate::shared::api_utils::item_path;

#[derive(Clone, Copy)]
pub struct OpStatus {
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl OpStatus {
    pub fn new() -> Self {
        Self {
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }
}

impl Default for OpStatus {
    fn default() -> Self {
        Self::new()
    }
}

struct Outcome {
    success: Option<&'static str>,
    failure: &'static str,
    invalidate: bool,
}

const GET: Outcome = Outcome {
    success: None,
    failure: "Failed to fetch item",
    invalidate: false,
};
const CREATE: Outcome = Outcome {
    success: Some("Item created successfully"),
    failure: "Failed to create item",
    invalidate: true,
};
const UPDATE: Outcome = Outcome {
    success: Some("Item updated successfully"),
    failure: "Failed to update item",
    invalidate: true,
};
const DELETE: Outcome = Outcome {
    success: Some("Item deleted successfully"),
    failure: "Failed to delete item",
    invalidate: true,
};

pub struct Crud<T: 'static> {
    pub get_status: OpStatus,
    pub create_status: OpStatus,
    pub update_status: OpStatus,
    pub remove_status: OpStatus,
    endpoint: StoredValue<String>,
    client: StoredValue<ApiClient>,
    queries: QueryClient,
    invalidates: StoredValue<Option<QueryKey>>,
    _item: PhantomData<fn() -> T>,
}

impl<T: 'static> Clone for Crud<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Crud<T> {}

impl<T> Crud<T>
where
    T: DeserializeOwned + 'static,
{
    pub fn new(endpoint: impl Into<String>, client: ApiClient, queries: QueryClient) -> Self {
        Self {
            get_status: OpStatus::new(),
            create_status: OpStatus::new(),
            update_status: OpStatus::new(),
            remove_status: OpStatus::new(),
            endpoint: StoredValue::new(endpoint.into()),
            client: StoredValue::new(client),
            queries,
            invalidates: StoredValue::new(None),
            _item: PhantomData,
        }
    }

    /// Invalidate `key` after every successful write.
    pub fn invalidating(self, key: QueryKey) -> Self {
        self.invalidates.set_value(Some(key));
        self
    }

    fn item(&self, id: impl Display) -> String {
        item_path(&self.endpoint.get_value(), &id.to_string())
    }

    async fn run<R, Fut>(&self, status: OpStatus, outcome: &Outcome, call: Fut) -> Result<R, ApiError>
    where
        Fut: Future<Output = Result<R, ApiError>>,
    {
        status.loading.set(true);
        status.error.set(None);
        let result = call.await;
        status.loading.set(false);

        let notifier = self.client.with_value(|c| c.notifier());
        match &result {
            Ok(_) => {
                if outcome.invalidate {
                    if let Some(key) = self.invalidates.get_value() {
                        self.queries.invalidate(&key);
                    }
                }
                if let Some(message) = outcome.success {
                    notifier.success(message);
                }
            }
            Err(e) => {
                log::error!("{}: {}", outcome.failure, e);
                status.error.set(Some(e.to_string()));
                notifier.error(outcome.failure);
            }
        }
        result
    }

    pub async fn get_by_id(&self, id: impl Display) -> Result<T, ApiError> {
        let client = self.client.get_value();
        let path = self.item(id);
        self.run(self.get_status, &GET, async {
            client.get::<ApiResponse<T>>(&path).await.map(|r| r.data)
        })
        .await
    }

    pub async fn create<C: Serialize + ?Sized>(&self, data: &C) -> Result<T, ApiError> {
        let client = self.client.get_value();
        let path = self.endpoint.get_value();
        self.run(self.create_status, &CREATE, async {
            client.post::<ApiResponse<T>, C>(&path, data).await.map(|r| r.data)
        })
        .await
    }

    pub async fn update<U: Serialize + ?Sized>(&self, id: impl Display, data: &U) -> Result<T, ApiError> {
        let client = self.client.get_value();
        let path = self.item(id);
        self.run(self.update_status, &UPDATE, async {
            client.put::<ApiResponse<T>, U>(&path, data).await.map(|r| r.data)
        })
        .await
    }

    /// Resolves `true` once the server accepted the delete; the body is
    /// ignored.
    pub async fn remove(&self, id: impl Display) -> Result<bool, ApiError> {
        let client = self.client.get_value();
        let path = self.item(id);
        self.run(self.remove_status, &DELETE, async {
            client.delete::<Value>(&path).await.map(|_| true)
        })
        .await
    }
}

/// CRUD hook for `endpoint`. Writes invalidate `invalidates` when given.
pub fn use_crud<T>(endpoint: impl Into<String>, invalidates: Option<QueryKey>) -> Crud<T>
where
    T: DeserializeOwned + 'static,
{
    let client = use_api_client();
    let crud = Crud::new(endpoint, client, use_query_client());
    match invalidates {
        Some(key) => crud.invalidating(key),
        None => crud,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::api::HttpMethod;
    use crate::shared::notifications::ToastLevel;
    use crate::shared::testing::{block_on, Harness};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Product {
        id: String,
        name: String,
    }

    fn crud(h: &Harness) -> Crud<Product> {
        Crud::new("/products", h.client.clone(), h.queries).invalidating(QueryKey::from("products"))
    }

    #[test]
    fn test_remove_resolves_true_and_invalidates() {
        let h = Harness::new();
        let list = QueryKey::from("products").with(1).with(10);
        h.queries.register(&list);
        h.transport.respond_raw(204, "");

        let removed = block_on(crud(&h).remove("p-1")).unwrap();

        assert!(removed);
        assert_eq!(h.transport.last_request().method, HttpMethod::Delete);
        assert!(h.transport.last_request().url.ends_with("/products/p-1"));
        assert_eq!(h.queries.generation(&list), 1);
        assert_eq!(h.notifier.snapshot()[0].message, "Item deleted successfully");
    }

    #[test]
    fn test_get_by_id_does_not_invalidate() {
        let h = Harness::new();
        let key = QueryKey::from("products");
        h.queries.register(&key);
        h.transport.respond(200, json!({"data": {"id": "p-1", "name": "Lamp"}}));

        let product = block_on(crud(&h).get_by_id("p-1")).unwrap();

        assert_eq!(product.name, "Lamp");
        assert_eq!(h.queries.generation(&key), 0);
        assert!(h.notifier.snapshot().is_empty());
    }

    #[test]
    fn test_create_and_update_notify() {
        let h = Harness::new();
        h.transport.respond(201, json!({"data": {"id": "p-2", "name": "Desk"}}));
        h.transport.respond(200, json!({"data": {"id": "p-2", "name": "Table"}}));
        let products = crud(&h);

        let created = block_on(products.create(&json!({"name": "Desk"}))).unwrap();
        assert_eq!(created.id, "p-2");
        let updated = block_on(products.update("p-2", &json!({"name": "Table"}))).unwrap();
        assert_eq!(updated.name, "Table");

        let messages: Vec<_> = h.notifier.snapshot().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["Item created successfully", "Item updated successfully"]);
        assert_eq!(h.transport.last_request().method, HttpMethod::Put);
    }

    #[test]
    fn test_failure_tracked_per_operation() {
        let h = Harness::new();
        h.transport.respond(422, json!({"message": "Name is required"}));
        let products = crud(&h);

        let err = block_on(products.create(&json!({}))).unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert_eq!(
            products.create_status.error.get_untracked().as_deref(),
            Some("Name is required (422)")
        );
        assert_eq!(products.update_status.error.get_untracked(), None);
        assert!(!products.create_status.loading.get_untracked());
        let toasts = h.notifier.snapshot();
        assert_eq!(toasts[0].message, "Failed to create item");
        assert_eq!(toasts[0].level, ToastLevel::Error);
    }
}
