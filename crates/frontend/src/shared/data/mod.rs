//! Data-access hooks: cached queries, mutations, list views, CRUD and
//! analytics.

pub mod analytics;
pub mod crud;
pub mod data_fetching;
pub mod fetch;
pub mod list_state;
pub mod mutation;
pub mod query_cache;

pub use analytics::{use_analytics, Analytics};
pub use crud::{use_crud, Crud, OpStatus};
pub use data_fetching::{use_data_fetching, DataFetching};
pub use fetch::{use_fetch, use_paginated_fetch, Query};
pub use list_state::{FilterValue, ListState, PaginationState, QueryState, RequestTicket, DEFAULT_PAGE_SIZE};
pub use mutation::{use_create, use_delete, use_update, CreateMutation, DeleteMutation, UpdateMutation};
pub use query_cache::{use_api_client, use_query_client, QueryClient, QueryKey};
