//! Dashboard analytics over a date range.

use contracts::dashboards::analytics::AnalyticsQuery;
use contracts::shared::api::ApiResponse;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;

use super::query_cache::use_api_client;
use crate::shared::api::{ApiClient, ApiError};
use crate::shared::date_utils::DateRange;

pub const DEFAULT_ANALYTICS_ENDPOINT: &str = "/analytics";
const MSG_LOAD_FAILED: &str = "Failed to load analytics data";

pub struct Analytics<T: 'static> {
    pub data: RwSignal<Option<T>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    pub date_range: RwSignal<DateRange>,
    endpoint: StoredValue<String>,
    client: StoredValue<ApiClient>,
}

impl<T: 'static> Clone for Analytics<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Analytics<T> {}

/// `{endpoint}?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD`
pub fn analytics_url(endpoint: &str, range: DateRange) -> Result<String, ApiError> {
    let query = AnalyticsQuery {
        start_date: range.start,
        end_date: range.end,
    };
    let qs = serde_qs::to_string(&query).map_err(|e| ApiError::Encode(e.to_string()))?;
    Ok(format!("{}?{}", endpoint, qs))
}

impl<T> Analytics<T>
where
    T: Clone + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(endpoint: impl Into<String>, client: ApiClient, range: DateRange) -> Self {
        Self {
            data: RwSignal::new(None),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            date_range: RwSignal::new(range),
            endpoint: StoredValue::new(endpoint.into()),
            client: StoredValue::new(client),
        }
    }

    /// Replaces the whole range.
    pub fn handle_date_range_change(&self, range: DateRange) {
        self.date_range.set(range);
    }

    pub async fn fetch_analytics(&self) {
        let range = self.date_range.get_untracked();
        self.loading.set(true);
        self.error.set(None);

        let client = self.client.get_value();
        let result = match analytics_url(&self.endpoint.get_value(), range) {
            Ok(url) => client.get::<ApiResponse<T>>(&url).await,
            Err(e) => Err(e),
        };

        if self.date_range.get_untracked() != range {
            log::debug!("dropping analytics for superseded range");
            return;
        }
        match result {
            Ok(response) => self.data.set(Some(response.data)),
            Err(e) => {
                log::error!("Error fetching analytics: {}", e);
                self.error.set(Some(e.to_string()));
                client.notifier().error(MSG_LOAD_FAILED);
            }
        }
        self.loading.set(false);
    }
}

/// Analytics hook; `endpoint` defaults to `/analytics` and the range to the
/// last 30 days. Refetches whenever the range changes.
pub fn use_analytics<T>(endpoint: Option<&str>) -> Analytics<T>
where
    T: Clone + DeserializeOwned + Send + Sync + 'static,
{
    let client = use_api_client();
    let analytics = Analytics::new(
        endpoint.unwrap_or(DEFAULT_ANALYTICS_ENDPOINT),
        client,
        DateRange::last_30_days(),
    );

    Effect::new(move |_| {
        analytics.date_range.track();
        spawn_local(async move { analytics.fetch_analytics().await });
    });

    analytics
}
