use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ApiError;
use super::events::{ApiEvent, ApiEventBus};
use super::transport::{HttpMethod, HttpRequest, Transport};
use crate::shared::api_utils::{api_url, with_query};
use crate::shared::notifications::Notifier;
use crate::shared::storage::{KeyValueStore, TOKEN_KEY};

const MSG_NOT_FOUND: &str = "The requested resource was not found";
const MSG_SERVER_ERROR: &str = "An unexpected error occurred. Please try again later";
const MSG_NETWORK: &str = "Unable to connect to the server. Please check your internet connection";

/// Optional per-call settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestConfig {
    /// Extra headers; override the defaults on name clash.
    pub headers: Vec<(String, String)>,
    /// Query parameters appended to the path.
    pub query: Vec<(String, String)>,
}

impl RequestConfig {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: Arc<str>,
    transport: Arc<dyn Transport>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Notifier,
    events: ApiEventBus,
}

impl ApiClient {
    pub fn new(
        base_url: impl AsRef<str>,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            base_url: Arc::from(base_url.as_ref().trim_end_matches('/')),
            transport,
            storage,
            notifier,
            events: ApiEventBus::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn events(&self) -> &ApiEventBus {
        &self.events
    }

    pub fn notifier(&self) -> Notifier {
        self.notifier
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with(path, &RequestConfig::default()).await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        config: &RequestConfig,
    ) -> Result<T, ApiError> {
        self.request(HttpMethod::Get, path, None, config).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.post_with(path, body, &RequestConfig::default()).await
    }

    pub async fn post_with<T, B>(&self, path: &str, body: &B, config: &RequestConfig) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.request(HttpMethod::Post, path, Some(body), config).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.put_with(path, body, &RequestConfig::default()).await
    }

    pub async fn put_with<T, B>(&self, path: &str, body: &B, config: &RequestConfig) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.request(HttpMethod::Put, path, Some(body), config).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.patch_with(path, body, &RequestConfig::default()).await
    }

    pub async fn patch_with<T, B>(&self, path: &str, body: &B, config: &RequestConfig) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.request(HttpMethod::Patch, path, Some(body), config).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.delete_with(path, &RequestConfig::default()).await
    }

    pub async fn delete_with<T: DeserializeOwned>(
        &self,
        path: &str,
        config: &RequestConfig,
    ) -> Result<T, ApiError> {
        self.request(HttpMethod::Delete, path, None, config).await
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        config: &RequestConfig,
    ) -> Result<T, ApiError> {
        let request = self.prepare(method, path, body, config);
        log::debug!("{} {}", method.as_str(), request.url);

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => return Err(self.intercept(ApiError::NetworkUnreachable(e.0))),
        };

        if !response.is_success() {
            return Err(self.intercept(ApiError::from_response(response.status, &response.body)));
        }

        decode_body(&response.body)
    }

    /// Request interceptor: defaults, bearer token, per-call overrides.
    ///
    /// A missing token sends the request unauthenticated and lets the server
    /// decide.
    fn prepare(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        config: &RequestConfig,
    ) -> HttpRequest {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if let Some(token) = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty()) {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        for (name, value) in &config.headers {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }

        HttpRequest {
            method,
            url: api_url(&self.base_url, &with_query(path, &config.query)),
            headers,
            body,
        }
    }

    /// Response interceptor. Runs the central side effects and hands the
    /// error back unchanged.
    fn intercept(&self, error: ApiError) -> ApiError {
        match &error {
            ApiError::AuthenticationExpired(_) => {
                log::warn!("401 from server, clearing persisted token");
                self.storage.remove(TOKEN_KEY);
                self.events.emit(ApiEvent::SessionExpired);
            }
            ApiError::Forbidden(_) => {
                log::warn!("403 from server");
                self.events.emit(ApiEvent::Forbidden);
            }
            ApiError::NotFound(_) => {
                self.notifier.error(MSG_NOT_FOUND);
            }
            ApiError::Server(payload) => {
                log::error!("server error {}", payload.status);
                self.notifier.error(MSG_SERVER_ERROR);
            }
            ApiError::NetworkUnreachable(reason) => {
                log::error!("network failure: {}", reason);
                self.notifier.error(MSG_NETWORK);
            }
            ApiError::Validation(_) | ApiError::Decode(_) | ApiError::Encode(_) => {}
        }
        error
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))
}

/// An empty body decodes as `null`.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::notifications::ToastLevel;
    use crate::shared::testing::{block_on, Harness};
    use contracts::shared::api::ApiResponse;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn test_bearer_token_attached_when_present() {
        let h = Harness::new();
        h.transport.respond(200, json!({"data": 1}));
        h.transport.respond(200, json!({"data": 2}));

        let _: ApiResponse<u32> = block_on(h.client.get("/things")).unwrap();
        assert_eq!(h.transport.last_request().header("authorization"), None);

        h.storage.set(TOKEN_KEY, "abc");
        let _: ApiResponse<u32> = block_on(h.client.get("/things")).unwrap();
        let request = h.transport.last_request();
        assert_eq!(request.header("Authorization"), Some("Bearer abc"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.url, "http://test.local/api/things");
    }

    #[test]
    fn test_returns_decoded_body() {
        let h = Harness::new();
        h.transport.respond(201, json!({"data": {"id": "7"}, "message": "Created"}));

        let created: ApiResponse<serde_json::Value> =
            block_on(h.client.post("/things", &json!({"name": "x"}))).unwrap();
        assert_eq!(created.data["id"], "7");
        assert_eq!(created.message.as_deref(), Some("Created"));

        let request = h.transport.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body.as_deref(), Some(r#"{"name":"x"}"#));
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let h = Harness::new();
        h.transport.respond_raw(204, "");
        let result: Option<ApiResponse<()>> = block_on(h.client.delete("/things/1")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_config_headers_and_query() {
        let h = Harness::new();
        h.transport.respond(200, json!(null));
        let config = RequestConfig::default()
            .header("Accept", "text/csv")
            .query("page", "2");

        let _: Option<()> = block_on(h.client.get_with("/export", &config)).unwrap();
        let request = h.transport.last_request();
        assert_eq!(request.header("accept"), Some("text/csv"));
        assert_eq!(request.url, "http://test.local/api/export?page=2");
    }

    #[test]
    fn test_401_clears_token_and_emits_event() {
        let h = Harness::new();
        h.storage.set(TOKEN_KEY, "stale");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        h.client.events().connect(move |e| sink.lock().unwrap().push(e));
        h.transport.respond(401, json!({"message": "jwt expired"}));

        let err = block_on(h.client.get::<serde_json::Value>("/me")).unwrap_err();

        assert!(matches!(err, ApiError::AuthenticationExpired(_)));
        assert_eq!(err.server_message().as_deref(), Some("jwt expired"));
        assert_eq!(h.storage.get(TOKEN_KEY), None);
        assert_eq!(*seen.lock().unwrap(), vec![ApiEvent::SessionExpired]);
        // navigation-coupled notification belongs to the coordinator
        assert!(h.notifier.snapshot().is_empty());
    }

    #[test]
    fn test_403_emits_forbidden_and_keeps_token() {
        let h = Harness::new();
        h.storage.set(TOKEN_KEY, "abc");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        h.client.events().connect(move |e| sink.lock().unwrap().push(e));
        h.transport.respond(403, json!({}));

        let err = block_on(h.client.get::<serde_json::Value>("/admin")).unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("abc"));
        assert_eq!(*seen.lock().unwrap(), vec![ApiEvent::Forbidden]);
    }

    #[test]
    fn test_not_found_server_and_network_notify() {
        let h = Harness::new();
        h.transport.respond(404, json!({}));
        h.transport.respond(500, json!({}));
        h.transport.fail("connection refused");

        let e1 = block_on(h.client.get::<serde_json::Value>("/a")).unwrap_err();
        let e2 = block_on(h.client.get::<serde_json::Value>("/b")).unwrap_err();
        let e3 = block_on(h.client.get::<serde_json::Value>("/c")).unwrap_err();
        assert!(matches!(e1, ApiError::NotFound(_)));
        assert!(matches!(e2, ApiError::Server(_)));
        assert!(matches!(e3, ApiError::NetworkUnreachable(_)));

        let messages: Vec<_> = h.notifier.snapshot().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec![MSG_NOT_FOUND, MSG_SERVER_ERROR, MSG_NETWORK]);
        assert!(h.notifier.snapshot().iter().all(|t| t.level == ToastLevel::Error));
    }

    #[test]
    fn test_validation_error_is_silent() {
        let h = Harness::new();
        h.transport.respond(422, json!({"message": "Name is required"}));
        let err = block_on(h.client.put::<serde_json::Value, _>("/things/1", &json!({}))).unwrap_err();
        assert_eq!(err.server_message().as_deref(), Some("Name is required"));
        assert!(h.notifier.snapshot().is_empty());
    }

    #[test]
    fn test_decode_error() {
        let h = Harness::new();
        h.transport.respond_raw(200, "<html>");
        let err = block_on(h.client.get::<ApiResponse<u32>>("/x")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
