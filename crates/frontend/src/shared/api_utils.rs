//! URL helpers for frontend-backend communication.

/// Join the API base URL and a request path.
///
/// # Example
/// ```rust
/// use dashboard_frontend::shared::api_utils::api_url;
/// assert_eq!(api_url("http://localhost:5000/api", "/users"), "http://localhost:5000/api/users");
/// ```
pub fn api_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Path of a single resource item, `{endpoint}/{id}` with the id encoded.
pub fn item_path(endpoint: &str, id: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}

/// Encode key/value pairs as a query string (no leading `?`).
pub fn encode_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append extra query parameters to a path that may already carry some.
pub fn with_query(path: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{}{}{}", path, sep, encode_query(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_api_url() {
        assert_eq!(api_url("http://h/api/", "/users"), "http://h/api/users");
        assert_eq!(api_url("http://h/api", "users"), "http://h/api/users");
        assert_eq!(api_url("http://h/api", "https://other/x"), "https://other/x");
    }

    #[test]
    fn test_item_path_encodes_id() {
        assert_eq!(item_path("/users/", "a b"), "/users/a%20b");
    }

    #[test]
    fn test_with_query() {
        let params = pairs(&[("page", "1"), ("q", "a&b")]);
        assert_eq!(with_query("/users", &params), "/users?page=1&q=a%26b");
        assert_eq!(with_query("/users?x=1", &params), "/users?x=1&page=1&q=a%26b");
        assert_eq!(with_query("/users", &[]), "/users");
    }
}
