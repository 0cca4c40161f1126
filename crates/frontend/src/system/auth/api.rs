use contracts::shared::api::ApiResponse;
use contracts::system::auth::{AuthPayload, LoginCredentials, RegisterCredentials, User};

use crate::shared::api::{ApiClient, ApiError};

/// `POST /auth/login`
pub async fn login(client: &ApiClient, credentials: &LoginCredentials) -> Result<AuthPayload, ApiError> {
    let response: ApiResponse<AuthPayload> = client.post("/auth/login", credentials).await?;
    Ok(response.data)
}

/// `POST /auth/register`
pub async fn register(client: &ApiClient, credentials: &RegisterCredentials) -> Result<AuthPayload, ApiError> {
    let response: ApiResponse<AuthPayload> = client.post("/auth/register", credentials).await?;
    Ok(response.data)
}

/// `GET /auth/me`, authenticated by the persisted token.
pub async fn current_user(client: &ApiClient) -> Result<User, ApiError> {
    let response: ApiResponse<User> = client.get("/auth/me").await?;
    Ok(response.data)
}
