use std::sync::Arc;

use crate::client::{failure_message, ApiClient};
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, Role, User};
use crate::session::SessionStore;

/// The session lifecycle operations: login, register, logout and profile
/// update. Holds the store and the request pipeline; consumers get snapshot
/// reads from the store and funnel every write through these four.
pub struct AuthContext {
    client: Arc<ApiClient>,
    store: Arc<SessionStore>,
}

impl AuthContext {
    pub fn new(client: Arc<ApiClient>, store: Arc<SessionStore>) -> Self {
        Self { client, store }
    }

    /// Exchange credentials for a session. On success both the session and
    /// the bearer token are persisted before the user is returned; on
    /// failure persisted state is untouched.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self
            .client
            .post_json("/auth/login", &body)
            .await
            .map_err(|e| e.with_default("Login failed"))?;

        if !resp.status().is_success() {
            return Err(ApiError::Api(
                failure_message(resp, &["message"], "Login failed").await,
            ));
        }

        let auth: AuthResponse = resp
            .json()
            .await
            .map_err(|_| ApiError::Api("Login failed".to_string()))?;
        self.store.store(auth.user.clone(), auth.access_token)?;
        tracing::info!(username = %auth.user.username, "signed in");
        Ok(auth.user)
    }

    /// Create an account and sign in. Role is always the ordinary-user
    /// value; the backend reports failures in `detail` before `message`.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> ApiResult<User> {
        let body = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::User,
        };
        let resp = self
            .client
            .post_json("/auth/register", &body)
            .await
            .map_err(|e| e.with_default("Registration failed"))?;

        if !resp.status().is_success() {
            return Err(ApiError::Api(
                failure_message(resp, &["detail", "message"], "Registration failed").await,
            ));
        }

        let auth: AuthResponse = resp
            .json()
            .await
            .map_err(|_| ApiError::Api("Registration failed".to_string()))?;
        self.store.store(auth.user.clone(), auth.access_token)?;
        tracing::info!(username = %auth.user.username, "registered");
        Ok(auth.user)
    }

    /// Drop the session locally. No network call, cannot fail.
    pub fn logout(&self) {
        self.store.clear();
        tracing::info!("signed out");
    }

    /// Send a partial profile update; the backend returns the full updated
    /// user, which replaces the persisted session. Failure leaves state
    /// untouched.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        let resp = self
            .client
            .put_json("/users/me", update)
            .await
            .map_err(|e| e.with_default("Update failed"))?;

        if !resp.status().is_success() {
            return Err(ApiError::Api(
                failure_message(resp, &["message"], "Update failed").await,
            ));
        }

        let user: User = resp
            .json()
            .await
            .map_err(|_| ApiError::Api("Update failed".to_string()))?;
        self.store.update_user(user.clone())?;
        Ok(user)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
