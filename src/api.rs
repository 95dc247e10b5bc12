//! Typed client for the Notes HTTP API
//!
//! Every endpoint returns the application's response envelope
//! `{ success, status, message, data }`, decoded once at the HTTP boundary
//! into [`Envelope`] so scenario assertions operate on checked fields.
//!
//! Authentication is an opaque token in the `X-Auth-Token` header. Negative
//! scenarios that need a tampered header or a malformed path use
//! [`ApiClient::request`] + [`ApiClient::send`] directly so the action under
//! test stays local to the scenario.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{E2eError, E2eResult};

/// Header carrying the opaque auth token.
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Header the API validates for content negotiation; anything other than
/// `application/json` is rejected with a 400.
pub const CONTENT_FORMAT_HEADER: &str = "x-content-format";

/// The application's response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub status: u16,
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
}

/// Identity fields echoed by the user endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

/// Login response: identity plus the session token.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// A note as echoed by the notes endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub completed: bool,
    pub user_id: String,
}

/// Status plus decoded envelope for one request-response cycle.
#[derive(Debug)]
pub struct ApiReply<T> {
    pub status: StatusCode,
    pub body: Envelope<T>,
}

impl<T> ApiReply<T> {
    /// Fail-fast status check used by the lifecycle helpers.
    pub fn ensure_status(self, endpoint: &str, expected: StatusCode) -> E2eResult<Self> {
        if self.status != expected {
            return Err(E2eError::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                expected: expected.as_u16(),
                actual: self.status.as_u16(),
                message: self.body.message,
            });
        }
        Ok(self)
    }

    pub fn ensure_message(self, expected: &str) -> E2eResult<Self> {
        if self.body.message != expected {
            return Err(E2eError::AssertionFailed(format!(
                "expected message {expected:?}, got {:?}",
                self.body.message
            )));
        }
        Ok(self)
    }

    /// The data payload, or an assertion failure if the envelope had none.
    pub fn data(self) -> E2eResult<T> {
        self.body
            .data
            .ok_or_else(|| E2eError::AssertionFailed("response envelope carried no data".into()))
    }
}

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A bare request builder for a path under the API base. Scenarios use
    /// this for actions under test that need tampered headers or ids.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("Accept", "application/json")
    }

    /// Issue the request and decode the envelope regardless of status, so
    /// error responses stay inspectable.
    pub async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> E2eResult<ApiReply<T>> {
        let response = builder.send().await?;
        let status = response.status();
        let body: Envelope<T> = response.json().await?;
        debug!(status = status.as_u16(), message = %body.message, "api reply");
        Ok(ApiReply { status, body })
    }

    // --- service endpoints ---

    pub async fn health_check(&self) -> E2eResult<ApiReply<serde_json::Value>> {
        self.send(self.request(Method::GET, "/health-check")).await
    }

    // --- user endpoints ---

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> E2eResult<ApiReply<UserData>> {
        let payload = serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        });
        self.send(self.request(Method::POST, "/users/register").json(&payload))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> E2eResult<ApiReply<LoginData>> {
        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });
        self.send(self.request(Method::POST, "/users/login").json(&payload))
            .await
    }

    pub async fn profile(&self, token: &str) -> E2eResult<ApiReply<UserData>> {
        self.send(self.request(Method::GET, "/users/profile").header(AUTH_HEADER, token))
            .await
    }

    pub async fn update_profile(
        &self,
        token: &str,
        name: &str,
        phone: &str,
        company: &str,
    ) -> E2eResult<ApiReply<UserData>> {
        let form = [("name", name), ("phone", phone), ("company", company)];
        self.send(
            self.request(Method::PATCH, "/users/profile")
                .header(AUTH_HEADER, token)
                .form(&form),
        )
        .await
    }

    pub async fn change_password(
        &self,
        token: &str,
        current: &str,
        new: &str,
    ) -> E2eResult<ApiReply<serde_json::Value>> {
        let form = [("currentPassword", current), ("newPassword", new)];
        self.send(
            self.request(Method::POST, "/users/change-password")
                .header(AUTH_HEADER, token)
                .form(&form),
        )
        .await
    }

    pub async fn logout(&self, token: &str) -> E2eResult<ApiReply<serde_json::Value>> {
        self.send(self.request(Method::DELETE, "/users/logout").header(AUTH_HEADER, token))
            .await
    }

    pub async fn delete_account(&self, token: &str) -> E2eResult<ApiReply<serde_json::Value>> {
        self.send(
            self.request(Method::DELETE, "/users/delete-account")
                .header(AUTH_HEADER, token),
        )
        .await
    }

    // --- note endpoints ---

    pub async fn create_note(
        &self,
        token: &str,
        title: &str,
        description: &str,
        category: &str,
        completed: Option<bool>,
    ) -> E2eResult<ApiReply<NoteData>> {
        let mut form = vec![
            ("title", title.to_string()),
            ("description", description.to_string()),
            ("category", category.to_string()),
        ];
        if let Some(completed) = completed {
            form.push(("completed", completed.to_string()));
        }
        self.send(
            self.request(Method::POST, "/notes")
                .header(AUTH_HEADER, token)
                .form(&form),
        )
        .await
    }

    pub async fn notes(&self, token: &str) -> E2eResult<ApiReply<Vec<NoteData>>> {
        self.send(self.request(Method::GET, "/notes").header(AUTH_HEADER, token))
            .await
    }

    pub async fn note(&self, token: &str, note_id: &str) -> E2eResult<ApiReply<NoteData>> {
        self.send(
            self.request(Method::GET, &format!("/notes/{note_id}"))
                .header(AUTH_HEADER, token),
        )
        .await
    }

    /// Full update via PUT; `completed` is sent as `"true"`/`"false"` form
    /// text, matching what the UI submits.
    pub async fn update_note(
        &self,
        token: &str,
        note_id: &str,
        title: &str,
        description: &str,
        category: &str,
        completed: bool,
    ) -> E2eResult<ApiReply<NoteData>> {
        let completed = completed.to_string();
        let form = [
            ("title", title),
            ("description", description),
            ("category", category),
            ("completed", completed.as_str()),
        ];
        self.send(
            self.request(Method::PUT, &format!("/notes/{note_id}"))
                .header(AUTH_HEADER, token)
                .form(&form),
        )
        .await
    }

    pub async fn set_note_completed(
        &self,
        token: &str,
        note_id: &str,
        completed: bool,
    ) -> E2eResult<ApiReply<NoteData>> {
        let completed = completed.to_string();
        let form = [("completed", completed.as_str())];
        self.send(
            self.request(Method::PATCH, &format!("/notes/{note_id}"))
                .header(AUTH_HEADER, token)
                .form(&form),
        )
        .await
    }

    pub async fn delete_note(
        &self,
        token: &str,
        note_id: &str,
    ) -> E2eResult<ApiReply<serde_json::Value>> {
        self.send(
            self.request(Method::DELETE, &format!("/notes/{note_id}"))
                .header(AUTH_HEADER, token),
        )
        .await
    }
}
