//! HTTP helpers for the backend JSON API with one timeout policy and one error
//! mapping. Feature clients call these helpers instead of building requests
//! themselves. The helpers hold no credentials: callers pass the bearer and
//! CSRF headers they want attached, and token values are never logged.

use super::{config::AppConfig, errors::AppError, errors::GENERIC_FAILURE};
use crate::APP_USER_AGENT;
use reqwest::{
    Client, Method, RequestBuilder, Response,
    cookie::{CookieStore, Jar},
    multipart::Form,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

pub const CSRF_HEADER: &str = "x-csrf-token";

/// Header list attached to a single request.
pub type Headers = Vec<(String, String)>;

/// `Authorization: Bearer <token>`.
#[must_use]
pub fn bearer(token: &SecretString) -> (String, String) {
    (
        "Authorization".to_string(),
        format!("Bearer {}", token.expose_secret()),
    )
}

/// `x-csrf-token: <token>`.
#[must_use]
pub fn csrf(token: &SecretString) -> (String, String) {
    (CSRF_HEADER.to_string(), token.expose_secret().to_string())
}

/// Shared HTTP client bound to the backend base URL. Cookies set by the backend
/// are kept in an in-process jar so later lookups (CSRF cookie) can read them.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    cookies: Arc<Jar>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// # Errors
    /// Returns `AppError::Config` if the base URL is invalid or the client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|err| AppError::Config(format!("Invalid API base URL: {err}")))?;
        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .cookie_provider(Arc::clone(&cookies))
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            cookies,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Value of a cookie the backend set for the API origin.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<String> {
        let header = self.cookies.cookies(&self.base_url)?;
        let header = header.to_str().ok()?;
        cookie_value(header, name)
    }

    /// Fetches JSON with the given headers.
    ///
    /// # Errors
    /// Returns transport, HTTP or decoding errors.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        headers: &[(String, String)],
    ) -> Result<T, AppError> {
        let builder = self.request(Method::GET, path, headers).query(query);
        let response = self.send(builder).await?;
        handle_json_response(response).await
    }

    /// Posts JSON and parses a JSON response.
    ///
    /// # Errors
    /// Returns transport, HTTP or decoding errors.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        headers: &[(String, String)],
    ) -> Result<T, AppError> {
        let builder = self.request(Method::POST, path, headers).json(body);
        let response = self.send(builder).await?;
        handle_json_response(response).await
    }

    /// Posts JSON and ignores any response body.
    ///
    /// # Errors
    /// Returns transport or HTTP errors.
    pub async fn post_json_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        headers: &[(String, String)],
    ) -> Result<(), AppError> {
        let builder = self.request(Method::POST, path, headers).json(body);
        let response = self.send(builder).await?;
        handle_empty_response(response).await
    }

    /// Patches JSON and parses a JSON response.
    ///
    /// # Errors
    /// Returns transport, HTTP or decoding errors.
    pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        headers: &[(String, String)],
    ) -> Result<T, AppError> {
        let builder = self.request(Method::PATCH, path, headers).json(body);
        let response = self.send(builder).await?;
        handle_json_response(response).await
    }

    /// Posts a multipart form and parses a JSON response.
    ///
    /// # Errors
    /// Returns transport, HTTP or decoding errors.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        headers: &[(String, String)],
    ) -> Result<T, AppError> {
        let builder = self.request(Method::POST, path, headers).multipart(form);
        let response = self.send(builder).await?;
        handle_json_response(response).await
    }

    fn request(&self, method: Method, path: &str, headers: &[(String, String)]) -> RequestBuilder {
        let url = build_url(self.base_url.as_str(), path);
        let mut builder = self.client.request(method, url);
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    #[instrument(skip_all)]
    async fn send(&self, builder: RequestBuilder) -> Result<Response, AppError> {
        let request = builder
            .build()
            .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))?;
        debug!(method = %request.method(), path = request.url().path(), "sending request");

        let response = self.client.execute(request).await.map_err(map_request_error)?;
        debug!(status = response.status().as_u16(), "received response");
        Ok(response)
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

/// Maps transport errors into `AppError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        AppError::Serialization(format!("Failed to build request: {err}"))
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

/// Handles responses whose body is not needed.
async fn handle_empty_response(response: Response) -> Result<(), AppError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> AppError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AppError::Http {
        status,
        message: error_message(&body),
    }
}

/// JSON bodies yield their `message` (or `error`) field; other bodies are
/// used as text.
fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let message = ["message", "error"]
            .iter()
            .find_map(|key| json.get(key).and_then(Value::as_str))
            .unwrap_or_default();
        return sanitize_body(message);
    }
    sanitize_body(body)
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
