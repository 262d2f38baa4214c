//! HTTP client for the Vision AI API.
//!
//! Every authenticated request carries the session's bearer token. A 401 from
//! the API ends the session, and once logged out the client refuses to send
//! authenticated requests at all.

use futures::future::try_join_all;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::models::*;
use crate::session::{Authenticator, SessionStore};

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: session expired or invalid")]
    Unauthorized,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Server error: {0}")]
    Server(String),
}

impl ClientError {
    /// True when the failure means the user has to log in again.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::NotAuthenticated)
    }
}

/// HTTP client for the Vision AI API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    session: SessionStore,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self {
            base_url: crate::config::normalize_url(&base_url.into()),
            session,
            client: Client::new(),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build an authenticated request. Fails without a session token.
    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ClientError> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.client.request(method, self.url(path)).bearer_auth(token))
    }

    /// Map non-success statuses to errors, logging out on 401.
    async fn check_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("API rejected the session token, logging out");
                self.session.logout();
                Err(ClientError::Unauthorized)
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
            _ => Err(ClientError::Server(format!("{}: {}", status, body))),
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = self.check_status(response).await?;
        Ok(response.json().await?)
    }

    // ============================================================
    // Pagination
    // ============================================================

    /// Fetch a single page of a list endpoint.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<T>, ClientError> {
        let response = self
            .request(Method::GET, path)?
            .query(&[("page", page), ("size", page_size)])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Fetch every page of a list endpoint and flatten the items.
    ///
    /// Page 1 is fetched first to learn the page count; the rest are fetched
    /// concurrently. Items come back in ascending page order regardless of
    /// which response arrives first.
    pub async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        page_size: u32,
    ) -> Result<Vec<T>, ClientError> {
        let result = self.fetch_all_pages(path, page_size).await;
        if let Err(ref e) = result {
            tracing::error!(path, "Error fetching pages: {}", e);
        }
        result
    }

    async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        page_size: u32,
    ) -> Result<Vec<T>, ClientError> {
        let first: Page<T> = self.get_page(path, 1, page_size).await?;
        let pages = first.page_count();
        let mut items = first.items;

        if pages > 1 {
            let rest = try_join_all(
                (2..=pages).map(|page| self.get_page::<T>(path, page, page_size)),
            )
            .await?;
            for page in rest {
                items.extend(page.items);
            }
        }

        tracing::debug!(path, pages, count = items.len(), "Fetched all pages");
        Ok(items)
    }

    // ============================================================
    // Resource Operations
    // ============================================================

    /// Pending AI identifications awaiting human review.
    pub async fn list_ai_identifications(
        &self,
        page_size: u32,
    ) -> Result<Vec<Identification>, ClientError> {
        self.get_all_pages("/identifications/ai", page_size).await
    }

    /// The object/label catalog.
    pub async fn list_objects(&self, page_size: u32) -> Result<Vec<ObjectDefinition>, ClientError> {
        self.get_all_pages("/objects", page_size).await
    }

    pub async fn list_cameras(&self, page_size: u32) -> Result<Vec<Camera>, ClientError> {
        self.get_all_pages("/cameras", page_size).await
    }

    pub async fn list_prompts(&self, page_size: u32) -> Result<Vec<Prompt>, ClientError> {
        self.get_all_pages("/prompts", page_size).await
    }

    /// Record a human label for an identification.
    pub async fn submit_identification(
        &self,
        identification_id: Uuid,
        label: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .request(Method::POST, "/identifications")?
            .json(&Submission {
                identification_id,
                label: label.to_string(),
            })
            .send()
            .await?;
        self.check_status(response).await?;
        tracing::info!(%identification_id, label, "Submitted label");
        Ok(())
    }
}

impl Authenticator for ApiClient {
    /// `POST /auth/token` with a form-encoded body.
    ///
    /// Rejected credentials do not touch the current session.
    async fn request_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AccessToken, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/token"))
            .form(&Credentials { username, password })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
            _ => Err(ClientError::Server(format!("{}: {}", status, body))),
        }
    }
}
