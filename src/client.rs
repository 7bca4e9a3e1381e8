//! Tree-inventory API client.
//!
//! Provides blocking HTTP access to the tree backend.
//! Uses reqwest with rustls for TLS. Mutating operations take the bearer
//! token as an explicit argument; a missing or stale token is not checked
//! locally, the server rejects the request.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use tracing::{debug, instrument, warn};

use crate::errors::BoomkaartError;
use crate::models::{LoginResponse, NewTree, Tree, TreeUpdate};

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("boomkaart/", env!("CARGO_PKG_VERSION"));

/// Default backend base URL when neither flag nor environment sets one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "BOOMKAART_URL";

/// Client for the tree-inventory API.
pub struct TreeClient {
    client: Client,
    base_url: String,
}

impl TreeClient {
    /// Create a new client against the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BoomkaartError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Resolve the base URL from an optional flag, the environment, or the default.
    #[must_use]
    pub fn resolve_base_url(flag: Option<String>) -> String {
        flag.or_else(|| std::env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Fetch all tree records.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub fn list_trees(&self) -> Result<Vec<Tree>, BoomkaartError> {
        let url = format!("{}/trees", self.base_url);
        debug!("fetching trees from {}", url);

        let trees: Vec<Tree> = self.execute(self.client.get(&url))?;

        // Out-of-range records are kept: the radius filter drops anything
        // whose distance does not compute, and callers see the rest as-is.
        for tree in &trees {
            if let Err(e) = tree.validate() {
                warn!("tree {} failed validation: {e}", tree.id);
            }
        }

        debug!("fetched {} trees", trees.len());
        Ok(trees)
    }

    /// Create a tree record.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    #[instrument(skip(self, tree, token), fields(name = %tree.name))]
    pub fn add_tree(&self, tree: &NewTree, token: &str) -> Result<Tree, BoomkaartError> {
        let url = format!("{}/trees", self.base_url);
        debug!("adding tree via {}", url);

        self.execute(self.client.post(&url).bearer_auth(token).json(tree))
    }

    /// Update the biometric fields of a tree record.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    #[instrument(skip(self, token))]
    pub fn update_tree(
        &self,
        id: i64,
        update: &TreeUpdate,
        token: &str,
    ) -> Result<Tree, BoomkaartError> {
        let url = format!("{}/trees/{id}", self.base_url);
        debug!("updating tree via {}", url);

        self.execute(self.client.put(&url).bearer_auth(token).json(update))
    }

    /// Delete a tree record.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    #[instrument(skip(self, token))]
    pub fn delete_tree(&self, id: i64, token: &str) -> Result<(), BoomkaartError> {
        let url = format!("{}/trees/{id}", self.base_url);
        debug!("deleting tree via {}", url);

        self.execute_no_body(self.client.delete(&url).bearer_auth(token))
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, bad credentials, or an
    /// unexpected response shape.
    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Result<String, BoomkaartError> {
        let url = format!("{}/login", self.base_url);
        let form = [("username", username), ("password", password)];

        let response: LoginResponse = self.execute(self.client.post(&url).form(&form))?;

        if response.data.access_token.is_empty() {
            return Err(BoomkaartError::InvalidResponse(
                "login returned an empty access token".into(),
            ));
        }
        Ok(response.data.access_token)
    }

    /// Check that a token is still accepted by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid or the request fails.
    #[instrument(skip(self, token))]
    pub fn verify_token(&self, token: &str) -> Result<(), BoomkaartError> {
        let url = format!("{}/verify-token/{token}", self.base_url);
        self.execute_no_body(self.client.get(&url))
    }

    /// Revoke a token, ending the session server-side.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    #[instrument(skip(self, token))]
    pub fn revoke_token(&self, token: &str) -> Result<(), BoomkaartError> {
        let url = format!("{}/revoke-token/{token}", self.base_url);
        self.execute_no_body(self.client.post(&url))
    }

    /// Send a request and parse the JSON response body.
    fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, BoomkaartError> {
        let response = request.send()?;

        // Check status before parsing
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BoomkaartError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json()?)
    }

    /// Send a request where only the status matters.
    fn execute_no_body(&self, request: RequestBuilder) -> Result<(), BoomkaartError> {
        let response = request.send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BoomkaartError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(())
    }
}
