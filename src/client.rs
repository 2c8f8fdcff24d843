//! Async client for the 1secmail read API, routed through a forwarding relay.
//!
//! The provider exposes two read operations, both plain GET endpoints
//! returning JSON: a mailbox listing and a per-message fetch. Browsers cannot
//! call them cross-origin, so every request goes through a relay that takes
//! the full provider request as a single `url` query parameter and returns
//! the provider's response body unchanged. This client builds the provider
//! URL, wraps it for the relay, and decodes whatever comes back.
//!
//! Typical flow:
//! 1) Build a client (`Client::new` or `Client::builder().build()`)
//! 2) Generate an address via [`crate::address::generate`]
//! 3) Poll the inbox via [`Client::list_messages`]
//! 4) Fetch full message content via [`Client::fetch_message`]

use crate::{Address, Error, MessageDetails, MessageSummary, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Url;
use std::fmt;
use std::time::Duration;

const RELAY_URL: &str = "https://api.allorigins.win/raw";
const API_URL: &str = "https://www.1secmail.com/api/v1/";
const USER_AGENT_VALUE: &str = concat!("vanishmail/", env!("CARGO_PKG_VERSION"));

/// Async client for the 1secmail disposable-mail read API.
///
/// A `Client` is cheap to clone at the `reqwest` level (internally shared
/// connection pool), and this type is `Clone`. Create it once and clone as
/// needed.
///
/// # Notes
/// - The provider has no sessions or authentication; a mailbox is identified
///   purely by its local part and domain.
/// - All methods are async and require a Tokio runtime (or any runtime
///   compatible with `reqwest`).
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    relay_url: String,
    api_url: String,
    user_agent: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("http", &"<reqwest::Client>")
            .field("relay_url", &self.relay_url)
            .field("api_url", &self.api_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Client {
    /// Create a [`ClientBuilder`] for configuring a new client.
    ///
    /// Use this when you need to point at a different relay or provider
    /// endpoint, change the user agent, or set a request timeout.
    ///
    /// # Examples
    /// ```no_run
    /// # use vanishmail::Client;
    /// # fn main() -> Result<(), vanishmail::Error> {
    /// let client = Client::builder()
    ///     .user_agent("my-app/1.0")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new client using the default relay and provider endpoints.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Retrieve the current inbox listing for the given address.
    ///
    /// An empty mailbox yields an empty vector, not an error.
    ///
    /// # Errors
    /// Returns an error if the request fails, the relay or provider answers
    /// with a non-success status, or the response is not the expected JSON.
    ///
    /// # Examples
    /// ```no_run
    /// # use vanishmail::{address, Client};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), vanishmail::Error> {
    /// let client = Client::new()?;
    /// let address = address::generate();
    /// for summary in client.list_messages(&address).await? {
    ///     println!("{}: {}", summary.from, summary.subject);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_messages(&self, address: &Address) -> Result<Vec<MessageSummary>> {
        let provider = self.provider_url(address, None)?;
        self.relay_get(&provider).await
    }

    /// Fetch the full content of a specific message.
    ///
    /// Use [`Client::list_messages`] to obtain message ids, then call this
    /// method for the body and remaining fields.
    ///
    /// # Errors
    /// Returns an error if the request fails, the relay or provider answers
    /// with a non-success status, or the response cannot be deserialized.
    /// A failure here concerns one id only; other messages in the same
    /// mailbox are unaffected.
    pub async fn fetch_message(&self, address: &Address, id: u64) -> Result<MessageDetails> {
        let provider = self.provider_url(address, Some(id))?;
        self.relay_get(&provider).await
    }

    async fn relay_get<T>(&self, provider_url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .get(&self.relay_url)
            .query(&[("url", provider_url)])
            .headers(self.headers())
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let parsed = serde_json::from_slice::<T>(&body)?;
        Ok(parsed)
    }

    /// Build the provider-side request URL that the relay forwards.
    fn provider_url(&self, address: &Address, id: Option<u64>) -> Result<String> {
        let action = if id.is_some() {
            "readMessage"
        } else {
            "getMessages"
        };
        let mut params = vec![
            ("action", action.to_string()),
            ("login", address.local_part.clone()),
            ("domain", address.domain.clone()),
        ];
        if let Some(id) = id {
            params.push(("id", id.to_string()));
        }

        let url = Url::parse_with_params(&self.api_url, &params).map_err(|e| Error::Endpoint {
            msg: format!("{} ({e})", self.api_url),
        })?;
        Ok(url.to_string())
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, value);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }
}

/// Builder for configuring a [`Client`].
///
/// # Defaults
/// - The public `allorigins` relay endpoint
/// - The 1secmail v1 API endpoint
/// - A `vanishmail/<version>` user agent
/// - Reqwest default timeout
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    relay_url: String,
    api_url: String,
    user_agent: String,
    timeout: Option<Duration>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            relay_url: RELAY_URL.to_string(),
            api_url: API_URL.to_string(),
            user_agent: USER_AGENT_VALUE.to_string(),
            timeout: None,
        }
    }

    /// Override the relay endpoint that forwards provider requests.
    ///
    /// This is primarily useful for testing, or to switch to another
    /// forwarding service with the same `?url=` contract.
    pub fn relay_url(mut self, relay_url: impl Into<String>) -> Self {
        self.relay_url = relay_url.into();
        self
    }

    /// Override the provider API endpoint.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a request timeout applied to all operations.
    ///
    /// Defaults to reqwest's built-in timeout when not specified.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the [`Client`].
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Client {
            http,
            relay_url: self.relay_url,
            api_url: self.api_url,
            user_agent: self.user_agent,
        })
    }
}
