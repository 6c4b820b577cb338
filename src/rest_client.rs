use crate::domain::{Prefer, TestUser};
use crate::utils::error_chain_fmt;
use reqwest::header::{
    AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue,
};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const USERS_PATH: &str = "/rest/v1/users";

const APIKEY: HeaderName = HeaderName::from_static("apikey");
const PREFER: HeaderName = HeaderName::from_static("prefer");

#[derive(thiserror::Error)]
pub enum RestClientError {
    #[error("The service key is not a valid header value.")]
    InvalidServiceKey(#[source] InvalidHeaderValue),
    #[error("Failed to build the HTTP client.")]
    Build(#[source] reqwest::Error),
    #[error("Request to {url} failed.")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl std::fmt::Debug for RestClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Whatever the server sent back, unvalidated.
#[derive(Debug)]
pub struct RestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl RestResponse {
    /// Response headers as a sorted `name: value` map, for printing.
    ///
    /// Repeated headers are joined with `", "` in the order received.
    pub fn header_summary(&self) -> BTreeMap<&str, String> {
        let mut summary = BTreeMap::new();
        for name in self.headers.keys() {
            let values: Vec<_> = self
                .headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect();
            summary.insert(name.as_str(), values.join(", "));
        }
        summary
    }
}

/// Thin client for a Supabase project's PostgREST `users` endpoint.
///
/// The header map is shared by every call; changing the `Prefer` value
/// affects all later requests.
#[derive(Debug)]
pub struct RestClient {
    base_url: String,
    http_client: Client,
    headers: HeaderMap,
}

impl RestClient {
    pub fn new(base_url: &str, service_key: &Secret<String>) -> Result<Self, RestClientError> {
        // No timeout: a hung server hangs the probe.
        let http_client = Client::builder()
            .build()
            .map_err(RestClientError::Build)?;

        let mut apikey = HeaderValue::from_str(service_key.expose_secret())
            .map_err(RestClientError::InvalidServiceKey)?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", service_key.expose_secret()))
            .map_err(RestClientError::InvalidServiceKey)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(APIKEY, apikey);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            PREFER,
            HeaderValue::from_static(Prefer::ReturnRepresentation.as_str()),
        );

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            headers,
        })
    }

    pub fn set_prefer(&mut self, prefer: Prefer) {
        tracing::debug!(%prefer, "Switching Prefer header");
        self.headers.insert(PREFER, HeaderValue::from_static(prefer.as_str()));
    }

    pub fn prefer(&self) -> Option<&str> {
        self.headers.get(PREFER).and_then(|v| v.to_str().ok())
    }

    pub fn users_url(&self) -> String {
        format!("{}{}", self.base_url, USERS_PATH)
    }

    #[tracing::instrument(name = "Selecting users", skip(self))]
    pub async fn select_users(&self) -> Result<RestResponse, RestClientError> {
        let url = self.users_url();
        let request = self.http_client.get(&url).headers(self.headers.clone());
        send(request, url).await
    }

    #[tracing::instrument(
        name = "Inserting user",
        skip(self, user),
        fields(user_id = %user.id, prefer = ?self.prefer())
    )]
    pub async fn insert_user(&self, user: &TestUser) -> Result<RestResponse, RestClientError> {
        let url = self.users_url();
        let request = self
            .http_client
            .post(&url)
            .headers(self.headers.clone())
            .json(user);
        send(request, url).await
    }

    /// `GET /rest/v1/users?{field}=eq.{value}`.
    #[tracing::instrument(name = "Filtering users", skip(self))]
    pub async fn find_users_by(
        &self,
        field: &str,
        value: &str,
    ) -> Result<RestResponse, RestClientError> {
        let url = format!("{}?{}=eq.{}", self.users_url(), field, value);
        let request = self.http_client.get(&url).headers(self.headers.clone());
        send(request, url).await
    }

    pub async fn find_user_by_id(&self, id: Uuid) -> Result<RestResponse, RestClientError> {
        self.find_users_by("id", &id.to_string()).await
    }
}

async fn send(
    request: reqwest::RequestBuilder,
    url: String,
) -> Result<RestResponse, RestClientError> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(source) => {
            tracing::error!("Request to {} failed: {:?}", url, source);
            return Err(RestClientError::Request { url, source });
        }
    };
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .text()
        .await
        .map_err(|source| RestClientError::Request { url, source })?;
    tracing::info!(status = status.as_u16(), "Response received");
    Ok(RestResponse {
        status,
        headers,
        body,
    })
}
