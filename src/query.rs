use crate::country::{Country, COUNTRY_FIELDS};
use crate::decoder::{decode_body, ACCEPT_ENCODING};
use crate::error::QueryError;

use anyhow::{bail, Context, Result};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Certificate, Client, StatusCode, Url,
};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://restcountries.com/v2";

/// Connection settings the client is built from.
pub trait ConnectionProfile {
    fn endpoint(&self) -> &Url;
    fn insecure(&self) -> bool;
    fn ca_cert(&self) -> Option<&String>;
    fn headers(&self) -> &HashMap<String, String>;
    fn timeout(&self) -> Option<Duration>;
}

/// Anything that can look countries up by (partial) name.
///
/// The controller only talks to this trait so it can run against a canned source in tests.
pub trait CountrySource: Send + Sync + 'static {
    fn search(
        &self,
        name: &str,
    ) -> impl Future<Output = std::result::Result<Vec<Country>, QueryError>> + Send;
}

pub struct CountryClient {
    client: Client,
    endpoint: Url,
}

impl Debug for CountryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountryClient")
            .field("client", &"Client")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl CountryClient {
    pub fn new(profile: &impl ConnectionProfile) -> Result<Self> {
        let endpoint = profile.endpoint().clone();
        if endpoint.cannot_be_a_base() {
            bail!("Endpoint '{}' cannot be used as a base URL", endpoint);
        }

        Ok(CountryClient {
            client: Self::build_client(profile)?,
            endpoint,
        })
    }

    /// `{endpoint}/name/{name}?fields=...` with `name` encoded as a single path segment.
    pub fn search_url(&self, name: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("name").push(name);
        }
        url.set_query(Some(&format!("fields={COUNTRY_FIELDS}")));
        url
    }

    pub async fn search(&self, name: &str) -> std::result::Result<Vec<Country>, QueryError> {
        let url = self.search_url(name);
        debug!(%url, "querying country api");

        let res = self
            .client
            .get(url)
            .header(header::ACCEPT_ENCODING, ACCEPT_ENCODING)
            .send()
            .await?;

        // reqwest hands back 4xx/5xx as ordinary responses; 404 is the API's "no match".
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(QueryError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(QueryError::Status(status));
        }

        let content_encoding = res
            .headers()
            .get(header::CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = res.bytes().await?;
        let body = decode_body(body, content_encoding.as_deref())?;
        let countries: Vec<Country> = serde_json::from_slice(&body)?;

        debug!(name, matches = countries.len(), "country api answered");
        Ok(countries)
    }

    fn build_client(profile: &impl ConnectionProfile) -> Result<Client> {
        let insecure_access = profile.insecure();
        let mut cli_builder = Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(insecure_access);

        if let Some(ca_cert) = profile.ca_cert() {
            let ca_cert = shellexpand::tilde(ca_cert).to_string();
            let pem = std::fs::read(&ca_cert)
                .with_context(|| format!("Failed to read CA certificate '{ca_cert}'"))?;
            let cert = Certificate::from_pem(&pem)
                .with_context(|| format!("Invalid CA certificate '{ca_cert}'"))?;
            cli_builder = cli_builder.add_root_certificate(cert);
        }

        if !profile.headers().is_empty() {
            let mut headers = HeaderMap::new();
            for (key, value) in profile.headers() {
                let name = HeaderName::from_bytes(key.as_bytes())
                    .with_context(|| format!("Invalid header name '{key}'"))?;
                let value = HeaderValue::from_str(value)
                    .with_context(|| format!("Invalid value for header '{key}'"))?;
                headers.insert(name, value);
            }
            cli_builder = cli_builder.default_headers(headers);
        }

        if let Some(timeout) = profile.timeout() {
            cli_builder = cli_builder.timeout(timeout);
        }

        cli_builder.build().context("Failed to build HTTP client")
    }
}

impl CountrySource for CountryClient {
    fn search(
        &self,
        name: &str,
    ) -> impl Future<Output = std::result::Result<Vec<Country>, QueryError>> + Send {
        CountryClient::search(self, name)
    }
}
