//! PostgREST client
//!
//! Thin typed wrapper over the `/rest/v1/<table>` endpoints: filters go in
//! the query string, writes ask for the affected rows back with
//! `Prefer: return=representation`.

use std::time::Duration;

use pharmaclock_domain::{PharmaClockError, Result, StoreConfig};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::errors::InfraError;
use crate::http::HttpClient;

const REST_PATH: &str = "rest/v1/";
const RETURN_REPRESENTATION: &str = "return=representation";

/// PostgREST codes for a relation that does not exist
const MISSING_RELATION_CODES: [&str; 2] = ["PGRST205", "42P01"];

/// Error body returned by PostgREST for failed requests
#[derive(Debug, Default, Deserialize)]
struct PostgrestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Client for the hosted PostgREST store
#[derive(Clone)]
pub struct RestClient {
    http: HttpClient,
    rest_root: Url,
}

impl RestClient {
    /// Build a client from store settings.
    ///
    /// The anon key goes in `apikey`; the bearer is the user's session token
    /// when one is configured, otherwise the anon key.
    ///
    /// # Errors
    /// Returns `PharmaClockError::Config` for a malformed url or a key that
    /// is not a valid header value.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let base = if config.url.ends_with('/') {
            config.url.clone()
        } else {
            format!("{}/", config.url)
        };
        let rest_root = Url::parse(&base)
            .and_then(|url| url.join(REST_PATH))
            .map_err(|err| PharmaClockError::from(InfraError::from(err)))?;

        let bearer = config.access_token.as_deref().unwrap_or(&config.api_key);
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&config.api_key)?);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {bearer}"))?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("pharmaclock/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, rest_root })
    }

    /// Endpoint url for a table
    pub fn endpoint(&self, table: &str) -> Result<Url> {
        self.rest_root.join(table).map_err(|err| PharmaClockError::from(InfraError::from(err)))
    }

    /// `GET /rest/v1/<table>?<filters>`
    #[instrument(skip(self, filters), fields(table = %table))]
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let request = self.http.request(Method::GET, self.endpoint(table)?).query(filters);
        let response = self.http.send(request).await?;
        read_rows(table, response).await
    }

    /// `POST /rest/v1/<table>` returning the inserted row
    #[instrument(skip(self, body), fields(table = %table))]
    pub async fn insert<B, T>(&self, table: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .http
            .request(Method::POST, self.endpoint(table)?)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body);
        let response = self.http.send(request).await?;
        let mut rows: Vec<T> = read_rows(table, response).await?;
        if rows.is_empty() {
            return Err(PharmaClockError::Internal(format!("insert into {table} returned no rows")));
        }
        Ok(rows.swap_remove(0))
    }

    /// `PATCH /rest/v1/<table>?<filters>` returning the updated rows
    #[instrument(skip(self, filters, body), fields(table = %table))]
    pub async fn update<B, T>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        body: &B,
    ) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .http
            .request(Method::PATCH, self.endpoint(table)?)
            .query(filters)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body);
        let response = self.http.send(request).await?;
        read_rows(table, response).await
    }
}

/// PostgREST equality filter
pub(crate) fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| PharmaClockError::Config("store credential is not a valid header".to_string()))
}

async fn read_rows<T: DeserializeOwned>(table: &str, response: Response) -> Result<Vec<T>> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_status_error(table, status, &body));
    }

    let bytes = response.bytes().await.map_err(|err| PharmaClockError::from(InfraError::from(err)))?;
    let rows: Vec<T> =
        serde_json::from_slice(&bytes).map_err(|err| PharmaClockError::from(InfraError::from(err)))?;
    debug!(table, rows = rows.len(), "store rows received");
    Ok(rows)
}

/// Map a non-success response to a domain error, keeping the store's own
/// message verbatim when it sent one.
fn map_status_error(table: &str, status: StatusCode, body: &str) -> PharmaClockError {
    let parsed: PostgrestErrorBody = serde_json::from_str(body).unwrap_or_default();

    if parsed.code.as_deref().is_some_and(|code| MISSING_RELATION_CODES.contains(&code)) {
        debug!(table, code = ?parsed.code, "relation missing");
        return PharmaClockError::FeatureUnavailable(format!("{table} is not available"));
    }

    let message = match (parsed.message, body.trim()) {
        (Some(message), _) => message,
        (None, "") => format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown status")
        ),
        (None, raw) => raw.to_string(),
    };
    warn!(table, status = status.as_u16(), details = ?parsed.details, %message, "store request rejected");

    match status.as_u16() {
        401 | 403 => PharmaClockError::Auth(message),
        404 => PharmaClockError::NotFound(message),
        400..=499 => PharmaClockError::InvalidInput(message),
        _ => PharmaClockError::Database(message),
    }
}
