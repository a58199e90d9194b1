//! Remote storage gateway.
//!
//! Talks to a hosted row-oriented table addressed by a base URL and an
//! access token, PostgREST style. Each contract operation maps to one
//! request; failures surface as a single distinguishable error and the
//! caller must not assume partial success. There is no retry and no
//! timeout: a hung request leaves the caller waiting.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use tracing::{debug, info};

use super::{sort_newest_first, Gateway};
use crate::error::{Error, Result};
use crate::registrant::Registrant;

/// Filter used to wipe the table.
///
/// Matches every row only as long as ids are never the literal `0`; the
/// hosted table assigned positive integer keys when this predicate was
/// chosen, and the gap is carried as-is rather than silently fixed.
const WIPE_FILTER: &str = "neq.0";

/// Render an `eq.` filter for a registration key.
///
/// Keys are usually letters, digits, and `-`, but normalization keeps any
/// punctuation a name carries. Values holding filter-reserved characters
/// (`,.:()"`) are double-quoted, with embedded quotes and backslashes
/// escaped, so the predicate stays a single comparison.
fn eq_filter(value: &str) -> String {
    const RESERVED: &[char] = &[',', '.', ':', '(', ')', '"', '\\'];
    if value.contains(RESERVED) {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("eq.\"{escaped}\"")
    } else {
        format!("eq.{value}")
    }
}

/// Gateway backed by a hosted table over HTTP.
#[derive(Debug)]
pub struct RemoteGateway {
    client: Client,
    base_url: String,
    table: String,
}

impl RemoteGateway {
    /// Build a gateway for the table at `base_url` using `api_key`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` if the key cannot form a valid header,
    /// or an HTTP error if the client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        api_key: &str,
        table: impl Into<String>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(api_key).map_err(|_| Error::ConfigValidation {
            message: "remote api_key contains characters not valid in a header".to_string(),
        })?;
        let bearer =
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
                Error::ConfigValidation {
                    message: "remote api_key contains characters not valid in a header".to_string(),
                }
            })?;
        headers.insert("apikey", key_value);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            table: table.into(),
        })
    }

    /// URL of the backing table.
    #[must_use]
    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Turn a non-success response into a `Remote` error.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(Error::remote(status.as_u16(), message))
        }
    }
}

#[async_trait]
impl Gateway for RemoteGateway {
    async fn exists(&self, key: &str) -> Result<bool> {
        let key_filter = eq_filter(key);
        let response = self
            .client
            .get(self.table_url())
            .query(&[
                ("select", "id"),
                ("id", key_filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = Self::check(response).await?.json().await?;
        Ok(!rows.is_empty())
    }

    async fn create(&self, record: &Registrant) -> Result<()> {
        if self.exists(&record.id).await? {
            return Err(Error::duplicate_key(&record.id));
        }

        let response = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await?;
        Self::check(response).await?;
        debug!(id = %record.id, "Registrant stored remotely");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id_filter = eq_filter(id);
        let response = self
            .client
            .delete(self.table_url())
            .query(&[("id", id_filter.as_str())])
            .send()
            .await?;
        Self::check(response).await?;
        info!(id = %id, "Registrant deleted remotely");
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let response = self
            .client
            .delete(self.table_url())
            .query(&[("id", WIPE_FILTER)])
            .send()
            .await?;
        Self::check(response).await?;
        info!("All registrants deleted remotely");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Registrant>> {
        let response = self
            .client
            .get(self.table_url())
            .query(&[("select", "*"), ("order", "registeredAt.desc")])
            .send()
            .await?;
        let mut records: Vec<Registrant> = Self::check(response).await?.json().await?;
        // The table's native order is not trusted.
        sort_newest_first(&mut records);
        Ok(records)
    }
}
