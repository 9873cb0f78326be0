// src/services/api.rs

//! JSON API fetching.

use std::collections::BTreeMap;

use reqwest::Client;
use serde_json::Value;

use crate::error::Result;
use crate::models::ApiRecord;
use crate::utils::http::fetch_bytes;

/// Fetches JSON from public endpoints.
pub struct ApiFetcher<'a> {
    client: &'a Client,
}

impl<'a> ApiFetcher<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET an endpoint and parse the body as JSON.
    ///
    /// Returns the record for `api_data` along with the parsed payload.
    pub async fn fetch(
        &self,
        endpoint: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<(ApiRecord, Value)> {
        let body = fetch_bytes(self.client, endpoint, params).await?;
        let payload: Value = serde_json::from_slice(&body)?;
        Ok((ApiRecord::new(endpoint, &payload), payload))
    }
}
