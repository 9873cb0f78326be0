// src/utils/http.rs

//! HTTP client utilities.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::Result;
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// GET a URL with optional query parameters; non-2xx statuses are errors.
pub async fn get_checked(
    client: &Client,
    url: &str,
    params: &BTreeMap<String, String>,
) -> Result<Response> {
    let mut request = client.get(url);
    if !params.is_empty() {
        request = request.query(params);
    }
    let response = request.send().await?.error_for_status()?;
    Ok(response)
}

/// Fetch a page body as text.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    Ok(get_checked(client, url, &BTreeMap::new())
        .await?
        .text()
        .await?)
}

/// Fetch a response body as raw bytes.
pub async fn fetch_bytes(
    client: &Client,
    url: &str,
    params: &BTreeMap<String, String>,
) -> Result<Vec<u8>> {
    Ok(get_checked(client, url, params).await?.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> HttpConfig {
        HttpConfig {
            user_agent: "collector-test".into(),
            ..HttpConfig::default()
        }
    }

    #[tokio::test]
    async fn test_sends_user_agent_and_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("page", "2"))
            .and(header("user-agent", "collector-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = create_client(&config()).unwrap();
        let mut params = BTreeMap::new();
        params.insert("page".to_string(), "2".to_string());

        let body = fetch_bytes(&client, &format!("{}/items", server.uri()), &params)
            .await
            .unwrap();
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_error_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = create_client(&config()).unwrap();
        let result = fetch_text(&client, &format!("{}/missing", server.uri())).await;
        assert!(matches!(result, Err(crate::error::AppError::Http(_))));
    }
}
