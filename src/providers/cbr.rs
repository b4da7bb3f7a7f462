use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::rates::{QuoteSet, RateProvider};

pub const DEFAULT_BASE_URL: &str = "https://www.cbr-xml-daily.ru";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Daily-rates provider backed by the CBR JSON API.
///
/// One bounded GET per call, no retries, no caching: any transport or
/// validation failure aborts the whole call without partial results.
pub struct CbrProvider {
    base_url: String,
}

impl CbrProvider {
    pub fn new(base_url: &str) -> Self {
        CbrProvider {
            base_url: base_url.to_string(),
        }
    }
}

impl Default for CbrProvider {
    fn default() -> Self {
        CbrProvider::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl RateProvider for CbrProvider {
    async fn fetch_rates(&self, codes: &[String]) -> Result<QuoteSet, CoreError> {
        if codes.is_empty() {
            return Err(CoreError::InvalidArgument(
                "at least one currency code is required".into(),
            ));
        }

        let url = format!("{}/daily_json.js", self.base_url);
        debug!("Requesting currency rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fintrace/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CoreError::SourceUnavailable(format!("failed to build HTTP client: {e}")))?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::SourceUnavailable(format!("rate source unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(CoreError::SourceUnavailable(format!(
                "rate source returned HTTP {}",
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| CoreError::SourceUnavailable(format!("failed to read response body: {e}")))?;

        let data: Value = serde_json::from_str(&text)
            .map_err(|e| CoreError::MalformedResponse(format!("response is not valid JSON: {e}")))?;

        let valute = data
            .get("Valute")
            .ok_or_else(|| CoreError::MissingField("response has no 'Valute' table".into()))?;

        let mut quotes = QuoteSet::new();
        // The quote date is informational; an unparseable one is not an error.
        quotes.set_as_of(
            data.get("Date")
                .and_then(Value::as_str)
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok()),
        );

        for code in codes {
            let record = valute.get(code).ok_or_else(|| {
                CoreError::MissingField(format!("currency '{code}' is absent from the rate table"))
            })?;
            let value = record.get("Value").ok_or_else(|| {
                CoreError::MissingField(format!("currency '{code}' has no 'Value' field"))
            })?;
            let rate = value.as_f64().ok_or_else(|| {
                CoreError::TypeMismatch(format!("rate for currency '{code}' is not numeric"))
            })?;
            quotes.insert(code.clone(), rate);
        }

        debug!("Fetched {} rate(s) from {}", quotes.len(), url);
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/daily_json.js"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    const MOCK_JSON: &str = r#"{
        "Date": "2025-08-08T11:30:00+03:00",
        "Valute": {
            "USD": {"Name": "US Dollar", "Nominal": 1, "Value": 76.55},
            "EUR": {"Name": "Euro", "Nominal": 1, "Value": 83.10}
        }
    }"#;

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_server = create_mock_server(MOCK_JSON).await;
        let provider = CbrProvider::new(&mock_server.uri());

        let quotes = provider.fetch_rates(&codes(&["USD", "EUR"])).await.unwrap();

        assert_eq!(quotes.get("USD"), Some(76.55));
        assert_eq!(quotes.get("EUR"), Some(83.10));
        let order: Vec<&str> = quotes.iter().map(|(code, _)| code).collect();
        assert_eq!(order, vec!["USD", "EUR"]);
        assert!(quotes.as_of().is_some());
    }

    #[tokio::test]
    async fn test_result_follows_request_order() {
        let mock_server = create_mock_server(MOCK_JSON).await;
        let provider = CbrProvider::new(&mock_server.uri());

        let quotes = provider.fetch_rates(&codes(&["EUR", "USD"])).await.unwrap();

        let order: Vec<&str> = quotes.iter().map(|(code, _)| code).collect();
        assert_eq!(order, vec!["EUR", "USD"]);
    }

    #[tokio::test]
    async fn test_integer_rate_coerces_to_float() {
        let mock_server =
            create_mock_server(r#"{"Valute": {"JPY": {"Value": 63}}}"#).await;
        let provider = CbrProvider::new(&mock_server.uri());

        let quotes = provider.fetch_rates(&codes(&["JPY"])).await.unwrap();
        assert_eq!(quotes.get("JPY"), Some(63.0));
        assert!(quotes.as_of().is_none());
    }

    #[tokio::test]
    async fn test_empty_code_list_is_rejected() {
        let provider = CbrProvider::new("http://unused.invalid");

        let result = provider.fetch_rates(&[]).await;
        assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_http_error_maps_to_source_unavailable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/daily_json.js"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        let provider = CbrProvider::new(&mock_server.uri());

        let result = provider.fetch_rates(&codes(&["USD"])).await;
        match result {
            Err(CoreError::SourceUnavailable(message)) => {
                assert!(message.contains("500"), "unexpected message: {message}");
            }
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_maps_to_source_unavailable() {
        // Discard port; nothing listens there.
        let provider = CbrProvider::new("http://127.0.0.1:9");

        let result = provider.fetch_rates(&codes(&["USD"])).await;
        assert!(matches!(result, Err(CoreError::SourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_malformed_response() {
        let mock_server = create_mock_server("not json at all").await;
        let provider = CbrProvider::new(&mock_server.uri());

        let result = provider.fetch_rates(&codes(&["USD"])).await;
        assert!(matches!(result, Err(CoreError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_missing_rate_table() {
        let mock_server = create_mock_server(r#"{"Date": "2025-08-08"}"#).await;
        let provider = CbrProvider::new(&mock_server.uri());

        let result = provider.fetch_rates(&codes(&["USD"])).await;
        match result {
            Err(CoreError::MissingField(message)) => {
                assert!(message.contains("Valute"), "unexpected message: {message}");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_currency_names_the_code() {
        let mock_server = create_mock_server(MOCK_JSON).await;
        let provider = CbrProvider::new(&mock_server.uri());

        let result = provider.fetch_rates(&codes(&["USD", "GBP"])).await;
        match result {
            Err(CoreError::MissingField(message)) => {
                assert!(message.contains("GBP"), "unexpected message: {message}");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_value_field_names_the_code() {
        let mock_server =
            create_mock_server(r#"{"Valute": {"USD": {"Name": "US Dollar"}}}"#).await;
        let provider = CbrProvider::new(&mock_server.uri());

        let result = provider.fetch_rates(&codes(&["USD"])).await;
        match result {
            Err(CoreError::MissingField(message)) => {
                assert!(message.contains("USD"), "unexpected message: {message}");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_numeric_rate_maps_to_type_mismatch() {
        let mock_server =
            create_mock_server(r#"{"Valute": {"USD": {"Value": "76,55"}}}"#).await;
        let provider = CbrProvider::new(&mock_server.uri());

        let result = provider.fetch_rates(&codes(&["USD"])).await;
        match result {
            Err(CoreError::TypeMismatch(message)) => {
                assert!(message.contains("USD"), "unexpected message: {message}");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_returns_no_partial_result() {
        let mock_server = create_mock_server(MOCK_JSON).await;
        let provider = CbrProvider::new(&mock_server.uri());

        // USD is present but the overall call must still fail whole.
        let result = provider.fetch_rates(&codes(&["USD", "XXX"])).await;
        assert!(matches!(result, Err(CoreError::MissingField(_))));
    }
}
