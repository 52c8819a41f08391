/*!
 * Tests for provider clients, retries and rate limiting
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use mtdesk::errors::ProviderError;
use mtdesk::providers::huggingface::{HuggingFace, InferenceRequest};
use mtdesk::providers::mock::{MockProvider, MockRequest};
use mtdesk::providers::ollama::Ollama;
use mtdesk::providers::{Provider, RateLimiter, RetryPolicy};

fn mock_request(text: &str) -> MockRequest {
    MockRequest {
        text: text.to_string(),
        model_id: "Helsinki-NLP/opus-mt-en-de".to_string(),
        max_length: 500,
    }
}

/// Retryable errors are retried until success
#[tokio::test]
async fn test_retryPolicy_withTransientFailures_shouldEventuallySucceed() {
    let policy = RetryPolicy::new(3, 1);
    let attempts = Arc::new(AtomicU32::new(0));

    let result = policy
        .run("Test", || {
            let attempts = Arc::clone(&attempts);
            async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    Err(ProviderError::ConnectionError("reset".to_string()))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

/// Authentication errors are not retried
#[tokio::test]
async fn test_retryPolicy_withAuthError_shouldFailImmediately() {
    let policy = RetryPolicy::new(3, 1);
    let attempts = Arc::new(AtomicU32::new(0));

    let result: Result<(), _> = policy
        .run("Test", || {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::AuthenticationError("bad token".to_string()))
            }
        })
        .await;

    assert!(matches!(result, Err(ProviderError::AuthenticationError(_))));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

/// Backoff doubles on each retry
#[test]
fn test_retryPolicy_backoff_shouldDouble() {
    let policy = RetryPolicy::new(3, 100);

    assert_eq!(policy.backoff(1), Duration::from_millis(100));
    assert_eq!(policy.backoff(2), Duration::from_millis(200));
    assert_eq!(policy.backoff(3), Duration::from_millis(400));
}

/// The second request in a minute-limited window has to wait
#[test]
fn test_rateLimiter_shouldSpaceRequests() {
    let limiter = RateLimiter::new(Some(60));

    assert_eq!(limiter.reserve(), Duration::ZERO);
    let wait = limiter.reserve();
    assert!(wait > Duration::from_millis(900) && wait <= Duration::from_secs(1));

    let unlimited = RateLimiter::new(None);
    assert_eq!(unlimited.reserve(), Duration::ZERO);
    assert_eq!(unlimited.reserve(), Duration::ZERO);
}

/// The inference body carries text and length but not the model id
#[test]
fn test_inferenceRequest_shouldMatchPipelineBody() {
    let request = InferenceRequest::new("Helsinki-NLP/opus-mt-fr-en", "Bonjour", 500);
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["inputs"], "Bonjour");
    assert_eq!(json["parameters"]["max_length"], 500);
    assert!(json.get("model_id").is_none());
}

/// Translation outputs are parsed and joined
#[test]
fn test_huggingFace_parseResponse_shouldExtractTranslation() {
    let response = HuggingFace::parse_response(r#"[{"translation_text": "Hello"}]"#).unwrap();

    assert_eq!(HuggingFace::extract_text(&response), "Hello");
}

/// A loading model reports a retryable server error
#[test]
fn test_huggingFace_parseError_withLoadingModel_shouldBeRetryable() {
    let error = HuggingFace::parse_error(
        503,
        r#"{"error": "Model Helsinki-NLP/opus-mt-en-de is currently loading", "estimated_time": 20.0}"#,
    );

    assert!(error.is_retryable());
    assert!(error.to_string().contains("currently loading"));
}

/// The model URL is built from the endpoint without a doubled slash
#[test]
fn test_huggingFace_modelUrl_shouldJoinEndpoint() {
    let client = HuggingFace::new("https://api-inference.huggingface.co/", "", 30, RetryPolicy::none(), None);

    assert_eq!(
        client.model_url("Helsinki-NLP/opus-mt-en-ur"),
        "https://api-inference.huggingface.co/models/Helsinki-NLP/opus-mt-en-ur"
    );
}

/// Streamed Ollama answers are concatenated
#[test]
fn test_ollama_parseResponse_withJsonLines_shouldConcatenate() {
    let body = concat!(
        r#"{"model":"llama3.2:3b","response":"Hal","done":false}"#,
        "\n",
        r#"{"model":"llama3.2:3b","response":"lo","done":true}"#,
        "\n"
    );

    let response = Ollama::parse_response(body).unwrap();
    assert_eq!(Ollama::extract_text(&response), "Hallo");
}

/// The intermittent mock fails on every n-th request
#[tokio::test]
async fn test_mockProvider_intermittent_shouldFailEveryNth() {
    let provider = MockProvider::intermittent(2);

    assert!(provider.complete(mock_request("a")).await.is_ok());
    assert!(provider.complete(mock_request("b")).await.is_err());
    assert!(provider.complete(mock_request("c")).await.is_ok());
    assert_eq!(provider.request_count(), 3);
}

/// Serve one canned HTTP response on a local port and return its base URL
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", address)
}

/// A rejected token fails the connection test
#[tokio::test]
async fn test_huggingFace_testConnection_withRejectedToken_shouldFail() {
    let endpoint = serve_once("401 Unauthorized", r#"{"error":"Invalid credentials in Authorization header"}"#).await;
    let client = HuggingFace::new(endpoint, "hf_bad", 5, RetryPolicy::none(), None);

    let result = client.test_connection().await;

    assert!(matches!(result, Err(ProviderError::AuthenticationError(_))));
}

/// An accepted token passes the connection test
#[tokio::test]
async fn test_huggingFace_testConnection_withAcceptedToken_shouldSucceed() {
    let endpoint = serve_once("200 OK", r#"{"loaded":true,"state":"Loaded"}"#).await;
    let client = HuggingFace::new(endpoint, "hf_good", 5, RetryPolicy::none(), None);

    assert!(client.test_connection().await.is_ok());
}
