use chatskcet_http::{HttpClient, HttpError, RequestOpts};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn post_json_sends_bearer_and_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(header("authorization", "Bearer gsk_test"))
        .and(body_json(json!({ "model": "m" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/openai/v1", server.uri())).unwrap();
    let got: Value = client
        .post_json("chat/completions", Some(" gsk_test "), &json!({ "model": "m" }))
        .await
        .unwrap();

    assert_eq!(got, json!({ "ok": true }));
}

#[tokio::test]
async fn api_errors_carry_status_and_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("x-request-id", "req_123")
                .set_body_json(json!({ "error": { "message": "Invalid API Key" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .post_json::<_, Value>("chat/completions", Some("bad"), &json!({}))
        .await
        .unwrap_err();

    match err {
        HttpError::Api {
            status,
            message,
            request_id,
        } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(message, "Invalid API Key");
            assert_eq!(request_id, "req_123");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_text_honours_headers_and_absolute_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "fees site:skcet.ac.in"))
        .and(header("user-agent", "Mozilla/5.0 test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 test"));

    let client = HttpClient::new(&server.uri()).unwrap();
    let url = format!("{}/html/?q=fees%20site%3Askcet.ac.in", server.uri());
    let body = client
        .get_text(
            &url,
            RequestOpts {
                headers: Some(headers),
                allow_absolute: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_text("html/", RequestOpts::default())
        .await
        .unwrap_err();

    assert!(
        matches!(&err, HttpError::Api { status, .. } if status.as_u16() == 503),
        "got {err:?}"
    );
}

#[tokio::test]
async fn slow_upstream_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(50));
    let err = client
        .get_text("slow", RequestOpts::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .post_json::<_, Value>("x", None, &json!({}))
        .await
        .unwrap_err();

    match err {
        HttpError::Decode(_, snippet) => assert_eq!(snippet, "not json"),
        other => panic!("expected Decode, got {other:?}"),
    }
}
