use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use twstock_core::domain::report::RiskLevel;
use twstock_core::llm::error::AnalysisError;
use twstock_core::llm::gemini::{AnalysisConfig, GeminiClient};
use twstock_core::llm::LlmClient;

#[derive(Clone)]
struct FakeGemini {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

async fn generate_content(
    State(fake): State<FakeGemini>,
    Path(rest): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    fake.seen.lock().unwrap().push((rest, key, body));
    (fake.status, Json(fake.reply.clone()))
}

async fn spawn_fake(status: StatusCode, reply: Value) -> (String, FakeGemini) {
    let fake = FakeGemini {
        status,
        reply,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v1beta/models/*rest", post(generate_content))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), fake)
}

fn client(base_url: &str) -> GeminiClient {
    let config = AnalysisConfig::new("test-key")
        .unwrap()
        .with_model("gemini-test")
        .with_base_url(base_url);
    GeminiClient::new(config).unwrap()
}

fn candidate_with_text(text: &str, chunks: Value) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP",
            "groundingMetadata": {"groundingChunks": chunks}
        }]
    })
}

#[tokio::test]
async fn end_to_end_single_stock_with_duplicate_citation() {
    let payload = json!({
        "marketSentiment": "盤勢偏多",
        "stocks": [{
            "code": "2330",
            "name": "台積電",
            "price": "600",
            "sector": "半導體",
            "reason": "...",
            "technicalSignal": "MACD黃金交叉",
            "chipSignal": "外資買超",
            "riskLevel": "Low"
        }]
    })
    .to_string();
    let chunks = json!([
        {"web": {"uri": "https://tw.stock.example/2330", "title": "a"}},
        {"web": {"uri": "https://tw.stock.example/2330", "title": "a"}}
    ]);

    let (base_url, fake) = spawn_fake(StatusCode::OK, candidate_with_text(&payload, chunks)).await;
    let report = client(&base_url).request_analysis().await.unwrap();

    assert_eq!(report.sources.len(), 1);
    assert_eq!(report.stocks.len(), 1);
    assert_eq!(report.stocks[0].risk_level, RiskLevel::Low);
    assert_eq!(report.market_sentiment, "盤勢偏多");

    let seen = fake.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (path, key, body) = &seen[0];
    assert_eq!(path, "gemini-test:generateContent");
    assert_eq!(key.as_deref(), Some("test-key"));
    assert_eq!(body["tools"], json!([{"googleSearch": {}}]));
    assert_eq!(
        body["generationConfig"]["responseSchema"]["properties"]["stocks"]["items"]["properties"]["riskLevel"]["enum"],
        json!(["High", "Medium", "Low"])
    );
}

#[tokio::test]
async fn missing_text_is_empty_response() {
    let (base_url, _fake) = spawn_fake(
        StatusCode::OK,
        json!({"candidates": [{"content": {"parts": []}, "finishReason": "SAFETY"}]}),
    )
    .await;

    let err = client(&base_url).request_analysis().await.unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyResponse));
}

#[tokio::test]
async fn malformed_text_is_parse_error() {
    let (base_url, _fake) = spawn_fake(
        StatusCode::OK,
        candidate_with_text("{\"marketSentiment\": \"x\", \"stocks\": [", json!([])),
    )
    .await;

    let err = client(&base_url).request_analysis().await.unwrap_err();
    assert!(matches!(err, AnalysisError::Parse(_)));
}

#[tokio::test]
async fn provider_error_is_surfaced_once_without_retry() {
    let (base_url, fake) = spawn_fake(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}),
    )
    .await;

    let err = client(&base_url).request_analysis().await.unwrap_err();
    match err {
        AnalysisError::Provider { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Resource has been exhausted");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fake.seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"))
        .request_analysis()
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Transport(_)));
}

#[tokio::test]
async fn stock_count_is_not_enforced() {
    let stocks: Vec<Value> = (0..13)
        .map(|i| json!({"code": format!("{}", 2300 + i), "name": "n", "riskLevel": "Unknown"}))
        .collect();
    let payload = json!({"marketSentiment": "x", "stocks": stocks}).to_string();
    let (base_url, _fake) = spawn_fake(StatusCode::OK, candidate_with_text(&payload, json!([]))).await;

    let report = client(&base_url).request_analysis().await.unwrap();
    assert_eq!(report.stocks.len(), 13);
    assert_eq!(
        report.stocks[0].risk_level,
        RiskLevel::Unrecognized("Unknown".to_string())
    );
}
