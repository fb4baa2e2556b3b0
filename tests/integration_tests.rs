//! Integration tests for the action server
//!
//! These tests run the real router on a local port, with a scripted language
//! model and the translation service mocked by wiremock.

use polyglot_bot::{
    actions::ActionRegistry,
    config::{Config, ModelBackend},
    detection::{LanguageIdentifier, LanguageModel, Prediction},
    error::DetectionError,
    i18n::{LanguageCode, TranslationMetrics},
    localizer::ResponseLocalizer,
    normalizer::TextNormalizer,
    pipeline::LanguageDetectionComponent,
    server::{create_router, AppState},
    translation::GoogleTranslateClient,
};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

// ==================== Test Helpers ====================

/// Answers with the label of the first keyword found in the text.
struct KeywordModel;

impl LanguageModel for KeywordModel {
    fn predict(&self, text: &str, _k: usize) -> Result<Vec<Prediction>, DetectionError> {
        let label = if text.contains("Hello") || text.contains("thanks") {
            "__label__en"
        } else if text.contains("Bonjour") {
            "__label__fr"
        } else if text.contains("CRASH") {
            return Err(DetectionError::Model("corrupted model".to_string()));
        } else {
            "__label__es"
        };

        Ok(vec![Prediction {
            label: label.to_string(),
            score: 0.97,
        }])
    }

    fn name(&self) -> &'static str {
        "keyword"
    }

    fn required_packages(&self) -> &'static [&'static str] {
        &[]
    }
}

fn create_test_config(translation_url: &str, token: Option<&str>) -> Config {
    Config {
        environment: "test".to_string(),
        port: 0,
        action_server_token: token.map(str::to_string),
        reference_language: LanguageCode::SPANISH,
        language_model: ModelBackend::Whatlang,
        language_model_path: "lid.176.ftz".into(),
        translation_api_url: translation_url.to_string(),
        translation_timeout_secs: Some(5),
    }
}

/// Google Translate style response with a single segment
fn translation_response(translated: &str, original: &str, source: &str) -> Value {
    json!([[[translated, original, null, null, 10]], null, source])
}

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    metrics: Arc<TranslationMetrics>,
}

async fn start_server(translate_server: &MockServer, token: Option<&str>) -> TestServer {
    let config = create_test_config(
        &format!("{}/translate_a/single", translate_server.uri()),
        token,
    );
    let metrics = Arc::new(TranslationMetrics::new());
    let translator = Arc::new(GoogleTranslateClient::from_config(&config).expect("client builds"));

    let identifier = LanguageIdentifier::new(Box::new(KeywordModel), LanguageCode::SPANISH)
        .with_metrics(Arc::clone(&metrics));
    let normalizer = TextNormalizer::new(translator.clone(), LanguageCode::SPANISH)
        .with_metrics(Arc::clone(&metrics));
    let localizer =
        ResponseLocalizer::new(translator, LanguageCode::SPANISH).with_metrics(Arc::clone(&metrics));

    let state = AppState::new(
        config,
        LanguageDetectionComponent::new(identifier, normalizer),
        ActionRegistry::with_default_actions(Arc::new(localizer)),
        Arc::clone(&metrics),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, create_router(state))
            .await
            .expect("server runs");
    });

    TestServer {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        metrics,
    }
}

fn action_call(action: &str, slots: Value, latest_message: Value) -> Value {
    json!({
        "next_action": action,
        "sender_id": "user-42",
        "tracker": {
            "sender_id": "user-42",
            "slots": slots,
            "latest_message": latest_message,
            "latest_action_name": "action_listen",
            "events": []
        },
        "domain": {"actions": []},
        "version": "3.6.0"
    })
}

// ==================== Health & Discovery ====================

#[tokio::test]
async fn test_health_check() {
    let translate = MockServer::start().await;
    let server = start_server(&translate, None).await;

    let body: Value = server
        .client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_list_actions() {
    let translate = MockServer::start().await;
    let server = start_server(&translate, None).await;

    let body: Vec<Value> = server
        .client
        .get(format!("{}/actions", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body.len(), 6);
    assert!(body.contains(&json!({"name": "action_set_detected_language"})));
}

// ==================== Pipeline Stage ====================

#[tokio::test]
async fn test_process_english_message_round_trip() {
    let translate = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("sl", "en"))
        .and(query_param("tl", "es"))
        .and(query_param("q", "Hello, tell me a fun fact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(translation_response(
            "Hola, cuéntame un dato curioso",
            "Hello, tell me a fun fact",
            "en",
        )))
        .expect(1)
        .mount(&translate)
        .await;

    let server = start_server(&translate, None).await;

    let response = server
        .client
        .post(format!("{}/process", server.base_url))
        .json(&json!({
            "messages": [{"text": "Hello, tell me a fun fact", "message_id": "m-1"}],
            "slots": {"nombre_usuario": "Ana"}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let message = &body["messages"][0];

    assert_eq!(message["text"], "Hola, cuéntame un dato curioso");
    assert_eq!(message["raw_text"], "Hello, tell me a fun fact");
    assert_eq!(message["detected_language"], "en");
    assert_eq!(message["message_id"], "m-1");
    assert_eq!(
        message["entities"],
        json!([{
            "entity": "detected_language",
            "value": "en",
            "confidence": 1.0,
            "extractor": "LanguageDetectionComponent"
        }])
    );
    assert_eq!(
        body["events"],
        json!([{"event": "slot", "name": "detected_language", "value": "en", "timestamp": null}])
    );
    assert_eq!(server.metrics.translation_requests(), 1);
}

#[tokio::test]
async fn test_process_spanish_message_makes_no_translation_call() {
    let translate = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&translate)
        .await;

    let server = start_server(&translate, None).await;

    let body: Value = server
        .client
        .post(format!("{}/process", server.base_url))
        .json(&json!({"messages": [{"text": "¿Qué hora es?"}]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["messages"][0]["text"], "¿Qué hora es?");
    assert_eq!(body["events"][0]["value"], "es");
    assert_eq!(server.metrics.short_circuits(), 1);
}

#[tokio::test]
async fn test_process_translation_outage_fails_open() {
    let translate = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&translate)
        .await;

    let server = start_server(&translate, None).await;

    let body: Value = server
        .client
        .post(format!("{}/process", server.base_url))
        .json(&json!({"messages": [{"text": "Bonjour, comment ça va?"}]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["messages"][0]["text"], "Bonjour, comment ça va?");
    assert_eq!(body["messages"][0]["detected_language"], "fr");
    assert_eq!(server.metrics.translation_failures(), 1);
}

#[tokio::test]
async fn test_process_detection_failure_defaults_to_spanish() {
    let translate = MockServer::start().await;
    let server = start_server(&translate, None).await;

    let body: Value = server
        .client
        .post(format!("{}/process", server.base_url))
        .json(&json!({"messages": [{"text": "CRASH please"}]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["messages"][0]["detected_language"], "es");
    assert_eq!(body["messages"][0]["text"], "CRASH please");
    assert_eq!(server.metrics.detection_fallbacks(), 1);
}

#[tokio::test]
async fn test_process_message_without_text() {
    let translate = MockServer::start().await;
    let server = start_server(&translate, None).await;

    let body: Value = server
        .client
        .post(format!("{}/process", server.base_url))
        .json(&json!({"messages": [{"text": null, "metadata": {"source": "button"}}]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body["messages"][0].get("detected_language").is_none());
    assert_eq!(body["messages"][0]["metadata"]["source"], "button");
    assert_eq!(body["events"], json!([]));
    assert_eq!(server.metrics.detections(), 0);
}

// ==================== Actions ====================

#[tokio::test]
async fn test_webhook_set_detected_language() {
    let translate = MockServer::start().await;
    let server = start_server(&translate, None).await;

    let body: Value = server
        .client
        .post(format!("{}/webhook", server.base_url))
        .json(&action_call(
            "action_set_detected_language",
            json!({"detected_language": null}),
            json!({"text": "Hola", "detected_language": "en", "entities": []}),
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        json!({
            "events": [{"event": "slot", "name": "detected_language", "value": "en", "timestamp": null}],
            "responses": [{"text": "Idioma detectado: en"}]
        })
    );
}

#[tokio::test]
async fn test_webhook_unusable_detected_language_defaults_to_spanish() {
    let translate = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&translate)
        .await;

    let server = start_server(&translate, None).await;

    for bad in ["__label__en", "xx_invalid"] {
        let response = server
            .client
            .post(format!("{}/webhook", server.base_url))
            .json(&action_call(
                "action_set_detected_language",
                json!({}),
                json!({"text": "hi", "detected_language": bad}),
            ))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["events"][0]["value"], "es");
        assert_eq!(body["responses"], json!([{"text": "Idioma detectado: es"}]));
    }
}

#[tokio::test]
async fn test_process_keeps_host_entity_attributes() {
    let translate = MockServer::start().await;
    let server = start_server(&translate, None).await;

    let host_entity = json!({
        "entity": "name",
        "value": "Ana",
        "start": 5,
        "end": 8,
        "extractor": "DIETClassifier",
        "confidence_entity": 0.97,
        "role": "friend",
        "processors": ["EntitySynonymMapper"]
    });

    let body: Value = server
        .client
        .post(format!("{}/process", server.base_url))
        .json(&json!({"messages": [{"text": "Soy Ana", "entities": [host_entity.clone()]}]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let entities = body["messages"][0]["entities"].as_array().unwrap();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0], host_entity);
    assert_eq!(entities[1]["entity"], "detected_language");
}

#[tokio::test]
async fn test_webhook_localizes_response() {
    let translate = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("sl", "es"))
        .and(query_param("tl", "en"))
        .and(query_param("q", "¡Hola! ¿Cómo te llamas? 🙂"))
        .respond_with(ResponseTemplate::new(200).set_body_json(translation_response(
            "Hello! What is your name? 🙂",
            "¡Hola! ¿Cómo te llamas? 🙂",
            "es",
        )))
        .expect(1)
        .mount(&translate)
        .await;

    let server = start_server(&translate, None).await;

    let body: Value = server
        .client
        .post(format!("{}/webhook", server.base_url))
        .json(&action_call(
            "action_preguntar_nombre",
            json!({"detected_language": "en"}),
            json!({"text": "Hello"}),
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["responses"], json!([{"text": "Hello! What is your name? 🙂"}]));
    assert_eq!(body["events"], json!([]));
}

#[tokio::test]
async fn test_webhook_translation_failure_returns_spanish() {
    let translate = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&translate)
        .await;

    let server = start_server(&translate, None).await;

    let body: Value = server
        .client
        .post(format!("{}/webhook", server.base_url))
        .json(&action_call(
            "action_despedida",
            json!({"detected_language": "en", "nombre_usuario": "Ana"}),
            json!({"text": "bye, thanks"}),
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["responses"], json!([{"text": "¡Hasta pronto, Ana!"}]));
}

#[tokio::test]
async fn test_webhook_unknown_action() {
    let translate = MockServer::start().await;
    let server = start_server(&translate, None).await;

    let response = server
        .client
        .post(format!("{}/webhook", server.base_url))
        .json(&action_call("action_does_not_exist", json!({}), json!({})))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["action_name"], "action_does_not_exist");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("action_does_not_exist"));
}

#[tokio::test]
async fn test_webhook_malformed_body() {
    let translate = MockServer::start().await;
    let server = start_server(&translate, None).await;

    let response = server
        .client
        .post(format!("{}/webhook", server.base_url))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// ==================== Token ====================

#[tokio::test]
async fn test_token_required_when_configured() {
    let translate = MockServer::start().await;
    let server = start_server(&translate, Some("s3cret")).await;
    let call = action_call("action_preguntar_nombre", json!({}), json!({}));

    let missing = server
        .client
        .post(format!("{}/webhook", server.base_url))
        .json(&call)
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 401);

    let wrong = server
        .client
        .post(format!("{}/webhook?token=guess", server.base_url))
        .json(&call)
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), 401);

    let right = server
        .client
        .post(format!("{}/webhook?token=s3cret", server.base_url))
        .json(&call)
        .send()
        .await
        .unwrap();
    assert_eq!(right.status(), 200);
}

#[tokio::test]
async fn test_process_requires_token_when_configured() {
    let translate = MockServer::start().await;
    let server = start_server(&translate, Some("s3cret")).await;

    let response = server
        .client
        .post(format!("{}/process", server.base_url))
        .json(&json!({"messages": []}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}

// ==================== Metrics ====================

#[tokio::test]
async fn test_metrics_endpoint() {
    let translate = MockServer::start().await;
    let server = start_server(&translate, None).await;

    server
        .client
        .post(format!("{}/process", server.base_url))
        .json(&json!({"messages": [{"text": "Buenos días"}]}))
        .send()
        .await
        .unwrap();

    let body: Value = server
        .client
        .get(format!("{}/metrics", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["detections"], 1);
    assert_eq!(body["short_circuits"], 1);
    assert_eq!(body["translation_requests"], 0);
}
