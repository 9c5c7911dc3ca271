//! End-to-end runs of the pipeline against a scripted local HTTP endpoint.
//!
//! The server answers one connection per scripted response, in order, and
//! records which model each request asked for.

use easyvocab_enrichment::{get_usage_examples, EnrichError, EnrichmentConfig, Level, NoDelay};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn read_body(stream: &mut TcpStream) -> Value {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return serde_json::from_slice(&buf[header_end + 4..]).unwrap();
            }
        }
    }
    Value::Null
}

/// One scripted HTTP response.
struct Reply {
    status_line: &'static str,
    body: String,
}

fn completion(content: &str) -> Reply {
    Reply {
        status_line: "200 OK",
        body: json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string(),
    }
}

fn server_error() -> Reply {
    Reply {
        status_line: "503 Service Unavailable",
        body: json!({"error": {"message": "upstream overloaded"}}).to_string(),
    }
}

/// Serves `replies` in order and returns the base URL plus the requested models.
async fn serve(replies: Vec<Reply>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api/v1", listener.local_addr().unwrap());
    let models = Arc::new(Mutex::new(Vec::new()));

    let seen = Arc::clone(&models);
    tokio::spawn(async move {
        for reply in replies {
            let (mut stream, _) = listener.accept().await.unwrap();
            let body = read_body(&mut stream).await;
            seen.lock()
                .unwrap()
                .push(body["model"].as_str().unwrap_or_default().to_string());

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.status_line,
                reply.body.len(),
                reply.body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        }
    });

    (base_url, models)
}

fn config(base_url: String) -> EnrichmentConfig {
    EnrichmentConfig {
        api_key: "sk-test".to_string(),
        base_url,
        model: "primary/model".to_string(),
        fallback_models: vec!["fallback/model".to_string()],
        max_retries: 1,
        timeout: Duration::from_secs(5),
        backoff_base: Duration::from_millis(1),
        ..EnrichmentConfig::default()
    }
}

const HOUSE: &str = r#"```json
{
  "word": "house", "level": "A1", "type": "word", "is_phrasal": false, "is_idiom": false,
  "frequency": 3, "rank": 150, "rank_range": "1-500", "frequency_group": "Core 500",
  "translation": "будинок", "category": "Nouns", "synonyms": ["home", "dwelling"],
  "meanings": [{"partOfSpeech": "noun",
                "definitions": [{"definition": "A building for people to live in.",
                                 "example": "A house is big."}]}]
}
```"#;

#[tokio::test]
async fn test_fenced_reply_is_enriched() {
    let (base_url, models) = serve(vec![completion(HOUSE)]).await;

    let info = get_usage_examples(&config(base_url), "House").await.unwrap();

    assert_eq!(info.word, "house");
    assert_eq!(info.level, Level::A1);
    assert_eq!(info.examples, "(noun) A house is big.");
    assert_eq!(info.synonyms, "home, dwelling");
    assert_eq!(*models.lock().unwrap(), vec!["primary/model"]);
}

#[tokio::test]
async fn test_invalid_then_server_error_then_fallback() {
    let (base_url, models) = serve(vec![
        completion(r#"{"word": "house", "level": "Z9", "type": "word"}"#),
        server_error(),
        completion(HOUSE),
    ])
    .await;

    let info = get_usage_examples(&config(base_url), "house").await.unwrap();

    assert_eq!(info.translation, "будинок");
    assert_eq!(
        *models.lock().unwrap(),
        vec!["primary/model", "primary/model", "fallback/model"]
    );
}

#[tokio::test]
async fn test_every_model_failing_is_a_gateway_error() {
    let (base_url, models) = serve(vec![
        server_error(),
        completion("not json at all"),
        server_error(),
        completion(""),
    ])
    .await;

    let err = get_usage_examples(&config(base_url), "house").await.unwrap_err();

    assert_eq!(err.status_code(), 502);
    let EnrichError::Exhausted { attempts, history } = err else {
        panic!("expected exhaustion");
    };
    assert_eq!(attempts, 4);
    assert!(history[0].error.contains("503"));
    assert_eq!(models.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn test_enricher_with_custom_delay() {
    let (base_url, _models) = serve(vec![completion("nope"), completion(HOUSE)]).await;

    let enricher = easyvocab_enrichment::Enricher::new(config(base_url))
        .unwrap()
        .delay(Arc::new(NoDelay));
    let info = enricher.enrich("house").await.unwrap();
    assert_eq!(info.rank, 150);
}
