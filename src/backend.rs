//! Async network loop (runs in a separate thread).
//!
//! The backend owns a Tokio runtime and a `reqwest` client. It drains
//! actions from the UI, performs the HTTP request inline, and reports
//! the outcome as a `UiEvent`. Requests are strictly serial: the UI
//! disables input while one is outstanding, so there is never more than
//! one in flight.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use serde::Deserialize;
use tokio::runtime::Runtime;

use crate::protocol::{BackendAction, FileUpload, UiEvent};

/// How long to wait on the endpoint before giving up.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// Idle poll interval when no action is pending.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Expected response shape from both endpoints.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

pub fn run_backend(action_rx: Receiver<BackendAction>, event_tx: Sender<UiEvent>, base_url: String) {
    // Create a Tokio runtime for this thread
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let _ = event_tx.send(UiEvent::RequestFailed(format!(
                "Failed to create Tokio runtime: {}",
                e
            )));
            return;
        }
    };

    rt.block_on(async move {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        loop {
            // Check for actions from the UI (non-blocking)
            loop {
                match action_rx.try_recv() {
                    Ok(BackendAction::SendMessage { text }) => {
                        let event = match send_chat(&client, &base_url, &text).await {
                            Ok(reply) => UiEvent::BotResponse(reply),
                            Err(detail) => UiEvent::RequestFailed(detail),
                        };
                        let _ = event_tx.send(event);
                    }
                    Ok(BackendAction::SendMessageWithFiles { text, files }) => {
                        let event = match send_chat_with_files(&client, &base_url, &text, files).await {
                            Ok(reply) => UiEvent::BotResponse(reply),
                            Err(detail) => UiEvent::RequestFailed(detail),
                        };
                        let _ = event_tx.send(event);
                    }
                    Ok(BackendAction::Shutdown) | Err(TryRecvError::Disconnected) => return,
                    Err(TryRecvError::Empty) => break,
                }
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    });
}

/// POST {base}/chat with a JSON body `{"message": ...}`.
async fn send_chat(client: &reqwest::Client, base_url: &str, text: &str) -> Result<String, String> {
    let resp = client
        .post(endpoint(base_url, "chat"))
        .json(&chat_request_body(text))
        .send()
        .await
        .map_err(|e| format!("chat request failed: {}", e))?;

    read_chat_response(resp).await
}

/// POST {base}/chat-with-files as multipart form data.
async fn send_chat_with_files(
    client: &reqwest::Client,
    base_url: &str,
    text: &str,
    files: Vec<FileUpload>,
) -> Result<String, String> {
    let mut form = reqwest::multipart::Form::new().text("message", text.to_string());
    for file in files {
        let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.name);
        form = form.part("files", part);
    }

    let resp = client
        .post(endpoint(base_url, "chat-with-files"))
        .multipart(form)
        .send()
        .await
        .map_err(|e| format!("chat-with-files request failed: {}", e))?;

    read_chat_response(resp).await
}

async fn read_chat_response(resp: reqwest::Response) -> Result<String, String> {
    let status = resp.status();
    if !status.is_success() {
        return Err(format!("endpoint returned {}", status));
    }
    let body = resp
        .text()
        .await
        .map_err(|e| format!("failed to read response body: {}", e))?;
    parse_chat_response(&body)
}

/// Join the base URL and an endpoint path, tolerating a trailing slash
/// on the configured base.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// The JSON body for the text-only endpoint.
pub fn chat_request_body(text: &str) -> serde_json::Value {
    serde_json::json!({ "message": text })
}

/// Extract the `response` field from an endpoint reply.
pub fn parse_chat_response(body: &str) -> Result<String, String> {
    serde_json::from_str::<ChatResponse>(body)
        .map(|parsed| parsed.response)
        .map_err(|e| format!("malformed response body: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joining() {
        assert_eq!(endpoint("http://localhost:8000", "chat"), "http://localhost:8000/chat");
        assert_eq!(
            endpoint("https://bot.example.com/", "chat-with-files"),
            "https://bot.example.com/chat-with-files"
        );
    }

    #[test]
    fn test_chat_request_body_shape() {
        assert_eq!(chat_request_body("hello").to_string(), r#"{"message":"hello"}"#);
    }

    #[test]
    fn test_parse_chat_response() {
        assert_eq!(parse_chat_response(r#"{"response":"Hi!"}"#).unwrap(), "Hi!");
        // Extra fields are fine, missing/invalid ones are not.
        assert!(parse_chat_response(r#"{"response":"ok","model":"x"}"#).is_ok());
        assert!(parse_chat_response(r#"{"answer":"Hi!"}"#).is_err());
        assert!(parse_chat_response("not json").is_err());
    }

    #[test]
    fn test_backend_thread_exits_on_shutdown() {
        let (action_tx, action_rx) = crossbeam_channel::unbounded();
        let (event_tx, _event_rx) = crossbeam_channel::unbounded();

        let handle = std::thread::spawn(move || {
            run_backend(action_rx, event_tx, "http://localhost:1".into());
        });

        action_tx.send(BackendAction::Shutdown).unwrap();
        handle.join().expect("backend thread should exit cleanly");
    }

    #[test]
    fn test_backend_thread_exits_when_ui_hangs_up() {
        let (action_tx, action_rx) = crossbeam_channel::unbounded::<BackendAction>();
        let (event_tx, _event_rx) = crossbeam_channel::unbounded();

        let handle = std::thread::spawn(move || {
            run_backend(action_rx, event_tx, "http://localhost:1".into());
        });

        drop(action_tx);
        handle.join().expect("backend thread should exit cleanly");
    }
}
