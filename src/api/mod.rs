//! Boundary to the assistant server
//!
//! `AssistantApi` is the seam the session flows talk to; `HttpAssistantApi`
//! is the reqwest implementation used by the application.

mod http;

pub use http::HttpAssistantApi;

use crate::audio::AudioClip;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of `POST /query`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub question: String,
}

/// Reply of `POST /query`
///
/// Servers have shipped the answer under either key, so both are optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct QueryResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub sql_query: Option<String>,
    #[serde(default)]
    pub sql_result: Option<String>,
}

impl QueryResponse {
    /// `answer`, else `response`; empty strings count as missing
    pub fn answer_text(&self) -> Option<&str> {
        non_empty(self.answer.as_deref()).or_else(|| non_empty(self.response.as_deref()))
    }
}

/// Reply of `POST /transcribe`
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TranscriptionResponse {
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl TranscriptionResponse {
    /// `transcription`, else `text`, trimmed; blank results count as missing
    pub fn recognized_text(&self) -> Option<&str> {
        non_empty(self.transcription.as_deref().map(str::trim))
            .or_else(|| non_empty(self.text.as_deref().map(str::trim)))
    }
}

/// Reply of `GET /`
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    #[serde(default)]
    pub message: String,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Operations the chat session needs from the server
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Ask a question
    async fn query(&self, question: &str) -> Result<QueryResponse>;

    /// Upload a recording for speech recognition
    async fn transcribe(&self, clip: &AudioClip) -> Result<TranscriptionResponse>;

    /// Probe the server root
    async fn health(&self) -> Result<HealthResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_precedence() {
        let reply: QueryResponse =
            serde_json::from_str(r#"{"answer": "A", "response": "R"}"#).unwrap();
        assert_eq!(reply.answer_text(), Some("A"));

        let reply: QueryResponse = serde_json::from_str(r#"{"response": "R"}"#).unwrap();
        assert_eq!(reply.answer_text(), Some("R"));

        let reply: QueryResponse =
            serde_json::from_str(r#"{"answer": "", "response": "R"}"#).unwrap();
        assert_eq!(reply.answer_text(), Some("R"));

        let reply: QueryResponse = serde_json::from_str(r#"{"classification": "sql"}"#).unwrap();
        assert_eq!(reply.answer_text(), None);
    }

    #[test]
    fn test_query_response_accepts_full_server_reply() {
        let reply: QueryResponse = serde_json::from_str(
            r#"{
                "answer": "Günlük ortalama süt 24 litre.",
                "classification": "sql",
                "sql_query": "SELECT AVG(milk) FROM yields",
                "sql_result": "[(24.0,)]"
            }"#,
        )
        .unwrap();
        assert_eq!(reply.classification.as_deref(), Some("sql"));
        assert_eq!(reply.answer_text(), Some("Günlük ortalama süt 24 litre."));
    }

    #[test]
    fn test_null_fields_are_missing() {
        let reply: QueryResponse =
            serde_json::from_str(r#"{"answer": null, "response": "R", "sql_query": null}"#)
                .unwrap();
        assert_eq!(reply.answer_text(), Some("R"));
    }

    #[test]
    fn test_transcription_precedence() {
        let reply: TranscriptionResponse =
            serde_json::from_str(r#"{"transcription": " inek ", "text": "other"}"#).unwrap();
        assert_eq!(reply.recognized_text(), Some("inek"));

        let reply: TranscriptionResponse =
            serde_json::from_str(r#"{"text": "süt verimi", "success": true}"#).unwrap();
        assert_eq!(reply.recognized_text(), Some("süt verimi"));

        let reply: TranscriptionResponse =
            serde_json::from_str(r#"{"text": "   ", "success": true}"#).unwrap();
        assert_eq!(reply.recognized_text(), None);
    }

    #[test]
    fn test_query_request_shape() {
        let body = serde_json::to_value(QueryRequest {
            question: "kaç inek var?".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "question": "kaç inek var?" }));
    }
}
