use super::{AssistantApi, HealthResponse, QueryRequest, QueryResponse, TranscriptionResponse};
use crate::audio::AudioClip;
use crate::config::ApiConfig;
use crate::{ChatError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Multipart field the server reads the recording from
pub const AUDIO_FIELD: &str = "audio";
const AUDIO_FILE_NAME: &str = "recording.wav";
const AUDIO_MIME: &str = "audio/wav";

/// reqwest-backed client for the assistant server
#[derive(Clone)]
pub struct HttpAssistantApi {
    client: Client,
    config: ApiConfig,
}

impl HttpAssistantApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn read_json<T: DeserializeOwned>(res: reqwest::Response, endpoint: &str) -> Result<T> {
        if let Err(e) = res.error_for_status_ref() {
            warn!("{} answered with status {}", endpoint, res.status());
            return Err(e.into());
        }

        match res.json::<T>().await {
            Ok(body) => Ok(body),
            Err(e) => {
                warn!("{} sent an unreadable body: {}", endpoint, e);
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl AssistantApi for HttpAssistantApi {
    async fn query(&self, question: &str) -> Result<QueryResponse> {
        let url = self.config.endpoint("query");
        debug!("POST {} ({} chars)", url, question.chars().count());

        let res = self
            .client
            .post(&url)
            .json(&QueryRequest {
                question: question.to_string(),
            })
            .send()
            .await?;

        Self::read_json(res, "/query").await
    }

    async fn transcribe(&self, clip: &AudioClip) -> Result<TranscriptionResponse> {
        let url = self.config.endpoint("transcribe");
        let wav = clip.to_wav_bytes()?;
        debug!(
            "POST {} ({:.1}s of audio, {} bytes)",
            url,
            clip.duration_seconds(),
            wav.len()
        );

        let part = Part::bytes(wav)
            .file_name(AUDIO_FILE_NAME)
            .mime_str(AUDIO_MIME)
            .map_err(|e| ChatError::AudioEncoding(e.to_string()))?;
        let form = Form::new().part(AUDIO_FIELD, part);

        let res = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await?;

        Self::read_json(res, "/transcribe").await
    }

    async fn health(&self) -> Result<HealthResponse> {
        let url = self.config.endpoint("");
        let res = self
            .client
            .get(&url)
            .send()
            .await?;

        Self::read_json(res, "/").await
    }
}
