//! Text and voice query flows
//!
//! Each flow appends its messages to the shared session and converts every
//! failure into a chat notice; nothing is propagated to the caller beyond the
//! returned `FlowOutcome`.

use super::state::SharedSession;
use crate::api::AssistantApi;
use crate::audio::AudioClip;
use crate::config::UiTexts;
use crate::messages::Message;
use crate::{ChatError, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// How a flow ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Blank input; nothing was appended or sent
    Ignored,
    /// Another flow is outstanding or a recording is in progress
    Busy,
    /// Recording stopped with no captured audio
    NoAudio,
    /// A bot reply was appended
    Answered,
    /// A fixed error notice was appended
    Failed,
}

/// Runs flows against an `AssistantApi`, writing into a `SharedSession`
pub struct ChatSession<A: AssistantApi> {
    api: Arc<A>,
    state: SharedSession,
    texts: UiTexts,
}

impl<A: AssistantApi> ChatSession<A> {
    pub fn new(api: A, texts: UiTexts) -> Self {
        Self::with_state(api, texts, SharedSession::new())
    }

    /// Create a session over an existing shared state
    pub fn with_state(api: A, texts: UiTexts, state: SharedSession) -> Self {
        Self {
            api: Arc::new(api),
            state,
            texts,
        }
    }

    pub fn state(&self) -> &SharedSession {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn texts(&self) -> &UiTexts {
        &self.texts
    }

    /// Send typed text and append the answer
    pub async fn send_text(&self, input: &str) -> FlowOutcome {
        let question = input.trim();
        if question.is_empty() {
            debug!("Ignoring blank input");
            return FlowOutcome::Ignored;
        }

        if !self.state.write().begin_text_flow(Message::user(question)) {
            warn!("Text flow refused: session is busy");
            return FlowOutcome::Busy;
        }

        let started = Instant::now();
        let (reply, outcome) = match self.ask(question).await {
            Ok(answer) => (Message::bot(answer), FlowOutcome::Answered),
            Err(e) => {
                warn!("Text query failed: {}", e);
                (Message::error(&self.texts.text_error), FlowOutcome::Failed)
            }
        };

        self.state.write().finish_flow(reply);
        info!(
            "Text flow finished: {:?} in {}ms",
            outcome,
            started.elapsed().as_millis()
        );
        outcome
    }

    /// Upload a finished recording, then ask the transcribed question
    ///
    /// Expects the session to be in the Recording phase.
    pub async fn send_voice(&self, clip: AudioClip) -> FlowOutcome {
        {
            let mut state = self.state.write();
            if state.busy {
                warn!("Voice flow refused: session is busy");
                return FlowOutcome::Busy;
            }
            if !state.voice.is_recording() {
                debug!("Voice flow ignored: no recording in progress");
                return FlowOutcome::Ignored;
            }
            if clip.is_empty() {
                info!("Recording stopped without audio, nothing to send");
                state.cancel_recording();
                return FlowOutcome::NoAudio;
            }
            state.begin_transcription();
        }

        let started = Instant::now();
        let outcome = match self.run_voice(&clip).await {
            Ok(answer) => {
                self.state.write().finish_flow(Message::bot(answer));
                FlowOutcome::Answered
            }
            Err(e) => {
                // Transcription and answer failures share one notice; only the log tells them apart
                if e.is_transport_or_server() {
                    warn!("Voice query failed: {}", e);
                } else {
                    info!("Voice query produced no question: {}", e);
                }
                let mut state = self.state.write();
                state.raise_alert(&self.texts.alert_voice_failed);
                state.finish_flow(Message::error(&self.texts.voice_error));
                FlowOutcome::Failed
            }
        };

        info!(
            "Voice flow finished: {:?} in {}ms ({:.1}s of audio)",
            outcome,
            started.elapsed().as_millis(),
            clip.duration_seconds()
        );
        outcome
    }

    async fn run_voice(&self, clip: &AudioClip) -> Result<String> {
        let transcription = self.api.transcribe(clip).await?;
        let text = transcription
            .recognized_text()
            .ok_or(ChatError::EmptyTranscription)?
            .to_string();
        debug!("Transcribed: {:?}", text);

        self.state.write().begin_voice_query(Message::user(&text));
        self.ask(&text).await
    }

    async fn ask(&self, question: &str) -> Result<String> {
        let reply = self.api.query(question).await?;
        if let Some(classification) = &reply.classification {
            debug!("Answer classification: {}", classification);
        }
        Ok(reply
            .answer_text()
            .unwrap_or(&self.texts.fallback_answer)
            .to_string())
    }
}
