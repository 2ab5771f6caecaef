//! Session worker thread
//!
//! The UI thread must never wait on the network, so flows run on a dedicated
//! thread that owns a tokio runtime. The UI talks to it through a
//! `SessionHandle`: commands go in over one channel, events come back over
//! another, and state is read directly from the `SharedSession`.

use super::flow::{ChatSession, FlowOutcome};
use super::state::SharedSession;
use crate::api::AssistantApi;
use crate::audio::AudioClip;
use crate::config::UiTexts;
use crate::{ChatError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tokio::runtime::Builder;
use tracing::{debug, error, info, warn};

/// Commands the UI sends to the worker
#[derive(Debug)]
pub enum SessionCommand {
    /// Run the text flow
    SendText(String),
    /// Run the voice flow with a finished recording
    SendVoice(AudioClip),
    /// Stop the worker
    Shutdown,
}

/// Events the worker emits
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Session state changed (trigger a repaint)
    StateChanged,
    /// A flow has ended
    FlowFinished(FlowOutcome),
    /// The worker has stopped
    Shutdown,
}

/// UI-side handle for the session worker
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: Sender<SessionCommand>,
    event_rx: Receiver<SessionEvent>,
    state: SharedSession,
}

impl SessionHandle {
    pub fn send_command(&self, cmd: SessionCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| ChatError::Channel(format!("Failed to send command: {}", e)))
    }

    /// Queue the text flow; blank text is dropped here
    pub fn send_text(&self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        if text.trim().is_empty() {
            return Ok(());
        }
        self.send_command(SessionCommand::SendText(text))
    }

    /// Queue the voice flow for a finished recording
    pub fn send_voice(&self, clip: AudioClip) -> Result<()> {
        self.send_command(SessionCommand::SendVoice(clip))
    }

    /// Idle → Recording; false while busy or already recording
    pub fn start_recording(&self) -> bool {
        self.state.write().start_recording()
    }

    /// Recording → Idle, discarding the capture
    pub fn cancel_recording(&self) -> bool {
        self.state.write().cancel_recording()
    }

    pub fn raise_alert(&self, body: impl Into<String>) {
        self.state.write().raise_alert(body);
    }

    pub fn dismiss_alert(&self) {
        self.state.write().dismiss_alert();
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send_command(SessionCommand::Shutdown)
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv_event(&self) -> Option<SessionEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive an event (blocking)
    pub fn recv_event(&self) -> Result<SessionEvent> {
        self.event_rx
            .recv()
            .map_err(|e| ChatError::Channel(format!("Failed to receive event: {}", e)))
    }

    pub fn state(&self) -> &SharedSession {
        &self.state
    }
}

/// Owns the `ChatSession` and runs flows one at a time
pub struct SessionWorker<A: AssistantApi + 'static> {
    session: ChatSession<A>,
    command_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
}

impl<A: AssistantApi + 'static> SessionWorker<A> {
    /// Create the worker and its handle; call `start` to spawn the thread
    pub fn new(api: A, texts: UiTexts, buffer_size: usize) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = bounded(buffer_size);
        let (event_tx, event_rx) = bounded(buffer_size);

        let state = SharedSession::new();
        let session = ChatSession::with_state(api, texts, state.clone());

        let handle = SessionHandle {
            command_tx,
            event_rx,
            state,
        };

        let worker = Self {
            session,
            command_rx,
            event_tx,
        };

        (worker, handle)
    }

    /// Start the worker thread
    pub fn start(self) -> Result<JoinHandle<()>> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ChatError::Io(format!("Failed to create tokio runtime: {}", e)))?;

        thread::Builder::new()
            .name("session-worker".to_string())
            .spawn(move || {
                info!("Session worker starting");
                runtime.block_on(self.run());
                info!("Session worker stopped");
            })
            .map_err(ChatError::from)
    }

    async fn run(self) {
        loop {
            let command = match self.command_rx.recv() {
                Ok(command) => command,
                Err(_) => {
                    warn!("Command channel disconnected");
                    break;
                }
            };

            let outcome = match command {
                SessionCommand::SendText(text) => {
                    debug!("Running text flow");
                    self.notify(SessionEvent::StateChanged);
                    self.session.send_text(&text).await
                }
                SessionCommand::SendVoice(clip) => {
                    debug!("Running voice flow with {} samples", clip.samples.len());
                    self.notify(SessionEvent::StateChanged);
                    self.session.send_voice(clip).await
                }
                SessionCommand::Shutdown => {
                    info!("Session worker received shutdown command");
                    let _ = self.event_tx.send(SessionEvent::Shutdown);
                    break;
                }
            };

            self.notify(SessionEvent::StateChanged);
            self.notify(SessionEvent::FlowFinished(outcome));
        }
    }

    fn notify(&self, event: SessionEvent) {
        // The UI polls state every frame, so a full event queue only delays a repaint
        if let Err(e) = self.event_tx.try_send(event) {
            if e.is_disconnected() {
                error!("Event channel disconnected");
            } else {
                debug!("Event queue full, dropping {:?}", e.into_inner());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HealthResponse, QueryResponse, TranscriptionResponse};
    use async_trait::async_trait;

    struct FixedApi;

    #[async_trait]
    impl AssistantApi for FixedApi {
        async fn query(&self, _question: &str) -> Result<QueryResponse> {
            Ok(QueryResponse {
                answer: Some("42".to_string()),
                ..Default::default()
            })
        }

        async fn transcribe(&self, _clip: &AudioClip) -> Result<TranscriptionResponse> {
            Err(ChatError::Server { status: 500 })
        }

        async fn health(&self) -> Result<HealthResponse> {
            Ok(HealthResponse::default())
        }
    }

    fn wait_for_outcome(handle: &SessionHandle) -> FlowOutcome {
        loop {
            if let SessionEvent::FlowFinished(outcome) = handle.recv_event().unwrap() {
                return outcome;
            }
        }
    }

    #[test]
    fn test_text_command_round_trip() {
        let (worker, handle) = SessionWorker::new(FixedApi, UiTexts::default(), 16);
        let join = worker.start().unwrap();

        handle.send_text("kaç inek var?").unwrap();
        assert_eq!(wait_for_outcome(&handle), FlowOutcome::Answered);

        let messages = handle.state().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, "42");
        assert!(!handle.state().is_busy());

        handle.shutdown().unwrap();
        join.join().unwrap();
    }

    #[test]
    fn test_blank_text_is_not_queued() {
        let (worker, handle) = SessionWorker::new(FixedApi, UiTexts::default(), 16);
        let join = worker.start().unwrap();

        handle.send_text("   ").unwrap();
        handle.shutdown().unwrap();

        assert_eq!(handle.recv_event().unwrap(), SessionEvent::Shutdown);
        assert_eq!(handle.state().message_count(), 0);
        join.join().unwrap();
    }

    #[test]
    fn test_voice_failure_raises_alert() {
        let (worker, handle) = SessionWorker::new(FixedApi, UiTexts::default(), 16);
        let join = worker.start().unwrap();

        assert!(handle.start_recording());
        handle
            .send_voice(AudioClip::new(vec![0.2; 1600], 16000, 1))
            .unwrap();
        assert_eq!(wait_for_outcome(&handle), FlowOutcome::Failed);

        let texts = UiTexts::default();
        assert_eq!(handle.state().alert(), Some(texts.alert_voice_failed));
        let messages = handle.state().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, texts.voice_error);

        handle.dismiss_alert();
        assert!(handle.state().alert().is_none());

        handle.shutdown().unwrap();
        join.join().unwrap();
    }
}
