//! Shared session state
//!
//! The session worker writes; the UI reads snapshots each frame. All
//! transitions go through `SessionState` methods so the busy flag and the
//! voice phase can only move together.

use crate::messages::Message;
use parking_lot::RwLock;
use std::sync::Arc;

/// Voice flow phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoicePhase {
    #[default]
    Idle,
    /// Microphone capture in progress
    Recording,
    /// Recording uploaded, waiting for the transcription
    Transcribing,
    /// Transcribed text sent, waiting for the answer
    Querying,
}

impl VoicePhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, VoicePhase::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, VoicePhase::Recording)
    }

    /// Waiting on the server in either voice step
    pub fn is_processing(&self) -> bool {
        matches!(self, VoicePhase::Transcribing | VoicePhase::Querying)
    }
}

impl std::fmt::Display for VoicePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoicePhase::Idle => write!(f, "Idle"),
            VoicePhase::Recording => write!(f, "Recording"),
            VoicePhase::Transcribing => write!(f, "Transcribing"),
            VoicePhase::Querying => write!(f, "Querying"),
        }
    }
}

/// Session data and transient UI flags
#[derive(Debug, Default)]
pub struct SessionState {
    /// Conversation so far
    pub messages: Vec<Message>,
    /// True while a flow has a request outstanding
    pub busy: bool,
    /// Voice flow phase
    pub voice: VoicePhase,
    /// Pending modal alert body
    pub alert: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing outstanding and no capture running
    pub fn accepts_input(&self) -> bool {
        !self.busy && self.voice.is_idle()
    }

    /// Idle → Recording; refused while busy or already in a voice phase
    pub fn start_recording(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.voice = VoicePhase::Recording;
        true
    }

    /// Recording → Idle without uploading anything
    pub fn cancel_recording(&mut self) -> bool {
        if !self.voice.is_recording() {
            return false;
        }
        self.voice = VoicePhase::Idle;
        true
    }

    /// Mark a text request as outstanding
    pub(crate) fn begin_text_flow(&mut self, user_message: Message) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.messages.push(user_message);
        self.busy = true;
        true
    }

    /// Recording → Transcribing and mark the upload as outstanding
    pub(crate) fn begin_transcription(&mut self) -> bool {
        if self.busy || !self.voice.is_recording() {
            return false;
        }
        self.voice = VoicePhase::Transcribing;
        self.busy = true;
        true
    }

    /// Transcribing → Querying, recording what the user said
    pub(crate) fn begin_voice_query(&mut self, user_message: Message) {
        self.messages.push(user_message);
        self.voice = VoicePhase::Querying;
    }

    /// Append the flow's last message and release the busy flag
    pub(crate) fn finish_flow(&mut self, reply: Message) {
        self.messages.push(reply);
        self.busy = false;
        self.voice = VoicePhase::Idle;
    }

    pub fn raise_alert(&mut self, body: impl Into<String>) {
        self.alert = Some(body.into());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            messages: self.messages.clone(),
            busy: self.busy,
            voice: self.voice,
            alert: self.alert.clone(),
        }
    }
}

/// Immutable view of the session, detached from the lock
#[derive(Clone, Debug, Default)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub busy: bool,
    pub voice: VoicePhase,
    pub alert: Option<String>,
}

impl SessionSnapshot {
    pub fn accepts_input(&self) -> bool {
        !self.busy && self.voice.is_idle()
    }
}

/// Thread-safe shared session state
#[derive(Clone, Default)]
pub struct SharedSession {
    inner: Arc<RwLock<SessionState>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a read lock on the state
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, SessionState> {
        self.inner.read()
    }

    /// Get a write lock on the state
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, SessionState> {
        self.inner.write()
    }

    /// Get a snapshot of current state (no lock held after return)
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().snapshot()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.read().busy
    }

    pub fn voice_phase(&self) -> VoicePhase {
        self.inner.read().voice
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner.read().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.inner.read().messages.len()
    }

    pub fn alert(&self) -> Option<String> {
        self.inner.read().alert.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_transitions() {
        let mut state = SessionState::new();
        assert!(state.voice.is_idle());

        assert!(state.start_recording());
        assert!(state.voice.is_recording());
        assert!(!state.start_recording());

        assert!(state.begin_transcription());
        assert_eq!(state.voice, VoicePhase::Transcribing);
        assert!(state.busy);

        state.begin_voice_query(Message::user("süt"));
        assert_eq!(state.voice, VoicePhase::Querying);
        assert!(state.busy);

        state.finish_flow(Message::bot("cevap"));
        assert!(state.voice.is_idle());
        assert!(!state.busy);
        assert_eq!(state.messages.len(), 2);
    }

    #[test]
    fn test_cancel_recording() {
        let mut state = SessionState::new();
        assert!(!state.cancel_recording());

        state.start_recording();
        assert!(state.cancel_recording());
        assert!(state.voice.is_idle());
        assert!(!state.busy);
    }

    #[test]
    fn test_busy_blocks_new_flows() {
        let mut state = SessionState::new();
        assert!(state.begin_text_flow(Message::user("bir")));
        assert!(state.busy);

        assert!(!state.begin_text_flow(Message::user("iki")));
        assert!(!state.start_recording());
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn test_transcription_requires_recording() {
        let mut state = SessionState::new();
        assert!(!state.begin_transcription());
        assert!(!state.busy);
    }

    #[test]
    fn test_alerts() {
        let mut state = SessionState::new();
        state.raise_alert("Kayıt başlatılamadı.");
        assert_eq!(state.alert.as_deref(), Some("Kayıt başlatılamadı."));
        state.dismiss_alert();
        assert!(state.alert.is_none());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let shared = SharedSession::new();
        let before = shared.snapshot();

        shared.write().start_recording();

        assert!(before.voice.is_idle());
        assert!(before.accepts_input());
        assert!(shared.snapshot().voice.is_recording());
        assert!(!shared.snapshot().accepts_input());
    }

    #[test]
    fn test_messages_keep_flow_order() {
        let shared = SharedSession::new();
        assert!(shared.write().begin_text_flow(Message::user("kaç inek?")));
        let mid_flow = shared.snapshot();

        shared.write().finish_flow(Message::bot("42 inek"));

        assert_eq!(mid_flow.messages.len(), 1);
        let texts: Vec<String> = shared.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["kaç inek?", "42 inek"]);
        assert_eq!(shared.message_count(), 2);
    }

    #[test]
    fn test_voice_phase_display() {
        assert_eq!(VoicePhase::Transcribing.to_string(), "Transcribing");
        assert!(VoicePhase::Querying.is_processing());
        assert!(!VoicePhase::Recording.is_processing());
    }
}
