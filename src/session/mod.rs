//! Chat session: shared state, the text and voice flows, and the worker
//! thread that runs them off the UI thread.

pub mod flow;
pub mod state;
pub mod worker;

pub use flow::{ChatSession, FlowOutcome};
pub use state::{SessionSnapshot, SessionState, SharedSession, VoicePhase};
pub use worker::{SessionCommand, SessionEvent, SessionHandle, SessionWorker};
