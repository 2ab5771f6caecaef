pub mod api;
pub mod audio;
pub mod config;
pub mod console;
pub mod markdown;
pub mod messages;
pub mod session;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChatError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server returned status {status}")]
    Server { status: u16 },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Transcription returned no usable text")]
    EmptyTranscription,

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio encoding error: {0}")]
    AudioEncoding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ChatError {
    fn from(e: std::io::Error) -> Self {
        ChatError::Io(e.to_string())
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            ChatError::Server {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            ChatError::Decode(e.to_string())
        } else {
            ChatError::Transport(e.to_string())
        }
    }
}

impl ChatError {
    /// True for the failures a request can end with: network, non-2xx or a body we could not read
    pub fn is_transport_or_server(&self) -> bool {
        matches!(
            self,
            ChatError::Transport(_) | ChatError::Server { .. } | ChatError::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
