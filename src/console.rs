//! Line-oriented console client
//!
//! Reads questions from any `BufRead`, runs each through the text flow and
//! prints the reply. Used by `milkwizard --console` and by tests with
//! in-memory buffers.

use crate::api::AssistantApi;
use crate::session::{ChatSession, FlowOutcome};
use crate::Result;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Words that end the console session
pub const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "çıkış"];

/// True if the line asks to leave (trimmed, case-insensitive)
///
/// Both the default and the Turkish case folding are tried, so `ÇIKIŞ`
/// matches as well as `EXIT`.
pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    let folded = line.to_lowercase();
    let folded_tr = turkish_lowercase(line);
    EXIT_COMMANDS
        .iter()
        .any(|cmd| *cmd == folded || *cmd == folded_tr)
}

/// Lowercase with the Turkish dotted/dotless I pairs
fn turkish_lowercase(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'I' => 'ı'.to_string(),
            'İ' => 'i'.to_string(),
            other => other.to_lowercase().to_string(),
        })
        .collect()
}

/// Probe the server and print its banner; failure is only logged
pub async fn print_banner<A: AssistantApi, W: Write>(
    session: &ChatSession<A>,
    output: &mut W,
) -> Result<()> {
    match session.api().health().await {
        Ok(health) if !health.message.is_empty() => {
            info!("Server is up: {}", health.message);
            writeln!(output, "{}", health.message)?;
        }
        Ok(_) => info!("Server is up"),
        Err(e) => warn!("Health check failed: {}", e),
    }
    Ok(())
}

/// Run the read-ask-print loop until an exit word or end of input
pub async fn run<A: AssistantApi, R: BufRead, W: Write>(
    session: &ChatSession<A>,
    input: R,
    output: &mut W,
) -> Result<()> {
    let texts = session.texts();
    writeln!(output, "{}", texts.welcome_title)?;
    writeln!(output, "{}", texts.welcome_subtitle)?;
    writeln!(output, "({})", EXIT_COMMANDS.join(" / "))?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        if is_exit_command(&line) {
            debug!("Exit requested");
            break;
        }

        match session.send_text(&line).await {
            FlowOutcome::Ignored => continue,
            outcome => debug!("Console query finished: {:?}", outcome),
        }

        if let Some(reply) = session.state().read().messages.last() {
            writeln!(output, "{}: {}", texts.assistant_name, reply.text)?;
        }
        output.flush()?;
    }

    info!(
        "Console session ended after {} messages",
        session.state().message_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HealthResponse, QueryResponse, TranscriptionResponse};
    use crate::audio::AudioClip;
    use crate::config::UiTexts;
    use crate::ChatError;
    use async_trait::async_trait;
    use std::io::Cursor;

    struct TableApi {
        healthy: bool,
    }

    #[async_trait]
    impl AssistantApi for TableApi {
        async fn query(&self, question: &str) -> crate::Result<QueryResponse> {
            if question == "boom" {
                return Err(ChatError::Server { status: 500 });
            }
            Ok(QueryResponse {
                response: Some(format!("yanıt: {}", question)),
                ..Default::default()
            })
        }

        async fn transcribe(&self, _clip: &AudioClip) -> crate::Result<TranscriptionResponse> {
            Ok(TranscriptionResponse::default())
        }

        async fn health(&self) -> crate::Result<HealthResponse> {
            if self.healthy {
                Ok(HealthResponse {
                    message: "Süt Sihirbazı API çalışıyor".to_string(),
                })
            } else {
                Err(ChatError::Transport("connection refused".to_string()))
            }
        }
    }

    fn session(healthy: bool) -> ChatSession<TableApi> {
        ChatSession::new(TableApi { healthy }, UiTexts::default())
    }

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("  QUIT \n"));
        assert!(is_exit_command("çıkış"));
        assert!(is_exit_command("ÇIKIŞ"));
        assert!(is_exit_command("Çıkış"));
        assert!(is_exit_command("EXIT"));
        assert!(!is_exit_command("çikiş"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command(""));
    }

    #[tokio::test]
    async fn test_console_prints_replies_until_exit() {
        let session = session(true);
        let input = Cursor::new("süt ne kadar?\n\n   \nboom\nçıkış\nbu okunmaz\n");
        let mut output = Vec::new();

        run(&session, input, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Merhaba, Çiftçi Dostum!"));
        assert!(output.contains("Süt Sihirbazı: yanıt: süt ne kadar?"));
        assert!(output.contains("Süt Sihirbazı: Bağlantı hatası oluştu."));
        assert!(!output.contains("bu okunmaz"));

        // Two flows, two messages each; blank lines are skipped
        assert_eq!(session.state().message_count(), 4);
    }

    #[tokio::test]
    async fn test_console_stops_at_end_of_input() {
        let session = session(true);
        let mut output = Vec::new();

        run(&session, Cursor::new("merhaba"), &mut output)
            .await
            .unwrap();

        assert_eq!(session.state().message_count(), 2);
    }

    #[tokio::test]
    async fn test_banner_tolerates_unreachable_server() {
        let mut output = Vec::new();
        print_banner(&session(false), &mut output).await.unwrap();
        assert!(output.is_empty());

        print_banner(&session(true), &mut output).await.unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Süt Sihirbazı API çalışıyor\n"
        );
    }
}
