//! UI automation tests using egui_kittest and AccessKit
//!
//! These tests render the chat components against a prepared session
//! snapshot and check the accessibility tree for the expected elements.

use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use milkwizard::config::UiTexts;
use milkwizard::messages::Message;
use milkwizard::session::{SessionSnapshot, VoicePhase};
use milkwizard::ui::{InputAction, InputBar, MessageList, Theme};

/// Component state wrapper for testing
struct TestApp {
    session: SessionSnapshot,
    input_text: String,
    texts: UiTexts,
    theme: Theme,
    actions: Vec<InputAction>,
}

impl TestApp {
    fn new() -> Self {
        Self {
            session: SessionSnapshot::default(),
            input_text: String::new(),
            texts: UiTexts::default(),
            theme: Theme::farm(),
            actions: Vec::new(),
        }
    }

    fn with_message(mut self, message: Message) -> Self {
        self.session.messages.push(message);
        self
    }

    fn busy(mut self) -> Self {
        self.session.busy = true;
        self
    }

    fn with_voice(mut self, voice: VoicePhase) -> Self {
        self.session.voice = voice;
        self
    }
}

/// Render the chat components for testing
fn render_chat_ui(ctx: &egui::Context, app: &mut TestApp) {
    egui::TopBottomPanel::bottom("input").show(ctx, |ui| {
        let action =
            InputBar::new(&mut app.input_text, &app.session, &app.texts, &app.theme).show(ui);
        if action != InputAction::None {
            app.actions.push(action);
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        MessageList::new(&app.session, &app.texts, &app.theme).show(ui);
    });
}

fn harness(app: TestApp) -> Harness<'static, TestApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(480.0, 640.0))
        .build_state(|ctx, app: &mut TestApp| render_chat_ui(ctx, app), app)
}

/// Test that the welcome panel greets an empty session
#[test]
fn test_welcome_shown_for_empty_session() {
    let mut harness = harness(TestApp::new());
    harness.run();

    let _title = harness.get_by_label("Merhaba, Çiftçi Dostum!");
}

/// Test that the message input field exists and is accessible
#[test]
fn test_message_input_exists() {
    let mut harness = harness(TestApp::new());
    harness.run();

    let _input = harness.get_by_label("Message input");
}

/// Test that the mic button stands in for send while the input is empty
#[test]
fn test_mic_button_when_input_empty() {
    let mut harness = harness(TestApp::new());
    harness.run();

    harness.get_by_label("Start recording").click();
    harness.run();

    assert_eq!(harness.state().actions, vec![InputAction::StartRecording]);
}

/// Test that the mic button turns into a stop button while recording
#[test]
fn test_stop_button_while_recording() {
    let mut harness = harness(TestApp::new().with_voice(VoicePhase::Recording));
    harness.run();

    harness.get_by_label("Stop recording").click();
    harness.run();

    assert_eq!(harness.state().actions, vec![InputAction::StopRecording]);
}

/// Test that typing and clicking send emits the trimmed text and clears the field
#[test]
fn test_send_message_emits_action() {
    let mut harness = harness(TestApp::new());
    harness.run();

    harness.get_by_label("Message input").focus();
    harness.run();

    harness
        .get_by_label("Message input")
        .type_text("  Süt verimi nasıl?  ");
    harness.run();

    harness.get_by_label("Send message").click();
    harness.run();

    assert_eq!(
        harness.state().actions,
        vec![InputAction::Send("Süt verimi nasıl?".to_string())]
    );
    assert!(
        harness.state().input_text.is_empty(),
        "Input should be cleared after sending"
    );
}

/// Test that a busy session does not emit a send
#[test]
fn test_cannot_send_while_busy() {
    let mut app = TestApp::new().busy();
    app.input_text = "ikinci soru".to_string();

    let mut harness = harness(app);
    harness.step();

    harness.get_by_label("Send message").click();
    harness.step();
    harness.step();

    assert!(harness.state().actions.is_empty());
    assert_eq!(harness.state().input_text, "ikinci soru");
}

/// Test that user messages appear in the message list
#[test]
fn test_user_message_appears_in_list() {
    let mut harness = harness(TestApp::new().with_message(Message::user("Bugün kaç inek sağıldı?")));
    harness.run();

    let _message = harness.get_by_label("User message: Bugün kaç inek sağıldı?");
}

/// Test that assistant answers appear in the message list
#[test]
fn test_assistant_response_appears_in_list() {
    let mut harness = harness(
        TestApp::new()
            .with_message(Message::user("Toplam?"))
            .with_message(Message::bot("Toplam 540 litre.")),
    );
    harness.run();

    let _user = harness.get_by_label("User message: Toplam?");
    let _answer = harness.get_by_label("Assistant response: Toplam 540 litre.");
}

/// Test that failed flows are shown as error notices
#[test]
fn test_error_notice_appears_in_list() {
    let mut harness = harness(
        TestApp::new()
            .with_message(Message::user("merhaba"))
            .with_message(Message::error("Bağlantı hatası oluştu.")),
    );
    harness.run();

    let _notice = harness.get_by_label("Error notice: Bağlantı hatası oluştu.");
}

/// Test that markdown tables in answers render their cells
#[test]
fn test_markdown_table_cells_rendered() {
    let answer = "Son ölçümler:\n\n| İnek | Süt (L) |\n|---|---:|\n| Sarıkız | 25 |\n| Karabaş | 30 |";
    let mut harness = harness(TestApp::new().with_message(Message::bot(answer)));
    harness.run();

    let _header = harness.get_by_label("İnek");
    let _first = harness.get_by_label("Sarıkız");
    let _second = harness.get_by_label("Karabaş");
}

/// Test that the thinking indicator shows while a flow is outstanding
#[test]
fn test_thinking_indicator_while_busy() {
    let mut harness = harness(TestApp::new().with_message(Message::user("soru")).busy());
    harness.step();

    let _thinking = harness.get_by_label("Süt Sihirbazı düşünüyor...");
}
