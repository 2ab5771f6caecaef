//! Input bar component
//!
//! Text field plus a single action button: send while there is text to send,
//! otherwise the microphone toggle.

use crate::config::UiTexts;
use crate::session::{SessionSnapshot, VoicePhase};
use crate::ui::theme::Theme;
use egui::{self, Color32, Key, RichText, Vec2};

/// What the user asked for this frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputAction {
    None,
    /// Trimmed text to send; the field has already been cleared
    Send(String),
    StartRecording,
    StopRecording,
}

/// Input bar for text and voice input
pub struct InputBar<'a> {
    input: &'a mut String,
    session: &'a SessionSnapshot,
    texts: &'a UiTexts,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(
        input: &'a mut String,
        session: &'a SessionSnapshot,
        texts: &'a UiTexts,
        theme: &'a Theme,
    ) -> Self {
        Self {
            input,
            session,
            texts,
            theme,
        }
    }

    pub fn show(mut self, ui: &mut egui::Ui) -> InputAction {
        let mut action = InputAction::None;

        egui::Frame::none()
            .fill(self.theme.surface)
            .stroke(egui::Stroke::new(1.0, self.theme.border))
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let enter_pressed = self.show_text_input(ui);

                    if self.input.trim().is_empty() {
                        action = self.show_mic_button(ui);
                    } else if self.show_send_button(ui) || enter_pressed {
                        action = self.take_input();
                    }
                });
            });

        action
    }

    /// Returns true when Enter was pressed in the field
    fn show_text_input(&mut self, ui: &mut egui::Ui) -> bool {
        let enabled = self.session.accepts_input();
        // Reserve room for the action button
        let width = (ui.available_width() - 56.0).max(80.0);

        let text_edit = egui::TextEdit::singleline(&mut *self.input)
            .hint_text(RichText::new(&self.texts.input_placeholder).color(self.theme.text_muted))
            .desired_width(width)
            .font(egui::TextStyle::Body)
            .text_color(self.theme.primary)
            .margin(egui::Margin::symmetric(12.0, 8.0))
            .id(egui::Id::new("message_input"));

        let response = ui.add_enabled(enabled, text_edit);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, enabled, "Message input")
        });

        enabled && response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter))
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) -> bool {
        let enabled = self.session.accepts_input();

        let button = egui::Button::new(RichText::new("➤").size(18.0).color(Color32::WHITE))
            .fill(self.theme.primary)
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding);

        let response = ui.add_enabled(enabled, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, "Send message")
        });
        response.clicked()
    }

    fn show_mic_button(&mut self, ui: &mut egui::Ui) -> InputAction {
        let (icon, label, fill, color, enabled) = match self.session.voice {
            VoicePhase::Recording => (
                "⏹",
                "Stop recording",
                self.theme.danger,
                Color32::WHITE,
                true,
            ),
            VoicePhase::Idle => (
                "🎤",
                "Start recording",
                self.theme.accent_soft,
                self.theme.primary_soft,
                !self.session.busy,
            ),
            VoicePhase::Transcribing | VoicePhase::Querying => (
                "⏳",
                "Processing recording",
                self.theme.accent_soft,
                self.theme.text_muted,
                false,
            ),
        };

        let button = egui::Button::new(RichText::new(icon).size(20.0).color(color))
            .fill(fill)
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding);

        let response = ui.add_enabled(enabled, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, label)
        });

        if !response.clicked() {
            return InputAction::None;
        }

        if self.session.voice.is_recording() {
            InputAction::StopRecording
        } else {
            InputAction::StartRecording
        }
    }

    fn take_input(&mut self) -> InputAction {
        let text = self.input.trim().to_string();
        self.input.clear();
        InputAction::Send(text)
    }
}
