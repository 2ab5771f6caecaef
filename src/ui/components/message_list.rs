//! Message list component
//!
//! Shows the welcome panel for an empty session, otherwise the conversation
//! with the "thinking" footer while a flow is outstanding.

use crate::config::UiTexts;
use crate::messages::Message;
use crate::session::SessionSnapshot;
use crate::ui::components::MarkdownView;
use crate::ui::theme::Theme;
use egui::{self, Align, RichText};

/// Message list component
pub struct MessageList<'a> {
    session: &'a SessionSnapshot,
    texts: &'a UiTexts,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(session: &'a SessionSnapshot, texts: &'a UiTexts, theme: &'a Theme) -> Self {
        Self {
            session,
            texts,
            theme,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("messages")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);

                if self.session.messages.is_empty() && !self.session.busy {
                    self.show_welcome(ui);
                } else {
                    for message in &self.session.messages {
                        self.show_message(ui, message);
                        ui.add_space(self.theme.spacing_sm);
                    }

                    if self.session.busy {
                        self.show_thinking(ui);
                    }
                }

                ui.add_space(self.theme.spacing);
            });
    }

    fn show_welcome(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);

            egui::Frame::none()
                .fill(self.theme.accent_soft)
                .rounding(self.theme.card_rounding)
                .inner_margin(self.theme.spacing_lg)
                .show(ui, |ui| {
                    ui.label(RichText::new("🐄").size(48.0));
                });

            ui.add_space(self.theme.spacing);

            ui.label(
                RichText::new(&self.texts.welcome_title)
                    .size(22.0)
                    .strong()
                    .color(self.theme.text_title),
            );

            ui.add_space(self.theme.spacing_sm);

            ui.label(
                RichText::new(&self.texts.welcome_subtitle)
                    .size(15.0)
                    .color(self.theme.text_secondary),
            );
        });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        if message.is_user() {
            self.show_user_message(ui, message);
        } else {
            self.show_bot_message(ui, message);
        }
    }

    fn show_user_message(&self, ui: &mut egui::Ui, message: &Message) {
        ui.with_layout(egui::Layout::top_down(Align::RIGHT), |ui| {
            let max_width = ui.available_width() * 0.8;

            egui::Frame::none()
                .fill(self.theme.user_bubble)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(14.0, 10.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    let response =
                        ui.label(RichText::new(&message.text).color(self.theme.text_primary));
                    let label = format!("User message: {}", message.text);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
                    });
                });

            self.show_timestamp(ui, message);
        });
    }

    fn show_bot_message(&self, ui: &mut egui::Ui, message: &Message) {
        let is_error = message.is_error();
        let (fill, color) = if is_error {
            (self.theme.error_bubble, self.theme.danger)
        } else {
            (self.theme.bot_bubble, self.theme.text_primary)
        };

        ui.with_layout(egui::Layout::top_down(Align::LEFT), |ui| {
            let max_width = ui.available_width() * 0.9;

            egui::Frame::none()
                .fill(fill)
                .stroke(egui::Stroke::new(1.0, self.theme.border))
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(14.0, 10.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);

                    let name = ui.label(
                        RichText::new(format!("🐄 {}", self.texts.assistant_name))
                            .size(12.0)
                            .strong()
                            .color(self.theme.primary_soft),
                    );
                    let label = if is_error {
                        format!("Error notice: {}", message.text)
                    } else {
                        format!("Assistant response: {}", message.text)
                    };
                    name.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
                    });

                    ui.add_space(4.0);

                    if is_error {
                        ui.label(RichText::new(&message.text).color(color));
                    } else {
                        MarkdownView::new(&message.text, self.theme, &message.id)
                            .color(color)
                            .show(ui);
                    }
                });

            self.show_timestamp(ui, message);
        });
    }

    fn show_timestamp(&self, ui: &mut egui::Ui, message: &Message) {
        let time = message.timestamp.with_timezone(&chrono::Local);
        ui.label(
            RichText::new(time.format("%H:%M").to_string())
                .size(10.0)
                .color(self.theme.text_muted),
        );
    }

    fn show_thinking(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add(egui::Spinner::new().color(self.theme.accent));
            ui.label(
                RichText::new(&self.texts.thinking)
                    .italics()
                    .color(self.theme.primary_soft),
            );
        });
    }
}
