//! Markdown body of an assistant answer
//!
//! Tables get their own horizontal scroll area so wide query results do not
//! stretch the chat column.

use crate::markdown::{parse_blocks, Block, Cell, Span};
use crate::ui::theme::Theme;
use egui::{self, Color32, RichText};

/// Renders parsed markdown blocks
pub struct MarkdownView<'a> {
    text: &'a str,
    theme: &'a Theme,
    color: Color32,
    id_salt: egui::Id,
}

impl<'a> MarkdownView<'a> {
    pub fn new(text: &'a str, theme: &'a Theme, id_salt: impl std::hash::Hash) -> Self {
        Self {
            text,
            theme,
            color: theme.text_primary,
            id_salt: egui::Id::new(id_salt),
        }
    }

    /// Body text color
    pub fn color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) {
        for (index, block) in parse_blocks(self.text).iter().enumerate() {
            match block {
                Block::Heading { level, spans } => {
                    let size = match level {
                        1 => 20.0,
                        2 => 18.0,
                        _ => 16.0,
                    };
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        for span in spans {
                            ui.label(
                                RichText::new(span.as_str())
                                    .size(size)
                                    .strong()
                                    .color(self.theme.text_title),
                            );
                        }
                    });
                }
                Block::Paragraph(spans) => {
                    ui.horizontal_wrapped(|ui| self.spans(ui, spans));
                }
                Block::ListItem(spans) => {
                    ui.horizontal_wrapped(|ui| {
                        let ordered = matches!(
                            spans.first(),
                            Some(Span::Text(t)) if t.starts_with(|c: char| c.is_ascii_digit())
                        );
                        if !ordered {
                            ui.label(RichText::new("• ").color(self.theme.primary_soft));
                        }
                        self.spans(ui, spans);
                    });
                }
                Block::Table { header, rows } => {
                    self.table(ui, index, header, rows);
                }
                Block::CodeBlock(code) => {
                    egui::Frame::none()
                        .fill(self.theme.input_bg)
                        .rounding(self.theme.card_rounding)
                        .inner_margin(self.theme.spacing_sm)
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(code)
                                    .monospace()
                                    .color(self.theme.text_primary),
                            );
                        });
                }
                Block::Rule => {
                    ui.separator();
                }
            }
        }
    }

    fn spans(&self, ui: &mut egui::Ui, spans: &[Span]) {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in spans {
            ui.label(self.rich(span, self.color));
        }
    }

    fn rich(&self, span: &Span, color: Color32) -> RichText {
        match span {
            Span::Text(t) => RichText::new(t).color(color),
            Span::Strong(t) => RichText::new(t).strong().color(self.theme.text_title),
            Span::Emphasis(t) => RichText::new(t).italics().color(color),
            Span::Code(t) => RichText::new(t).code().color(self.theme.primary_soft),
        }
    }

    fn table(&self, ui: &mut egui::Ui, index: usize, header: &[Cell], rows: &[Vec<Cell>]) {
        let id = self.id_salt.with(("table", index));

        egui::ScrollArea::horizontal()
            .id_salt(id)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                egui::Frame::none()
                    .stroke(egui::Stroke::new(1.0, self.theme.table_stroke))
                    .rounding(egui::Rounding::same(8.0))
                    .inner_margin(self.theme.spacing_sm)
                    .show(ui, |ui| {
                        egui::Grid::new(id.with("grid"))
                            .striped(true)
                            .spacing([self.theme.spacing, self.theme.spacing_sm])
                            .show(ui, |ui| {
                                for cell in header {
                                    let text: String = cell.iter().map(Span::as_str).collect();
                                    ui.label(
                                        RichText::new(text)
                                            .strong()
                                            .color(self.theme.text_title)
                                            .background_color(self.theme.table_header),
                                    );
                                }
                                ui.end_row();

                                for row in rows {
                                    for cell in row {
                                        ui.horizontal(|ui| self.spans(ui, cell));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
