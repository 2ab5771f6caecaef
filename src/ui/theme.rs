//! Colors and styling for the chat window

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Deep green used for titles and the send button
    pub primary: Color32,
    /// Icons and secondary accents
    pub primary_soft: Color32,
    pub accent: Color32,
    pub accent_soft: Color32,
    pub danger: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub surface: Color32,
    pub input_bg: Color32,
    pub border: Color32,

    /// Text colors
    pub text_title: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Chat bubbles
    pub user_bubble: Color32,
    pub bot_bubble: Color32,
    pub error_bubble: Color32,

    /// Table header and grid lines
    pub table_header: Color32,
    pub table_stroke: Color32,

    pub button_rounding: Rounding,
    pub card_rounding: Rounding,
    pub bubble_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    pub spacing_lg: f32,
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::farm()
    }
}

impl Theme {
    /// Light theme in farm greens
    pub fn farm() -> Self {
        Self {
            primary: Color32::from_rgb(0x1B, 0x5E, 0x20),
            primary_soft: Color32::from_rgb(0x2E, 0x7D, 0x32),
            accent: Color32::from_rgb(0x4C, 0xAF, 0x50),
            accent_soft: Color32::from_rgb(0xC8, 0xE6, 0xC9),
            danger: Color32::from_rgb(0xD3, 0x2F, 0x2F),

            bg_primary: Color32::from_rgb(0xF9, 0xFB, 0xF9),
            surface: Color32::WHITE,
            input_bg: Color32::from_rgb(0xF1, 0xF8, 0xF4),
            border: Color32::from_rgb(0xE0, 0xE0, 0xE0),

            text_title: Color32::from_rgb(0x1B, 0x5E, 0x20),
            text_primary: Color32::from_rgb(0x26, 0x32, 0x38),
            text_secondary: Color32::from_rgb(0x54, 0x6E, 0x7A),
            text_muted: Color32::from_rgb(0x8F, 0xA3, 0xAD),

            user_bubble: Color32::from_rgb(0xE0, 0xF2, 0xF1),
            bot_bubble: Color32::WHITE,
            error_bubble: Color32::from_rgb(0xFD, 0xEC, 0xEA),

            table_header: Color32::from_rgb(0xF1, 0xF8, 0xE9),
            table_stroke: Color32::from_rgb(0xC5, 0xE1, 0xA5),

            button_rounding: Rounding::same(22.0),
            card_rounding: Rounding::same(16.0),
            bubble_rounding: Rounding::same(18.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::light();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.surface;
        visuals.extreme_bg_color = self.input_bg;

        visuals.widgets.noninteractive.bg_fill = self.surface;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_primary);
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);

        visuals.widgets.inactive.bg_fill = self.input_bg;
        visuals.widgets.inactive.weak_bg_fill = self.input_bg;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.primary_soft);

        visuals.widgets.hovered.bg_fill = self.accent_soft;
        visuals.widgets.hovered.weak_bg_fill = self.accent_soft;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.primary);

        visuals.widgets.active.bg_fill = self.accent;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

        visuals.selection.bg_fill = self.accent_soft;
        visuals.selection.stroke = Stroke::new(1.0, self.primary);

        visuals.hyperlink_color = self.primary_soft;

        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.border);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.window_margin = egui::Margin::same(self.spacing);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(20.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(15.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            FontId::new(13.0, FontFamily::Monospace),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(15.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(12.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_header_is_distinct() {
        let theme = Theme::farm();
        assert_ne!(theme.table_header, theme.bot_bubble);
        assert_ne!(theme.table_header, theme.surface);
    }

    #[test]
    fn test_apply_sets_panel_fill() {
        let theme = Theme::default();
        let ctx = egui::Context::default();
        theme.apply(&ctx);
        assert_eq!(ctx.style().visuals.panel_fill, theme.bg_primary);
    }
}
