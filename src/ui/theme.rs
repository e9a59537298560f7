//! Colors, spacing and text styles for the chat screen

use crate::config::ChatConfig;
use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

#[derive(Clone, Debug)]
pub struct Theme {
    /// Accent for the send button and highlights
    pub primary: Color32,
    pub error: Color32,
    pub warning: Color32,

    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Bubble fill for messages sent from this device
    pub my_bubble: Color32,
    /// Bubble fill for messages from the other side
    pub other_bubble: Color32,
    /// Quick-reply chip outline
    pub chip: Color32,

    /// Mic/stop indicator while recording
    pub recording: Color32,

    /// Waveform bars already played
    pub waveform_active: Color32,
    /// Waveform bars not yet played
    pub waveform_inactive: Color32,

    pub button_rounding: Rounding,
    pub card_rounding: Rounding,
    pub bubble_rounding: Rounding,

    pub spacing: f32,
    pub spacing_lg: f32,
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(37, 99, 235),
            error: Color32::from_rgb(220, 38, 38),
            warning: Color32::from_rgb(202, 138, 4),

            bg_primary: Color32::from_rgb(255, 255, 255),
            bg_secondary: Color32::from_rgb(243, 244, 246),
            bg_tertiary: Color32::from_rgb(229, 231, 235),

            text_primary: Color32::from_rgb(17, 24, 39),
            text_secondary: Color32::from_rgb(55, 65, 81),
            text_muted: Color32::from_rgb(107, 114, 128),

            my_bubble: Color32::from_rgb(37, 99, 235),
            other_bubble: Color32::from_rgb(243, 244, 246),
            chip: Color32::from_rgb(147, 197, 253),

            recording: Color32::from_rgb(220, 38, 38),

            waveform_active: Color32::from_rgb(37, 99, 235),
            waveform_inactive: Color32::from_rgb(156, 163, 175),

            button_rounding: Rounding::same(20.0),
            card_rounding: Rounding::same(12.0),
            bubble_rounding: Rounding::same(14.0),

            spacing: 12.0,
            spacing_lg: 24.0,
            spacing_sm: 6.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(99, 102, 241),
            error: Color32::from_rgb(239, 68, 68),
            warning: Color32::from_rgb(234, 179, 8),

            bg_primary: Color32::from_rgb(17, 24, 39),
            bg_secondary: Color32::from_rgb(31, 41, 55),
            bg_tertiary: Color32::from_rgb(55, 65, 81),

            text_primary: Color32::from_rgb(249, 250, 251),
            text_secondary: Color32::from_rgb(209, 213, 219),
            text_muted: Color32::from_rgb(156, 163, 175),

            my_bubble: Color32::from_rgb(79, 70, 229),
            other_bubble: Color32::from_rgb(31, 41, 55),
            chip: Color32::from_rgb(99, 102, 241),

            recording: Color32::from_rgb(239, 68, 68),

            waveform_active: Color32::from_rgb(165, 180, 252),
            waveform_inactive: Color32::from_rgb(75, 85, 99),

            button_rounding: Rounding::same(20.0),
            card_rounding: Rounding::same(12.0),
            bubble_rounding: Rounding::same(14.0),

            spacing: 12.0,
            spacing_lg: 24.0,
            spacing_sm: 6.0,
        }
    }

    /// The theme the configuration asks for
    pub fn for_config(config: &ChatConfig) -> Self {
        if config.dark_theme {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Text color on top of a bubble fill
    pub fn bubble_text(&self, mine: bool) -> Color32 {
        if mine {
            Color32::WHITE
        } else {
            self.text_primary
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = if self.bg_primary.r() > 128 {
            Visuals::light()
        } else {
            Visuals::dark()
        };

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_secondary;

        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_muted);

        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.8);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.primary;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);

        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.bg_tertiary);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(20.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            FontId::new(13.0, FontFamily::Monospace),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(11.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }
}
