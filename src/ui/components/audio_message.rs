//! Voice message player widget

use super::waveform::Waveform;
use crate::session::{AudioMessage, LoadState, Variant};
use crate::ui::theme::Theme;
use egui::{Color32, RichText, Vec2};
use std::time::Instant;
use tracing::debug;

/// Play/pause button, static waveform and remaining-time countdown
///
/// `name` identifies the message for accessibility, e.g. "voice message 2".
pub struct AudioMessageView<'a> {
    player: &'a mut AudioMessage,
    theme: &'a Theme,
    name: &'a str,
    text_color: Color32,
    now: Instant,
}

impl<'a> AudioMessageView<'a> {
    pub fn new(player: &'a mut AudioMessage, theme: &'a Theme, name: &'a str, now: Instant) -> Self {
        Self {
            player,
            theme,
            name,
            text_color: theme.text_primary,
            now,
        }
    }

    pub fn text_color(mut self, color: Color32) -> Self {
        self.text_color = color;
        self
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let fraction = match self.player.variant() {
            Variant::Preview => 0.65,
            Variant::Sent => 0.6,
        };
        let width = (ui.ctx().screen_rect().width() * fraction).max(160.0);

        ui.horizontal(|ui| {
            ui.set_max_width(width);

            if let LoadState::Failed(err) = self.player.load_state() {
                let text = format!("Could not load {}", self.name);
                debug!("[PLAYBACK] Rendering load failure: {}", err);
                let response = ui.label(RichText::new("⚠").color(self.theme.error));
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &text)
                });
                ui.label(
                    RichText::new(err.user_message())
                        .size(12.0)
                        .color(self.theme.error),
                );
                return;
            }

            self.show_play_button(ui);

            let countdown = self.player.countdown();
            let timer_width = 44.0;
            let wave_width = (ui.available_width() - timer_width).max(40.0);
            Waveform::new(self.player.waveform(), self.theme)
                .progress(self.player.progress())
                .width(wave_width)
                .show(ui);

            let label = format!("Time left for {}: {}", self.name, countdown);
            let response = ui.label(
                RichText::new(countdown)
                    .size(12.0)
                    .family(egui::FontFamily::Monospace)
                    .color(self.text_color),
            );
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
            });
        });

        if let Some(err) = self.player.playback_error() {
            ui.label(
                RichText::new(err.user_message())
                    .size(11.0)
                    .color(self.theme.error),
            );
        }
    }

    fn show_play_button(&mut self, ui: &mut egui::Ui) {
        let playing = self.player.is_playing();
        let enabled = self.player.is_loaded();
        let (icon, verb) = if playing {
            ("⏸", "Pause")
        } else {
            ("▶", "Play")
        };

        let button = egui::Button::new(RichText::new(icon).size(16.0).color(self.text_color))
            .min_size(Vec2::splat(32.0))
            .rounding(self.theme.button_rounding);
        let response = ui.add_enabled(enabled, button);

        let label = format!("{} {}", verb, self.name);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, &label)
        });

        if response.clicked() {
            // The player keeps the error for rendering
            let _ = self.player.toggle_play(self.now);
        }
    }
}
