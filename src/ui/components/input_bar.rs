//! Composer, recording controls and send button

use super::audio_message::AudioMessageView;
use crate::ui::state::ChatScreen;
use crate::ui::theme::Theme;
use crate::utils::format_mmss;
use egui::{Key, RichText, Vec2};
use std::time::Instant;
use tracing::debug;

/// Width kept free on the right for the controls
const CONTROLS_WIDTH: f32 = 132.0;

pub struct InputBar<'a> {
    screen: &'a mut ChatScreen,
    theme: &'a Theme,
    now: Instant,
}

impl<'a> InputBar<'a> {
    pub fn new(screen: &'a mut ChatScreen, theme: &'a Theme, now: Instant) -> Self {
        Self { screen, theme, now }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        self.show_banners(ui);

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let left_width = (ui.available_width() - CONTROLS_WIDTH).max(120.0);
                    ui.allocate_ui(Vec2::new(left_width, 40.0), |ui| {
                        if self.screen.recording().pending_path().is_some() {
                            self.show_pending(ui);
                        } else {
                            self.show_composer(ui, left_width);
                        }
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        self.show_send_button(ui);
                        self.show_record_controls(ui);
                    });
                });
            });
    }

    fn show_banners(&mut self, ui: &mut egui::Ui) {
        if let Some(err) = self.screen.permission_error() {
            let response = ui.label(
                RichText::new(err.user_message())
                    .size(12.0)
                    .color(self.theme.warning),
            );
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, "Permission warning")
            });
        }

        let mut dismiss = false;
        if let Some(err) = self.screen.recorder_error() {
            ui.horizontal(|ui| {
                let response = ui.label(
                    RichText::new(err.user_message())
                        .size(12.0)
                        .color(self.theme.error),
                );
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, "Recorder error")
                });

                let close = ui.small_button("✕");
                close.widget_info(|| {
                    egui::WidgetInfo::labeled(
                        egui::WidgetType::Button,
                        true,
                        "Dismiss recorder error",
                    )
                });
                dismiss = close.clicked();
            });
        }
        if dismiss {
            self.screen.clear_recorder_error();
        }
    }

    fn show_pending(&mut self, ui: &mut egui::Ui) {
        let mut discard = false;

        ui.horizontal(|ui| {
            let trash = ui.add(
                egui::Button::new(RichText::new("🗑").size(18.0).color(self.theme.text_secondary))
                    .frame(false),
            );
            trash.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Discard recording")
            });
            discard = trash.clicked();

            if let Some(preview) = self.screen.preview_player_mut() {
                AudioMessageView::new(preview, self.theme, "recording preview", self.now).show(ui);
            }
        });

        if discard {
            if let Err(e) = self.screen.discard_pending() {
                debug!("[CHAT] Discard ignored: {}", e);
            }
        }
    }

    fn show_composer(&mut self, ui: &mut egui::Ui, width: f32) {
        let text_edit = egui::TextEdit::singleline(self.screen.draft_mut())
            .hint_text("Ask Anything...")
            .desired_width(width)
            .font(egui::TextStyle::Body)
            .margin(egui::Margin::symmetric(10.0, 8.0))
            .id(egui::Id::new("message_input"));

        let response = ui.add(text_edit);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Message input")
        });

        // Single-line edits give up focus on Enter
        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            self.screen.send_message();
            response.request_focus();
        }
    }

    fn show_record_controls(&mut self, ui: &mut egui::Ui) {
        let recording = self.screen.recording();

        if recording.is_recording() {
            let elapsed = format_mmss(recording.elapsed_secs() as f64);
            let label = format!("Recording time: {}", elapsed);

            let stop = ui.add(
                egui::Button::new(RichText::new("⏹").size(20.0).color(self.theme.recording))
                    .min_size(Vec2::splat(36.0))
                    .rounding(self.theme.button_rounding),
            );
            stop.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Stop recording")
            });

            let timer = ui.label(
                RichText::new(elapsed)
                    .family(egui::FontFamily::Monospace)
                    .color(self.theme.recording),
            );
            timer.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
            });

            if stop.clicked() {
                // Failures land in the recorder error slot
                let _ = self.screen.stop_recording();
            }
        } else if recording.is_idle() {
            let mic = ui.add(
                egui::Button::new(RichText::new("🎤").size(20.0).color(self.theme.text_secondary))
                    .min_size(Vec2::splat(36.0))
                    .rounding(self.theme.button_rounding),
            );
            mic.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Start recording")
            });

            if mic.clicked() {
                let _ = self.screen.start_recording(self.now);
            }
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.screen.recording().is_recording();
        let fill = if enabled && self.screen.can_send() {
            self.theme.primary
        } else {
            self.theme.text_muted
        };

        let button = egui::Button::new(RichText::new("↑").size(18.0).color(egui::Color32::WHITE))
            .min_size(Vec2::splat(36.0))
            .rounding(self.theme.button_rounding)
            .fill(fill);
        let response = ui.add_enabled(enabled, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, "Send message")
        });

        if response.clicked() {
            self.screen.send_message();
        }
    }
}
