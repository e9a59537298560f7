//! Conversation view
//!
//! Shows the greeting card while the conversation is empty, otherwise every
//! message in insertion order: mine on the right, the other side's on the left.

use super::audio_message::AudioMessageView;
use crate::messages::{Message, MessageContent};
use crate::ui::state::ChatScreen;
use crate::ui::theme::Theme;
use egui::{Align, RichText};
use std::time::Instant;

pub struct MessageList<'a> {
    screen: &'a mut ChatScreen,
    theme: &'a Theme,
    now: Instant,
}

impl<'a> MessageList<'a> {
    pub fn new(screen: &'a mut ChatScreen, theme: &'a Theme, now: Instant) -> Self {
        Self { screen, theme, now }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let messages = self.screen.messages();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);

                if messages.is_empty() {
                    self.show_greeting(ui);
                } else {
                    let mut voice_index = 0;
                    for message in &messages {
                        if matches!(message.content, MessageContent::Audio { .. }) {
                            voice_index += 1;
                        }
                        // Keyed by message id so widget state survives appends
                        ui.push_id(message.id, |ui| {
                            self.show_message(ui, message, voice_index);
                        });
                        ui.add_space(self.theme.spacing_sm);
                    }
                }

                ui.add_space(self.theme.spacing);
            });
    }

    fn show_greeting(&self, ui: &mut egui::Ui) {
        let config = self.screen.config();

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                let response = ui.label(
                    RichText::new(&config.greeting)
                        .size(15.0)
                        .color(self.theme.text_primary),
                );
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, "Greeting")
                });

                ui.add_space(self.theme.spacing_sm);

                ui.horizontal_wrapped(|ui| {
                    for reply in &config.quick_replies {
                        let chip = egui::Button::new(
                            RichText::new(reply).size(13.0).color(self.theme.primary),
                        )
                        .stroke(egui::Stroke::new(1.0, self.theme.chip))
                        .fill(self.theme.bg_primary)
                        .rounding(self.theme.button_rounding);
                        let response = ui.add(chip);
                        let label = format!("Quick reply: {}", reply);
                        response.widget_info(|| {
                            egui::WidgetInfo::labeled(egui::WidgetType::Button, true, &label)
                        });
                    }
                });
            });
    }

    fn show_message(&mut self, ui: &mut egui::Ui, message: &Message, voice_index: usize) {
        let mine = message.is_mine();
        let align = if mine { Align::RIGHT } else { Align::LEFT };
        let fill = if mine {
            self.theme.my_bubble
        } else {
            self.theme.other_bubble
        };
        let text_color = self.theme.bubble_text(mine);

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(fill)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);

                    match &message.content {
                        MessageContent::Text(text) => {
                            let response = ui.label(RichText::new(text).color(text_color));
                            let label = format!(
                                "Message from {}: {}",
                                if mine { "me" } else { "them" },
                                text
                            );
                            response.widget_info(|| {
                                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
                            });
                        }
                        MessageContent::Audio { .. } => {
                            let name = format!("voice message {}", voice_index);
                            match self.screen.player_mut(message.id) {
                                Some(player) => {
                                    AudioMessageView::new(player, self.theme, &name, self.now)
                                        .text_color(text_color)
                                        .show(ui);
                                }
                                None => {
                                    ui.label(
                                        RichText::new("Voice message unavailable")
                                            .color(self.theme.error),
                                    );
                                }
                            }
                        }
                    }
                });

            ui.label(
                RichText::new(message.local_time())
                    .size(10.0)
                    .color(self.theme.text_muted),
            );
        });
    }
}
