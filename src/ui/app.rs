//! eframe integration
//!
//! `ChatApp` advances the screen's timers once per frame, renders it and
//! asks for the next frame only when a timer is due.

use crate::ui::components::{Header, InputBar, MessageList};
use crate::ui::state::ChatScreen;
use crate::ui::theme::Theme;
use egui::{CentralPanel, TopBottomPanel};
use std::time::Instant;
use tracing::info;

pub struct ChatApp {
    screen: ChatScreen,
    theme: Theme,
}

impl ChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>, screen: ChatScreen) -> Self {
        let theme = Theme::for_config(screen.config());
        theme.apply(&cc.egui_ctx);
        Self::with_theme(screen, theme)
    }

    /// Build without an eframe context (tests and embedding)
    pub fn with_theme(screen: ChatScreen, theme: Theme) -> Self {
        Self { screen, theme }
    }

    pub fn screen(&self) -> &ChatScreen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut ChatScreen {
        &mut self.screen
    }

    /// Advance timers and draw one frame
    pub fn frame(&mut self, ctx: &egui::Context, now: Instant) {
        self.screen.update(now);

        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                Header::new(&self.screen.config().title, &self.theme).show(ui);
            });

        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                InputBar::new(&mut self.screen, &self.theme, now).show(ui);
            });

        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(egui::Margin::symmetric(self.theme.spacing, 0.0)),
            )
            .show(ctx, |ui| {
                MessageList::new(&mut self.screen, &self.theme, now).show(ui);
            });

        if let Some(due) = self.screen.next_repaint() {
            ctx.request_repaint_after(due.saturating_duration_since(Instant::now()));
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.frame(ctx, Instant::now());
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!(
            "[CHAT] Shutting down with {} message(s)",
            self.screen.storage().len()
        );
    }
}
