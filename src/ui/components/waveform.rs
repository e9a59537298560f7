//! Static waveform for a voice message
//!
//! Bars come from the file's peaks; the played portion is drawn in the
//! active color.

use crate::ui::theme::Theme;
use egui::{Pos2, Rect, Stroke, Vec2};

const HEIGHT: f32 = 28.0;

pub struct Waveform<'a> {
    peaks: &'a [f32],
    theme: &'a Theme,
    progress: f32,
    width: Option<f32>,
}

impl<'a> Waveform<'a> {
    pub fn new(peaks: &'a [f32], theme: &'a Theme) -> Self {
        Self {
            peaks,
            theme,
            progress: 0.0,
            width: None,
        }
    }

    /// Fraction already played, 0.0 to 1.0
    pub fn progress(mut self, progress: f32) -> Self {
        self.progress = progress.clamp(0.0, 1.0);
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let width = self.width.unwrap_or_else(|| ui.available_width());
        let (rect, response) =
            ui.allocate_exact_size(Vec2::new(width, HEIGHT), egui::Sense::hover());

        if ui.is_rect_visible(rect) {
            if self.peaks.is_empty() {
                let center_y = rect.center().y;
                ui.painter().line_segment(
                    [
                        Pos2::new(rect.left(), center_y),
                        Pos2::new(rect.right(), center_y),
                    ],
                    Stroke::new(1.0, self.theme.waveform_inactive),
                );
            } else {
                self.draw_bars(ui, rect);
            }
        }

        response
    }

    fn draw_bars(&self, ui: &egui::Ui, rect: Rect) {
        let painter = ui.painter();
        let bar_count = self.peaks.len();
        let bar_width = rect.width() / bar_count as f32;
        let gap = (bar_width * 0.3).min(2.0);
        let center_y = rect.center().y;
        let played = (self.progress * bar_count as f32).round() as usize;

        for (i, peak) in self.peaks.iter().enumerate() {
            let bar_height = (peak * rect.height()).clamp(2.0, rect.height());
            let x = rect.left() + i as f32 * bar_width + bar_width / 2.0;
            let bar = Rect::from_center_size(
                Pos2::new(x, center_y),
                Vec2::new((bar_width - gap).max(1.0), bar_height),
            );
            let color = if i < played {
                self.theme.waveform_active
            } else {
                self.theme.waveform_inactive
            };
            painter.rect_filled(bar, 1.0, color);
        }
    }
}
