use crate::ui::theme::Theme;
use egui::RichText;

/// Title bar with a menu glyph on the left
pub struct Header<'a> {
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str, theme: &'a Theme) -> Self {
        Self { title, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("☰").size(20.0).color(self.theme.text_primary));
            ui.with_layout(
                egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                |ui| {
                    let response = ui.label(
                        RichText::new(self.title)
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, self.title)
                    });
                },
            );
        });
    }
}
