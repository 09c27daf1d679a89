use eframe::egui::{self, Frame, Margin, RichText, Stroke};

use super::style;

/// Render the failure message. Returns true when "Try Again" was clicked.
pub(super) fn render_error_panel(ui: &mut egui::Ui, message: &str) -> bool {
    let palette = style::palette();
    let mut retry = false;
    Frame::new()
        .fill(style::compartment_fill())
        .stroke(Stroke::new(1.0, palette.danger))
        .corner_radius(8.0)
        .inner_margin(Margin::same(24))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("⚠").size(32.0).color(palette.danger));
                ui.heading(RichText::new("An Error Occurred").color(palette.text_primary));
                ui.add_space(6.0);
                ui.label(RichText::new(message).color(palette.text_muted));
                ui.add_space(12.0);
                retry = ui.button("Try Again").clicked();
            });
        });
    retry
}
