use super::style;
use eframe::egui::{self, Align2, Area, Color32, Frame, Id, Order, RichText, Spinner, Stroke};

/// Dim the window and block input while an analysis is in flight.
pub(super) fn render_loading_overlay(ctx: &egui::Context) {
    modal_backdrop(
        ctx,
        Id::new("loading_overlay_backdrop"),
        Color32::from_rgba_premultiplied(0, 0, 0, 160),
    );
    let palette = style::palette();
    Area::new(Id::new("loading_overlay_panel"))
        .order(Order::Tooltip)
        .constrain(true)
        .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            Frame::window(&ctx.style())
                .fill(style::compartment_fill())
                .stroke(Stroke::new(1.0, palette.panel_outline))
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add(Spinner::new().size(36.0).color(palette.accent));
                        ui.add_space(10.0);
                        ui.heading(
                            RichText::new("Analyzing X-Ray Image").color(palette.text_primary),
                        );
                        ui.label(
                            RichText::new("Generating predictions and visualizations...")
                                .color(palette.text_muted),
                        );
                    });
                });
        });
}

fn modal_backdrop(ctx: &egui::Context, id: Id, color: Color32) {
    let rect = ctx.viewport_rect();
    let painter = ctx.layer_painter(egui::LayerId::new(Order::Tooltip, id.with("paint")));
    painter.rect_filled(rect, 0.0, color);
    Area::new(id.with("blocker"))
        .order(Order::Tooltip)
        .fixed_pos(rect.min)
        .show(ctx, |ui| {
            ui.allocate_rect(rect, egui::Sense::click_and_drag());
        });
}
