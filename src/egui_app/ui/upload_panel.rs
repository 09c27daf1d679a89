use eframe::egui::{self, Frame, Margin, RichText, Sense};

use super::style;
use super::textures::TextureCache;
use crate::egui_app::state::UploadState;

const DROP_ZONE_HEIGHT: f32 = 320.0;
const PREVIEW_MAX_SIDE: f32 = 280.0;

/// Render the drop zone. Returns true when the user clicked to browse.
pub(super) fn render_upload_panel(
    ui: &mut egui::Ui,
    upload: &UploadState,
    enabled: bool,
    textures: &mut TextureCache,
) -> bool {
    let palette = style::palette();
    let frame = Frame::new()
        .fill(if upload.drag_active {
            style::selected_card_fill()
        } else {
            style::compartment_fill()
        })
        .stroke(style::drop_zone_stroke(upload.drag_active))
        .corner_radius(8.0)
        .inner_margin(Margin::same(24));
    let response = frame
        .show(ui, |ui| {
            ui.set_min_size(egui::vec2(ui.available_width(), DROP_ZONE_HEIGHT));
            ui.vertical_centered(|ui| match upload.preview.as_ref() {
                Some(preview) => {
                    let texture = textures.preview(ui.ctx(), &preview.image);
                    ui.add(
                        egui::Image::new(&texture)
                            .max_size(egui::vec2(PREVIEW_MAX_SIDE, PREVIEW_MAX_SIDE))
                            .maintain_aspect_ratio(true),
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(&preview.name).color(palette.text_muted));
                }
                None => {
                    ui.add_space(DROP_ZONE_HEIGHT / 3.0);
                    ui.label(RichText::new("⬆").size(36.0).color(palette.accent));
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new("Click to upload or drag and drop")
                            .strong()
                            .size(16.0),
                    );
                    ui.label(
                        RichText::new("PNG, JPG (recommended: chest X-ray images)")
                            .color(palette.text_muted),
                    );
                }
            });
        })
        .response
        .interact(if enabled { Sense::click() } else { Sense::hover() });

    if let Some(rejection) = upload.rejection.as_deref() {
        ui.add_space(8.0);
        ui.colored_label(palette.warning, rejection);
    }
    if upload.preview.is_none() {
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(
                    "Upload a chest X-ray image to receive disease predictions and visualization",
                )
                .color(palette.text_muted),
            );
        });
    }

    let response = if enabled {
        response.on_hover_cursor(egui::CursorIcon::PointingHand)
    } else {
        response
    };
    enabled && response.clicked()
}
