use eframe::egui::{self, Frame, Margin, RichText, Sense, Stroke, TextureHandle};

use super::style;
use super::textures::TextureCache;
use crate::egui_app::state::{AnalysisResults, ResultsViewState};
use crate::egui_app::view_model::{self, PredictionCardView, ProbabilityRowView};

const CARD_WIDTH: f32 = 200.0;
const BAR_HEIGHT: f32 = 8.0;
const LEGEND_SEGMENTS: usize = 48;
const DISCLAIMER: &str = "This is an AI-assisted tool for educational purposes. \
Always consult with qualified medical professionals for proper diagnosis and treatment.";

/// User input collected while drawing the results; applied after the frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum ResultsAction {
    Select(String),
    ToggleAllPredictions,
    Reset,
}

pub(super) fn render_results(
    ui: &mut egui::Ui,
    results: &AnalysisResults,
    view: &ResultsViewState,
    display: Option<&str>,
    textures: &mut TextureCache,
) -> Option<ResultsAction> {
    let mut action = None;
    let response = &results.response;

    render_header(ui, &results.source_name, &mut action);
    ui.add_space(12.0);

    let cards = view_model::prediction_cards(response, display);
    render_summary(ui, &cards, response.threshold(), &mut action);

    if let Some(rows) = view_model::all_prediction_rows(response) {
        ui.add_space(8.0);
        render_all_predictions(ui, &rows, view.show_all_predictions, &mut action);
    }

    if let Some(disease) = display {
        ui.add_space(16.0);
        render_image_pair(ui, results, disease, textures);
        if cards.len() > 1 {
            ui.add_space(10.0);
            render_selector(ui, &cards, &mut action);
        }
    }

    ui.add_space(16.0);
    render_disclaimer(ui);
    action
}

fn render_header(ui: &mut egui::Ui, source_name: &str, action: &mut Option<ResultsAction>) {
    let palette = style::palette();
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.heading(RichText::new("Analysis Results").strong());
            ui.label(RichText::new(source_name).color(palette.text_muted));
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("⟲ New Analysis").clicked() {
                *action = Some(ResultsAction::Reset);
            }
        });
    });
}

fn render_summary(
    ui: &mut egui::Ui,
    cards: &[PredictionCardView],
    threshold: f64,
    action: &mut Option<ResultsAction>,
) {
    let palette = style::palette();
    ui.horizontal(|ui| {
        ui.label(RichText::new("Detected Conditions").strong().size(16.0));
        Frame::new()
            .fill(palette.accent_soft)
            .corner_radius(4.0)
            .inner_margin(Margin::symmetric(6, 2))
            .show(ui, |ui| {
                ui.label(RichText::new(view_model::threshold_badge(threshold)).small());
            })
            .response
            .on_hover_text("Confidence threshold used by the model");
    });
    ui.add_space(6.0);
    if cards.is_empty() {
        ui.label(RichText::new("No conditions above threshold").color(palette.text_muted));
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for card in cards {
            if render_card(ui, card).clicked() {
                *action = Some(ResultsAction::Select(card.disease.clone()));
            }
        }
    });
}

fn render_card(ui: &mut egui::Ui, card: &PredictionCardView) -> egui::Response {
    let palette = style::palette();
    let (fill, stroke) = if card.selected {
        (style::selected_card_fill(), Stroke::new(1.5, palette.accent))
    } else {
        (style::compartment_fill(), style::section_stroke())
    };
    let response = Frame::new()
        .fill(fill)
        .stroke(stroke)
        .corner_radius(6.0)
        .inner_margin(Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.horizontal(|ui| {
                ui.label(RichText::new(&card.disease).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(&card.label).color(palette.text_primary));
                });
            });
            ui.add_space(4.0);
            confidence_bar(ui, card.fraction, CARD_WIDTH);
        })
        .response
        .interact(Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    if card.has_heatmap {
        response
    } else {
        response.on_hover_text("No heatmap returned for this condition")
    }
}

fn render_all_predictions(
    ui: &mut egui::Ui,
    rows: &[ProbabilityRowView],
    expanded: bool,
    action: &mut Option<ResultsAction>,
) {
    let label = view_model::all_predictions_toggle_label(expanded, rows.len());
    if ui.button(label).clicked() {
        *action = Some(ResultsAction::ToggleAllPredictions);
    }
    if !expanded {
        return;
    }
    let palette = style::palette();
    ui.add_space(4.0);
    egui::Grid::new("all_predictions_grid")
        .num_columns(3)
        .spacing(egui::vec2(12.0, 4.0))
        .striped(true)
        .show(ui, |ui| {
            for row in rows {
                let name = if row.predicted {
                    RichText::new(&row.disease).strong()
                } else {
                    RichText::new(&row.disease).color(palette.text_muted)
                };
                ui.label(name);
                confidence_bar(ui, row.fraction, CARD_WIDTH);
                ui.label(&row.label);
                ui.end_row();
            }
        });
}

fn render_image_pair(
    ui: &mut egui::Ui,
    results: &AnalysisResults,
    disease: &str,
    textures: &mut TextureCache,
) {
    let palette = style::palette();
    ui.label(
        RichText::new(format!("Grad-CAM Visualization - {disease}"))
            .strong()
            .size(16.0),
    );
    ui.add_space(6.0);
    let ctx = ui.ctx().clone();
    let original = results
        .images
        .original
        .as_ref()
        .map(|image| textures.original(&ctx, image));
    let heatmap = results
        .images
        .heatmaps
        .get(disease)
        .map(|image| textures.heatmap(&ctx, disease, image));
    let confidence = results
        .response
        .predictions
        .get(disease)
        .map(view_model::percent_label)
        .unwrap_or_default();

    ui.columns(2, |columns| {
        let side = columns[0].available_width();
        columns[0].vertical(|ui| {
            ui.label(RichText::new("Original X-Ray").strong());
            image_or_placeholder(ui, original.as_ref(), side, "Original image unavailable");
        });
        columns[1].vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Grad-CAM Heatmap").strong());
                ui.label(
                    RichText::new(format!("Confidence: {confidence}")).color(palette.text_muted),
                );
            });
            image_or_placeholder(
                ui,
                heatmap.as_ref(),
                side,
                &view_model::missing_heatmap_label(disease),
            );
            if heatmap.is_some() {
                ui.add_space(4.0);
                attention_legend(ui, side);
            }
        });
    });
}

fn image_or_placeholder(
    ui: &mut egui::Ui,
    texture: Option<&TextureHandle>,
    side: f32,
    placeholder: &str,
) {
    match texture {
        Some(texture) => {
            ui.add(
                egui::Image::new(texture)
                    .max_size(egui::vec2(side, side))
                    .maintain_aspect_ratio(true),
            );
        }
        None => {
            let palette = style::palette();
            Frame::new()
                .fill(palette.bg_primary)
                .stroke(style::section_stroke())
                .corner_radius(4.0)
                .show(ui, |ui| {
                    ui.set_min_size(egui::vec2(side, side * 0.75));
                    ui.centered_and_justified(|ui| {
                        ui.label(RichText::new(placeholder).color(palette.text_muted));
                    });
                });
        }
    }
}

fn attention_legend(ui: &mut egui::Ui, width: f32) {
    let palette = style::palette();
    ui.horizontal(|ui| {
        ui.label(RichText::new("Low attention").small().color(palette.text_muted));
        let bar_width = (width - 180.0).max(60.0);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(bar_width, 10.0), Sense::hover());
        let step = rect.width() / LEGEND_SEGMENTS as f32;
        for index in 0..LEGEND_SEGMENTS {
            let t = index as f32 / (LEGEND_SEGMENTS - 1) as f32;
            let x = rect.left() + step * index as f32;
            let segment = egui::Rect::from_min_max(
                egui::pos2(x, rect.top()),
                egui::pos2(x + step + 0.5, rect.bottom()),
            );
            ui.painter()
                .rect_filled(segment, 0.0, style::attention_color(t));
        }
        ui.label(RichText::new("High attention").small().color(palette.text_muted));
    });
}

fn render_selector(
    ui: &mut egui::Ui,
    cards: &[PredictionCardView],
    action: &mut Option<ResultsAction>,
) {
    let palette = style::palette();
    ui.label(RichText::new("Select condition to view:").color(palette.text_muted));
    ui.horizontal_wrapped(|ui| {
        for card in cards {
            if ui.selectable_label(card.selected, &card.disease).clicked() {
                *action = Some(ResultsAction::Select(card.disease.clone()));
            }
        }
    });
}

fn render_disclaimer(ui: &mut egui::Ui) {
    let palette = style::palette();
    Frame::new()
        .fill(palette.accent_soft)
        .corner_radius(6.0)
        .inner_margin(Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new("ℹ Note:").strong());
                ui.label(DISCLAIMER);
            });
        });
}

fn confidence_bar(ui: &mut egui::Ui, fraction: f32, width: f32) {
    let palette = style::palette();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, BAR_HEIGHT), Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, 3.0, palette.bg_primary);
    let mut filled = rect;
    filled.set_width(rect.width() * fraction.clamp(0.0, 1.0));
    if filled.width() > 0.0 {
        painter.rect_filled(filled, 3.0, style::confidence_color(fraction));
    }
}
