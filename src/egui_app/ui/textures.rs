//! GPU textures for the preview, original, and heatmap images.
//!
//! Handles are keyed by submission generation; a generation change drops
//! every handle, which frees the textures on the next frame.

use std::collections::HashMap;

use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};

#[derive(Default)]
pub(super) struct TextureCache {
    generation: u64,
    preview: Option<TextureHandle>,
    original: Option<TextureHandle>,
    heatmaps: HashMap<String, TextureHandle>,
}

impl TextureCache {
    /// Release everything if the cache belongs to an older submission.
    pub(super) fn sync(&mut self, generation: u64) {
        if self.generation == generation {
            return;
        }
        if !self.is_empty() {
            tracing::debug!(
                from = self.generation,
                to = generation,
                "Releasing image textures"
            );
        }
        self.generation = generation;
        self.preview = None;
        self.original = None;
        self.heatmaps.clear();
    }

    pub(super) fn is_empty(&self) -> bool {
        self.preview.is_none() && self.original.is_none() && self.heatmaps.is_empty()
    }

    pub(super) fn preview(&mut self, ctx: &egui::Context, image: &ColorImage) -> TextureHandle {
        self.preview
            .get_or_insert_with(|| load(ctx, "xray_preview", image))
            .clone()
    }

    pub(super) fn original(&mut self, ctx: &egui::Context, image: &ColorImage) -> TextureHandle {
        self.original
            .get_or_insert_with(|| load(ctx, "xray_original", image))
            .clone()
    }

    pub(super) fn heatmap(
        &mut self,
        ctx: &egui::Context,
        disease: &str,
        image: &ColorImage,
    ) -> TextureHandle {
        self.heatmaps
            .entry(disease.to_string())
            .or_insert_with(|| load(ctx, &format!("xray_heatmap_{disease}"), image))
            .clone()
    }
}

fn load(ctx: &egui::Context, name: &str, image: &ColorImage) -> TextureHandle {
    ctx.load_texture(name, image.clone(), TextureOptions::LINEAR)
}
