use eframe::egui::{self, DroppedFile};

use super::EguiApp;

/// Where the bytes of a dropped file can be found.
#[derive(Debug, PartialEq)]
pub(super) enum DropSource<'a> {
    Path(&'a std::path::Path),
    Bytes {
        name: &'a str,
        media_type: Option<&'a str>,
        bytes: &'a [u8],
    },
}

/// Only the first dropped file is analyzed.
pub(super) fn first_drop_source(files: &[DroppedFile]) -> Option<DropSource<'_>> {
    let file = files.first()?;
    if let Some(path) = file.path.as_deref() {
        return Some(DropSource::Path(path));
    }
    let bytes = file.bytes.as_deref()?;
    let media_type = (!file.mime.is_empty()).then_some(file.mime.as_str());
    Some(DropSource::Bytes {
        name: &file.name,
        media_type,
        bytes,
    })
}

impl EguiApp {
    pub(super) fn handle_file_drops(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) =
            ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));
        self.controller.ui.upload.drag_active = hovering && self.controller.can_submit();
        if dropped.is_empty() {
            return;
        }
        if dropped.len() > 1 {
            tracing::debug!(count = dropped.len(), "Multiple files dropped; using the first");
        }
        if !self.controller.can_submit() {
            tracing::debug!("Ignoring dropped file outside Idle");
            return;
        }
        match first_drop_source(&dropped) {
            Some(DropSource::Path(path)) => {
                self.controller.submit_path(path);
            }
            Some(DropSource::Bytes {
                name,
                media_type,
                bytes,
            }) => {
                self.controller.submit_bytes(name, media_type, bytes);
            }
            None => tracing::warn!("Dropped file had neither a path nor contents"),
        }
    }
}
