use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub accent_soft: Color32,
    pub warning: Color32,
    pub danger: Color32,
    pub success: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(12, 16, 22),
        bg_secondary: Color32::from_rgb(22, 28, 36),
        bg_tertiary: Color32::from_rgb(36, 44, 56),
        panel_outline: Color32::from_rgb(48, 58, 72),
        text_primary: Color32::from_rgb(214, 222, 232),
        text_muted: Color32::from_rgb(140, 152, 168),
        accent: Color32::from_rgb(76, 154, 255),
        accent_soft: Color32::from_rgb(34, 64, 104),
        warning: Color32::from_rgb(222, 160, 62),
        danger: Color32::from_rgb(214, 84, 72),
        success: Color32::from_rgb(96, 184, 132),
    }
}

/// Tone of the footer status badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

pub fn status_badge(tone: StatusTone) -> (&'static str, Color32) {
    match tone {
        StatusTone::Idle => ("Idle", Color32::from_rgb(42, 42, 42)),
        StatusTone::Busy => ("Busy", Color32::from_rgb(31, 139, 255)),
        StatusTone::Info => ("Info", Color32::from_rgb(64, 140, 112)),
        StatusTone::Warning => ("Warning", Color32::from_rgb(192, 138, 43)),
        StatusTone::Error => ("Error", Color32::from_rgb(192, 57, 43)),
    }
}

pub fn status_badge_color(tone: StatusTone) -> Color32 {
    status_badge(tone).1
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent;
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = palette.danger;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.accent_soft;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_widget(&mut visuals.widgets.inactive, palette);
    set_widget(&mut visuals.widgets.hovered, palette);
    set_widget(&mut visuals.widgets.active, palette);
    set_widget(&mut visuals.widgets.open, palette);
    visuals.window_corner_radius = CornerRadius::same(6);
    visuals.menu_corner_radius = CornerRadius::same(4);
    visuals.popup_shadow = Shadow::NONE;
    visuals.button_frame = true;
}

fn set_widget(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::same(4);
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.bg_tertiary;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

pub fn section_stroke() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}

pub fn compartment_fill() -> Color32 {
    palette().bg_tertiary
}

/// Drop zone outline, highlighted while files hover over the window.
pub fn drop_zone_stroke(drag_active: bool) -> Stroke {
    let palette = palette();
    if drag_active {
        Stroke::new(2.0, palette.accent)
    } else {
        Stroke::new(2.0, palette.panel_outline)
    }
}

pub fn selected_card_fill() -> Color32 {
    palette().accent_soft
}

/// Bar color ramps from amber at low confidence to red at high confidence.
pub fn confidence_color(fraction: f32) -> Color32 {
    let palette = palette();
    let t = fraction.clamp(0.0, 1.0);
    lerp_color(palette.warning, palette.danger, t)
}

const ATTENTION_LOW: Color32 = Color32::from_rgb(40, 60, 200);
const ATTENTION_MID: Color32 = Color32::from_rgb(240, 220, 60);
const ATTENTION_HIGH: Color32 = Color32::from_rgb(220, 40, 40);

/// Heatmap legend ramp: blue at `0.0`, yellow at `0.5`, red at `1.0`.
pub fn attention_color(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        lerp_color(ATTENTION_LOW, ATTENTION_MID, t * 2.0)
    } else {
        lerp_color(ATTENTION_MID, ATTENTION_HIGH, (t - 0.5) * 2.0)
    }
}

fn lerp_color(from: Color32, to: Color32, t: f32) -> Color32 {
    let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    Color32::from_rgb(mix(from.r(), to.r()), mix(from.g(), to.g()), mix(from.b(), to.b()))
}
