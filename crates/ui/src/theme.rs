use bevy_egui::{egui, EguiContexts};

// Forest greens
pub const DEEP_GREEN: egui::Color32 = egui::Color32::from_rgb(0x02, 0x2c, 0x22);
pub const PANEL_GREEN: egui::Color32 = egui::Color32::from_rgb(0x06, 0x4e, 0x3b);
pub const BORDER_GREEN: egui::Color32 = egui::Color32::from_rgb(0x04, 0x78, 0x57);
pub const LEAF: egui::Color32 = egui::Color32::from_rgb(0x10, 0xb9, 0x81);
pub const PALE_LEAF: egui::Color32 = egui::Color32::from_rgb(0xa7, 0xf3, 0xd0);
pub const MUTED_LEAF: egui::Color32 = egui::Color32::from_rgb(0x34, 0xd3, 0x99);

// Persona bubble and cards
pub const PARCHMENT: egui::Color32 = egui::Color32::from_rgb(0xee, 0xcf, 0xa1);
pub const BARK: egui::Color32 = egui::Color32::from_rgb(0x5d, 0x40, 0x37);
pub const INK: egui::Color32 = egui::Color32::from_rgb(0x3e, 0x27, 0x23);

// Player bubble
pub const STONE: egui::Color32 = egui::Color32::from_rgb(0xe2, 0xe8, 0xf0);
pub const SLATE: egui::Color32 = egui::Color32::from_rgb(0x1e, 0x29, 0x3b);

/// Translucent backdrop so the forest stays visible behind panels.
pub fn veil(alpha: u8) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(0x02, 0x2c, 0x22, alpha)
}

/// Thick square border, the pixel-card look.
pub fn pixel_frame(fill: egui::Color32, border: egui::Color32) -> egui::Frame {
    egui::Frame::NONE
        .fill(fill)
        .stroke(egui::Stroke::new(4.0, border))
        .inner_margin(egui::Margin::same(14))
        .shadow(egui::Shadow {
            offset: [6, 6],
            blur: 0,
            spread: 0,
            color: egui::Color32::from_black_alpha(90),
        })
}

pub fn apply_forest_theme(mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();
    let mut style = (*ctx.style()).clone();

    style.visuals.widgets.noninteractive.bg_fill = PANEL_GREEN;
    style.visuals.widgets.inactive.bg_fill = LEAF;
    style.visuals.widgets.hovered.bg_fill = MUTED_LEAF;
    style.visuals.widgets.active.bg_fill = PALE_LEAF;
    style.visuals.widgets.inactive.weak_bg_fill = LEAF;
    style.visuals.widgets.hovered.weak_bg_fill = MUTED_LEAF;
    style.visuals.widgets.active.weak_bg_fill = PALE_LEAF;
    style.visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.5, PANEL_GREEN);
    style.visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.5, PANEL_GREEN);
    style.visuals.widgets.active.fg_stroke = egui::Stroke::new(1.5, PANEL_GREEN);

    style.visuals.window_fill = PANEL_GREEN;
    style.visuals.panel_fill = veil(220);
    style.visuals.extreme_bg_color = veil(160);
    style.visuals.override_text_color = Some(PALE_LEAF);

    style.visuals.selection.bg_fill = BORDER_GREEN;
    style.visuals.selection.stroke = egui::Stroke::new(1.0, PALE_LEAF);

    // Square corners everywhere for the pixel look
    let square = egui::CornerRadius::ZERO;
    style.visuals.window_corner_radius = square;
    style.visuals.widgets.noninteractive.corner_radius = square;
    style.visuals.widgets.inactive.corner_radius = square;
    style.visuals.widgets.hovered.corner_radius = square;
    style.visuals.widgets.active.corner_radius = square;

    ctx.set_style(style);
}
