use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use simulation::ambient_settings::AmbientSoundSettings;

use crate::theme;

pub fn toggle_label(enabled: bool) -> &'static str {
    if enabled {
        "🔊"
    } else {
        "🔇"
    }
}

/// Round speaker button pinned to the top-right corner.
pub fn audio_toggle_ui(mut contexts: EguiContexts, mut settings: ResMut<AmbientSoundSettings>) {
    let ctx = contexts.ctx_mut();
    egui::Area::new(egui::Id::new("audio_toggle"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            let button = egui::Button::new(
                egui::RichText::new(toggle_label(settings.enabled))
                    .size(20.0)
                    .color(theme::SLATE),
            )
            .fill(egui::Color32::from_rgb(0x94, 0xa3, 0xb8))
            .corner_radius(egui::CornerRadius::same(20))
            .min_size(egui::vec2(40.0, 40.0));

            let hint = if settings.enabled {
                "Mute the forest"
            } else {
                "Listen to the forest"
            };
            if ui.add(button).on_hover_text(hint).clicked() {
                settings.toggle();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_tracks_state() {
        assert_ne!(toggle_label(true), toggle_label(false));
    }
}
