//! Intro and tutorial cards shown over the forest.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::theme;
use crate::view_state::ViewState;

const BIG_BUTTON: egui::Vec2 = egui::Vec2 { x: 320.0, y: 60.0 };

/// Bold lead and body of each "how to speak" paragraph.
pub const TUTORIAL_STEPS: [(&str, &str); 3] = [
    (
        "Chat to a friend you've never met.",
        "Bring your worries, your joys, and your confusion about your daily life.",
    ),
    (
        "Be honest.",
        "No need to pretend. The forest accepts you, even if you smell of the city.",
    ),
    (
        "Listen.",
        "You are talking to a spirit that has lived here since the beginning of history. \
         Ask them: What could life have been?",
    ),
];

fn primary_button(label: &str, size: f32) -> egui::Button<'static> {
    egui::Button::new(
        egui::RichText::new(label.to_uppercase())
            .size(size)
            .strong()
            .color(theme::PANEL_GREEN),
    )
    .fill(theme::LEAF)
    .stroke(egui::Stroke::new(3.0, theme::PANEL_GREEN))
}

pub fn intro_ui(mut contexts: EguiContexts, mut next: ResMut<NextState<ViewState>>) {
    let ctx = contexts.ctx_mut();
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.18);
                ui.label(
                    egui::RichText::new("AWÁ WHISPERS")
                        .size(72.0)
                        .strong()
                        .color(theme::PALE_LEAF),
                );
                ui.add_space(24.0);

                ui.allocate_ui(egui::vec2(620.0, 0.0), |ui| {
                    theme::pixel_frame(theme::PANEL_GREEN, theme::BORDER_GREEN).show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(
                                "An alternative narrative. A conversation across worlds.",
                            )
                            .size(20.0),
                        );
                        ui.add_space(8.0);
                        ui.label(
                            egui::RichText::new(
                                "Connect with a resident of the Amazon. Speak of your daily life, \
                                 your \"cold boxes\" and \"electric nets\", and listen to the \
                                 wisdom of the forest.",
                            )
                            .size(14.0)
                            .color(theme::MUTED_LEAF),
                        );
                    });
                });
                ui.add_space(32.0);

                if ui
                    .add_sized(BIG_BUTTON, primary_button("Enter the forest", 24.0))
                    .clicked()
                {
                    next.set(ViewState::Tutorial);
                }

                ui.add_space(32.0);
                ui.label(
                    egui::RichText::new("Powered by Google Gemini")
                        .size(11.0)
                        .color(theme::BORDER_GREEN),
                );
            });
        });
}

pub fn tutorial_ui(mut contexts: EguiContexts, mut next: ResMut<NextState<ViewState>>) {
    let ctx = contexts.ctx_mut();
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE.fill(theme::veil(120)))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.15);
                ui.allocate_ui(egui::vec2(560.0, 0.0), |ui| {
                    theme::pixel_frame(theme::PARCHMENT, theme::BARK).show(ui, |ui| {
                        ui.visuals_mut().override_text_color = Some(theme::INK);
                        ui.label(egui::RichText::new("HOW TO SPEAK").size(30.0).strong());
                        ui.separator();
                        for (lead, rest) in TUTORIAL_STEPS {
                            ui.add_space(8.0);
                            ui.horizontal_wrapped(|ui| {
                                ui.label(egui::RichText::new(lead).size(17.0).strong());
                                ui.label(egui::RichText::new(rest).size(17.0));
                            });
                        }
                    });
                });
                ui.add_space(24.0);
                if ui
                    .add_sized(BIG_BUTTON, primary_button("Begin journey", 20.0))
                    .clicked()
                {
                    next.set(ViewState::Game);
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutorial_listen_step_speaks_of_a_spirit() {
        let (lead, rest) = TUTORIAL_STEPS[2];
        assert_eq!(lead, "Listen.");
        assert_eq!(
            rest,
            "You are talking to a spirit that has lived here since the beginning of history. \
             Ask them: What could life have been?"
        );
    }

    #[test]
    fn test_tutorial_steps_in_order() {
        let leads: Vec<&str> = TUTORIAL_STEPS.iter().map(|(lead, _)| *lead).collect();
        assert_eq!(
            leads,
            ["Chat to a friend you've never met.", "Be honest.", "Listen."]
        );
    }
}
