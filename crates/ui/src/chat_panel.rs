//! The game screen: header, transcript and the input row.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use conversation::{ChatLog, Message, SendTurn, Sender};
use simulation::time_of_day::{TimeCategory, TimeOfDay};

use crate::theme;
use crate::typewriter::TypewriterState;

pub const LOADING_LINE: &str = "... The forest is whispering ...";
const INPUT_HINT: &str = "Speak to the forest...";
const AWA_ABOUT: &str = "The Awá are an indigenous people of Brazil living in the Amazon \
    rainforest. Often called the \"Earth's most threatened tribe,\" they are nomadic \
    hunter-gatherers known for their deep connection to the forest and for adopting \
    orphaned animals as family members.";

/// What the player is typing.
#[derive(Resource, Debug, Default)]
pub struct ChatDraft {
    pub text: String,
}

/// Take the draft for sending. Nothing is taken while a reply is pending or
/// when the draft is blank; a blank draft is left as is.
pub fn take_draft(draft: &mut String, loading: bool) -> Option<String> {
    if loading || draft.trim().is_empty() {
        return None;
    }
    let text = draft.trim().to_string();
    draft.clear();
    Some(text)
}

fn time_glyph(category: TimeCategory) -> &'static str {
    match category {
        TimeCategory::Morning | TimeCategory::Day => "☀",
        TimeCategory::Evening | TimeCategory::Night => "☾",
    }
}

pub fn chat_ui(
    mut contexts: EguiContexts,
    time: Res<Time>,
    time_of_day: Res<TimeOfDay>,
    chat: Res<ChatLog>,
    typewriter: Res<TypewriterState>,
    mut draft: ResMut<ChatDraft>,
    mut turns: EventWriter<SendTurn>,
) {
    let ctx = contexts.ctx_mut();
    let now = time.elapsed();

    egui::TopBottomPanel::top("chat_header")
        .frame(
            egui::Frame::NONE
                .fill(theme::veil(210))
                .stroke(egui::Stroke::new(4.0, theme::PANEL_GREEN))
                .inner_margin(egui::Margin::same(12)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("🍃").size(26.0));
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new("AWÁ RESIDENT").size(24.0).strong());
                        ui.label(egui::RichText::new("ⓘ").size(16.0).color(theme::LEAF))
                            .on_hover_text(AWA_ABOUT);
                    });
                    ui.label(
                        egui::RichText::new("CONNECTED TO THE EARTH")
                            .size(11.0)
                            .color(theme::MUTED_LEAF),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(56.0);
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new("STATUS").size(11.0).color(theme::LEAF));
                        ui.label(egui::RichText::new("LISTENING").size(14.0));
                    });
                    ui.add_space(16.0);
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new("TIME").size(11.0).color(theme::LEAF));
                        ui.label(
                            egui::RichText::new(format!(
                                "{} {}",
                                time_glyph(time_of_day.category),
                                time_of_day.category
                            ))
                            .size(14.0),
                        )
                        .on_hover_text(time_of_day.category.label());
                    });
                });
            });
        });

    egui::TopBottomPanel::bottom("chat_input")
        .frame(
            egui::Frame::NONE
                .fill(theme::veil(230))
                .stroke(egui::Stroke::new(4.0, theme::PANEL_GREEN))
                .inner_margin(egui::Margin::same(12)),
        )
        .show(ctx, |ui| {
            let input_id = egui::Id::new("chat_input_text");
            // Enter sends; Shift+Enter keeps its newline.
            let enter = ui.memory(|m| m.has_focus(input_id))
                && ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));

            let mut clicked = false;
            ui.horizontal(|ui| {
                let field_width = (ui.available_width() - 96.0).max(120.0);
                ui.add(
                    egui::TextEdit::multiline(&mut draft.text)
                        .id(input_id)
                        .hint_text(INPUT_HINT)
                        .desired_rows(2)
                        .desired_width(field_width)
                        .font(egui::TextStyle::Heading),
                );
                let can_send = !chat.is_loading() && !draft.text.trim().is_empty();
                clicked = ui
                    .add_enabled(
                        can_send,
                        egui::Button::new(egui::RichText::new("➤").size(24.0))
                            .min_size(egui::vec2(80.0, 56.0)),
                    )
                    .clicked();
            });
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("Press Enter to send")
                        .size(11.0)
                        .color(theme::BORDER_GREEN),
                );
            });

            if enter || clicked {
                if let Some(text) = take_draft(&mut draft.text, chat.is_loading()) {
                    turns.send(SendTurn(text));
                }
            }
        });

    egui::CentralPanel::default()
        .frame(egui::Frame::NONE.inner_margin(egui::Margin::same(20)))
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for message in chat.transcript.messages() {
                        message_bubble(ui, message, typewriter.visible(message, now));
                        ui.add_space(16.0);
                    }
                    if chat.is_loading() {
                        theme::pixel_frame(theme::PARCHMENT, theme::BARK).show(ui, |ui| {
                            ui.label(egui::RichText::new(LOADING_LINE).size(16.0).color(theme::INK));
                        });
                    }
                });
        });
}

fn message_bubble(ui: &mut egui::Ui, message: &Message, visible: &str) {
    let (fill, border, ink, align) = match message.sender {
        Sender::User => (theme::STONE, theme::SLATE, theme::SLATE, egui::Align::Max),
        Sender::Persona => (theme::PARCHMENT, theme::BARK, theme::INK, egui::Align::Min),
    };
    let max_width = ui.available_width() * 0.7;

    ui.with_layout(egui::Layout::top_down(align), |ui| {
        ui.set_max_width(max_width.max(200.0));
        theme::pixel_frame(fill, border).show(ui, |ui| {
            ui.label(egui::RichText::new(visible).size(18.0).color(ink));
        });
        ui.label(
            egui::RichText::new(message.caption())
                .size(11.0)
                .color(theme::MUTED_LEAF),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_draft_trims_and_clears() {
        let mut draft = "  I have many deadlines \n".to_string();
        assert_eq!(
            take_draft(&mut draft, false).as_deref(),
            Some("I have many deadlines")
        );
        assert!(draft.is_empty());
    }

    #[test]
    fn test_blank_draft_is_not_sent() {
        let mut draft = "   \n".to_string();
        assert_eq!(take_draft(&mut draft, false), None);
        assert_eq!(draft, "   \n");
    }

    #[test]
    fn test_nothing_sent_while_loading() {
        let mut draft = "hello".to_string();
        assert_eq!(take_draft(&mut draft, true), None);
        assert_eq!(draft, "hello");
    }
}
