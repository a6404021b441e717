use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod audio_toggle;
pub mod chat_panel;
pub mod screens;
pub mod theme;
pub mod typewriter;
pub mod view_state;

pub use view_state::{ViewFlowPlugin, ViewState};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((EguiPlugin, ViewFlowPlugin))
            .init_resource::<chat_panel::ChatDraft>()
            .add_systems(Startup, theme::apply_forest_theme)
            .add_systems(
                Update,
                (
                    screens::intro_ui.run_if(in_state(ViewState::Intro)),
                    screens::tutorial_ui.run_if(in_state(ViewState::Tutorial)),
                    chat_panel::chat_ui.run_if(in_state(ViewState::Game)),
                    audio_toggle::audio_toggle_ui.run_if(not(in_state(ViewState::Intro))),
                ),
            );
    }
}
