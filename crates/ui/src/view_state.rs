//! Intro → Tutorial → Game flow.
//!
//! Sound may only start after a deliberate click, so it is switched on when
//! the player leaves the intro. The conversation opens on entering the game.

use bevy::prelude::*;

use conversation::StartConversation;
use simulation::ambient_settings::AmbientSoundSettings;

use crate::typewriter::{track_reveals, TypewriterState};

#[derive(States, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewState {
    #[default]
    Intro,
    Tutorial,
    Game,
}

fn enable_sound(mut settings: ResMut<AmbientSoundSettings>) {
    if !settings.enabled {
        settings.enabled = true;
        info!("Ambient sound enabled");
    }
}

fn open_conversation(mut start: EventWriter<StartConversation>) {
    start.send(StartConversation);
}

/// Screen flow and the state behind the screens, without any drawing.
pub struct ViewFlowPlugin;

impl Plugin for ViewFlowPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ViewState>()
            .init_resource::<TypewriterState>()
            .add_systems(OnEnter(ViewState::Tutorial), enable_sound)
            .add_systems(OnEnter(ViewState::Game), open_conversation)
            .add_systems(Update, track_reveals.run_if(in_state(ViewState::Game)));
    }
}
