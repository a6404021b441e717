//! Bevy side of the conversation: events in, transcript out.
//!
//! Session calls block on the network, so each turn runs on the
//! `AsyncComputeTaskPool` and is polled once per frame. Only one turn is in
//! flight at a time; requests arriving meanwhile are dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::*;
use bevy::tasks::{block_on, AsyncComputeTaskPool, Task};

use simulation::time_of_day::TimeOfDay;

use crate::context::with_context;
use crate::error::ConversationError;
use crate::offline::OfflineSession;
use crate::session::{reply_or_fallback, ConversationSession};
use crate::transcript::{Sender, Transcript};

// =============================================================================
// Events & resources
// =============================================================================

/// Open the conversation. Ignored once it has started.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct StartConversation;

/// The player's words, exactly as typed.
#[derive(Event, Debug, Clone)]
pub struct SendTurn(pub String);

#[derive(Resource, Debug, Default)]
pub struct ChatLog {
    pub transcript: Transcript,
    loading: bool,
    started: bool,
}

impl ChatLog {
    /// A turn (or the opening) is waiting on the session.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

type BoxedSession = Box<dyn ConversationSession>;

/// The session every turn goes through.
#[derive(Resource, Clone)]
pub struct ActiveSession(Arc<Mutex<BoxedSession>>);

impl ActiveSession {
    pub fn new(session: impl ConversationSession) -> Self {
        Self(Arc::new(Mutex::new(Box::new(session))))
    }

    pub fn name(&self) -> &'static str {
        lock_session(&self.0).name()
    }
}

impl Default for ActiveSession {
    fn default() -> Self {
        Self::new(OfflineSession::default())
    }
}

fn lock_session(session: &Mutex<BoxedSession>) -> MutexGuard<'_, BoxedSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

enum TurnKind {
    Opening,
    Reply,
}

struct TurnOutcome {
    kind: TurnKind,
    result: Result<String, ConversationError>,
}

#[derive(Resource, Default)]
struct PendingTurn(Option<Task<TurnOutcome>>);

impl PendingTurn {
    fn is_busy(&self) -> bool {
        self.0.is_some()
    }
}

// =============================================================================
// Systems
// =============================================================================

fn start_conversation(
    mut requests: EventReader<StartConversation>,
    time_of_day: Res<TimeOfDay>,
    session: Res<ActiveSession>,
    mut chat: ResMut<ChatLog>,
    mut pending: ResMut<PendingTurn>,
) {
    if requests.read().count() == 0 || chat.started || pending.is_busy() {
        return;
    }
    let category = time_of_day.category;
    let session = Arc::clone(&session.0);
    let task = AsyncComputeTaskPool::get().spawn(async move {
        TurnOutcome {
            kind: TurnKind::Opening,
            result: lock_session(&session).start(category),
        }
    });
    pending.0 = Some(task);
    chat.loading = true;
}

fn dispatch_turns(
    mut turns: EventReader<SendTurn>,
    time_of_day: Res<TimeOfDay>,
    session: Res<ActiveSession>,
    mut chat: ResMut<ChatLog>,
    mut pending: ResMut<PendingTurn>,
) {
    for SendTurn(text) in turns.read() {
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if pending.is_busy() {
            warn!("Dropped turn: {}", ConversationError::Busy);
            continue;
        }

        chat.transcript.push(Sender::User, text);
        let prompt = with_context(time_of_day.category, text);
        let session = Arc::clone(&session.0);
        let task = AsyncComputeTaskPool::get().spawn(async move {
            TurnOutcome {
                kind: TurnKind::Reply,
                result: lock_session(&session).send(&prompt),
            }
        });
        pending.0 = Some(task);
        chat.loading = true;
    }
}

fn collect_turns(mut pending: ResMut<PendingTurn>, mut chat: ResMut<ChatLog>) {
    let Some(task) = pending.0.as_mut() else {
        return;
    };
    let Some(outcome) = block_on(futures_lite::future::poll_once(task)) else {
        return;
    };
    pending.0 = None;
    chat.loading = false;

    if matches!(outcome.kind, TurnKind::Opening) {
        chat.started = true;
    }
    let line = reply_or_fallback(outcome.result);
    chat.transcript.push(Sender::Persona, line);
}

// =============================================================================
// Plugin
// =============================================================================

/// Expects a [`TimeOfDay`] resource (from the simulation plugin). Insert an
/// [`ActiveSession`] before adding the plugin to pick the backend; the
/// offline session is the default.
pub struct ConversationPlugin;

impl Plugin for ConversationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChatLog>()
            .init_resource::<ActiveSession>()
            .init_resource::<PendingTurn>()
            .add_event::<StartConversation>()
            .add_event::<SendTurn>()
            .add_systems(
                Update,
                (start_conversation, dispatch_turns, collect_turns).chain(),
            );
        info!(
            "Conversation backend: {}",
            app.world().resource::<ActiveSession>().name()
        );
    }
}
