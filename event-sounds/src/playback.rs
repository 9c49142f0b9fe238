//! Interface to the subsystem that actually plays sounds.

use serde::{Deserialize, Serialize};

use crate::errors::PlaybackError;
use crate::events::{InputEvent, SoundEventId};
use crate::widget::Widget;

/// Whether the playback backend should keep the decoded sample around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    None,
    #[default]
    Permanent,
}

/// What the sound relates to, for positioning and per-application context.
#[derive(Debug, Clone, Copy)]
pub enum PlaybackContext<'a> {
    Widget(&'a dyn Widget),
    InputEvent(&'a InputEvent),
}

/// One play call. Borrows from the record being dispatched and is only valid
/// for the duration of [`PlaybackPort::play`].
#[derive(Debug, Clone, Copy)]
pub struct PlayRequest<'a> {
    pub event_id: SoundEventId,
    pub description: &'static str,
    pub cache_policy: CachePolicy,
    pub context: PlaybackContext<'a>,
}

/// Receives semantic sound events.
///
/// Implementations may re-enter the engine (for example by submitting new
/// signals), since no engine state is borrowed while `play` runs.
pub trait PlaybackPort {
    fn play(&self, request: &PlayRequest<'_>) -> Result<(), PlaybackError>;
}

impl<P: PlaybackPort + ?Sized> PlaybackPort for Box<P> {
    fn play(&self, request: &PlayRequest<'_>) -> Result<(), PlaybackError> {
        (**self).play(request)
    }
}

impl<P: PlaybackPort + ?Sized> PlaybackPort for std::rc::Rc<P> {
    fn play(&self, request: &PlayRequest<'_>) -> Result<(), PlaybackError> {
        (**self).play(request)
    }
}
