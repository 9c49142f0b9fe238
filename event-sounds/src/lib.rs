//! Event sounds for widget toolkits.
//!
//! Raw widget signals (show, hide, dialog response, button press, ...) are
//! submitted to a [`SoundEventEngine`] as they happen. The engine defers them
//! to the host loop's idle phase, collapses redundant or self-cancelling
//! sequences, and hands each surviving record to a [`PlaybackPort`] as a
//! named sound event such as `window-new` or `menu-popup`.

pub mod coalesce;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod events;
pub mod playback;
pub mod queue;
pub mod scheduler;
pub mod state;
pub mod widget;

#[cfg(test)]
mod testing;

pub use config::{EngineConfig, DEFAULT_MAX_PENDING_RECORDS};
pub use dispatch::{Dispatched, SoundDispatcher};
pub use engine::{DrainReport, IdleState, SoundEventEngine, Submission};
pub use errors::{PlaybackError, Result, SoundEventError};
pub use events::{
    AuxValue, EventRecord, InputEvent, InputEventKind, SignalKind, SoundEventId, WindowState,
    WindowStateEvent,
};
pub use playback::{CachePolicy, PlayRequest, PlaybackContext, PlaybackPort};
pub use queue::PendingQueue;
pub use scheduler::{IdleScheduler, IdleTask, ManualIdleScheduler, TokioIdleScheduler};
pub use state::{DispatchState, ObjectFlags, ObjectStateStore};
pub use widget::{
    Capabilities, MessageType, ObjectId, ResponseCode, Widget, WindowTypeHint,
};
