//! The coalescing engine: accepts raw signals, defers them to the idle phase
//! and turns the survivors into play calls.

use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, instrument, trace, warn};

use crate::coalesce::coalesce;
use crate::config::EngineConfig;
use crate::dispatch::{Dispatched, SoundDispatcher};
use crate::errors::{Result, SoundEventError};
use crate::events::{AuxValue, EventRecord, InputEvent, SignalKind};
use crate::playback::{PlayRequest, PlaybackPort};
use crate::queue::PendingQueue;
use crate::scheduler::IdleScheduler;
use crate::state::ObjectStateStore;
use crate::widget::{Capabilities, ObjectId, Widget};

/// Where the engine is in its defer/drain cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdleState {
    /// Nothing scheduled; the next submit schedules a drain.
    #[default]
    Idle,
    /// A drain task is waiting on the scheduler.
    Scheduled,
    /// A drain is running. Submits made now are picked up by the same drain.
    Draining,
}

/// What [`SoundEventEngine::submit`] did with a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Queued { sequence: u64 },
    /// Rejected by the pre-filter: not a window, or not drawable.
    Filtered,
}

/// Counters for one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Records that reached the dispatch table.
    pub dispatched: usize,
    /// Records removed by merge rules.
    pub coalesced: usize,
    /// Records dropped because their source was destroyed.
    pub stale: usize,
    pub played: usize,
    pub failed: usize,
    /// Sounds chosen but suppressed by configuration.
    pub muted: usize,
}

impl DrainReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// Puts back the state a drain started from, even if playback panics.
struct DrainGuard<'a> {
    idle: &'a Cell<IdleState>,
    restore: IdleState,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.idle.set(self.restore);
    }
}

/// Single-threaded sound event engine.
///
/// Always held in an [`Rc`]: the drain task scheduled on the host loop keeps a
/// weak handle back to the engine and does nothing once the engine is gone.
/// Every method takes `&self`, and no internal borrow is held while the
/// playback port runs, so `play` may call back into [`submit`] or any other
/// method.
///
/// [`submit`]: SoundEventEngine::submit
pub struct SoundEventEngine {
    queue: RefCell<PendingQueue>,
    objects: RefCell<ObjectStateStore>,
    dispatcher: RefCell<SoundDispatcher>,
    idle: Cell<IdleState>,
    scheduler: Box<dyn IdleScheduler>,
    playback: Box<dyn PlaybackPort>,
    config: EngineConfig,
    this: Weak<SoundEventEngine>,
}

impl std::fmt::Debug for SoundEventEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundEventEngine")
            .field("idle", &self.idle.get())
            .field("pending", &self.pending_len())
            .field("tracked_objects", &self.tracked_objects())
            .field("config", &self.config)
            .finish()
    }
}

impl SoundEventEngine {
    pub fn new(
        config: EngineConfig,
        scheduler: impl IdleScheduler + 'static,
        playback: impl PlaybackPort + 'static,
    ) -> Result<Rc<Self>> {
        config.validate()?;

        Ok(Rc::new_cyclic(|this| Self {
            queue: RefCell::new(PendingQueue::new(config.max_pending_records)),
            objects: RefCell::new(ObjectStateStore::new()),
            dispatcher: RefCell::new(SoundDispatcher::new()),
            idle: Cell::new(IdleState::Idle),
            scheduler: Box::new(scheduler),
            playback: Box::new(playback),
            config,
            this: this.clone(),
        }))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn idle_state(&self) -> IdleState {
        self.idle.get()
    }

    pub fn is_idle_scheduled(&self) -> bool {
        self.idle.get() == IdleState::Scheduled
    }

    pub fn pending_len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn menu_popped_up(&self) -> bool {
        self.dispatcher.borrow().state().menu_popped_up
    }

    /// Records a raw signal for the next drain.
    ///
    /// Show, hide and window-state signals from non-windows are filtered out,
    /// as is anything from a source that is not drawable, except hide and
    /// dialog response which are always accepted. A drain is scheduled when
    /// none is pending or running.
    pub fn submit(
        &self,
        signal: SignalKind,
        source: Rc<dyn Widget>,
        aux: Option<AuxValue>,
        input_event: Option<InputEvent>,
    ) -> Result<Submission> {
        if signal.is_window_lifecycle() && !source.has(Capabilities::WINDOW) {
            debug!("Ignoring {:?} from non-window {}", signal, source.object_id());
            return Ok(Submission::Filtered);
        }

        if !signal.bypasses_visibility() && !source.is_drawable() {
            debug!("Ignoring {:?} from undrawable {}", signal, source.object_id());
            return Ok(Submission::Filtered);
        }

        let id = source.object_id();
        let pushed = self
            .queue
            .borrow_mut()
            .push(signal, source, aux, input_event);
        let sequence = match pushed {
            Ok(sequence) => sequence,
            Err(e) => {
                warn!("Rejected {:?} from {}: {}", signal, id, e);
                return Err(e);
            }
        };

        if self.idle.get() == IdleState::Idle {
            self.schedule_drain();
        }

        Ok(Submission::Queued { sequence })
    }

    fn schedule_drain(&self) {
        self.idle.set(IdleState::Scheduled);
        let this = self.this.clone();
        self.scheduler.schedule(Box::new(move || {
            if let Some(engine) = this.upgrade() {
                engine.drain(IdleState::Idle);
            }
        }));
    }

    /// Drains the pending queue: coalesces, dispatches and plays every record
    /// in emission order.
    ///
    /// Hosts may call this directly instead of waiting for the scheduled
    /// task. The idle state is left as it was found, so a drain task that is
    /// still queued stays accounted for and no second one gets scheduled. A
    /// nested call made while a drain is already running returns an empty
    /// report.
    pub fn run_idle(&self) -> DrainReport {
        self.drain(self.idle.get())
    }

    #[instrument(level = "debug", skip(self))]
    fn drain(&self, restore: IdleState) -> DrainReport {
        let mut report = DrainReport::default();

        if self.idle.get() == IdleState::Draining {
            trace!("Drain already running");
            return report;
        }

        self.idle.set(IdleState::Draining);
        let _guard = DrainGuard {
            idle: &self.idle,
            restore,
        };

        loop {
            let head = self.queue.borrow_mut().pop_front();
            let Some(candidate) = head else {
                break;
            };

            if !candidate.is_alive() {
                let err = SoundEventError::StaleReference(candidate.object_id());
                debug!("Dropping {:?}: {}", candidate, err);
                report.stale += 1;
                continue;
            }

            let outcome = coalesce(candidate, &mut self.queue.borrow_mut());
            report.coalesced += outcome.eliminated;
            report.stale += outcome.stale;

            if let Some(record) = outcome.survivor {
                self.play_record(&record, &mut report);
            }
        }

        if !report.is_empty() {
            debug!(?report, "Drain finished");
        }
        report
    }

    /// Runs the dispatch table for a single record without queueing or
    /// coalescing it. Nothing is played.
    pub fn dispatch_record(&self, record: &EventRecord) -> Result<Option<Dispatched>> {
        if !record.is_alive() {
            return Err(SoundEventError::StaleReference(record.object_id()));
        }

        let mut objects = self.objects.borrow_mut();
        Ok(self.dispatcher.borrow_mut().dispatch(record, &mut objects))
    }

    fn play_record(&self, record: &EventRecord, report: &mut DrainReport) {
        let dispatched = {
            let mut objects = self.objects.borrow_mut();
            self.dispatcher.borrow_mut().dispatch(record, &mut objects)
        };
        report.dispatched += 1;

        let Some(sound) = dispatched else {
            trace!("No sound for {:?}", record);
            return;
        };

        if !self.config.should_play(sound.id) {
            debug!("Sound {} muted by configuration", sound.id);
            report.muted += 1;
            return;
        }

        let request = PlayRequest {
            event_id: sound.id,
            description: sound.description,
            cache_policy: self.config.cache_policy,
            context: sound.context(record),
        };

        match self.playback.play(&request) {
            Ok(()) => {
                debug!("Played {} ({}) for {:?}", sound.id, sound.description, record);
                report.played += 1;
            }
            Err(e) => {
                warn!("Failed to play {}: {}", sound.id, SoundEventError::from(e));
                report.failed += 1;
            }
        }
    }

    /// Turns sounds on or off for one object. Applies to records already
    /// queued as well as future ones.
    pub fn set_sound_disabled(&self, id: ObjectId, disabled: bool) {
        self.objects.borrow_mut().set_sound_disabled(id, disabled);
    }

    pub fn is_sound_disabled(&self, id: ObjectId) -> bool {
        self.objects.borrow().is_sound_disabled(id)
    }

    pub fn was_hidden(&self, id: ObjectId) -> bool {
        self.objects.borrow().was_hidden(id)
    }

    /// Drops the flags kept for an object, typically when the host destroys it.
    pub fn forget_object(&self, id: ObjectId) -> bool {
        self.objects.borrow_mut().forget(id)
    }

    pub fn tracked_objects(&self) -> usize {
        self.objects.borrow().len()
    }

    /// Discards queued records, per-object flags and the menu flag.
    ///
    /// A drain already scheduled still runs, against an empty queue.
    pub fn reset(&self) {
        let dropped = self.queue.borrow().len();
        self.queue.borrow_mut().clear();
        self.objects.borrow_mut().clear();
        self.dispatcher.borrow_mut().reset();
        debug!("Engine reset, {} pending records discarded", dropped);
    }
}
