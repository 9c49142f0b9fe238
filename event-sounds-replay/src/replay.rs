use anyhow::{bail, Result};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, info, warn};

use event_sounds::{
    EngineConfig, ObjectId, PlayRequest, PlaybackContext, PlaybackError, PlaybackPort,
    SoundEventEngine, SoundEventId, Submission, TokioIdleScheduler,
};

use crate::scenario::{Scenario, ScriptedWidget, Step};

/// One sound emitted while replaying.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayedEvent {
    /// Index of the step during which the sound was played.
    pub step: usize,
    pub event: SoundEventId,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectId>,
    /// The sound was positioned from the captured input event.
    pub from_input: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct ReplaySummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub played: Vec<PlayedEvent>,
    pub submitted: usize,
    pub filtered: usize,
    pub rejected: usize,
}

/// Playback port that logs each sound and keeps it for the summary.
#[derive(Debug, Default)]
pub struct ReportingPlayback {
    step: Cell<usize>,
    played: RefCell<Vec<PlayedEvent>>,
}

impl ReportingPlayback {
    fn set_step(&self, step: usize) {
        self.step.set(step);
    }

    fn take(&self) -> Vec<PlayedEvent> {
        std::mem::take(&mut *self.played.borrow_mut())
    }
}

impl PlaybackPort for ReportingPlayback {
    fn play(&self, request: &PlayRequest<'_>) -> Result<(), PlaybackError> {
        let (object, from_input) = match request.context {
            PlaybackContext::Widget(widget) => (Some(widget.object_id()), false),
            PlaybackContext::InputEvent(_) => (None, true),
        };

        info!(
            "🔊 {} ({}) cache={:?}",
            request.event_id, request.description, request.cache_policy
        );

        self.played.borrow_mut().push(PlayedEvent {
            step: self.step.get(),
            event: request.event_id,
            description: request.description,
            object,
            from_input,
        });
        Ok(())
    }
}

/// Yields to the local task set until the engine's pending drain has run.
async fn settle(engine: &SoundEventEngine) {
    while engine.is_idle_scheduled() {
        tokio::task::yield_now().await;
    }
}

/// Replays `scenario` against a fresh engine. Must run inside a
/// [`tokio::task::LocalSet`].
pub async fn run(scenario: &Scenario, config: EngineConfig) -> Result<ReplaySummary> {
    let mut widgets: HashMap<ObjectId, Rc<ScriptedWidget>> = HashMap::new();
    for spec in &scenario.widgets {
        if widgets
            .insert(spec.id, Rc::new(ScriptedWidget::new(spec.clone())))
            .is_some()
        {
            bail!("widget {} declared twice", spec.id);
        }
    }

    let lookup = |id: &ObjectId| -> Result<Rc<ScriptedWidget>> {
        match widgets.get(id) {
            Some(widget) => Ok(widget.clone()),
            None => bail!("unknown widget {}", id),
        }
    };

    let playback = Rc::new(ReportingPlayback::default());
    let engine = SoundEventEngine::new(config, TokioIdleScheduler::new(), playback.clone())?;

    let mut summary = ReplaySummary {
        name: scenario.name.clone(),
        ..Default::default()
    };

    for (index, step) in scenario.steps.iter().enumerate() {
        playback.set_step(index);

        match step {
            Step::Submit {
                widget,
                signal,
                aux,
                input,
            } => {
                let source = lookup(widget)?;
                match engine.submit(*signal, source, *aux, input.clone()) {
                    Ok(Submission::Queued { sequence }) => {
                        debug!("Step {}: {:?} from {} queued as {}", index, signal, widget, sequence);
                        summary.submitted += 1;
                    }
                    Ok(Submission::Filtered) => {
                        debug!("Step {}: {:?} from {} filtered", index, signal, widget);
                        summary.filtered += 1;
                    }
                    Err(e) => {
                        warn!("Step {}: {:?} from {} rejected: {}", index, signal, widget, e);
                        summary.rejected += 1;
                    }
                }
            }
            Step::Idle => settle(&engine).await,
            Step::Update {
                widget,
                drawable,
                active,
                hidden,
                alive,
            } => lookup(widget)?.update(*drawable, *active, *hidden, *alive),
            Step::DisableSound { widget, disabled } => {
                engine.set_sound_disabled(*widget, *disabled);
            }
            Step::Forget { widget } => {
                engine.forget_object(*widget);
            }
        }
    }

    playback.set_step(scenario.steps.len());
    settle(&engine).await;

    summary.played = playback.take();
    Ok(summary)
}
