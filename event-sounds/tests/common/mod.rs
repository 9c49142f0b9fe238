#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use event_sounds::{
    CachePolicy, Capabilities, EngineConfig, ManualIdleScheduler, MessageType, ObjectId,
    PlayRequest, PlaybackContext, PlaybackError, PlaybackPort, ResponseCode, SoundEventEngine,
    SoundEventId, Widget, WindowTypeHint,
};

// A mock widget whose mutable bits can be flipped between submits. Built the
// same way as the crate's internal test widget: a capability set plus
// `with_*` builders.
#[derive(Debug)]
pub struct MockWidget {
    pub id: ObjectId,
    pub name: Option<String>,
    pub capabilities: Capabilities,
    pub hint: WindowTypeHint,
    pub message_type: Option<MessageType>,
    pub contains_menu: bool,
    pub has_submenu: bool,
    pub response: Option<ResponseCode>,
    pub drawable: Cell<bool>,
    pub alive: Cell<bool>,
    pub active: Cell<bool>,
    pub hidden: Cell<bool>,
}

impl MockWidget {
    pub fn new(id: u64, capabilities: Capabilities) -> Self {
        Self {
            id: ObjectId(id),
            name: None,
            capabilities,
            hint: WindowTypeHint::Normal,
            message_type: None,
            contains_menu: false,
            has_submenu: false,
            response: None,
            drawable: Cell::new(true),
            alive: Cell::new(true),
            active: Cell::new(false),
            hidden: Cell::new(false),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_hint(mut self, hint: WindowTypeHint) -> Self {
        self.hint = hint;
        self
    }

    pub fn with_message_type(mut self, message_type: MessageType) -> Self {
        self.message_type = Some(message_type);
        self
    }

    pub fn with_contains_menu(mut self, contains_menu: bool) -> Self {
        self.contains_menu = contains_menu;
        self
    }

    pub fn with_response(mut self, response: ResponseCode) -> Self {
        self.response = Some(response);
        self
    }

    pub fn into_rc(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn window(id: u64) -> Rc<Self> {
        Self::new(id, Capabilities::WINDOW).into_rc()
    }

    pub fn dialog(id: u64) -> Rc<Self> {
        Self::new(id, Capabilities::WINDOW | Capabilities::DIALOG)
            .with_hint(WindowTypeHint::Dialog)
            .into_rc()
    }

    pub fn message_dialog(id: u64, message_type: MessageType) -> Rc<Self> {
        Self::new(
            id,
            Capabilities::WINDOW | Capabilities::DIALOG | Capabilities::MESSAGE_DIALOG,
        )
        .with_hint(WindowTypeHint::Dialog)
        .with_message_type(message_type)
        .into_rc()
    }

    pub fn menu(id: u64) -> Rc<Self> {
        Self::new(id, Capabilities::WINDOW)
            .with_hint(WindowTypeHint::PopupMenu)
            .with_contains_menu(true)
            .into_rc()
    }

    pub fn button(id: u64) -> Rc<Self> {
        Self::new(id, Capabilities::BUTTON).into_rc()
    }

    pub fn response_button(id: u64, response: ResponseCode) -> Rc<Self> {
        Self::new(id, Capabilities::BUTTON)
            .with_response(response)
            .into_rc()
    }
}

impl Widget for MockWidget {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn is_drawable(&self) -> bool {
        self.drawable.get()
    }

    fn is_alive(&self) -> bool {
        self.alive.get()
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn type_hint(&self) -> WindowTypeHint {
        self.hint
    }

    fn message_type(&self) -> Option<MessageType> {
        self.message_type
    }

    fn contains_menu(&self) -> bool {
        self.contains_menu
    }

    fn has_submenu(&self) -> bool {
        self.has_submenu
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn is_hidden_on_screen(&self) -> bool {
        self.hidden.get()
    }

    fn dialog_response(&self) -> Option<ResponseCode> {
        self.response
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayedSound {
    pub id: SoundEventId,
    pub description: &'static str,
    /// Source object when the sound was anchored on a widget.
    pub widget: Option<ObjectId>,
    pub cache_policy: CachePolicy,
}

type PlayHook = Box<dyn Fn(SoundEventId)>;

/// Playback port that remembers every call.
#[derive(Default)]
pub struct RecordingPlayback {
    pub played: RefCell<Vec<PlayedSound>>,
    pub failing: RefCell<HashSet<SoundEventId>>,
    hook: RefCell<Option<PlayHook>>,
}

impl RecordingPlayback {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn fail_on(&self, id: SoundEventId) {
        self.failing.borrow_mut().insert(id);
    }

    /// Runs `hook` after every successful play, e.g. to submit new signals
    /// from inside playback.
    pub fn set_hook(&self, hook: impl Fn(SoundEventId) + 'static) {
        *self.hook.borrow_mut() = Some(Box::new(hook));
    }

    pub fn ids(&self) -> Vec<SoundEventId> {
        self.played.borrow().iter().map(|p| p.id).collect()
    }
}

impl PlaybackPort for RecordingPlayback {
    fn play(&self, request: &PlayRequest<'_>) -> Result<(), PlaybackError> {
        if self.failing.borrow().contains(&request.event_id) {
            return Err(PlaybackError::Backend(format!(
                "no sample for {}",
                request.event_id
            )));
        }

        let widget = match request.context {
            PlaybackContext::Widget(w) => Some(w.object_id()),
            PlaybackContext::InputEvent(_) => None,
        };
        self.played.borrow_mut().push(PlayedSound {
            id: request.event_id,
            description: request.description,
            widget,
            cache_policy: request.cache_policy,
        });

        if let Some(hook) = self.hook.borrow().as_ref() {
            hook(request.event_id);
        }
        Ok(())
    }
}

pub struct Harness {
    pub engine: Rc<SoundEventEngine>,
    pub scheduler: ManualIdleScheduler,
    pub playback: Rc<RecordingPlayback>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let scheduler = ManualIdleScheduler::new();
        let playback = RecordingPlayback::new();
        let engine = SoundEventEngine::new(config, scheduler.clone(), playback.clone())
            .expect("engine config should be valid");
        Self {
            engine,
            scheduler,
            playback,
        }
    }

    /// Lets the host loop go idle.
    pub fn idle(&self) -> usize {
        self.scheduler.run_pending()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
