use anyhow::{Context, Result};
use serde::Deserialize;
use std::cell::Cell;
use std::path::Path;

use event_sounds::{
    AuxValue, Capabilities, EngineConfig, InputEvent, MessageType, ObjectId, ResponseCode,
    SignalKind, Widget, WindowTypeHint,
};

/// A recorded trace of widget signals, with the widgets that emitted them.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    /// Overrides the default engine configuration when no config file is given.
    #[serde(default)]
    pub config: Option<EngineConfig>,
    pub widgets: Vec<WidgetSpec>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(json).context("invalid scenario")?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json_str(&contents).with_context(|| format!("in {}", path.display()))
    }
}

fn default_true() -> bool {
    true
}

/// Static description of a widget plus its initial mutable state.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetSpec {
    pub id: ObjectId,
    #[serde(default)]
    pub name: Option<String>,
    pub capabilities: Capabilities,
    #[serde(default)]
    pub hint: WindowTypeHint,
    #[serde(default)]
    pub message_type: Option<MessageType>,
    #[serde(default)]
    pub contains_menu: bool,
    #[serde(default)]
    pub has_submenu: bool,
    #[serde(default)]
    pub response: Option<ResponseCode>,
    #[serde(default = "default_true")]
    pub drawable: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Step {
    /// A signal emitted by a widget.
    Submit {
        widget: ObjectId,
        signal: SignalKind,
        #[serde(default)]
        aux: Option<AuxValue>,
        #[serde(default)]
        input: Option<InputEvent>,
    },
    /// The host loop goes idle and pending drains run.
    Idle,
    /// Widget state changes between signals.
    Update {
        widget: ObjectId,
        #[serde(default)]
        drawable: Option<bool>,
        #[serde(default)]
        active: Option<bool>,
        #[serde(default)]
        hidden: Option<bool>,
        #[serde(default)]
        alive: Option<bool>,
    },
    DisableSound {
        widget: ObjectId,
        #[serde(default = "default_true")]
        disabled: bool,
    },
    Forget {
        widget: ObjectId,
    },
}

/// Widget backed by a [`WidgetSpec`], with the mutable parts in cells so
/// `update` steps can change them while records are queued.
#[derive(Debug)]
pub struct ScriptedWidget {
    spec: WidgetSpec,
    drawable: Cell<bool>,
    active: Cell<bool>,
    hidden: Cell<bool>,
    alive: Cell<bool>,
}

impl ScriptedWidget {
    pub fn new(spec: WidgetSpec) -> Self {
        Self {
            drawable: Cell::new(spec.drawable),
            active: Cell::new(spec.active),
            hidden: Cell::new(spec.hidden),
            alive: Cell::new(true),
            spec,
        }
    }

    pub fn update(
        &self,
        drawable: Option<bool>,
        active: Option<bool>,
        hidden: Option<bool>,
        alive: Option<bool>,
    ) {
        if let Some(v) = drawable {
            self.drawable.set(v);
        }
        if let Some(v) = active {
            self.active.set(v);
        }
        if let Some(v) = hidden {
            self.hidden.set(v);
        }
        if let Some(v) = alive {
            self.alive.set(v);
        }
    }
}

impl Widget for ScriptedWidget {
    fn object_id(&self) -> ObjectId {
        self.spec.id
    }

    fn capabilities(&self) -> Capabilities {
        self.spec.capabilities
    }

    fn is_drawable(&self) -> bool {
        self.drawable.get()
    }

    fn is_alive(&self) -> bool {
        self.alive.get()
    }

    fn name(&self) -> Option<String> {
        self.spec.name.clone()
    }

    fn type_hint(&self) -> WindowTypeHint {
        self.spec.hint
    }

    fn message_type(&self) -> Option<MessageType> {
        self.spec.message_type
    }

    fn contains_menu(&self) -> bool {
        self.spec.contains_menu
    }

    fn has_submenu(&self) -> bool {
        self.spec.has_submenu
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn is_hidden_on_screen(&self) -> bool {
        self.hidden.get()
    }

    fn dialog_response(&self) -> Option<ResponseCode> {
        self.spec.response
    }
}
