use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use crate::errors::{Result, SoundEventError};
use crate::widget::{ObjectId, ResponseCode, Widget};

/// Raw lifecycle signal observed on a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    WidgetShow,
    WidgetHide,
    DialogResponse,
    MenuItemActivate,
    CheckMenuItemToggled,
    ToggleButtonToggled,
    ButtonPressed,
    ButtonReleased,
    WindowStateChanged,
    NotebookSwitchPage,
    TreeViewCursorChanged,
    IconViewSelectionChanged,
}

impl SignalKind {
    /// Show, hide and window-state signals only matter for windows.
    pub fn is_window_lifecycle(self) -> bool {
        matches!(
            self,
            SignalKind::WidgetShow | SignalKind::WidgetHide | SignalKind::WindowStateChanged
        )
    }

    /// Signals submitted even when the source is no longer drawable.
    pub fn bypasses_visibility(self) -> bool {
        matches!(self, SignalKind::WidgetHide | SignalKind::DialogResponse)
    }

    /// Checks that `aux` carries the payload this signal expects.
    pub fn validate_aux(self, aux: Option<&AuxValue>) -> Result<()> {
        let ok = match (self, aux) {
            (SignalKind::DialogResponse, Some(AuxValue::Response(_))) => true,
            (SignalKind::WindowStateChanged, Some(AuxValue::WindowState(_))) => true,
            (
                SignalKind::CheckMenuItemToggled | SignalKind::ToggleButtonToggled,
                None | Some(AuxValue::Toggle(_)),
            ) => true,
            (SignalKind::DialogResponse | SignalKind::WindowStateChanged, _) => false,
            (SignalKind::CheckMenuItemToggled | SignalKind::ToggleButtonToggled, _) => false,
            (_, None) => true,
            (_, Some(_)) => false,
        };

        if ok {
            Ok(())
        } else {
            Err(SoundEventError::InvalidArgument(format!(
                "{self:?} cannot carry auxiliary payload {aux:?}"
            )))
        }
    }
}

bitflags::bitflags! {
    /// Window state bits as reported by the windowing system.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct WindowState: u32 {
        const WITHDRAWN  = 1 << 0;
        const ICONIFIED  = 1 << 1;
        const MAXIMIZED  = 1 << 2;
        const STICKY     = 1 << 3;
        const FULLSCREEN = 1 << 4;
        const ABOVE      = 1 << 5;
        const BELOW      = 1 << 6;
    }
}

/// Payload of a window-state change: which bits changed and the new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowStateEvent {
    pub changed_mask: WindowState,
    pub new_state: WindowState,
}

impl WindowStateEvent {
    pub fn new(changed_mask: WindowState, new_state: WindowState) -> Self {
        Self {
            changed_mask,
            new_state,
        }
    }

    pub fn changed(&self, bits: WindowState) -> bool {
        self.changed_mask.intersects(bits)
    }

    pub fn is_set(&self, bits: WindowState) -> bool {
        self.new_state.intersects(bits)
    }
}

/// Signal-specific payload carried by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuxValue {
    Response(ResponseCode),
    Toggle(bool),
    WindowState(WindowStateEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputEventKind {
    ButtonPress,
    ButtonRelease,
    KeyPress,
    KeyRelease,
    Other,
}

/// Snapshot of the low-level input event that caused a signal, kept for
/// positioning the sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: InputEventKind,
    /// Event time in milliseconds, as reported by the input system.
    pub time_ms: u32,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyval: Option<u32>,
}

/// One raw signal occurrence waiting in the pending queue.
///
/// The record owns a strong reference to its source, so the source outlives
/// the record unless the host tears it down explicitly (see
/// [`Widget::is_alive`]).
pub struct EventRecord {
    signal: SignalKind,
    source: Rc<dyn Widget>,
    aux: Option<AuxValue>,
    input_event: Option<InputEvent>,
    sequence: u64,
}

impl EventRecord {
    pub fn new(
        signal: SignalKind,
        source: Rc<dyn Widget>,
        aux: Option<AuxValue>,
        input_event: Option<InputEvent>,
        sequence: u64,
    ) -> Result<Self> {
        signal.validate_aux(aux.as_ref())?;
        Ok(Self {
            signal,
            source,
            aux,
            input_event,
            sequence,
        })
    }

    pub fn signal(&self) -> SignalKind {
        self.signal
    }

    pub fn source(&self) -> &dyn Widget {
        self.source.as_ref()
    }

    pub fn object_id(&self) -> ObjectId {
        self.source.object_id()
    }

    pub fn aux(&self) -> Option<&AuxValue> {
        self.aux.as_ref()
    }

    pub fn input_event(&self) -> Option<&InputEvent> {
        self.input_event.as_ref()
    }

    /// Position in emission order.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn is_alive(&self) -> bool {
        self.source.is_alive()
    }

    pub fn same_source(&self, other: &EventRecord) -> bool {
        self.object_id() == other.object_id()
    }

    pub fn response(&self) -> Option<ResponseCode> {
        match self.aux {
            Some(AuxValue::Response(code)) => Some(code),
            _ => None,
        }
    }

    pub fn toggle_state(&self) -> Option<bool> {
        match self.aux {
            Some(AuxValue::Toggle(active)) => Some(active),
            _ => None,
        }
    }

    pub fn window_state(&self) -> Option<&WindowStateEvent> {
        match &self.aux {
            Some(AuxValue::WindowState(state)) => Some(state),
            _ => None,
        }
    }
}

impl fmt::Debug for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug_struct = f.debug_struct("EventRecord");
        debug_struct
            .field("sequence", &self.sequence)
            .field("signal", &self.signal)
            .field("source", &self.object_id());

        if let Some(name) = self.source.name() {
            debug_struct.field("name", &name);
        }
        if let Some(ref aux) = self.aux {
            debug_struct.field("aux", aux);
        }
        if self.input_event.is_some() {
            debug_struct.field("input_event", &true);
        }

        debug_struct.finish()
    }
}

/// Semantic sound event handed to the playback subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundEventId {
    DialogError,
    DialogWarning,
    DialogInformation,
    DialogQuestion,
    DialogOk,
    DialogCancel,
    WindowNew,
    WindowClose,
    WindowMinimized,
    WindowUnminimized,
    WindowMaximized,
    WindowUnmaximized,
    NotebookTabChanged,
    ItemSelected,
    LinkPressed,
    LinkReleased,
    ButtonPressed,
    ButtonReleased,
    ButtonToggleOn,
    ButtonToggleOff,
    MenuClick,
    MenuPopup,
    MenuPopdown,
    MenuReplace,
    TooltipPopup,
    TooltipPopdown,
}

impl SoundEventId {
    pub fn as_str(self) -> &'static str {
        match self {
            SoundEventId::DialogError => "dialog-error",
            SoundEventId::DialogWarning => "dialog-warning",
            SoundEventId::DialogInformation => "dialog-information",
            SoundEventId::DialogQuestion => "dialog-question",
            SoundEventId::DialogOk => "dialog-ok",
            SoundEventId::DialogCancel => "dialog-cancel",
            SoundEventId::WindowNew => "window-new",
            SoundEventId::WindowClose => "window-close",
            SoundEventId::WindowMinimized => "window-minimized",
            SoundEventId::WindowUnminimized => "window-unminimized",
            SoundEventId::WindowMaximized => "window-maximized",
            SoundEventId::WindowUnmaximized => "window-unmaximized",
            SoundEventId::NotebookTabChanged => "notebook-tab-changed",
            SoundEventId::ItemSelected => "item-selected",
            SoundEventId::LinkPressed => "link-pressed",
            SoundEventId::LinkReleased => "link-released",
            SoundEventId::ButtonPressed => "button-pressed",
            SoundEventId::ButtonReleased => "button-released",
            SoundEventId::ButtonToggleOn => "button-toggle-on",
            SoundEventId::ButtonToggleOff => "button-toggle-off",
            SoundEventId::MenuClick => "menu-click",
            SoundEventId::MenuPopup => "menu-popup",
            SoundEventId::MenuPopdown => "menu-popdown",
            SoundEventId::MenuReplace => "menu-replace",
            SoundEventId::TooltipPopup => "tooltip-popup",
            SoundEventId::TooltipPopdown => "tooltip-popdown",
        }
    }

    /// Direct feedback to pointer/keyboard input, as opposed to sounds that
    /// announce windows, dialogs and menus.
    pub fn is_input_feedback(self) -> bool {
        matches!(
            self,
            SoundEventId::NotebookTabChanged
                | SoundEventId::ItemSelected
                | SoundEventId::LinkPressed
                | SoundEventId::LinkReleased
                | SoundEventId::ButtonPressed
                | SoundEventId::ButtonReleased
                | SoundEventId::ButtonToggleOn
                | SoundEventId::ButtonToggleOff
                | SoundEventId::MenuClick
        )
    }
}

impl fmt::Display for SoundEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
