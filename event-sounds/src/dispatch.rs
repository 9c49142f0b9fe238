//! Translation of surviving records into semantic sound events.

use tracing::debug;

use crate::events::{EventRecord, SignalKind, SoundEventId, WindowState};
use crate::playback::PlaybackContext;
use crate::state::{DispatchState, ObjectStateStore};
use crate::widget::{Capabilities, MessageType, ResponseCode, Widget, WindowTypeHint};

/// Sound chosen for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    pub id: SoundEventId,
    pub description: &'static str,
    anchor: Anchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Widget,
    InputEvent,
}

impl Dispatched {
    fn widget(id: SoundEventId, description: &'static str) -> Self {
        Self {
            id,
            description,
            anchor: Anchor::Widget,
        }
    }

    fn input(id: SoundEventId, description: &'static str) -> Self {
        Self {
            id,
            description,
            anchor: Anchor::InputEvent,
        }
    }

    /// Playback context for this sound. Input-feedback sounds use the captured
    /// input event and fall back to the widget when none was captured.
    pub fn context<'a>(&self, record: &'a EventRecord) -> PlaybackContext<'a> {
        match (self.anchor, record.input_event()) {
            (Anchor::InputEvent, Some(event)) => PlaybackContext::InputEvent(event),
            _ => PlaybackContext::Widget(record.source()),
        }
    }
}

/// Sound for a dialog response, `None` for responses with no dialog sound of
/// their own.
pub fn response_sound(response: ResponseCode) -> Option<SoundEventId> {
    match response {
        ResponseCode::Reject
        | ResponseCode::DeleteEvent
        | ResponseCode::Cancel
        | ResponseCode::No => Some(SoundEventId::DialogCancel),
        ResponseCode::Accept
        | ResponseCode::Ok
        | ResponseCode::Close
        | ResponseCode::Yes
        | ResponseCode::Apply => Some(SoundEventId::DialogOk),
        ResponseCode::None | ResponseCode::Help | ResponseCode::Custom(_) => None,
    }
}

pub fn message_sound(message_type: MessageType) -> Option<SoundEventId> {
    match message_type {
        MessageType::Info => Some(SoundEventId::DialogInformation),
        MessageType::Warning => Some(SoundEventId::DialogWarning),
        MessageType::Question => Some(SoundEventId::DialogQuestion),
        MessageType::Error => Some(SoundEventId::DialogError),
        MessageType::Other => None,
    }
}

/// The dispatch table. Owns the menu flag shared by every menu chain.
#[derive(Debug, Default)]
pub struct SoundDispatcher {
    state: DispatchState,
}

impl SoundDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Picks the sound for `record`, if any.
    ///
    /// Updates the menu flag and the record source's was-hidden flag as a
    /// side effect; nothing else is touched.
    pub fn dispatch(
        &mut self,
        record: &EventRecord,
        objects: &mut ObjectStateStore,
    ) -> Option<Dispatched> {
        let source = record.source();

        if objects.is_sound_disabled(record.object_id()) {
            debug!("Sounds disabled for {}, skipping {:?}", record.object_id(), record);
            return None;
        }

        let caps = source.capabilities();

        match record.signal() {
            SignalKind::WidgetShow if caps.contains(Capabilities::WINDOW) => {
                self.window_shown(source)
            }
            SignalKind::WidgetHide if caps.contains(Capabilities::WINDOW) => {
                self.window_hidden(source)
            }
            SignalKind::DialogResponse if caps.contains(Capabilities::DIALOG) => {
                let id = record.response().and_then(response_sound);
                Some(match id {
                    Some(id) => Dispatched::widget(id, "Dialog closed"),
                    None => Dispatched::widget(SoundEventId::WindowClose, "Window closed"),
                })
            }
            SignalKind::WindowStateChanged if caps.contains(Capabilities::WINDOW) => {
                window_state_changed(record, objects)
            }
            SignalKind::CheckMenuItemToggled if caps.contains(Capabilities::CHECK_MENU_ITEM) => {
                Some(toggled(
                    record,
                    "Check menu item checked",
                    "Check menu item unchecked",
                ))
            }
            SignalKind::MenuItemActivate
                if caps.contains(Capabilities::MENU_ITEM) && !source.has_submenu() =>
            {
                Some(Dispatched::input(SoundEventId::MenuClick, "Menu item clicked"))
            }
            SignalKind::ToggleButtonToggled
                if caps.contains(Capabilities::TOGGLE_BUTTON)
                    && !caps.contains(Capabilities::IN_COMBO_BOX) =>
            {
                Some(toggled(
                    record,
                    "Toggle button checked",
                    "Toggle button unchecked",
                ))
            }
            SignalKind::ButtonPressed | SignalKind::ButtonReleased => button(record),
            SignalKind::NotebookSwitchPage if caps.contains(Capabilities::NOTEBOOK) => Some(
                Dispatched::input(SoundEventId::NotebookTabChanged, "Tab changed"),
            ),
            SignalKind::TreeViewCursorChanged if caps.contains(Capabilities::TREE_VIEW) => {
                Some(Dispatched::input(SoundEventId::ItemSelected, "Item selected"))
            }
            SignalKind::IconViewSelectionChanged if caps.contains(Capabilities::ICON_VIEW) => {
                Some(Dispatched::input(SoundEventId::ItemSelected, "Item selected"))
            }
            _ => None,
        }
    }

    fn window_shown(&mut self, source: &dyn Widget) -> Option<Dispatched> {
        let hint = source.type_hint();

        if hint.is_menu() {
            let shown = if self.state.menu_popped_up {
                Dispatched::widget(SoundEventId::MenuReplace, "Menu replaced")
            } else {
                Dispatched::widget(SoundEventId::MenuPopup, "Menu popped up")
            };
            self.state.menu_popped_up = true;
            return Some(shown);
        }

        if hint == WindowTypeHint::Tooltip {
            return Some(Dispatched::widget(
                SoundEventId::TooltipPopup,
                "Tooltip popped up",
            ));
        }

        if !hint.is_normal_or_dialog() {
            return None;
        }

        let message = source
            .has(Capabilities::MESSAGE_DIALOG)
            .then(|| source.message_type())
            .flatten()
            .and_then(message_sound);

        Some(match message {
            Some(id) => Dispatched::widget(id, "Message dialog shown"),
            None => Dispatched::widget(SoundEventId::WindowNew, "Window shown"),
        })
    }

    fn window_hidden(&mut self, source: &dyn Widget) -> Option<Dispatched> {
        let hint = source.type_hint();

        if hint.is_menu() {
            self.state.menu_popped_up = false;
            return source
                .contains_menu()
                .then(|| Dispatched::widget(SoundEventId::MenuPopdown, "Menu popped down"));
        }

        if hint == WindowTypeHint::Tooltip {
            return Some(Dispatched::widget(
                SoundEventId::TooltipPopdown,
                "Tooltip popped down",
            ));
        }

        hint.is_normal_or_dialog()
            .then(|| Dispatched::widget(SoundEventId::WindowClose, "Window closed"))
    }
}

fn window_state_changed(
    record: &EventRecord,
    objects: &mut ObjectStateStore,
) -> Option<Dispatched> {
    let state = record.window_state()?;
    let max_bits = WindowState::MAXIMIZED | WindowState::FULLSCREEN;

    let hidden = record.source().is_hidden_on_screen();
    let was_hidden = objects.replace_was_hidden(record.object_id(), hidden);

    let iconify_changed = state.changed(WindowState::ICONIFIED);
    let iconified = state.is_set(WindowState::ICONIFIED);

    if iconify_changed && iconified && hidden && !was_hidden {
        Some(Dispatched::widget(
            SoundEventId::WindowMinimized,
            "Window minimized",
        ))
    } else if state.changed(max_bits) && state.is_set(max_bits) {
        Some(Dispatched::widget(
            SoundEventId::WindowMaximized,
            "Window maximized",
        ))
    } else if iconify_changed && !iconified && was_hidden {
        Some(Dispatched::widget(
            SoundEventId::WindowUnminimized,
            "Window unminimized",
        ))
    } else if state.changed(max_bits) && !state.is_set(max_bits) {
        Some(Dispatched::widget(
            SoundEventId::WindowUnmaximized,
            "Window unmaximized",
        ))
    } else {
        None
    }
}

fn toggled(record: &EventRecord, on: &'static str, off: &'static str) -> Dispatched {
    let active = record
        .toggle_state()
        .unwrap_or_else(|| record.source().is_active());

    if active {
        Dispatched::input(SoundEventId::ButtonToggleOn, on)
    } else {
        Dispatched::input(SoundEventId::ButtonToggleOff, off)
    }
}

fn button(record: &EventRecord) -> Option<Dispatched> {
    let source = record.source();
    let pressed = record.signal() == SignalKind::ButtonPressed;

    if source.has(Capabilities::TOGGLE_BUTTON) {
        return None;
    }

    if source.has(Capabilities::LINK_BUTTON) {
        return Some(if pressed {
            Dispatched::input(SoundEventId::LinkPressed, "Link pressed")
        } else {
            Dispatched::input(SoundEventId::LinkReleased, "Link released")
        });
    }

    if !source.has(Capabilities::BUTTON) {
        return None;
    }

    if pressed {
        return Some(Dispatched::input(
            SoundEventId::ButtonPressed,
            "Button pressed",
        ));
    }

    // The dialog response will produce its own sound.
    if source.dialog_response().and_then(response_sound).is_some() {
        debug!("Suppressing release on response widget {}", record.object_id());
        return None;
    }

    Some(Dispatched::input(
        SoundEventId::ButtonReleased,
        "Button released",
    ))
}
