//! Capability model for the widgets that emit lifecycle signals.
//!
//! The engine never looks at concrete widget classes. A host wraps each of its
//! toolkit objects in something implementing [`Widget`] and reports which
//! [`Capabilities`] the object has; the coalescing filter and the dispatch
//! table switch on those capabilities only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Debug;

/// Stable identity of a source object for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

bitflags::bitflags! {
    /// What a source object is, as far as sound dispatch cares.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Capabilities: u16 {
        const WINDOW          = 1 << 0;
        const DIALOG          = 1 << 1;
        const MESSAGE_DIALOG  = 1 << 2;
        const MENU            = 1 << 3;
        const MENU_ITEM       = 1 << 4;
        const CHECK_MENU_ITEM = 1 << 5;
        const TOGGLE_BUTTON   = 1 << 6;
        /// Toggle button living inside a combo-box control.
        const IN_COMBO_BOX    = 1 << 7;
        const LINK_BUTTON     = 1 << 8;
        const BUTTON          = 1 << 9;
        const NOTEBOOK        = 1 << 10;
        const TREE_VIEW       = 1 << 11;
        const ICON_VIEW       = 1 << 12;
    }
}

/// Window classification as reported by the windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowTypeHint {
    #[default]
    Normal,
    Dialog,
    Menu,
    Toolbar,
    Splashscreen,
    Utility,
    Dock,
    Desktop,
    DropdownMenu,
    PopupMenu,
    Tooltip,
    Notification,
    Combo,
    Dnd,
}

impl WindowTypeHint {
    /// Popup, dropdown and plain menu windows.
    pub fn is_menu(self) -> bool {
        matches!(
            self,
            WindowTypeHint::PopupMenu | WindowTypeHint::DropdownMenu | WindowTypeHint::Menu
        )
    }

    pub fn is_normal_or_dialog(self) -> bool {
        matches!(self, WindowTypeHint::Normal | WindowTypeHint::Dialog)
    }
}

/// Severity of a message-style dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    Info,
    Warning,
    Question,
    Error,
    Other,
}

/// Dialog response code. Predefined responses are negative, application
/// defined ones are zero or positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    None,
    Reject,
    Accept,
    DeleteEvent,
    Ok,
    Cancel,
    Close,
    Yes,
    No,
    Apply,
    Help,
    Custom(i32),
}

impl ResponseCode {
    pub fn code(self) -> i32 {
        match self {
            ResponseCode::None => -1,
            ResponseCode::Reject => -2,
            ResponseCode::Accept => -3,
            ResponseCode::DeleteEvent => -4,
            ResponseCode::Ok => -5,
            ResponseCode::Cancel => -6,
            ResponseCode::Close => -7,
            ResponseCode::Yes => -8,
            ResponseCode::No => -9,
            ResponseCode::Apply => -10,
            ResponseCode::Help => -11,
            ResponseCode::Custom(code) => code,
        }
    }
}

impl From<i32> for ResponseCode {
    fn from(code: i32) -> Self {
        match code {
            -1 => ResponseCode::None,
            -2 => ResponseCode::Reject,
            -3 => ResponseCode::Accept,
            -4 => ResponseCode::DeleteEvent,
            -5 => ResponseCode::Ok,
            -6 => ResponseCode::Cancel,
            -7 => ResponseCode::Close,
            -8 => ResponseCode::Yes,
            -9 => ResponseCode::No,
            -10 => ResponseCode::Apply,
            -11 => ResponseCode::Help,
            other => ResponseCode::Custom(other),
        }
    }
}

impl Serialize for ResponseCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

impl<'de> Deserialize<'de> for ResponseCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i32::deserialize(deserializer).map(ResponseCode::from)
    }
}

/// Interface the host implements for every object that can emit signals.
///
/// Only [`Widget::object_id`], [`Widget::capabilities`] and
/// [`Widget::is_drawable`] are required; the rest default to the answer a
/// plain, non-window widget would give.
pub trait Widget: Debug {
    fn object_id(&self) -> ObjectId;
    fn capabilities(&self) -> Capabilities;

    /// Whether the object is currently mapped and drawable.
    fn is_drawable(&self) -> bool;

    /// `false` once the host has torn the object down, even if records still
    /// hold a reference to it.
    fn is_alive(&self) -> bool {
        true
    }

    /// Label shown next to the object id when records are logged.
    fn name(&self) -> Option<String> {
        None
    }

    fn type_hint(&self) -> WindowTypeHint {
        WindowTypeHint::Normal
    }

    fn message_type(&self) -> Option<MessageType> {
        None
    }

    /// For a menu-hint window: its child is a menu.
    fn contains_menu(&self) -> bool {
        false
    }

    /// For a menu item: it opens a submenu rather than performing an action.
    fn has_submenu(&self) -> bool {
        false
    }

    /// Current state of a check menu item or toggle button.
    fn is_active(&self) -> bool {
        false
    }

    /// Whether the window manager currently reports the window as hidden.
    fn is_hidden_on_screen(&self) -> bool {
        false
    }

    /// Response code this widget is bound to in its enclosing dialog, if any.
    fn dialog_response(&self) -> Option<ResponseCode> {
        None
    }

    fn has(&self, capability: Capabilities) -> bool {
        self.capabilities().contains(capability)
    }
}
