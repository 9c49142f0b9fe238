use std::cell::Cell;
use std::rc::Rc;

use crate::widget::{
    Capabilities, MessageType, ObjectId, ResponseCode, Widget, WindowTypeHint,
};

#[derive(Debug)]
pub(crate) struct TestWidget {
    id: ObjectId,
    name: Option<String>,
    capabilities: Capabilities,
    hint: WindowTypeHint,
    message_type: Option<MessageType>,
    contains_menu: bool,
    has_submenu: bool,
    response: Option<ResponseCode>,
    drawable: Cell<bool>,
    alive: Cell<bool>,
    active: Cell<bool>,
    hidden: Cell<bool>,
}

impl TestWidget {
    pub(crate) fn new(id: u64, capabilities: Capabilities) -> Self {
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

    pub(crate) fn window(id: u64) -> Self {
        Self::new(id, Capabilities::WINDOW)
    }

    pub(crate) fn dialog(id: u64) -> Self {
        Self::new(id, Capabilities::WINDOW | Capabilities::DIALOG).with_hint(WindowTypeHint::Dialog)
    }

    pub(crate) fn message_dialog(id: u64, message_type: MessageType) -> Self {
        let mut widget = Self::new(
            id,
            Capabilities::WINDOW | Capabilities::DIALOG | Capabilities::MESSAGE_DIALOG,
        )
        .with_hint(WindowTypeHint::Dialog);
        widget.message_type = Some(message_type);
        widget
    }

    pub(crate) fn menu_window(id: u64) -> Self {
        let mut widget = Self::new(id, Capabilities::WINDOW).with_hint(WindowTypeHint::PopupMenu);
        widget.contains_menu = true;
        widget
    }

    pub(crate) fn tooltip(id: u64) -> Self {
        Self::new(id, Capabilities::WINDOW).with_hint(WindowTypeHint::Tooltip)
    }

    pub(crate) fn button(id: u64) -> Self {
        Self::new(id, Capabilities::BUTTON)
    }

    pub(crate) fn link_button(id: u64) -> Self {
        Self::new(id, Capabilities::BUTTON | Capabilities::LINK_BUTTON)
    }

    pub(crate) fn toggle_button(id: u64) -> Self {
        Self::new(id, Capabilities::BUTTON | Capabilities::TOGGLE_BUTTON)
    }

    pub(crate) fn check_menu_item(id: u64) -> Self {
        Self::new(id, Capabilities::MENU_ITEM | Capabilities::CHECK_MENU_ITEM)
    }

    pub(crate) fn menu_item(id: u64, has_submenu: bool) -> Self {
        let mut widget = Self::new(id, Capabilities::MENU_ITEM);
        widget.has_submenu = has_submenu;
        widget
    }

    pub(crate) fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub(crate) fn with_hint(mut self, hint: WindowTypeHint) -> Self {
        self.hint = hint;
        self
    }

    pub(crate) fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities |= capabilities;
        self
    }

    pub(crate) fn with_response(mut self, response: ResponseCode) -> Self {
        self.response = Some(response);
        self
    }

    pub(crate) fn with_contains_menu(mut self, contains_menu: bool) -> Self {
        self.contains_menu = contains_menu;
        self
    }

    pub(crate) fn into_rc(self) -> Rc<TestWidget> {
        Rc::new(self)
    }

    pub(crate) fn set_drawable(&self, drawable: bool) {
        self.drawable.set(drawable);
    }

    pub(crate) fn set_alive(&self, alive: bool) {
        self.alive.set(alive);
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    pub(crate) fn set_hidden(&self, hidden: bool) {
        self.hidden.set(hidden);
    }
}

impl Widget for TestWidget {
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
