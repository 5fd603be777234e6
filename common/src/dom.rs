//! The slice of the document the drawer touches.
//!
//! `Dom` is implemented over `web_sys` in the browser and by an in-memory fake in
//! tests. Methods take `&self`; implementations are expected to be cheap handles
//! with interior mutability, the way a `web_sys::Document` is.

use crate::DrawerError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EventKind {
    Click,
    KeyDown,
    DomContentLoaded,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
            EventKind::DomContentLoaded => "DOMContentLoaded",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Phase {
    Capture,
    #[default]
    Bubble,
}

#[derive(Clone, Debug)]
pub enum ListenTarget<N> {
    Document,
    Node(N),
}

/// What a handler can see of, and do to, a dispatched event.
pub trait DomEvent<N> {
    fn target(&self) -> Option<N>;
    /// `KeyboardEvent.key`, `None` for anything that is not a keyboard event.
    fn key(&self) -> Option<String>;
    fn prevent_default(&self);
    fn stop_propagation(&self);
}

pub type Handler<N> = Box<dyn FnMut(&dyn DomEvent<N>)>;

pub trait Dom: Clone + 'static {
    type Node: Clone + PartialEq + 'static;
    /// Dropping the listener unregisters it.
    type Listener;

    fn body(&self) -> Option<Self::Node>;
    fn get_element_by_id(&self, id: &str) -> Option<Self::Node>;
    /// First descendant of `parent` matching a simple selector (`#id`, `.class` or a tag).
    fn query_selector(&self, parent: &Self::Node, selector: &str) -> Option<Self::Node>;
    /// `true` once the document has finished parsing (`readyState != "loading"`).
    fn is_ready(&self) -> bool;

    fn create_element(&self, tag: &str) -> Result<Self::Node, DrawerError>;
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DrawerError>;
    fn remove(&self, node: &Self::Node);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str)
        -> Result<(), DrawerError>;
    fn text_content(&self, node: &Self::Node) -> Option<String>;
    fn set_text_content(&self, node: &Self::Node, text: &str);

    fn add_class(&self, node: &Self::Node, class: &str) -> Result<(), DrawerError>;
    fn remove_class(&self, node: &Self::Node, class: &str) -> Result<(), DrawerError>;
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Inline style property, empty when unset.
    fn style(&self, node: &Self::Node, property: &str) -> String;
    fn set_style(&self, node: &Self::Node, property: &str, value: &str)
        -> Result<(), DrawerError>;

    fn listen(
        &self,
        target: ListenTarget<Self::Node>,
        kind: EventKind,
        phase: Phase,
        handler: Handler<Self::Node>,
    ) -> Result<Self::Listener, DrawerError>;
}
