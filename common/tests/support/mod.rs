//! In-memory document used to drive the drawer without a browser.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::{Rc, Weak},
};

use common::{
    dom::{Dom, DomEvent, EventKind, Handler, ListenTarget, Phase},
    DrawerError,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NodeId(usize);

struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

struct Entry {
    alive: Rc<Cell<bool>>,
    target: Option<usize>,
    kind: EventKind,
    phase: Phase,
    handler: Rc<RefCell<Handler<NodeId>>>,
}

struct Inner {
    nodes: Vec<NodeData>,
    body: usize,
    ready: bool,
    listeners: Vec<Option<Entry>>,
    dispatching: usize,
    fail_set_style: bool,
    fail_listen: Option<EventKind>,
}

const ROOT: usize = 0;

#[derive(Clone)]
pub struct FakeDom {
    inner: Rc<RefCell<Inner>>,
}

pub struct FakeListener {
    dom: Weak<RefCell<Inner>>,
    alive: Rc<Cell<bool>>,
    slot: usize,
}

impl Drop for FakeListener {
    fn drop(&mut self) {
        // a dead entry never fires again; the slot is reclaimed once no dispatch is running
        self.alive.set(false);
        if let Some(inner) = self.dom.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                if inner.dispatching == 0 {
                    inner.listeners[self.slot] = None;
                }
            }
        }
    }
}

pub struct FakeEvent {
    target: Option<NodeId>,
    key: Option<String>,
    prevented: Cell<bool>,
    stopped: Cell<bool>,
}

impl DomEvent<NodeId> for FakeEvent {
    fn target(&self) -> Option<NodeId> {
        self.target
    }

    fn key(&self) -> Option<String> {
        self.key.clone()
    }

    fn prevent_default(&self) {
        self.prevented.set(true);
    }

    fn stop_propagation(&self) {
        self.stopped.set(true);
    }
}

/// Result of a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

fn node(tag: &str, parent: Option<usize>) -> NodeData {
    NodeData {
        tag: tag.to_owned(),
        attributes: BTreeMap::new(),
        style: BTreeMap::new(),
        text: String::new(),
        parent,
        children: Vec::new(),
    }
}

impl FakeDom {
    /// A parsed document with an empty `<body>`.
    pub fn new() -> Self {
        let mut html = node("html", None);
        html.children.push(1);
        let body = node("body", Some(ROOT));
        Self {
            inner: Rc::new(RefCell::new(Inner {
                nodes: vec![html, body],
                body: 1,
                ready: true,
                listeners: Vec::new(),
                dispatching: 0,
                fail_set_style: false,
                fail_listen: None,
            })),
        }
    }

    /// A document still in `readyState == "loading"`.
    pub fn loading() -> Self {
        let dom = Self::new();
        dom.inner.borrow_mut().ready = false;
        dom
    }

    /// Appends `<tag id=id>` to `parent` (or the body).
    pub fn add(&self, parent: Option<NodeId>, tag: &str, id: Option<&str>) -> NodeId {
        let parent = parent.unwrap_or_else(|| NodeId(self.inner.borrow().body));
        let el = self.create_element(tag).unwrap();
        if let Some(id) = id {
            self.set_attribute(&el, "id", id).unwrap();
        }
        self.append_child(&parent, &el).unwrap();
        el
    }

    /// Every later `set_style` fails, like styling a non-HTML element in a browser.
    pub fn fail_set_style(&self) {
        self.inner.borrow_mut().fail_set_style = true;
    }

    /// Every later `listen` for `kind` fails.
    pub fn fail_listen(&self, kind: EventKind) {
        self.inner.borrow_mut().fail_listen = Some(kind);
    }

    pub fn count_by_id(&self, id: &str) -> usize {
        let inner = self.inner.borrow();
        descendants(&inner, ROOT)
            .into_iter()
            .filter(|n| inner.nodes[*n].attributes.get("id").map(String::as_str) == Some(id))
            .count()
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let inner = self.inner.borrow();
        let mut cur = Some(node.0);
        while let Some(n) = cur {
            if n == ROOT {
                return true;
            }
            cur = inner.nodes[n].parent;
        }
        false
    }

    pub fn listener_count(&self) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .flatten()
            .filter(|e| e.alive.get())
            .count()
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.inner.borrow().nodes[node.0].tag.clone()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.borrow().nodes[node.0]
            .children
            .iter()
            .map(|c| NodeId(*c))
            .collect()
    }

    pub fn set_ready(&self) -> Dispatched {
        self.inner.borrow_mut().ready = true;
        self.dispatch(None, EventKind::DomContentLoaded, None)
    }

    pub fn click(&self, node: NodeId) -> Dispatched {
        self.dispatch(Some(node.0), EventKind::Click, None)
    }

    /// Keydown on the body, the usual target when nothing has focus.
    pub fn key_down(&self, key: &str) -> Dispatched {
        let body = self.inner.borrow().body;
        self.dispatch(Some(body), EventKind::KeyDown, Some(key.to_owned()))
    }

    #[allow(clippy::type_complexity)]
    fn handlers(
        &self,
        at: Option<usize>,
        kind: EventKind,
        phase: Phase,
    ) -> Vec<(Rc<Cell<bool>>, Rc<RefCell<Handler<NodeId>>>)> {
        self.inner
            .borrow()
            .listeners
            .iter()
            .flatten()
            .filter(|e| e.target == at && e.kind == kind && e.phase == phase)
            .map(|e| (e.alive.clone(), e.handler.clone()))
            .collect()
    }

    fn dispatch(&self, target: Option<usize>, kind: EventKind, key: Option<String>) -> Dispatched {
        let event = FakeEvent {
            target: target.map(NodeId),
            key,
            prevented: Cell::new(false),
            stopped: Cell::new(false),
        };

        // document first, then html down to the target
        let mut path: Vec<Option<usize>> = Vec::new();
        {
            let inner = self.inner.borrow();
            let mut cur = target;
            while let Some(n) = cur {
                path.push(Some(n));
                cur = inner.nodes[n].parent;
            }
        }
        path.push(None);
        path.reverse();

        let last = path.len() - 1;
        let mut steps: Vec<(Option<usize>, Phase)> = path
            .iter()
            .take(last)
            .map(|n| (*n, Phase::Capture))
            .collect();
        steps.push((path[last], Phase::Capture));
        steps.push((path[last], Phase::Bubble));
        steps.extend(path.iter().take(last).rev().map(|n| (*n, Phase::Bubble)));

        self.inner.borrow_mut().dispatching += 1;
        let mut previous = None;
        for (at, phase) in steps {
            if event.stopped.get() && previous != Some(at) {
                break;
            }
            previous = Some(at);
            for (alive, handler) in self.handlers(at, kind, phase) {
                // removed by an earlier handler of this same event
                if !alive.get() {
                    continue;
                }
                let event: &dyn DomEvent<NodeId> = &event;
                let mut handler = handler.borrow_mut();
                (*handler)(event);
            }
        }

        {
            let mut inner = self.inner.borrow_mut();
            inner.dispatching -= 1;
            if inner.dispatching == 0 {
                for slot in inner.listeners.iter_mut() {
                    if slot.as_ref().is_some_and(|e| !e.alive.get()) {
                        *slot = None;
                    }
                }
            }
        }

        Dispatched {
            default_prevented: event.prevented.get(),
            propagation_stopped: event.stopped.get(),
        }
    }
}

fn descendants(inner: &Inner, from: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut stack: Vec<usize> = inner.nodes[from].children.iter().rev().copied().collect();
    while let Some(n) = stack.pop() {
        out.push(n);
        stack.extend(inner.nodes[n].children.iter().rev().copied());
    }
    out
}

fn classes(data: &NodeData) -> Vec<String> {
    data.attributes
        .get("class")
        .map(|c| c.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default()
}

fn matches(data: &NodeData, selector: &str) -> bool {
    if let Some(id) = selector.strip_prefix('#') {
        data.attributes.get("id").map(String::as_str) == Some(id)
    } else if let Some(class) = selector.strip_prefix('.') {
        classes(data).iter().any(|c| c == class)
    } else {
        data.tag.eq_ignore_ascii_case(selector)
    }
}

impl Dom for FakeDom {
    type Node = NodeId;
    type Listener = FakeListener;

    fn body(&self) -> Option<NodeId> {
        Some(NodeId(self.inner.borrow().body))
    }

    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_selector(&NodeId(ROOT), &format!("#{id}"))
    }

    fn query_selector(&self, parent: &NodeId, selector: &str) -> Option<NodeId> {
        let inner = self.inner.borrow();
        descendants(&inner, parent.0)
            .into_iter()
            .find(|n| matches(&inner.nodes[*n], selector))
            .map(NodeId)
    }

    fn is_ready(&self) -> bool {
        self.inner.borrow().ready
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, DrawerError> {
        let mut inner = self.inner.borrow_mut();
        inner.nodes.push(node(tag, None));
        Ok(NodeId(inner.nodes.len() - 1))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DrawerError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(old) = inner.nodes[child.0].parent {
            inner.nodes[old].children.retain(|c| *c != child.0);
        }
        inner.nodes[child.0].parent = Some(parent.0);
        inner.nodes[parent.0].children.push(child.0);
        Ok(())
    }

    fn remove(&self, node: &NodeId) {
        let mut inner = self.inner.borrow_mut();
        if let Some(parent) = inner.nodes[node.0].parent.take() {
            inner.nodes[parent].children.retain(|c| *c != node.0);
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.inner.borrow().nodes[node.0].attributes.get(name).cloned()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), DrawerError> {
        self.inner.borrow_mut().nodes[node.0]
            .attributes
            .insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn text_content(&self, node: &NodeId) -> Option<String> {
        let inner = self.inner.borrow();
        let mut text = inner.nodes[node.0].text.clone();
        for n in descendants(&inner, node.0) {
            text.push_str(&inner.nodes[n].text);
        }
        Some(text)
    }

    fn set_text_content(&self, node: &NodeId, text: &str) {
        let mut inner = self.inner.borrow_mut();
        let children = std::mem::take(&mut inner.nodes[node.0].children);
        for c in children {
            inner.nodes[c].parent = None;
        }
        inner.nodes[node.0].text = text.to_owned();
    }

    fn add_class(&self, node: &NodeId, class: &str) -> Result<(), DrawerError> {
        let mut inner = self.inner.borrow_mut();
        let data = &mut inner.nodes[node.0];
        let mut list = classes(data);
        if !list.iter().any(|c| c == class) {
            list.push(class.to_owned());
        }
        data.attributes.insert("class".to_owned(), list.join(" "));
        Ok(())
    }

    fn remove_class(&self, node: &NodeId, class: &str) -> Result<(), DrawerError> {
        let mut inner = self.inner.borrow_mut();
        let data = &mut inner.nodes[node.0];
        let list = classes(data)
            .into_iter()
            .filter(|c| c != class)
            .collect::<Vec<_>>();
        data.attributes.insert("class".to_owned(), list.join(" "));
        Ok(())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        classes(&self.inner.borrow().nodes[node.0])
            .iter()
            .any(|c| c == class)
    }

    fn style(&self, node: &NodeId, property: &str) -> String {
        self.inner.borrow().nodes[node.0]
            .style
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> Result<(), DrawerError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_set_style {
            return Err(DrawerError::Dom(format!("<{}> has no inline style", inner.nodes[node.0].tag)));
        }
        let style = &mut inner.nodes[node.0].style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_owned(), value.to_owned());
        }
        Ok(())
    }

    fn listen(
        &self,
        target: ListenTarget<NodeId>,
        kind: EventKind,
        phase: Phase,
        handler: Handler<NodeId>,
    ) -> Result<FakeListener, DrawerError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_listen == Some(kind) {
            return Err(DrawerError::Dom(format!("cannot listen for {}", kind.as_str())));
        }
        let alive = Rc::new(Cell::new(true));
        inner.listeners.push(Some(Entry {
            alive: alive.clone(),
            target: match target {
                ListenTarget::Document => None,
                ListenTarget::Node(n) => Some(n.0),
            },
            kind,
            phase,
            handler: Rc::new(RefCell::new(handler)),
        }));
        Ok(FakeListener {
            dom: Rc::downgrade(&self.inner),
            alive,
            slot: inner.listeners.len() - 1,
        })
    }
}
