use anyhow::anyhow;
use common::{
    dom::{Dom, DomEvent, EventKind, Handler, ListenTarget, Phase},
    DrawerError,
};
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent};

#[derive(Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new() -> anyhow::Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| anyhow!("no window document"))?;
        Ok(Self { document })
    }
}

/// `document.readyState` is `"loading"` until parsing finishes.
fn is_parsed(ready_state: &str) -> bool {
    ready_state != "loading"
}

fn js_err(e: JsValue) -> DrawerError {
    DrawerError::Dom(format!("{e:?}"))
}

struct WebEvent<'a>(&'a Event);

impl DomEvent<Element> for WebEvent<'_> {
    fn target(&self) -> Option<Element> {
        self.0.target().and_then(|t| t.dyn_into::<Element>().ok())
    }

    fn key(&self) -> Option<String> {
        self.0.dyn_ref::<KeyboardEvent>().map(|e| e.key())
    }

    fn prevent_default(&self) {
        self.0.prevent_default();
    }

    fn stop_propagation(&self) {
        self.0.stop_propagation();
    }
}

impl Dom for WebDom {
    type Node = Element;
    type Listener = EventListener;

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn get_element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_selector(&self, parent: &Element, selector: &str) -> Option<Element> {
        parent.query_selector(selector).ok().flatten()
    }

    fn is_ready(&self) -> bool {
        is_parsed(&self.document.ready_state())
    }

    fn create_element(&self, tag: &str) -> Result<Element, DrawerError> {
        self.document.create_element(tag).map_err(js_err)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DrawerError> {
        parent.append_child(child).map(|_| ()).map_err(js_err)
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<(), DrawerError> {
        node.set_attribute(name, value).map_err(js_err)
    }

    fn text_content(&self, node: &Element) -> Option<String> {
        node.text_content()
    }

    fn set_text_content(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn add_class(&self, node: &Element, class: &str) -> Result<(), DrawerError> {
        node.class_list().add_1(class).map_err(js_err)
    }

    fn remove_class(&self, node: &Element, class: &str) -> Result<(), DrawerError> {
        node.class_list().remove_1(class).map_err(js_err)
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn style(&self, node: &Element, property: &str) -> String {
        node.dyn_ref::<HtmlElement>()
            .and_then(|el| el.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> Result<(), DrawerError> {
        let style = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| DrawerError::Dom(format!("<{}> has no inline style", node.tag_name())))?
            .style();
        if value.is_empty() {
            style.remove_property(property).map(|_| ()).map_err(js_err)
        } else {
            style.set_property(property, value).map_err(js_err)
        }
    }

    fn listen(
        &self,
        target: ListenTarget<Element>,
        kind: EventKind,
        phase: Phase,
        mut handler: Handler<Element>,
    ) -> Result<EventListener, DrawerError> {
        let target: EventTarget = match target {
            ListenTarget::Document => self.document.clone().into(),
            ListenTarget::Node(node) => node.into(),
        };
        // not passive, the trigger handler cancels navigation
        let options = EventListenerOptions {
            phase: match phase {
                Phase::Capture => EventListenerPhase::Capture,
                Phase::Bubble => EventListenerPhase::Bubble,
            },
            passive: false,
        };
        Ok(EventListener::new_with_options(
            &target,
            kind.as_str(),
            options,
            move |event| {
                let event: &dyn DomEvent<Element> = &WebEvent(event);
                handler(event)
            },
        ))
    }
}
