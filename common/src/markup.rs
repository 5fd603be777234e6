use std::collections::HashMap;

use crate::{
    dom::Dom,
    structs::{DrawerConfig, NavLink},
    DrawerError,
};

/// A detached element description, turned into real nodes by [`mount`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementSpec {
    pub tag: &'static str,
    pub id: Option<String>,
    pub class: Option<&'static str>,
    pub attributes: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    fn attr(mut self, name: &'static str, value: &str) -> Self {
        self.attributes.push((name, value.to_owned()));
        self
    }

    fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_owned());
        self
    }

    fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    fn link(class: &'static str, link: &NavLink) -> Self {
        Self::new("a")
            .class(class)
            .attr("href", &link.href)
            .text(&link.label)
    }

    /// Depth-first walk, used by tests and by [`mount`] bookkeeping.
    pub fn find_by_id(&self, id: &str) -> Option<&ElementSpec> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }
}

/// Overlay, panel, header, links and footer for one drawer.
pub fn drawer_tree(config: &DrawerConfig, glyph: char) -> ElementSpec {
    let header = ElementSpec::new("div")
        .class("drawer-header")
        .child(
            ElementSpec::new("div")
                .class("drawer-avatar")
                .text(&glyph.to_string()),
        )
        .child(ElementSpec::new("div").class("drawer-title").text(&config.title))
        .child(
            ElementSpec::new("button")
                .class("drawer-close")
                .id(&config.close_id)
                .attr("aria-label", "Close")
                .text("\u{2715}"),
        );

    let content = config.links.iter().fold(
        ElementSpec::new("div").class("drawer-content"),
        |content, link| content.child(ElementSpec::link("drawer-link", link)),
    );

    let footer = ElementSpec::new("div")
        .class("drawer-footer")
        .child(ElementSpec::link("drawer-signout", &config.sign_out));

    let panel = ElementSpec::new("div")
        .class("drawer")
        .id(&config.panel_id)
        .attr("role", "dialog")
        .attr("aria-modal", "true")
        .child(header)
        .child(content)
        .child(footer);

    ElementSpec::new("div")
        .class("drawer-overlay")
        .id(&config.overlay_id)
        .child(panel)
}

/// Creates the nodes for `spec` and returns the root plus every node that has an id.
pub fn mount<D: Dom>(
    dom: &D,
    spec: &ElementSpec,
) -> Result<(D::Node, HashMap<String, D::Node>), DrawerError> {
    let mut by_id = HashMap::new();
    let root = build(dom, spec, &mut by_id)?;
    Ok((root, by_id))
}

fn build<D: Dom>(
    dom: &D,
    spec: &ElementSpec,
    by_id: &mut HashMap<String, D::Node>,
) -> Result<D::Node, DrawerError> {
    let node = dom.create_element(spec.tag)?;
    if let Some(id) = &spec.id {
        dom.set_attribute(&node, "id", id)?;
        by_id.insert(id.clone(), node.clone());
    }
    if let Some(class) = spec.class {
        dom.set_attribute(&node, "class", class)?;
    }
    for (name, value) in &spec.attributes {
        dom.set_attribute(&node, name, value)?;
    }
    if let Some(text) = &spec.text {
        dom.set_text_content(&node, text);
    }
    for child in &spec.children {
        let child = build(dom, child, by_id)?;
        dom.append_child(&node, &child)?;
    }
    Ok(node)
}
