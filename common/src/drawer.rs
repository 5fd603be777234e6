use log::{debug, info, warn};

use crate::{
    badge_glyph,
    dom::{Dom, DomEvent, EventKind, ListenTarget, Phase},
    markup::{drawer_tree, mount},
    structs::DrawerConfig,
    DrawerError,
};

/// A mounted drawer. Listeners stay bound until [`ProfileDrawer::dispose`] is
/// called or the handle is dropped.
pub struct ProfileDrawer<D: Dom> {
    dom: D,
    overlay: D::Node,
    open_class: String,
    glyph: char,
    superseded: Option<(D::Node, String)>,
    listeners: Vec<D::Listener>,
}

/// Mounts the drawer for the trigger named in `config`.
///
/// Returns `Ok(None)` when the page has no trigger. A second call on the same page
/// fails with [`DrawerError::AlreadyMounted`] and leaves the document untouched.
pub fn initialize<D: Dom>(
    dom: &D,
    config: &DrawerConfig,
) -> Result<Option<ProfileDrawer<D>>, DrawerError> {
    config.validate()?;

    let Some(trigger) = dom.get_element_by_id(&config.trigger_id) else {
        debug!("no #{} on this page, drawer not mounted", config.trigger_id);
        return Ok(None);
    };

    if dom.get_element_by_id(&config.overlay_id).is_some() {
        warn!("#{} already exists, refusing to mount twice", config.overlay_id);
        return Err(DrawerError::AlreadyMounted {
            id: config.overlay_id.clone(),
        });
    }

    let body = dom.body().ok_or(DrawerError::NoBody)?;

    let attribute = dom.attribute(&trigger, &config.initial_attribute);
    let avatar = dom
        .query_selector(&trigger, &config.avatar_selector)
        .map(|avatar| dom.text_content(&avatar).unwrap_or_default());
    let glyph = badge_glyph(
        attribute.as_deref(),
        avatar.as_deref(),
        config.fallback_initial,
    );

    let (overlay, nodes) = mount(dom, &drawer_tree(config, glyph))?;
    let close = nodes
        .get(&config.close_id)
        .cloned()
        .ok_or_else(|| DrawerError::MissingNode {
            id: config.close_id.clone(),
        })?;
    dom.append_child(&body, &overlay)?;

    let superseded = match &config.supersedes {
        Some(id) => match dom.get_element_by_id(id) {
            Some(legacy) => {
                let previous = dom.style(&legacy, "display");
                if let Err(e) = dom.set_style(&legacy, "display", "none") {
                    dom.remove(&overlay);
                    return Err(e);
                }
                debug!("hid superseded #{id}");
                Some((legacy, previous))
            }
            None => None,
        },
        None => None,
    };

    let mut drawer = ProfileDrawer {
        dom: dom.clone(),
        overlay,
        open_class: config.open_class.clone(),
        glyph,
        superseded,
        listeners: Vec::with_capacity(4),
    };
    if let Err(e) = drawer.bind(&trigger, &close) {
        drawer.dispose()?;
        return Err(e);
    }

    info!("profile drawer mounted on #{} with badge {glyph}", config.trigger_id);
    Ok(Some(drawer))
}

impl<D: Dom> ProfileDrawer<D> {
    fn bind(&mut self, trigger: &D::Node, close: &D::Node) -> Result<(), DrawerError> {
        let open = self.toggler(true);
        let on_trigger = self.dom.listen(
            ListenTarget::Node(trigger.clone()),
            EventKind::Click,
            Phase::Capture,
            Box::new(move |e: &dyn DomEvent<D::Node>| {
                e.prevent_default();
                e.stop_propagation();
                open();
            }),
        )?;
        self.listeners.push(on_trigger);

        let close_on_backdrop = self.toggler(false);
        let overlay = self.overlay.clone();
        let on_overlay = self.dom.listen(
            ListenTarget::Node(self.overlay.clone()),
            EventKind::Click,
            Phase::Bubble,
            Box::new(move |e: &dyn DomEvent<D::Node>| {
                // only the backdrop itself, not anything inside the panel
                if e.target().as_ref() == Some(&overlay) {
                    close_on_backdrop();
                }
            }),
        )?;
        self.listeners.push(on_overlay);

        let close_on_button = self.toggler(false);
        let on_close = self.dom.listen(
            ListenTarget::Node(close.clone()),
            EventKind::Click,
            Phase::Bubble,
            Box::new(move |_: &dyn DomEvent<D::Node>| close_on_button()),
        )?;
        self.listeners.push(on_close);

        let close_on_escape = self.toggler(false);
        let on_key = self.dom.listen(
            ListenTarget::Document,
            EventKind::KeyDown,
            Phase::Bubble,
            Box::new(move |e: &dyn DomEvent<D::Node>| {
                if e.key().as_deref() == Some("Escape") {
                    close_on_escape();
                }
            }),
        )?;
        self.listeners.push(on_key);

        Ok(())
    }

    fn toggler(&self, open: bool) -> impl Fn() + 'static {
        let dom = self.dom.clone();
        let overlay = self.overlay.clone();
        let class = self.open_class.clone();
        move || {
            if let Err(e) = set_open(&dom, &overlay, &class, open) {
                warn!("failed to toggle drawer: {e}");
            }
        }
    }

    pub fn open(&self) -> Result<(), DrawerError> {
        set_open(&self.dom, &self.overlay, &self.open_class, true)
    }

    pub fn close(&self) -> Result<(), DrawerError> {
        set_open(&self.dom, &self.overlay, &self.open_class, false)
    }

    pub fn is_open(&self) -> bool {
        self.dom.has_class(&self.overlay, &self.open_class)
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn overlay(&self) -> &D::Node {
        &self.overlay
    }

    /// Unbinds every listener, removes the overlay and gives the superseded
    /// element back its previous inline `display`.
    pub fn dispose(mut self) -> Result<(), DrawerError> {
        self.listeners.clear();
        self.dom.remove(&self.overlay);
        if let Some((legacy, previous)) = self.superseded.take() {
            self.dom.set_style(&legacy, "display", &previous)?;
        }
        info!("profile drawer disposed");
        Ok(())
    }
}

fn set_open<D: Dom>(dom: &D, overlay: &D::Node, class: &str, open: bool) -> Result<(), DrawerError> {
    if open {
        debug!("opening profile drawer");
        dom.add_class(overlay, class)
    } else {
        debug!("closing profile drawer");
        dom.remove_class(overlay, class)
    }
}

/// Runs `f` now if the document is parsed, otherwise on `DOMContentLoaded`.
///
/// The returned listener must be kept alive until the event fires.
pub fn when_ready<D, F>(dom: &D, f: F) -> Result<Option<D::Listener>, DrawerError>
where
    D: Dom,
    F: FnOnce() + 'static,
{
    if dom.is_ready() {
        f();
        return Ok(None);
    }
    let mut f = Some(f);
    dom.listen(
        ListenTarget::Document,
        EventKind::DomContentLoaded,
        Phase::Bubble,
        Box::new(move |_: &dyn DomEvent<D::Node>| {
            if let Some(f) = f.take() {
                f();
            }
        }),
    )
    .map(Some)
}
