use std::cell::RefCell;

use common::{initialize, when_ready, ProfileDrawer};
use gloo_storage::Storage;
use log::{error, info};

mod config;
mod web_dom;

use web_dom::WebDom;

thread_local! {
    // the drawer lives as long as the page, dropping it would unbind every listener
    static DRAWER: RefCell<Option<ProfileDrawer<WebDom>>> = const { RefCell::new(None) };
}

fn main() {
    let level = if gloo_storage::LocalStorage::get::<bool>("verbose").unwrap_or(false) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    if let Err(e) = console_log::init_with_level(level) {
        gloo::console::error!(format!("failed to set up logging: {e}"));
    }

    if let Err(e) = run() {
        error!("profile drawer not started: {e:#}");
    }
}

fn run() -> anyhow::Result<()> {
    let dom = WebDom::new()?;
    let page = dom.clone();
    let pending = when_ready(&dom, move || mount(&page))?;
    if let Some(listener) = pending {
        listener.forget();
    }
    Ok(())
}

fn mount(dom: &WebDom) {
    match initialize(dom, &config::load(dom)) {
        Ok(Some(drawer)) => DRAWER.with(|slot| *slot.borrow_mut() = Some(drawer)),
        Ok(None) => info!("no profile button on this page"),
        Err(e) => error!("{e}"),
    }
}
