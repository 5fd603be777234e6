use anyhow::Context;
use common::{dom::Dom, DrawerConfig};
use log::warn;

/// `<script type="application/json" id="profileDrawerConfig">` overrides on the host page.
pub const CONFIG_ID: &str = "profileDrawerConfig";
/// The dropdown menu the drawer replaced.
pub const LEGACY_DROPDOWN_ID: &str = "profileDropdown";

pub fn load<D: Dom>(dom: &D) -> DrawerConfig {
    let Some(node) = dom.get_element_by_id(CONFIG_ID) else {
        return default_config();
    };
    let raw = dom.text_content(&node).unwrap_or_default();
    parse(&raw).unwrap_or_else(|e| {
        warn!("ignoring #{CONFIG_ID}: {e:#}");
        default_config()
    })
}

pub fn default_config() -> DrawerConfig {
    DrawerConfig::default().supersedes(LEGACY_DROPDOWN_ID)
}

/// Omitting `supersedes` keeps the legacy dropdown hidden, `null` opts out.
pub fn parse(raw: &str) -> anyhow::Result<DrawerConfig> {
    if raw.trim().is_empty() {
        return Ok(default_config());
    }
    let mut value: serde_json::Value =
        serde_json::from_str(raw).context("drawer config is not valid json")?;
    if let Some(object) = value.as_object_mut() {
        object
            .entry("supersedes")
            .or_insert_with(|| LEGACY_DROPDOWN_ID.into());
    }
    let config: DrawerConfig =
        serde_json::from_value(value).context("drawer config has the wrong shape")?;
    config.validate()?;
    Ok(config)
}
