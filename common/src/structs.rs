use serde::{Deserialize, Serialize};

use crate::DrawerError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    pub fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_owned(),
            href: href.to_owned(),
        }
    }
}

/// Everything the drawer needs to know about the host page and the subtree it builds.
///
/// Every field has a default, so a page only has to spell out what differs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DrawerConfig {
    pub trigger_id: String,
    pub initial_attribute: String,
    pub avatar_selector: String,
    pub fallback_initial: char,
    pub overlay_id: String,
    pub panel_id: String,
    pub close_id: String,
    pub open_class: String,
    pub title: String,
    pub links: Vec<NavLink>,
    pub sign_out: NavLink,
    /// Id of an older element the drawer replaces; hidden while the drawer is mounted.
    pub supersedes: Option<String>,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            trigger_id: "profileBtn".to_owned(),
            initial_attribute: "data-initial".to_owned(),
            avatar_selector: ".profile-avatar".to_owned(),
            fallback_initial: 'U',
            overlay_id: "profileDrawerOverlay".to_owned(),
            panel_id: "profileDrawer".to_owned(),
            close_id: "drawerClose".to_owned(),
            open_class: "open".to_owned(),
            title: "Your Account".to_owned(),
            links: vec![
                NavLink::new("Profile", "/profile"),
                NavLink::new("All Tools", "/all-tools"),
                NavLink::new("Privacy Policy", "/privacy"),
                NavLink::new("Terms of Service", "/terms"),
            ],
            sign_out: NavLink::new("Sign Out", "/signout"),
            supersedes: None,
        }
    }
}

impl DrawerConfig {
    pub fn supersedes(mut self, id: &str) -> Self {
        self.supersedes = Some(id.to_owned());
        self
    }

    pub fn validate(&self) -> Result<(), DrawerError> {
        let ids = [
            ("trigger_id", &self.trigger_id),
            ("overlay_id", &self.overlay_id),
            ("panel_id", &self.panel_id),
            ("close_id", &self.close_id),
        ];
        if let Some((field, _)) = ids.iter().find(|(_, id)| id.trim().is_empty()) {
            return Err(DrawerError::InvalidConfig(format!("{field} is empty")));
        }
        if self.overlay_id == self.panel_id
            || self.overlay_id == self.close_id
            || self.panel_id == self.close_id
        {
            return Err(DrawerError::InvalidConfig(
                "overlay, panel and close ids must be distinct".to_owned(),
            ));
        }
        // classList.add throws on empty tokens and tokens with whitespace
        if self.open_class.is_empty() || self.open_class.chars().any(char::is_whitespace) {
            return Err(DrawerError::InvalidConfig(format!(
                "open_class `{}` is not a single class token",
                self.open_class
            )));
        }
        if self.supersedes.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(DrawerError::InvalidConfig("supersedes is empty".to_owned()));
        }
        Ok(())
    }
}
