use thiserror::Error;

pub mod dom;
pub mod drawer;
pub mod markup;
pub mod structs;

pub use drawer::{initialize, when_ready, ProfileDrawer};
pub use structs::{DrawerConfig, NavLink};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrawerError {
    #[error("document has no body to mount the drawer into")]
    NoBody,
    #[error("an element with id `{id}` already exists, the drawer is mounted once per page")]
    AlreadyMounted { id: String },
    #[error("freshly built drawer is missing `#{id}`")]
    MissingNode { id: String },
    #[error("invalid drawer config: {0}")]
    InvalidConfig(String),
    #[error("dom operation failed: {0}")]
    Dom(String),
}

/// The single uppercase character shown in the drawer header.
///
/// A non-blank `attribute` wins, then non-blank `avatar` text, then `fallback`.
/// Both sources are trimmed first, byte order marks included. The whole string is
/// uppercased before the first character is taken, so `"ßen"` yields `'S'`.
pub fn badge_glyph(attribute: Option<&str>, avatar: Option<&str>, fallback: char) -> char {
    [attribute, avatar]
        .into_iter()
        .flatten()
        .map(|s| s.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}'))
        .find(|s| !s.is_empty())
        .and_then(|s| s.to_uppercase().chars().next())
        .unwrap_or_else(|| fallback.to_uppercase().next().unwrap_or(fallback))
}
