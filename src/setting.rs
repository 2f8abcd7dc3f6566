//! HTTP/2 SETTINGS identifiers and the canonical-name registry.
use std::fmt;

use log::warn;

/// An HTTP/2 SETTINGS parameter identifier.
///
/// The associated constants cover every name a fingerprint description may
/// use. Identifiers `8` and `9` are the two post-RFC 7540 extensions Chromium
/// sends; they are named the way fingerprinting services report them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SettingId(pub u16);

impl SettingId {
    /// `SETTINGS_HEADER_TABLE_SIZE` (0x1)
    pub const HEADER_TABLE_SIZE: SettingId = SettingId(1);
    /// `SETTINGS_ENABLE_PUSH` (0x2)
    pub const ENABLE_PUSH: SettingId = SettingId(2);
    /// `SETTINGS_MAX_CONCURRENT_STREAMS` (0x3)
    pub const MAX_CONCURRENT_STREAMS: SettingId = SettingId(3);
    /// `SETTINGS_INITIAL_WINDOW_SIZE` (0x4)
    pub const INITIAL_WINDOW_SIZE: SettingId = SettingId(4);
    /// `SETTINGS_MAX_FRAME_SIZE` (0x5)
    pub const MAX_FRAME_SIZE: SettingId = SettingId(5);
    /// `SETTINGS_MAX_HEADER_LIST_SIZE` (0x6)
    pub const MAX_HEADER_LIST_SIZE: SettingId = SettingId(6);
    /// Identifier `8`, reported as `UNKNOWN_SETTING_8`.
    pub const UNKNOWN_SETTING_8: SettingId = SettingId(8);
    /// `SETTINGS_NO_RFC7540_PRIORITIES` (0x9)
    pub const NO_RFC7540_PRIORITIES: SettingId = SettingId(9);

    /// Resolves a canonical setting name.
    ///
    /// Returns `None` for names outside the registry.
    pub const fn from_name(name: &str) -> Option<SettingId> {
        let mut i = 0;
        while i < REGISTRY.len() {
            if str_eq(REGISTRY[i].0, name) {
                return Some(REGISTRY[i].1);
            }
            i += 1;
        }
        None
    }

    /// Returns the canonical name of a registered identifier.
    pub fn name(self) -> Option<&'static str> {
        REGISTRY
            .iter()
            .find(|(_, id)| *id == self)
            .map(|(name, _)| *name)
    }
}

impl From<SettingId> for u16 {
    fn from(id: SettingId) -> u16 {
        id.0
    }
}

impl From<u16> for SettingId {
    fn from(id: u16) -> SettingId {
        SettingId(id)
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNKNOWN_SETTING_{}", self.0),
        }
    }
}

// Names are unique. Order follows the identifiers.
const REGISTRY: [(&str, SettingId); 8] = [
    ("HEADER_TABLE_SIZE", SettingId::HEADER_TABLE_SIZE),
    ("ENABLE_PUSH", SettingId::ENABLE_PUSH),
    ("MAX_CONCURRENT_STREAMS", SettingId::MAX_CONCURRENT_STREAMS),
    ("INITIAL_WINDOW_SIZE", SettingId::INITIAL_WINDOW_SIZE),
    ("MAX_FRAME_SIZE", SettingId::MAX_FRAME_SIZE),
    ("MAX_HEADER_LIST_SIZE", SettingId::MAX_HEADER_LIST_SIZE),
    ("UNKNOWN_SETTING_8", SettingId::UNKNOWN_SETTING_8),
    ("NO_RFC7540_PRIORITIES", SettingId::NO_RFC7540_PRIORITIES),
];

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Looks up the identifier for a canonical setting name.
///
/// Unregistered names resolve to `SettingId(0)` instead of failing, and a
/// warning is logged. Callers that need to detect the miss should use
/// [`SettingId::from_name`].
pub fn lookup(name: &str) -> SettingId {
    SettingId::from_name(name).unwrap_or_else(|| {
        warn!("unknown HTTP/2 setting name {:?}, using identifier 0", name);
        SettingId::default()
    })
}

/// A single SETTINGS parameter, as it appears on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Setting {
    /// The parameter identifier.
    pub id: SettingId,
    /// The parameter value.
    pub value: u32,
}

impl Setting {
    /// Creates a setting from an identifier and a value.
    pub fn new(id: impl Into<SettingId>, value: u32) -> Setting {
        Setting {
            id: id.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_every_canonical_name() {
        let expected = [
            ("HEADER_TABLE_SIZE", 1),
            ("ENABLE_PUSH", 2),
            ("MAX_CONCURRENT_STREAMS", 3),
            ("INITIAL_WINDOW_SIZE", 4),
            ("MAX_FRAME_SIZE", 5),
            ("MAX_HEADER_LIST_SIZE", 6),
            ("UNKNOWN_SETTING_8", 8),
            ("NO_RFC7540_PRIORITIES", 9),
        ];
        for (name, id) in expected {
            assert_eq!(lookup(name), SettingId(id), "{name}");
            assert_eq!(SettingId(id).name(), Some(name));
        }
    }

    #[test]
    fn registry_names_are_unique() {
        for (i, (a, _)) in REGISTRY.iter().enumerate() {
            for (b, _) in &REGISTRY[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_name_maps_to_zero() {
        assert_eq!(lookup("ENABLE_CONNECT_PROTOCOL"), SettingId(0));
        assert_eq!(SettingId::from_name("enable_push"), None);
    }

    #[test]
    fn from_name_is_usable_in_const_context() {
        const PUSH: Option<SettingId> = SettingId::from_name("ENABLE_PUSH");
        assert_eq!(PUSH, Some(SettingId::ENABLE_PUSH));
    }

    #[test]
    fn display_uses_canonical_name() {
        assert_eq!(SettingId::INITIAL_WINDOW_SIZE.to_string(), "INITIAL_WINDOW_SIZE");
        assert_eq!(SettingId(7).to_string(), "UNKNOWN_SETTING_7");
    }
}
