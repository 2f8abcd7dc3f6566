//! Built-in browser fingerprints.
use std::collections::BTreeMap;

use crate::description::FingerprintDescription;
use crate::error::Result;
use crate::http2::{Http2Settings, PseudoId::*};
use crate::priority::{PriorityDescription, PriorityFrameDescription};

/// A browser whose HTTP/2 handshake can be reproduced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Profile {
    /// Chrome / Edge 117 on desktop, as seen in captured handshakes.
    ///
    /// Settings `8` and `9` are left out. Descriptions that want them can
    /// list `UNKNOWN_SETTING_8` and `NO_RFC7540_PRIORITIES` explicitly.
    Chrome117,
    /// Firefox 109 on desktop, with its RFC 7540 priority tree.
    Firefox109,
}

impl Profile {
    /// Every built-in profile.
    pub const ALL: [Profile; 2] = [Profile::Chrome117, Profile::Firefox109];

    /// The profile's fingerprint description.
    pub fn description(self) -> FingerprintDescription {
        match self {
            Profile::Chrome117 => chrome_117(),
            Profile::Firefox109 => firefox_109(),
        }
    }

    /// Translates the profile with the default options.
    pub fn settings(self) -> Result<Http2Settings> {
        crate::translate(&self.description())
    }
}

fn settings<const N: usize>(entries: [(&str, u32); N]) -> (BTreeMap<String, u32>, Vec<String>) {
    let order = entries.iter().map(|(name, _)| (*name).to_owned()).collect();
    let values = entries
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect();
    (values, order)
}

fn chrome_117() -> FingerprintDescription {
    let (values, order) = settings([
        ("HEADER_TABLE_SIZE", 65536),
        ("ENABLE_PUSH", 0),
        ("INITIAL_WINDOW_SIZE", 6291456),
        ("MAX_HEADER_LIST_SIZE", 262144),
    ]);

    FingerprintDescription::builder()
        .settings(values)
        .settings_order(order)
        .connection_flow(15663105)
        .header_priority(PriorityDescription::new(0, 256, true))
        .pseudo_header_order(vec![Method, Authority, Scheme, Path])
        .build()
}

fn firefox_109() -> FingerprintDescription {
    let (values, order) = settings([
        ("HEADER_TABLE_SIZE", 65536),
        ("INITIAL_WINDOW_SIZE", 131072),
        ("MAX_FRAME_SIZE", 16384),
    ]);

    // Firefox builds its dependency tree out of idle streams before the
    // first request, then hangs the request off stream 13.
    let frame = |stream_id, stream_dep, weight| {
        PriorityFrameDescription::new(
            stream_id,
            PriorityDescription::new(stream_dep, weight, false),
        )
    };

    FingerprintDescription::builder()
        .settings(values)
        .settings_order(order)
        .connection_flow(12517377)
        .header_priority(PriorityDescription::new(13, 42, false))
        .priority_frames(vec![
            frame(3, 0, 201),
            frame(5, 0, 101),
            frame(7, 0, 1),
            frame(9, 7, 1),
            frame(11, 3, 1),
            frame(13, 0, 241),
        ])
        .pseudo_header_order(vec![Method, Path, Authority, Scheme])
        .build()
}
