#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(test, deny(warnings))]

//! # h2fingerprint
//!
//! The `h2fingerprint` crate turns a declarative description of a browser's
//! HTTP/2 handshake into the exact protocol parameters needed to reproduce
//! it: the SETTINGS parameters in wire order, the connection WINDOW_UPDATE
//! increment, the priority of the first request stream, and the standalone
//! PRIORITY frames sent after SETTINGS.
//!
//! Servers profile clients by the order and values of these frames, so a
//! client that wants to look like a real browser has to match them exactly.
//!
//! - Descriptions decoded from JSON, with integer or floating-point numbers
//! - Order-preserving SETTINGS with browser-style zero suppression
//! - Priority weights encoded with the protocol's `weight - 1` rule
//! - Akamai fingerprint rendering and byte-level frame rendering
//! - Built-in [`Profile`]s
//!
//! ## Translating a description
//!
//! ```rust
//! # fn run() -> Result<(), h2fingerprint::Error> {
//! use h2fingerprint::{FingerprintDescription, SettingId};
//!
//! let desc: FingerprintDescription = r#"{
//!     "settings": {
//!         "HEADER_TABLE_SIZE": 65536,
//!         "ENABLE_PUSH": 0,
//!         "INITIAL_WINDOW_SIZE": 6291456,
//!         "MAX_HEADER_LIST_SIZE": 262144
//!     },
//!     "settingsOrder": [
//!         "HEADER_TABLE_SIZE",
//!         "ENABLE_PUSH",
//!         "INITIAL_WINDOW_SIZE",
//!         "MAX_HEADER_LIST_SIZE"
//!     ],
//!     "connectionFlow": 15663105,
//!     "headerPriority": {"weight": 256, "streamDep": 0, "exclusive": true}
//! }"#
//! .parse()?;
//!
//! let settings = h2fingerprint::translate(&desc)?;
//! assert_eq!(settings.get(SettingId::ENABLE_PUSH), Some(0));
//! assert_eq!(settings.header_priority().unwrap().weight, Some(255));
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! ## Errors
//!
//! A malformed description is never patched up: a missing `exclusive`, a
//! string where a number belongs or a list where a mapping belongs all fail
//! with an [`Error`] naming the offending field. Callers should abandon the
//! connection attempt rather than fall back to another fingerprint.
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade. Unknown
//! setting names, unordered SETTINGS and wrapped weights are reported at
//! `warn`; every translation is summarised at `debug`.

mod description;
mod error;
mod frame;
mod http2;
mod number;
mod priority;
mod profile;
mod setting;
mod translate;

pub use self::description::FingerprintDescription;
pub use self::error::{BoxError, Error, Result};
pub use self::frame::{FRAME_HEADER_LEN, PREFACE};
pub use self::http2::{Http2Settings, PseudoId};
pub use self::number::normalize;
pub use self::priority::{
    PriorityDescription, PriorityFrame, PriorityFrameDescription, PriorityParam, WeightPolicy,
    DEFAULT_WEIGHT_BYTE,
};
pub use self::profile::Profile;
pub use self::setting::{lookup, Setting, SettingId};
pub use self::translate::{translate, TranslateOptions, Translator};

fn _assert_impls() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    fn assert_clone<T: Clone>() {}

    assert_send::<Http2Settings>();
    assert_sync::<Http2Settings>();
    assert_clone::<Http2Settings>();

    assert_send::<FingerprintDescription>();
    assert_sync::<FingerprintDescription>();

    assert_send::<Translator>();
    assert_sync::<Translator>();

    assert_send::<Error>();
    assert_sync::<Error>();
}

#[cfg(test)]
doc_comment::doctest!("../README.md");
