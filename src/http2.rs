//! HTTP/2 settings.
use std::{fmt, str::FromStr};

use crate::error::Error;
use crate::priority::{PriorityFrame, PriorityParam};
use crate::setting::{Setting, SettingId};

/// The protocol-level parameters of an emulated HTTP/2 handshake.
///
/// Produced by [`Translator::translate`](crate::Translator::translate). The
/// value is read-only once built, so it can be handed to a transport, shared
/// by reference between concurrently opened connections, or cloned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Http2Settings {
    pub(crate) settings: Vec<Setting>,
    pub(crate) connection_flow: Option<u32>,
    pub(crate) header_priority: Option<PriorityParam>,
    pub(crate) priority_frames: Vec<PriorityFrame>,
    pub(crate) headers_pseudo_order: Option<Vec<PseudoId>>,
}

impl Http2Settings {
    /// The SETTINGS parameters, in wire order.
    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    /// Returns the value of the first parameter with the given identifier.
    pub fn get(&self, id: SettingId) -> Option<u32> {
        self.settings
            .iter()
            .find(|setting| setting.id == id)
            .map(|setting| setting.value)
    }

    /// The connection-level WINDOW_UPDATE increment sent after SETTINGS.
    pub fn connection_flow(&self) -> Option<u32> {
        self.connection_flow
    }

    /// The priority of the first request stream's HEADERS frame.
    pub fn header_priority(&self) -> Option<&PriorityParam> {
        self.header_priority.as_ref()
    }

    /// The standalone PRIORITY frames sent after SETTINGS, in send order.
    pub fn priority_frames(&self) -> &[PriorityFrame] {
        &self.priority_frames
    }

    /// The pseudo-header order of request HEADERS frames.
    pub fn headers_pseudo_order(&self) -> Option<&[PseudoId]> {
        self.headers_pseudo_order.as_deref()
    }

    /// Renders the Akamai-style fingerprint of these settings.
    ///
    /// The format is `S|WU|P|PS`: SETTINGS as `id:value` pairs joined by `;`,
    /// the WINDOW_UPDATE increment (`00` when none is sent), PRIORITY frames
    /// as `stream:exclusive:dependency:weight` joined by `,` (`0` when none
    /// are sent), and the pseudo-header order as single letters.
    ///
    /// ```
    /// use h2fingerprint::Profile;
    ///
    /// let settings = Profile::Chrome117.settings().unwrap();
    /// assert_eq!(
    ///     settings.akamai_fingerprint(),
    ///     "1:65536;2:0;4:6291456;6:262144|15663105|0|m,a,s,p"
    /// );
    /// ```
    pub fn akamai_fingerprint(&self) -> String {
        let settings = self
            .settings
            .iter()
            .map(|s| format!("{}:{}", s.id.0, s.value))
            .collect::<Vec<_>>()
            .join(";");

        let window = match self.connection_flow {
            Some(increment) => increment.to_string(),
            None => "00".to_owned(),
        };

        let priority = if self.priority_frames.is_empty() {
            "0".to_owned()
        } else {
            self.priority_frames
                .iter()
                .map(|frame| {
                    format!(
                        "{}:{}:{}:{}",
                        frame.stream_id,
                        u8::from(frame.param.exclusive),
                        frame.param.stream_dep,
                        frame.param.weight()
                    )
                })
                .collect::<Vec<_>>()
                .join(",")
        };

        let pseudo = self
            .headers_pseudo_order
            .iter()
            .flatten()
            .map(|id| id.abbreviation().to_string())
            .collect::<Vec<_>>()
            .join(",");

        format!("{settings}|{window}|{priority}|{pseudo}")
    }
}

/// A request pseudo-header field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PseudoId {
    /// `:method`
    Method,
    /// `:authority`
    Authority,
    /// `:scheme`
    Scheme,
    /// `:path`
    Path,
}

impl PseudoId {
    /// The field name, including the leading colon.
    pub fn as_str(self) -> &'static str {
        match self {
            PseudoId::Method => ":method",
            PseudoId::Authority => ":authority",
            PseudoId::Scheme => ":scheme",
            PseudoId::Path => ":path",
        }
    }

    /// The letter used for this field in Akamai fingerprints.
    pub fn abbreviation(self) -> char {
        match self {
            PseudoId::Method => 'm',
            PseudoId::Authority => 'a',
            PseudoId::Scheme => 's',
            PseudoId::Path => 'p',
        }
    }
}

impl FromStr for PseudoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ":method" => Ok(PseudoId::Method),
            ":authority" => Ok(PseudoId::Authority),
            ":scheme" => Ok(PseudoId::Scheme),
            ":path" => Ok(PseudoId::Path),
            other => Err(Error::invalid_description(format!(
                "unknown pseudo-header {other:?}"
            ))),
        }
    }
}

impl fmt::Display for PseudoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
