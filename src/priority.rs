//! Stream priority parameters.
//!
//! HTTP/2 weights range from 1 to 256 but travel as a single byte holding
//! `weight - 1`. Descriptions speak in user-facing weights; [`PriorityParam`]
//! stores the wire byte.
use log::warn;
use serde_json::Value;

use crate::description::{member, object};
use crate::error::{Error, Result};
use crate::number::{describe, normalize, normalize_u31};

/// The weight byte used when a parameter carries no explicit weight.
///
/// This is the protocol default weight of 16.
pub const DEFAULT_WEIGHT_BYTE: u8 = 15;

/// How out-of-range weights are handled while encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WeightPolicy {
    /// Weights outside `1..=256` fail with an out-of-range error.
    #[default]
    Reject,
    /// Weights are stored as `(weight - 1)` truncated to a byte, so `0`
    /// becomes `255` and `257` becomes `0`.
    Wrap,
}

/// A loosely specified priority parameter, as written in a fingerprint
/// description.
///
/// `weight` is the user-facing weight (1 to 256). It is kept unchecked here
/// so the configured [`WeightPolicy`] can decide what to do with it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PriorityDescription {
    /// The user-facing weight. `None` selects the protocol default.
    pub weight: Option<i64>,
    /// The stream this one depends on.
    pub stream_dep: u32,
    /// Whether the dependency is exclusive.
    pub exclusive: bool,
}

impl PriorityDescription {
    /// Creates a description with an explicit weight.
    pub fn new(stream_dep: u32, weight: i64, exclusive: bool) -> Self {
        PriorityDescription {
            weight: Some(weight),
            stream_dep,
            exclusive,
        }
    }

    /// Creates a description that leaves the weight at the protocol default.
    pub fn without_weight(stream_dep: u32, exclusive: bool) -> Self {
        PriorityDescription {
            weight: None,
            stream_dep,
            exclusive,
        }
    }

    /// Reads a description from a decoded `{weight?, streamDep?, exclusive}`
    /// object.
    ///
    /// `streamDep` defaults to `0` and `weight` to the protocol default.
    /// `exclusive` is required.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = object(value)?;

        let stream_dep = match member(map, "streamDep") {
            Some(v) => normalize_u31(v).map_err(|e| e.within("streamDep"))?,
            None => 0,
        };

        let exclusive = match member(map, "exclusive") {
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(Error::type_mismatch(format!(
                    "expected a boolean, found {}",
                    describe(other)
                ))
                .within("exclusive"))
            }
            None => return Err(Error::missing_field("exclusive")),
        };

        let weight = member(map, "weight")
            .map(normalize)
            .transpose()
            .map_err(|e| e.within("weight"))?;

        Ok(PriorityDescription {
            weight,
            stream_dep,
            exclusive,
        })
    }
}

/// An encoded stream priority parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PriorityParam {
    /// The stream this one depends on.
    pub stream_dep: u32,
    /// Whether the dependency is exclusive.
    pub exclusive: bool,
    /// The stored weight byte (`weight - 1`), or `None` for the default.
    pub weight: Option<u8>,
}

impl PriorityParam {
    /// Encodes a description, applying the stored-weight-is-weight-minus-one
    /// rule.
    ///
    /// ```
    /// use h2fingerprint::{PriorityDescription, PriorityParam, WeightPolicy};
    ///
    /// let desc = PriorityDescription::new(0, 256, true);
    /// let param = PriorityParam::encode(&desc, WeightPolicy::Reject).unwrap();
    /// assert_eq!(param.weight, Some(255));
    /// ```
    pub fn encode(desc: &PriorityDescription, policy: WeightPolicy) -> Result<PriorityParam> {
        let weight = match desc.weight {
            None => None,
            Some(w) if (1..=256).contains(&w) => Some((w - 1) as u8),
            Some(w) => match policy {
                WeightPolicy::Reject => {
                    return Err(Error::out_of_range(format!(
                        "weight {w} is outside 1..=256"
                    ))
                    .within("weight"))
                }
                WeightPolicy::Wrap => {
                    let byte = w.wrapping_sub(1) as u8;
                    warn!("weight {} is outside 1..=256, wrapped to byte {}", w, byte);
                    Some(byte)
                }
            },
        };

        Ok(PriorityParam {
            stream_dep: desc.stream_dep,
            exclusive: desc.exclusive,
            weight,
        })
    }

    /// The byte written on the wire, substituting the default when unset.
    pub fn weight_byte(&self) -> u8 {
        self.weight.unwrap_or(DEFAULT_WEIGHT_BYTE)
    }

    /// The user-facing weight (1 to 256).
    pub fn weight(&self) -> u16 {
        u16::from(self.weight_byte()) + 1
    }
}

/// A standalone PRIORITY frame as written in a fingerprint description.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PriorityFrameDescription {
    /// The stream the frame is sent on.
    pub stream_id: u32,
    /// The nested priority parameter.
    pub priority_param: PriorityDescription,
}

impl PriorityFrameDescription {
    /// Creates a frame description.
    pub fn new(stream_id: u32, priority_param: PriorityDescription) -> Self {
        PriorityFrameDescription {
            stream_id,
            priority_param,
        }
    }

    /// Reads a frame from a decoded `{streamID, priorityParam}` object.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = object(value)?;

        let stream_id = match member(map, "streamID") {
            Some(v) => normalize_u31(v).map_err(|e| e.within("streamID"))?,
            None => return Err(Error::missing_field("streamID")),
        };

        let priority_param = match member(map, "priorityParam") {
            Some(v) => {
                PriorityDescription::from_value(v).map_err(|e| e.within("priorityParam"))?
            }
            None => return Err(Error::missing_field("priorityParam")),
        };

        Ok(PriorityFrameDescription {
            stream_id,
            priority_param,
        })
    }
}

/// An encoded PRIORITY frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PriorityFrame {
    /// The stream the frame is sent on.
    pub stream_id: u32,
    /// The encoded priority parameter.
    pub param: PriorityParam,
}

impl PriorityFrame {
    /// Encodes a frame description.
    pub fn encode(desc: &PriorityFrameDescription, policy: WeightPolicy) -> Result<PriorityFrame> {
        Ok(PriorityFrame {
            stream_id: desc.stream_id,
            param: PriorityParam::encode(&desc.priority_param, policy)?,
        })
    }
}
