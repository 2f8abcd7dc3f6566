//! Declarative fingerprint descriptions.
//!
//! A description is usually decoded from JSON by some generic decoder, so its
//! numbers may be floats and its fields may be spelled `settingsOrder` or
//! `SettingsOrder`. [`FingerprintDescription::from_value`] validates the
//! shape once and hands back a strongly typed value; nothing downstream
//! inspects types again.
use std::{collections::BTreeMap, str::FromStr};

use serde::{Deserialize, Deserializer};
use serde_json::{json, Map, Value};
use typed_builder::TypedBuilder;

use crate::error::{Error, Result};
use crate::http2::PseudoId;
use crate::number::{describe, normalize_u31, normalize_u32};
use crate::priority::{PriorityDescription, PriorityFrameDescription};

/// A human-authored description of a browser's HTTP/2 handshake.
///
/// # Example
///
/// ```
/// use h2fingerprint::FingerprintDescription;
///
/// let desc: FingerprintDescription = r#"{
///     "settings": {"HEADER_TABLE_SIZE": 65536, "ENABLE_PUSH": 0},
///     "settingsOrder": ["HEADER_TABLE_SIZE", "ENABLE_PUSH"],
///     "connectionFlow": 15663105,
///     "headerPriority": {"weight": 256, "streamDep": 0, "exclusive": true}
/// }"#
/// .parse()
/// .unwrap();
///
/// assert_eq!(desc.connection_flow, 15663105);
/// assert_eq!(desc.header_priority.unwrap().weight, Some(256));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, TypedBuilder)]
pub struct FingerprintDescription {
    /// SETTINGS values by canonical name.
    #[builder(default, setter(strip_option))]
    pub settings: Option<BTreeMap<String, u32>>,

    /// The wire order of SETTINGS, by canonical name.
    ///
    /// Without it, SETTINGS follow the iteration order of `settings`, which
    /// is alphabetical and matches no real browser.
    #[builder(default, setter(strip_option))]
    pub settings_order: Option<Vec<String>>,

    /// The connection-level WINDOW_UPDATE increment. `0` means none is sent.
    #[builder(default)]
    pub connection_flow: u32,

    /// The priority of the first request stream.
    #[builder(default, setter(strip_option))]
    pub header_priority: Option<PriorityDescription>,

    /// PRIORITY frames sent right after SETTINGS, in send order.
    #[builder(default, setter(strip_option))]
    pub priority_frames: Option<Vec<PriorityFrameDescription>>,

    /// The pseudo-header order of request HEADERS frames.
    #[builder(default, setter(strip_option))]
    pub pseudo_header_order: Option<Vec<PseudoId>>,
}

impl FingerprintDescription {
    /// Validates a decoded description.
    ///
    /// # Errors
    ///
    /// - type mismatch: a number or boolean field holds another type
    /// - missing field: a required field (such as `exclusive`) is absent
    /// - invalid description: a mapping or sequence holds another type
    /// - out of range: a value does not fit its wire field
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = object(value)?;

        let settings = field(map, "settings")
            .map(|v| parse_settings(v).map_err(|e| e.within("settings")))
            .transpose()?;

        let settings_order = field(map, "settingsOrder")
            .map(|v| parse_strings(v).map_err(|e| e.within("settingsOrder")))
            .transpose()?;

        let connection_flow = field(map, "connectionFlow")
            .map(|v| normalize_u31(v).map_err(|e| e.within("connectionFlow")))
            .transpose()?
            .unwrap_or(0);

        let header_priority = field(map, "headerPriority")
            .map(|v| PriorityDescription::from_value(v).map_err(|e| e.within("headerPriority")))
            .transpose()?;

        let priority_frames = field(map, "priorityFrames")
            .map(|v| parse_priority_frames(v).map_err(|e| e.within("priorityFrames")))
            .transpose()?;

        let pseudo_header_order = field(map, "pseudoHeaderOrder")
            .map(|v| parse_pseudo_order(v).map_err(|e| e.within("pseudoHeaderOrder")))
            .transpose()?;

        Ok(FingerprintDescription {
            settings,
            settings_order,
            connection_flow,
            header_priority,
            priority_frames,
            pseudo_header_order,
        })
    }

    /// Renders the description with canonical field names.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();

        if let Some(settings) = &self.settings {
            map.insert("settings".to_owned(), json!(settings));
        }
        if let Some(order) = &self.settings_order {
            map.insert("settingsOrder".to_owned(), json!(order));
        }
        if self.connection_flow != 0 {
            map.insert("connectionFlow".to_owned(), json!(self.connection_flow));
        }
        if let Some(priority) = &self.header_priority {
            map.insert("headerPriority".to_owned(), priority_value(priority));
        }
        if let Some(frames) = &self.priority_frames {
            let frames = frames
                .iter()
                .map(|frame| {
                    json!({
                        "streamID": frame.stream_id,
                        "priorityParam": priority_value(&frame.priority_param),
                    })
                })
                .collect::<Vec<_>>();
            map.insert("priorityFrames".to_owned(), Value::Array(frames));
        }
        if let Some(order) = &self.pseudo_header_order {
            let order = order.iter().map(|id| id.as_str()).collect::<Vec<_>>();
            map.insert("pseudoHeaderOrder".to_owned(), json!(order));
        }

        Value::Object(map)
    }
}

impl FromStr for FingerprintDescription {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s).map_err(Error::invalid_description)?;
        FingerprintDescription::from_value(&value)
    }
}

impl<'de> Deserialize<'de> for FingerprintDescription {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        FingerprintDescription::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Looks up a field, treating `null` as absent.
///
/// An exact match wins; otherwise names are compared ignoring ASCII case, so
/// `SettingsOrder` and `settingsOrder` are the same field. Only the
/// top-level fields of a description are matched this way; see [`member`].
pub(crate) fn field<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    map.get(name)
        .or_else(|| {
            map.iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .filter(|value| !value.is_null())
}

/// Looks up a key of a nested mapping by its exact name, treating `null` as
/// absent.
pub(crate) fn member<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    map.get(name).filter(|value| !value.is_null())
}

pub(crate) fn object(value: &Value) -> Result<&Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        Error::invalid_description(format!("expected an object, found {}", describe(value)))
    })
}

fn array(value: &Value) -> Result<&Vec<Value>> {
    value.as_array().ok_or_else(|| {
        Error::invalid_description(format!("expected an array, found {}", describe(value)))
    })
}

fn parse_settings(value: &Value) -> Result<BTreeMap<String, u32>> {
    object(value)?
        .iter()
        .map(|(name, value)| {
            normalize_u32(value)
                .map(|value| (name.clone(), value))
                .map_err(|e| e.within(name))
        })
        .collect()
}

fn parse_strings(value: &Value) -> Result<Vec<String>> {
    array(value)?
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(Error::invalid_description(format!(
                "expected a string, found {}",
                describe(other)
            ))
            .within(&format!("[{i}]"))),
        })
        .collect()
}

fn parse_priority_frames(value: &Value) -> Result<Vec<PriorityFrameDescription>> {
    array(value)?
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            PriorityFrameDescription::from_value(frame).map_err(|e| e.within(&format!("[{i}]")))
        })
        .collect()
}

fn parse_pseudo_order(value: &Value) -> Result<Vec<PseudoId>> {
    parse_strings(value)?
        .iter()
        .enumerate()
        .map(|(i, name)| {
            name.parse::<PseudoId>()
                .map_err(|e| e.within(&format!("[{i}]")))
        })
        .collect()
}

fn priority_value(priority: &PriorityDescription) -> Value {
    let mut map = Map::new();
    if let Some(weight) = priority.weight {
        map.insert("weight".to_owned(), json!(weight));
    }
    map.insert("streamDep".to_owned(), json!(priority.stream_dep));
    map.insert("exclusive".to_owned(), json!(priority.exclusive));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_an_empty_description() {
        let desc = FingerprintDescription::from_value(&json!({})).unwrap();
        assert_eq!(desc, FingerprintDescription::default());
    }

    #[test]
    fn nulls_are_absent() {
        let desc = FingerprintDescription::from_value(&json!({
            "settings": null,
            "settingsOrder": null,
            "connectionFlow": null,
            "headerPriority": null,
            "priorityFrames": null
        }))
        .unwrap();
        assert_eq!(desc, FingerprintDescription::default());
    }

    #[test]
    fn pascal_case_field_names_are_accepted() {
        let desc = FingerprintDescription::from_value(&json!({
            "Settings": {"ENABLE_PUSH": 0},
            "SettingsOrder": ["ENABLE_PUSH"],
            "ConnectionFlow": 15663105.0,
            "HeaderPriority": {"weight": 256.0, "streamDep": 0.0, "exclusive": true}
        }))
        .unwrap();
        assert_eq!(desc.settings_order.as_deref(), Some(&["ENABLE_PUSH".to_owned()][..]));
        assert_eq!(desc.connection_flow, 15663105);
        assert_eq!(desc.header_priority.unwrap().weight, Some(256));
    }

    #[test]
    fn nested_priority_keys_are_case_sensitive() {
        let err = FingerprintDescription::from_value(&json!({
            "headerPriority": {"Weight": 256, "Exclusive": true}
        }))
        .unwrap_err();
        assert!(err.is_missing_field());
        assert_eq!(err.field(), Some("headerPriority.exclusive"));

        let desc = FingerprintDescription::from_value(&json!({
            "HeaderPriority": {"Weight": 256, "exclusive": true}
        }))
        .unwrap();
        assert_eq!(desc.header_priority.unwrap().weight, None);

        let err = FingerprintDescription::from_value(&json!({
            "priorityFrames": [{"StreamID": 3, "priorityParam": {"weight": 201, "exclusive": false}}]
        }))
        .unwrap_err();
        assert!(err.is_missing_field());
        assert_eq!(err.field(), Some("priorityFrames[0].streamID"));
    }

    #[test]
    fn exact_field_name_wins_over_case_insensitive_match() {
        let desc = FingerprintDescription::from_value(&json!({
            "ConnectionFlow": 1,
            "connectionFlow": 2
        }))
        .unwrap();
        assert_eq!(desc.connection_flow, 2);
    }

    #[test]
    fn setting_values_are_normalized() {
        let desc = FingerprintDescription::from_value(&json!({
            "settings": {"INITIAL_WINDOW_SIZE": 6291456.0, "MAX_FRAME_SIZE": 16384}
        }))
        .unwrap();
        let settings = desc.settings.unwrap();
        assert_eq!(settings["INITIAL_WINDOW_SIZE"], 6291456);
        assert_eq!(settings["MAX_FRAME_SIZE"], 16384);
    }

    #[test]
    fn setting_value_errors_carry_the_path() {
        let err = FingerprintDescription::from_value(&json!({
            "settings": {"HEADER_TABLE_SIZE": "65536"}
        }))
        .unwrap_err();
        assert!(err.is_type_mismatch());
        assert_eq!(err.field(), Some("settings.HEADER_TABLE_SIZE"));

        let err = FingerprintDescription::from_value(&json!({
            "settings": {"HEADER_TABLE_SIZE": -1}
        }))
        .unwrap_err();
        assert!(err.is_out_of_range());
    }

    #[test]
    fn malformed_shapes_are_invalid() {
        let cases = [
            (json!([]), None),
            (json!({"settings": [1, 2]}), Some("settings")),
            (json!({"settingsOrder": "HEADER_TABLE_SIZE"}), Some("settingsOrder")),
            (json!({"settingsOrder": ["ENABLE_PUSH", 2]}), Some("settingsOrder[1]")),
            (json!({"headerPriority": true}), Some("headerPriority")),
            (json!({"priorityFrames": {"streamID": 3}}), Some("priorityFrames")),
            (json!({"priorityFrames": [3, 5]}), Some("priorityFrames[0]")),
            (json!({"pseudoHeaderOrder": [":method", ":verb"]}), Some("pseudoHeaderOrder[1]")),
        ];
        for (value, path) in cases {
            let err = FingerprintDescription::from_value(&value).unwrap_err();
            assert!(err.is_invalid_description(), "{value}: {err}");
            assert_eq!(err.field(), path, "{value}");
        }
    }

    #[test]
    fn missing_exclusive_in_nested_frame() {
        let err = FingerprintDescription::from_value(&json!({
            "priorityFrames": [
                {"streamID": 3, "priorityParam": {"weight": 201, "exclusive": false}},
                {"streamID": 5, "priorityParam": {"weight": 101}}
            ]
        }))
        .unwrap_err();
        assert!(err.is_missing_field());
        assert_eq!(err.field(), Some("priorityFrames[1].priorityParam.exclusive"));
    }

    #[test]
    fn connection_flow_must_fit_31_bits() {
        let err = FingerprintDescription::from_value(&json!({"connectionFlow": 2147483648u64}))
            .unwrap_err();
        assert!(err.is_out_of_range());
        assert_eq!(err.field(), Some("connectionFlow"));
    }

    #[test]
    fn deserialize_routes_through_validation() {
        let err = serde_json::from_str::<FingerprintDescription>(
            r#"{"headerPriority": {"weight": 256}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("headerPriority.exclusive"), "{err}");

        let desc: FingerprintDescription =
            serde_json::from_str(r#"{"connectionFlow": 65535}"#).unwrap();
        assert_eq!(desc.connection_flow, 65535);
    }

    #[test]
    fn from_str_rejects_malformed_json() {
        let err = "{not json".parse::<FingerprintDescription>().unwrap_err();
        assert!(err.is_invalid_description());
    }

    #[test]
    fn to_value_reads_back() {
        let desc = FingerprintDescription::builder()
            .settings(BTreeMap::from([("ENABLE_PUSH".to_owned(), 0)]))
            .settings_order(vec!["ENABLE_PUSH".to_owned()])
            .connection_flow(15663105)
            .header_priority(PriorityDescription::new(0, 256, true))
            .priority_frames(vec![PriorityFrameDescription::new(
                3,
                PriorityDescription::without_weight(0, false),
            )])
            .pseudo_header_order(vec![PseudoId::Method, PseudoId::Path])
            .build();

        let value = desc.to_value();
        assert_eq!(value["pseudoHeaderOrder"], json!([":method", ":path"]));
        assert!(value["priorityFrames"][0]["priorityParam"].get("weight").is_none());
        assert_eq!(FingerprintDescription::from_value(&value).unwrap(), desc);
    }
}
