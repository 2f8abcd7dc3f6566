//! Fingerprint translation.
use log::{debug, trace, warn};
use typed_builder::TypedBuilder;

use crate::description::FingerprintDescription;
use crate::error::{Error, Result};
use crate::http2::Http2Settings;
use crate::priority::{PriorityFrame, PriorityParam, WeightPolicy};
use crate::setting::{lookup, Setting, SettingId};

/// Options that control how a description is translated.
///
/// ```
/// use h2fingerprint::{TranslateOptions, Translator, WeightPolicy};
///
/// let translator = Translator::new(
///     TranslateOptions::builder()
///         .weight_policy(WeightPolicy::Wrap)
///         .strict_setting_names(true)
///         .build(),
/// );
/// # let _ = translator;
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TypedBuilder)]
pub struct TranslateOptions {
    /// What to do with weights outside `1..=256`.
    #[builder(default)]
    pub(crate) weight_policy: WeightPolicy,

    /// Whether unregistered setting names fail translation instead of
    /// mapping to identifier `0`.
    #[builder(default = false)]
    pub(crate) strict_setting_names: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TranslateOptions {
    /// Sets the policy for weights outside `1..=256`.
    pub fn set_weight_policy(&mut self, policy: WeightPolicy) -> &mut Self {
        self.weight_policy = policy;
        self
    }

    /// Sets whether unregistered setting names are rejected.
    pub fn set_strict_setting_names(&mut self, strict: bool) -> &mut Self {
        self.strict_setting_names = strict;
        self
    }
}

/// Translates fingerprint descriptions into [`Http2Settings`].
///
/// Translation is pure: it reads only the description it is given and
/// returns a freshly allocated value, so one translator can serve any number
/// of threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct Translator {
    options: TranslateOptions,
}

impl Translator {
    /// Creates a translator with the given options.
    pub fn new(options: TranslateOptions) -> Translator {
        Translator { options }
    }

    /// The options this translator was built with.
    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    /// Translates a description.
    ///
    /// # Errors
    ///
    /// Fails when a weight is out of range under [`WeightPolicy::Reject`], or
    /// when a setting name is unregistered and strict names are enabled.
    pub fn translate(&self, desc: &FingerprintDescription) -> Result<Http2Settings> {
        let settings = self.settings(desc)?;

        let connection_flow = match desc.connection_flow {
            0 => None,
            increment => Some(increment),
        };

        let header_priority = desc
            .header_priority
            .as_ref()
            .map(|priority| {
                PriorityParam::encode(priority, self.options.weight_policy)
                    .map_err(|e| e.within("headerPriority"))
            })
            .transpose()?;

        let mut priority_frames = Vec::new();
        for (i, frame) in desc.priority_frames.iter().flatten().enumerate() {
            let frame = PriorityFrame::encode(frame, self.options.weight_policy).map_err(|e| {
                e.within("priorityParam")
                    .within(&format!("[{i}]"))
                    .within("priorityFrames")
            })?;
            trace!(
                "priority frame: stream={} dep={} exclusive={} weight={:?}",
                frame.stream_id,
                frame.param.stream_dep,
                frame.param.exclusive,
                frame.param.weight
            );
            priority_frames.push(frame);
        }

        debug!(
            "translated fingerprint: {} settings, window update {:?}, {} priority frames",
            settings.len(),
            connection_flow,
            priority_frames.len()
        );

        Ok(Http2Settings {
            settings,
            connection_flow,
            header_priority,
            priority_frames,
            headers_pseudo_order: desc.pseudo_header_order.clone(),
        })
    }

    fn settings(&self, desc: &FingerprintDescription) -> Result<Vec<Setting>> {
        let values = match &desc.settings {
            Some(values) => values,
            None => return Ok(Vec::new()),
        };

        let order = match &desc.settings_order {
            Some(order) => order,
            None => {
                warn!("no settings order given, SETTINGS will be sent in name order");
                return values
                    .iter()
                    .map(|(name, value)| {
                        self.resolve(name)
                            .map(|id| Setting::new(id, *value))
                            .map_err(|e| e.within(name).within("settings"))
                    })
                    .collect();
            }
        };

        let mut settings = Vec::with_capacity(order.len());
        for (i, name) in order.iter().enumerate() {
            let id = self
                .resolve(name)
                .map_err(|e| e.within(&format!("[{i}]")).within("settingsOrder"))?;
            let value = values.get(name).copied().unwrap_or(0);

            // Zero means "leave at default", except for push where zero is
            // the value being announced.
            if value == 0 && id != SettingId::ENABLE_PUSH {
                trace!("setting {} is zero, not sent", name);
                continue;
            }

            trace!("setting {}={} ({})", id.0, value, name);
            settings.push(Setting::new(id, value));
        }

        Ok(settings)
    }

    fn resolve(&self, name: &str) -> Result<SettingId> {
        if self.options.strict_setting_names {
            SettingId::from_name(name).ok_or_else(|| {
                Error::invalid_description(format!("unknown setting name {name:?}"))
            })
        } else {
            Ok(lookup(name))
        }
    }
}

/// Translates a description with the default options.
///
/// ```
/// use serde_json::json;
///
/// let desc = h2fingerprint::FingerprintDescription::from_value(&json!({
///     "settings": {"MAX_FRAME_SIZE": 0, "ENABLE_PUSH": 0},
///     "settingsOrder": ["MAX_FRAME_SIZE", "ENABLE_PUSH"]
/// }))
/// .unwrap();
///
/// let settings = h2fingerprint::translate(&desc).unwrap();
/// assert_eq!(settings.settings().len(), 1);
/// assert_eq!(settings.get(h2fingerprint::SettingId::ENABLE_PUSH), Some(0));
/// ```
pub fn translate(desc: &FingerprintDescription) -> Result<Http2Settings> {
    Translator::default().translate(desc)
}
