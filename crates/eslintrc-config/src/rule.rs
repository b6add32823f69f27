use crate::severity::Severity;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a single rule
///
/// Supports the two shapes a document can use:
/// ```yaml
/// # Bare severity
/// no-shadow: warn
/// no-console: 0
///
/// # Array: [severity, ...options]
/// max-len: [error, 80, 2, { ignoreUrls: true }]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSetting {
    /// Just a severity level
    Severity(Severity),

    /// Severity followed by the rule's options tuple, kept verbatim
    Detailed {
        severity: Severity,
        options: Vec<serde_json::Value>,
    },
}

impl RuleSetting {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Severity(s) | Self::Detailed { severity: s, .. } => *s,
        }
    }

    /// Options following the severity (empty for the bare form)
    #[must_use]
    pub fn options(&self) -> &[serde_json::Value] {
        match self {
            Self::Severity(_) => &[],
            Self::Detailed { options, .. } => options,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.severity().is_enabled()
    }

    /// Apply this setting on top of `base`.
    ///
    /// A setting without options (`"warn"` or `["warn"]`) only changes the
    /// level, so options configured by `base` survive. A setting with
    /// options replaces `base` entirely.
    #[must_use]
    pub fn merged_over(&self, base: &Self) -> Self {
        if self.options().is_empty() && !base.options().is_empty() {
            return Self::Detailed {
                severity: self.severity(),
                options: base.options().to_vec(),
            };
        }
        self.clone()
    }
}

impl Serialize for RuleSetting {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Severity(severity) => severity.serialize(serializer),
            Self::Detailed { severity, options } => {
                let mut seq = serializer.serialize_seq(Some(options.len() + 1))?;
                seq.serialize_element(severity)?;
                for option in options {
                    seq.serialize_element(option)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for RuleSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RuleSettingVisitor;

        impl<'de> Visitor<'de> for RuleSettingVisitor {
            type Value = RuleSetting;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(
                    "a severity ('off', 'warn', 'error' or 0, 1, 2) \
                     or an array [severity, ...options]",
                )
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                crate::severity::SeverityVisitor
                    .visit_str(value)
                    .map(RuleSetting::Severity)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                crate::severity::SeverityVisitor
                    .visit_u64(value)
                    .map(RuleSetting::Severity)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                crate::severity::SeverityVisitor
                    .visit_i64(value)
                    .map(RuleSetting::Severity)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let severity: Severity = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"array with severity"))?;

                let mut options = Vec::new();
                while let Some(option) = seq.next_element::<serde_json::Value>()? {
                    options.push(option);
                }

                Ok(RuleSetting::Detailed { severity, options })
            }
        }

        deserializer.deserialize_any(RuleSettingVisitor)
    }
}

/// Ordered mapping of rule id to setting.
///
/// Declaring a rule twice keeps the position of the first declaration and
/// the value of the last one. Repeated ids are remembered in
/// [`RuleConfiguration::overwritten`]; that record is neither serialized
/// nor compared.
#[derive(Debug, Clone, Default)]
pub struct RuleConfiguration {
    entries: Vec<(String, RuleSetting)>,
    overwritten: Vec<String>,
}

impl RuleConfiguration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from declarations in source order, last write wins
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, RuleSetting)>,
        K: Into<String>,
    {
        let mut rules = Self::new();
        for (rule_id, setting) in entries {
            rules.insert(rule_id, setting);
        }
        rules
    }

    /// Declare a rule. Returns the previous setting if the id was already declared.
    pub fn insert(
        &mut self,
        rule_id: impl Into<String>,
        setting: RuleSetting,
    ) -> Option<RuleSetting> {
        let rule_id = rule_id.into();
        let previous = self.replace(&rule_id, setting);
        if previous.is_some() {
            tracing::warn!(rule = %rule_id, "Rule declared more than once, later declaration wins");
            self.overwritten.push(rule_id);
        }
        previous
    }

    fn replace(&mut self, rule_id: &str, setting: RuleSetting) -> Option<RuleSetting> {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(id, _)| id == rule_id) {
            Some(std::mem::replace(existing, setting))
        } else {
            self.entries.push((rule_id.to_string(), setting));
            None
        }
    }

    #[must_use]
    pub fn get(&self, rule_id: &str) -> Option<&RuleSetting> {
        self.entries
            .iter()
            .find(|(id, _)| id == rule_id)
            .map(|(_, setting)| setting)
    }

    #[must_use]
    pub fn severity(&self, rule_id: &str) -> Option<Severity> {
        self.get(rule_id).map(RuleSetting::severity)
    }

    /// Options tuple of a rule, `None` if the rule is not configured
    #[must_use]
    pub fn options(&self, rule_id: &str) -> Option<&[serde_json::Value]> {
        self.get(rule_id).map(RuleSetting::options)
    }

    #[must_use]
    pub fn contains(&self, rule_id: &str) -> bool {
        self.get(rule_id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rules in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.entries
            .iter()
            .map(|(id, setting)| (id.as_str(), setting))
    }

    /// Rules configured as Warn or Error
    pub fn enabled(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.iter().filter(|(_, setting)| setting.is_enabled())
    }

    /// Rule ids that were declared more than once, in order of overwrite
    #[must_use]
    pub fn overwritten(&self) -> &[String] {
        &self.overwritten
    }

    /// Apply `overlay` on top of these rules with cascade semantics.
    ///
    /// Overrides between the two sides are not repeats; the repeats recorded
    /// inside either side are kept.
    #[must_use]
    pub fn merge(&self, overlay: &Self) -> Self {
        let mut merged = Self {
            entries: self.entries.clone(),
            overwritten: self.overwritten.clone(),
        };
        merged
            .overwritten
            .extend(overlay.overwritten.iter().cloned());
        for (rule_id, setting) in overlay.iter() {
            let setting = match merged.get(rule_id) {
                Some(base) => setting.merged_over(base),
                None => setting.clone(),
            };
            merged.replace(rule_id, setting);
        }
        merged
    }
}

impl PartialEq for RuleConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<'a> IntoIterator for &'a RuleConfiguration {
    type Item = (&'a str, &'a RuleSetting);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for RuleConfiguration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (rule_id, setting) in &self.entries {
            map.serialize_entry(rule_id, setting)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RuleConfiguration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RuleConfigurationVisitor;

        impl<'de> Visitor<'de> for RuleConfigurationVisitor {
            type Value = RuleConfiguration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of rule ids to settings")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rules = RuleConfiguration::new();
                while let Some(rule_id) = map.next_key::<String>()? {
                    let setting = map.next_value::<RuleSetting>().map_err(|e| {
                        <A::Error as de::Error>::custom(format!(
                            "invalid setting for rule '{rule_id}': {e}"
                        ))
                    })?;
                    rules.insert(rule_id, setting);
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_map(RuleConfigurationVisitor)
    }
}
