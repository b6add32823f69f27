use serde::{Deserialize, Serialize};
use std::fmt;

/// Enforcement level of a rule.
///
/// Documents may spell it as a string (`"off"`, `"warn"`, `"error"`, matched
/// case-insensitively) or as its numeric equivalent (`0`, `1`, `2`). It is
/// always written back as the lowercase string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Off,
    Warn,
    Error,
}

impl Severity {
    /// Parse the string spelling of a severity
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("off") {
            Some(Self::Off)
        } else if name.eq_ignore_ascii_case("warn") {
            Some(Self::Warn)
        } else if name.eq_ignore_ascii_case("error") {
            Some(Self::Error)
        } else {
            None
        }
    }

    /// Parse the numeric spelling of a severity
    #[must_use]
    pub const fn from_number(value: u64) -> Option<Self> {
        match value {
            0 => Some(Self::Off),
            1 => Some(Self::Warn),
            2 => Some(Self::Error),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_number(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Warn => 1,
            Self::Error => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Check if the rule runs at all (Warn or Error)
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Warn | Self::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(SeverityVisitor)
    }
}

pub(crate) struct SeverityVisitor;

impl serde::de::Visitor<'_> for SeverityVisitor {
    type Value = Severity;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a severity ('off', 'warn', 'error' or 0, 1, 2)")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Severity::from_name(value).ok_or_else(|| E::custom(format!("unknown severity: {value}")))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Severity::from_number(value).ok_or_else(|| E::custom(format!("unknown severity: {value}")))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        u64::try_from(value)
            .ok()
            .and_then(Severity::from_number)
            .ok_or_else(|| E::custom(format!("unknown severity: {value}")))
    }
}
