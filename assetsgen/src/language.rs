//! Language keys with optional platform specialization (`en` vs `en.ios`).

use std::{
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Target platform a value can be specialized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Ios,
    Android,
}

impl Os {
    /// Exact match on the wire tag used inside language keys.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ios" => Some(Os::Ios),
            "android" => Some(Os::Android),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Ios => "ios",
            Os::Android => "android",
        }
    }
}

impl Display for Os {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `ios` and `android`, case-insensitive.
impl FromStr for Os {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Os::Ios),
            "android" => Ok(Os::Android),
            other => Err(Error::UnknownOs(other.to_string())),
        }
    }
}

/// A language identifier, optionally specialized for one [`Os`].
///
/// `specific` shadows `raw` for the same language when looking values up,
/// never the other way round. Equality and hashing follow the canonical
/// string form (`en`, `en.ios`).
#[derive(Debug, Clone, Eq)]
pub enum LanguageKey {
    Raw(String),
    Specific(String, Os),
}

impl LanguageKey {
    /// Parses any string into a key. Never fails: strings that are not
    /// exactly `<lang>.<os>` are kept verbatim as a raw key.
    ///
    /// ```rust
    /// use assetsgen::{LanguageKey, Os};
    /// assert_eq!(LanguageKey::parse("en.ios"), LanguageKey::Specific("en".into(), Os::Ios));
    /// assert_eq!(LanguageKey::parse("en.web"), LanguageKey::Raw("en.web".into()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let parts: Vec<&str> = raw.split('.').collect();
        if let [lang, tag] = parts.as_slice() {
            if let Some(os) = Os::from_tag(tag) {
                return LanguageKey::Specific((*lang).to_string(), os);
            }
        }
        LanguageKey::Raw(raw.to_string())
    }

    pub fn raw(lang: impl Into<String>) -> Self {
        LanguageKey::Raw(lang.into())
    }

    /// The same language specialized for `os`, dropping any previous OS tag.
    pub fn specific(&self, os: Os) -> Self {
        LanguageKey::Specific(self.lang_value().to_string(), os)
    }

    /// The language part without OS tag.
    pub fn lang_value(&self) -> &str {
        match self {
            LanguageKey::Raw(lang) => lang,
            LanguageKey::Specific(lang, _) => lang,
        }
    }

    pub fn is_specific(&self) -> bool {
        matches!(self, LanguageKey::Specific(..))
    }

    /// Canonical string form.
    pub fn raw_value(&self) -> String {
        match self {
            LanguageKey::Raw(lang) => lang.clone(),
            LanguageKey::Specific(lang, os) => format!("{}.{}", lang, os),
        }
    }
}

impl PartialEq for LanguageKey {
    fn eq(&self, other: &Self) -> bool {
        self.raw_value() == other.raw_value()
    }
}

impl Hash for LanguageKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw_value().hash(state);
    }
}

impl PartialOrd for LanguageKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LanguageKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw_value().cmp(&other.raw_value())
    }
}

impl Display for LanguageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw_value())
    }
}

impl From<&str> for LanguageKey {
    fn from(value: &str) -> Self {
        LanguageKey::parse(value)
    }
}

impl Serialize for LanguageKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw_value())
    }
}

impl<'de> Deserialize<'de> for LanguageKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(LanguageKey::parse(&raw))
    }
}
