//! Core string table types: values, items and their per-language lookups.
//! Format adapters decode into these; generators and the reconciler work on these.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    formats::{
        android_xml::{Node, StringArrayResource, StringResource},
        strings::Content,
    },
    language::{LanguageKey, Os},
};

lazy_static! {
    static ref NUMERIC_ENTITY_REGEX: Regex = Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").unwrap();
    static ref ITEM_REGEX: Regex = Regex::new(r"(?s)<item>(.*?)</item>").unwrap();
}

const ITEM_OPEN: &str = "<item>";

/// How a string is rendered and which accessor is generated for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StringType {
    #[default]
    Single,
    /// Contains inline markup (`<b>`, `<font>`), kept verbatim on Android.
    Attributed,
    Array,
}

/// A template parameter of a string, used only by code generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: String,
}

/// The value of a string for one language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StringValue {
    Single(String),
    Array(Vec<String>),
}

impl StringValue {
    /// Bridges a flat text back into a value.
    ///
    /// This is a compatibility shim for formats that lose the array/single
    /// distinction (XLIFF targets, `.strings`): text starting with `<item>` is
    /// read as an array of the `<item>…</item>` contents. Any single text that
    /// happens to start with `<item>` is misread as an array.
    pub fn from_localizable_text(text: &str) -> Self {
        if text.starts_with(ITEM_OPEN) {
            StringValue::Array(
                ITEM_REGEX
                    .captures_iter(text)
                    .map(|caps| caps[1].to_string())
                    .collect(),
            )
        } else {
            StringValue::Single(text.to_string())
        }
    }

    /// Flat text used in `.strings`, XLIFF units and content comparisons.
    pub fn localizable_value(&self) -> String {
        match self {
            StringValue::Single(text) => localizable_text(text),
            StringValue::Array(items) => items
                .iter()
                .map(|item| format!("<item>{}</item>", localizable_text(item)))
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Renders the Android resource node for this value.
    pub fn render(&self, name: &str, string_type: StringType) -> Node {
        match self {
            StringValue::Single(text) => Node::String(StringResource {
                name: name.to_string(),
                content: Some(text.clone()),
                raw: string_type == StringType::Attributed,
            }),
            StringValue::Array(items) => Node::StringArray(StringArrayResource {
                name: name.to_string(),
                items: items.clone(),
            }),
        }
    }
}

impl From<&str> for StringValue {
    fn from(value: &str) -> Self {
        StringValue::Single(value.to_string())
    }
}

fn localizable_text(text: &str) -> String {
    escape_quotes(&decode_numeric_entities(text))
}

/// Decodes XML numeric character references (`&#1575;`, `&#x627;`).
pub fn decode_numeric_entities(input: &str) -> String {
    NUMERIC_ENTITY_REGEX
        .replace_all(input, |caps: &Captures| {
            let code = match (caps.get(1), caps.get(2)) {
                (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (_, Some(dec)) => dec.as_str().parse::<u32>().ok(),
                _ => None,
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub fn escape_quotes(input: &str) -> String {
    input.replace('"', "\\\"")
}

/// Inverse of [`escape_quotes`], for text coming back from translators.
pub fn unescape_quotes(input: &str) -> String {
    input.replace("\\\"", "\"")
}

/// One language value of a [`StringItem`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValueElement {
    pub key: LanguageKey,
    pub value: StringValue,
}

/// One localizable entry of a string table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StringItem {
    pub key: String,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(rename = "type", default)]
    pub string_type: StringType,

    #[serde(default)]
    pub variables: Option<Vec<Variable>>,

    #[serde(
        serialize_with = "serialize_values",
        deserialize_with = "deserialize_values"
    )]
    values: Vec<ValueElement>,
}

impl StringItem {
    pub fn new(key: impl Into<String>, string_type: StringType) -> Self {
        StringItem {
            key: key.into(),
            comment: None,
            string_type,
            variables: None,
            values: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_value(mut self, lang: impl Into<LanguageKey>, value: impl Into<StringValue>) -> Self {
        self.set(value.into(), &lang.into());
        self
    }

    /// All language values in insertion order.
    pub fn values(&self) -> &[ValueElement] {
        &self.values
    }

    /// Exact lookup, without OS fallback.
    pub fn get(&self, lang: &LanguageKey) -> Option<&StringValue> {
        self.values
            .iter()
            .find(|element| &element.key == lang)
            .map(|element| &element.value)
    }

    /// Resolves the value of `lang` for `os`: the OS-specific override wins,
    /// then the plain language value.
    pub fn value(&self, lang: &LanguageKey, os: Os) -> Option<&StringValue> {
        self.get(&lang.specific(os)).or_else(|| self.get(lang))
    }

    /// Inserts or replaces the value stored under exactly `lang`.
    pub fn set(&mut self, value: StringValue, lang: &LanguageKey) {
        match self.values.iter_mut().find(|element| &element.key == lang) {
            Some(element) => element.value = value,
            None => self.values.push(ValueElement {
                key: lang.clone(),
                value,
            }),
        }
    }

    pub fn set_text(&mut self, text: &str, lang: &LanguageKey) {
        self.set(StringValue::from_localizable_text(text), lang);
    }

    /// Drops every language value, then stores `value` for `lang`.
    ///
    /// This is not a partial update.
    pub fn reset_values(&mut self, value: StringValue, lang: &LanguageKey) {
        self.values.clear();
        self.set(value, lang);
    }

    /// Languages that are not OS-specific.
    pub fn langs(&self) -> impl Iterator<Item = &LanguageKey> {
        self.values
            .iter()
            .map(|element| &element.key)
            .filter(|key| !key.is_specific())
    }

    /// iOS content for `lang`, if the item has a value for it.
    pub fn localizable(&self, lang: &LanguageKey) -> Option<Content> {
        let value = self.value(lang, Os::Ios)?;
        Some(Content {
            lang: lang.clone(),
            comment: self
                .comment
                .clone()
                .unwrap_or_else(|| "No comments".to_string()),
            key: self.key.clone(),
            value: value.localizable_value(),
        })
    }

    /// Android node for `lang`, if the item has a value for it.
    pub fn xml(&self, lang: &LanguageKey) -> Option<Node> {
        self.value(lang, Os::Android)
            .map(|value| value.render(&self.key, self.string_type))
    }
}

fn serialize_values<S: Serializer>(values: &[ValueElement], serializer: S) -> Result<S::Ok, S::Error> {
    let mut sorted: Vec<&ValueElement> = values.iter().collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));
    serializer.collect_seq(sorted)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValuesRepr {
    List(Vec<ValueElement>),
    // Older sources stored values as a plain `{"en": "..."}` map.
    Map(BTreeMap<String, StringValue>),
}

fn deserialize_values<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<ValueElement>, D::Error> {
    let elements = match ValuesRepr::deserialize(deserializer)? {
        ValuesRepr::List(list) => list,
        ValuesRepr::Map(map) => map
            .into_iter()
            .map(|(key, value)| ValueElement {
                key: LanguageKey::parse(&key),
                value,
            })
            .collect(),
    };

    let mut values: Vec<ValueElement> = Vec::with_capacity(elements.len());
    for element in elements {
        match values.iter_mut().find(|e| e.key == element.key) {
            Some(existing) => existing.value = element.value,
            None => values.push(element),
        }
    }
    Ok(values)
}
