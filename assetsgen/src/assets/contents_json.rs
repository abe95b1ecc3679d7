//! `Contents.json` of asset catalogs, image sets and groups.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::{error::Error, traits::Parser};

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ContentsJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub images: Option<Vec<Image>>,

    #[serde(default)]
    pub info: Info,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub properties: Option<Properties>,
}

impl ContentsJson {
    /// Contents of a folder; Xcode namespaces the images inside when `provides_namespace`.
    pub fn group(provides_namespace: bool) -> Self {
        ContentsJson {
            images: None,
            info: Info::default(),
            properties: Some(Properties {
                provides_namespace: Some(provides_namespace),
                ..Properties::default()
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Image {
    pub idiom: Idiom,
    pub filename: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub scale: Option<Scale>,

    #[serde(rename = "language-direction")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub language_direction: Option<LanguageDirection>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Idiom {
    #[default]
    Universal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Scale {
    #[serde(rename = "1x")]
    X1,
    #[serde(rename = "2x")]
    X2,
    #[serde(rename = "3x")]
    X3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LanguageDirection {
    LeftToRight,
    RightToLeft,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Info {
    pub version: u32,
    pub author: String,
}

impl Default for Info {
    fn default() -> Self {
        Info {
            version: 1,
            author: "xcode".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateRenderingIntent {
    Template,
    Original,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Properties {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub provides_namespace: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub preserves_vector_representation: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub template_rendering_intent: Option<TemplateRenderingIntent>,
}

impl Parser for ContentsJson {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(Error::Parse)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(Error::Parse)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
