use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::{
    assets::{contents_json::ContentsJson, image_asset::ImageAsset},
    casing::{camel_cased, capitalized},
    error::Error,
    swift::SwiftCode,
    traits::Parser,
};

fn default_true() -> bool {
    true
}

/// A folder of an asset catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetGroup {
    pub name: String,

    #[serde(rename = "namespace", default = "default_true")]
    pub has_namespace: bool,

    #[serde(rename = "skipCodeGen", default)]
    pub skip_code_gen: bool,

    /// Only generate accessors; no folder is written.
    #[serde(rename = "codeOnly", default)]
    pub code_only: bool,

    #[serde(default)]
    pub groups: Vec<AssetGroup>,

    #[serde(default)]
    pub assets: Vec<ImageAsset>,
}

impl AssetGroup {
    pub fn contents_json(&self) -> ContentsJson {
        ContentsJson::group(self.has_namespace)
    }

    /// Namespace of this group's children, given the namespace the group lives in.
    pub fn child_namespace(&self, namespace: Option<&str>) -> Option<String> {
        match (self.has_namespace, namespace) {
            (true, Some(parent)) if !parent.is_empty() => Some(format!("{}/{}", parent, self.name)),
            (true, _) => Some(self.name.clone()),
            (false, parent) => parent.map(str::to_string),
        }
    }

    /// An enum named after the group holding the accessors of its children;
    /// nothing when code generation is skipped.
    pub fn swift_code(&self, namespace: Option<&str>) -> Vec<SwiftCode> {
        if self.skip_code_gen {
            return Vec::new();
        }
        let child_namespace = self.child_namespace(namespace);
        let mut content: Vec<SwiftCode> = self
            .groups
            .iter()
            .flat_map(|group| group.swift_code(child_namespace.as_deref()))
            .collect();
        content.extend(
            self.assets
                .iter()
                .map(|asset| asset.swift_code(child_namespace.as_deref())),
        );
        vec![SwiftCode::Enum {
            name: camel_cased(&self.name),
            content,
        }]
    }
}

/// One `.xcassets` catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetsContainer {
    pub name: String,

    #[serde(default)]
    pub groups: Vec<AssetGroup>,

    #[serde(default)]
    pub assets: Vec<ImageAsset>,
}

impl AssetsContainer {
    /// `icons` → `Icons.xcassets`
    pub fn folder_name(&self) -> String {
        let name = self
            .name
            .split(' ')
            .map(capitalized)
            .collect::<Vec<_>>()
            .join(" ");
        format!("{}.xcassets", name)
    }

    pub fn contents_json(&self) -> ContentsJson {
        ContentsJson::default()
    }

    pub fn swift_code(&self) -> Vec<SwiftCode> {
        let mut content: Vec<SwiftCode> = self
            .groups
            .iter()
            .flat_map(|group| group.swift_code(None))
            .collect();
        content.extend(self.assets.iter().map(|asset| asset.swift_code(None)));
        vec![
            SwiftCode::Import("UIKit".to_string()),
            SwiftCode::Newline,
            SwiftCode::Enum {
                name: camel_cased(&self.name),
                content,
            },
        ]
    }
}

/// The assets manifest: a JSON array of containers.
impl Parser for Vec<AssetsContainer> {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(Error::Parse)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(Error::Parse)
    }
}
