use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    assets::contents_json::{
        ContentsJson, Idiom, Image, Info, LanguageDirection, Properties, Scale,
        TemplateRenderingIntent,
    },
    casing::swift_identifier,
    swift::SwiftCode,
};

const SET_VARIANTS: [(&str, Scale); 3] = [("", Scale::X1), ("@2x", Scale::X2), ("@3x", Scale::X3)];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// One resolution independent file (PDF, SVG).
    #[default]
    Single,
    /// `name.png`, `name@2x.png`, `name@3x.png`.
    Set,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Attributes {
    #[serde(rename = "language-direction")]
    #[serde(default)]
    pub language_direction: Option<LanguageDirection>,
}

fn default_true() -> bool {
    true
}

/// An image of the manifest, written as `<name>.imageset`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageAsset {
    pub name: String,

    #[serde(default)]
    pub filename: String,

    #[serde(rename = "type", default)]
    pub asset_type: AssetType,

    #[serde(rename = "vector", default = "default_true")]
    pub is_vector: bool,

    #[serde(rename = "template", default = "default_true")]
    pub is_template: bool,

    /// Only generate the accessor, the image lives elsewhere.
    #[serde(rename = "codeOnly", default)]
    pub code_only: bool,

    #[serde(default)]
    pub attributes: Option<Attributes>,
}

/// What goes into an image set folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub contents: ContentsJson,
    /// File names to copy from the resources directory.
    pub resources: Vec<String>,
}

impl ImageAsset {
    fn language_direction(&self) -> Option<LanguageDirection> {
        self.attributes.as_ref().and_then(|a| a.language_direction)
    }

    /// Contents and resources of the image set. A `set` only lists the
    /// scale variants present in `resources_dir`.
    pub fn resolve(&self, resources_dir: &Path) -> ResolvedAsset {
        if self.code_only {
            return ResolvedAsset {
                contents: ContentsJson::default(),
                resources: Vec::new(),
            };
        }

        match self.asset_type {
            AssetType::Single => ResolvedAsset {
                contents: ContentsJson {
                    images: Some(vec![Image {
                        idiom: Idiom::Universal,
                        filename: self.filename.clone(),
                        scale: None,
                        language_direction: self.language_direction(),
                    }]),
                    info: Info::default(),
                    properties: Some(Properties {
                        provides_namespace: None,
                        preserves_vector_representation: Some(self.is_vector),
                        template_rendering_intent: Some(if self.is_template {
                            TemplateRenderingIntent::Template
                        } else {
                            TemplateRenderingIntent::Original
                        }),
                    }),
                },
                resources: vec![self.filename.clone()],
            },
            AssetType::Set => {
                let (base, ext) = match self.filename.rsplit_once('.') {
                    Some((base, ext)) => (base, format!(".{}", ext)),
                    None => (self.filename.as_str(), String::new()),
                };
                let mut images = Vec::new();
                let mut resources = Vec::new();
                for (suffix, scale) in SET_VARIANTS {
                    let file_name = format!("{}{}{}", base, suffix, ext);
                    if !resources_dir.join(&file_name).is_file() {
                        continue;
                    }
                    images.push(Image {
                        idiom: Idiom::Universal,
                        filename: file_name.clone(),
                        scale: Some(scale),
                        language_direction: self.language_direction(),
                    });
                    resources.push(file_name);
                }
                ResolvedAsset {
                    contents: ContentsJson {
                        images: Some(images),
                        info: Info::default(),
                        properties: None,
                    },
                    resources,
                }
            }
        }
    }

    /// `UIImage` accessor; the image is looked up as `<namespace>/<name>`.
    pub fn swift_code(&self, namespace: Option<&str>) -> SwiftCode {
        let image_name = match namespace {
            Some(namespace) if !namespace.is_empty() => format!("{}/{}", namespace, self.name),
            _ => self.name.clone(),
        };
        SwiftCode::FuncReturnImage {
            name: swift_identifier(&self.name),
            image_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn asset(json: &str) -> ImageAsset {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults() {
        let a = asset(r#"{"name": "close", "filename": "close.pdf"}"#);
        assert_eq!(a.asset_type, AssetType::Single);
        assert!(a.is_vector);
        assert!(a.is_template);
        assert!(!a.code_only);
    }

    #[test]
    fn test_single_resolves_properties() {
        let a = asset(r#"{"name": "logo", "filename": "logo.pdf", "vector": false, "template": false}"#);
        let resolved = a.resolve(Path::new("unused"));
        assert_eq!(resolved.resources, vec!["logo.pdf".to_string()]);
        let props = resolved.contents.properties.unwrap();
        assert_eq!(props.preserves_vector_representation, Some(false));
        assert_eq!(
            props.template_rendering_intent,
            Some(TemplateRenderingIntent::Original)
        );
        assert_eq!(resolved.contents.images.unwrap()[0].scale, None);
    }

    #[test]
    fn test_set_lists_existing_variants_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("arrow.back.png"), b"1x").unwrap();
        fs::write(dir.path().join("arrow.back@3x.png"), b"3x").unwrap();

        let a = asset(
            r#"{"name": "arrow", "filename": "arrow.back.png", "type": "set",
                "attributes": {"language-direction": "left-to-right"}}"#,
        );
        let resolved = a.resolve(dir.path());
        assert_eq!(
            resolved.resources,
            vec!["arrow.back.png".to_string(), "arrow.back@3x.png".to_string()]
        );
        let images = resolved.contents.images.unwrap();
        assert_eq!(images[0].scale, Some(Scale::X1));
        assert_eq!(images[1].scale, Some(Scale::X3));
        assert_eq!(images[1].language_direction, Some(LanguageDirection::LeftToRight));
        assert!(resolved.contents.properties.is_none());
    }

    #[test]
    fn test_code_only_has_no_images() {
        let a = asset(r#"{"name": "remote", "codeOnly": true}"#);
        let resolved = a.resolve(Path::new("unused"));
        assert!(resolved.resources.is_empty());
        assert!(resolved.contents.images.is_none());
    }

    #[test]
    fn test_swift_code_namespace() {
        let a = asset(r#"{"name": "ic_close", "filename": "ic_close.pdf"}"#);
        assert_eq!(
            a.swift_code(Some("Icons")),
            SwiftCode::FuncReturnImage {
                name: "icClose".to_string(),
                image_name: "Icons/ic_close".to_string(),
            }
        );
        assert_eq!(
            a.swift_code(None),
            SwiftCode::FuncReturnImage {
                name: "icClose".to_string(),
                image_name: "ic_close".to_string(),
            }
        );
    }
}
