use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, error};

use crate::{
    assets::{AssetGroup, AssetsContainer, ImageAsset},
    error::Error,
    generators::{write_or_log, write_text_or_log},
    swift,
    traits::Parser,
};

const CONTENTS_FILE: &str = "Contents.json";

/// Writes `.xcassets` catalogs described by an assets manifest.
#[derive(Debug, Clone)]
pub struct AssetsGenerator {
    pub containers: Vec<AssetsContainer>,
}

impl AssetsGenerator {
    pub fn new(containers: Vec<AssetsContainer>) -> Self {
        AssetsGenerator { containers }
    }

    pub fn read_from(path: &Path) -> Result<Self, Error> {
        Ok(AssetsGenerator::new(Vec::<AssetsContainer>::read_from(path)?))
    }

    /// One catalog per container. Resources are copied from `resources_path`;
    /// a missing resource is logged and skipped.
    pub fn generate(&self, output_path: &Path, resources_path: &Path, code_gen: bool) -> Vec<PathBuf> {
        let mut written = Vec::new();
        for container in &self.containers {
            let container_path = output_path.join(container.folder_name());
            debug!(container = %container.name, path = %container_path.display(), "generating catalog");
            write_or_log(&container.contents_json(), container_path.join(CONTENTS_FILE), &mut written);

            for group in &container.groups {
                generate_group(group, &container_path, resources_path, &mut written);
            }
            for asset in &container.assets {
                generate_asset(asset, &container_path, resources_path, &mut written);
            }

            if code_gen {
                let code = swift::render(&container.swift_code());
                let path = output_path.join(swift::swift_file_name(&container.name));
                write_text_or_log(&format!("{}\n", code), path, &mut written);
            }
        }
        written
    }
}

fn generate_group(group: &AssetGroup, parent: &Path, resources_path: &Path, written: &mut Vec<PathBuf>) {
    if group.code_only {
        return;
    }
    let group_path = parent.join(&group.name);
    write_or_log(&group.contents_json(), group_path.join(CONTENTS_FILE), written);
    for child in &group.groups {
        generate_group(child, &group_path, resources_path, written);
    }
    for asset in &group.assets {
        generate_asset(asset, &group_path, resources_path, written);
    }
}

fn generate_asset(asset: &ImageAsset, parent: &Path, resources_path: &Path, written: &mut Vec<PathBuf>) {
    if asset.code_only {
        return;
    }
    let asset_path = parent.join(format!("{}.imageset", asset.name));
    let resolved = asset.resolve(resources_path);
    write_or_log(&resolved.contents, asset_path.join(CONTENTS_FILE), written);

    for resource in &resolved.resources {
        let from = resources_path.join(resource);
        let to = asset_path.join(resource);
        match fs::copy(&from, &to) {
            Ok(_) => written.push(to),
            Err(e) => error!(from = %from.display(), error = %e, "failed to copy resource"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ContentsJson;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"[
        {
            "name": "icons",
            "groups": [
                {
                    "name": "Navigation",
                    "assets": [
                        {"name": "back", "filename": "back.pdf"},
                        {"name": "remote", "codeOnly": true}
                    ]
                },
                {"name": "Virtual", "codeOnly": true, "assets": [{"name": "ghost", "filename": "ghost.pdf"}]}
            ],
            "assets": [{"name": "star", "filename": "star.png", "type": "set"}]
        }
    ]"#;

    fn setup() -> (tempfile::TempDir, tempfile::TempDir) {
        let resources = tempdir().unwrap();
        fs::write(resources.path().join("back.pdf"), b"%PDF").unwrap();
        fs::write(resources.path().join("star.png"), b"png").unwrap();
        fs::write(resources.path().join("star@2x.png"), b"png").unwrap();
        (resources, tempdir().unwrap())
    }

    #[test]
    fn test_generate_catalog() {
        let (resources, output) = setup();
        let generator = AssetsGenerator::new(Vec::<AssetsContainer>::from_str(MANIFEST).unwrap());
        generator.generate(output.path(), resources.path(), true);

        let catalog = output.path().join("Icons.xcassets");
        assert!(catalog.join("Contents.json").is_file());
        assert!(catalog.join("Navigation/Contents.json").is_file());
        assert!(catalog.join("Navigation/back.imageset/back.pdf").is_file());
        assert!(!catalog.join("Navigation/remote.imageset").exists());
        assert!(!catalog.join("Virtual").exists());
        assert!(catalog.join("star.imageset/star@2x.png").is_file());
        assert!(!catalog.join("star.imageset/star@3x.png").exists());

        let star = ContentsJson::read_from(catalog.join("star.imageset/Contents.json")).unwrap();
        assert_eq!(star.images.unwrap().len(), 2);

        let code = fs::read_to_string(output.path().join("icons.generated.swift")).unwrap();
        assert!(code.contains(r#"UIImage(named: "Navigation/remote")"#));
        assert!(code.contains(r#"UIImage(named: "Virtual/ghost")"#));
    }

    #[test]
    fn test_missing_resource_is_skipped() {
        let (_, output) = setup();
        let empty = tempdir().unwrap();
        let generator = AssetsGenerator::new(Vec::<AssetsContainer>::from_str(MANIFEST).unwrap());
        let written = generator.generate(output.path(), empty.path(), false);

        let back = output.path().join("Icons.xcassets/Navigation/back.imageset");
        assert!(back.join("Contents.json").is_file());
        assert!(!back.join("back.pdf").exists());
        assert!(!written.iter().any(|path| path.ends_with("back.pdf")));
        assert!(!output.path().join("icons.generated.swift").exists());
    }
}
