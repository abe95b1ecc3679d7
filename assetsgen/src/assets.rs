//! Asset catalog model: a manifest of containers, groups and images that is
//! turned into `.xcassets` folders and `UIImage` accessors.

pub mod contents_json;
pub mod group;
pub mod image_asset;

pub use contents_json::ContentsJson;
pub use group::{AssetGroup, AssetsContainer};
pub use image_asset::{AssetType, ImageAsset, ResolvedAsset};
