#![forbid(unsafe_code)]
//! Localization and asset build toolkit for iOS and Android projects.
//!
//! String tables live in JSON ([`StringsSource`]) and are turned into Apple `.strings` files,
//! Android `strings.xml` resources, XLIFF translation requests and Swift accessors. Image
//! manifests become `.xcassets` catalogs.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use assetsgen::{generators::StringsGenerator, LanguageKey, Os, StringsSource};
//! use assetsgen::traits::Parser;
//! use std::path::Path;
//!
//! let source = StringsSource::read_from("strings/Common.strings.json")?;
//! let generator = StringsGenerator::new(vec![source]);
//! generator.generate(&LanguageKey::raw("en"), Os::Ios, true, Path::new("out"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Reconciliation
//!
//! Strings edited on the Android side are merged back into the JSON source with
//! [`Changeset`]: every key is classified as replaced, moved, inserted or deleted against the
//! baseline language and platform of a [`ReconcileContext`], reported to a [`ReportSink`], and
//! applied onto the old source.

pub mod assets;
pub mod casing;
pub mod error;
pub mod formats;
pub mod generators;
pub mod language;
pub mod reconcile;
pub mod report;
pub mod source;
pub mod swift;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    assets::{AssetGroup, AssetsContainer, ContentsJson, ImageAsset},
    error::Error,
    language::{LanguageKey, Os},
    reconcile::{Changeset, ReconcileContext, audit_duplicates},
    report::{CsvReportSink, MemoryReportSink, ReportSink},
    source::StringsSource,
    swift::SwiftCode,
    types::{StringItem, StringType, StringValue, Variable},
};
