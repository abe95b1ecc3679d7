use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    error::Error,
    generators::write_or_log,
    reconcile::{audit_duplicates, Changeset, ReconcileContext},
    report::ReportSink,
    source::StringsSource,
    types::StringItem,
};

/// Merges strings parsed from Android XML into the canonical JSON source.
#[derive(Debug, Clone)]
pub struct XmlStringsReconciler {
    pub old: StringsSource,
}

impl XmlStringsReconciler {
    pub fn new(old: StringsSource) -> Self {
        XmlStringsReconciler { old }
    }

    /// Diffs the old source against `parsed`, reports the changeset, applies it
    /// and audits the merged source for duplicates.
    pub fn reconcile(
        &self,
        parsed: Vec<StringItem>,
        ctx: &ReconcileContext,
        sink: &mut dyn ReportSink,
    ) -> Result<StringsSource, Error> {
        let mut new = StringsSource::new(self.old.file_name.clone(), parsed);
        new.code_name = self.old.code_name.clone();

        let changeset = Changeset::diff(&self.old, &new, ctx);
        info!(
            source = %self.old.file_name,
            replaces = changeset.replaces.len(),
            inserts = changeset.inserts.len(),
            deletes = changeset.deletes.len(),
            moves = changeset.moves.len(),
            "reconciled parsed strings"
        );
        changeset.report(ctx, sink)?;

        let merged = changeset.apply(&self.old, ctx);
        audit_duplicates(&merged, ctx, sink)?;
        Ok(merged)
    }

    /// [`Self::reconcile`], writing the merged source to `<project>.strings.json`.
    pub fn generate(
        &self,
        parsed: Vec<StringItem>,
        ctx: &ReconcileContext,
        sink: &mut dyn ReportSink,
        output_path: &Path,
        project_name: &str,
    ) -> Result<Vec<PathBuf>, Error> {
        let merged = self.reconcile(parsed, ctx, sink)?;
        let mut written = Vec::new();
        let path = output_path.join(format!("{}.strings.json", project_name));
        write_or_log(&merged, path, &mut written);
        Ok(written)
    }
}
