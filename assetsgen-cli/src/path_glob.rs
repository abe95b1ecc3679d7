use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use rayon::prelude::*;

use crate::options::CommandError;

fn has_glob_meta(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
}

// Directory part of the pattern before the first glob meta-character.
fn static_prefix_dir(base: &Path, pattern: &str) -> PathBuf {
    let idx = pattern
        .bytes()
        .position(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
        .unwrap_or(pattern.len());
    let prefix = &pattern[..idx];
    match prefix.rfind('/') {
        Some(slash) => base.join(&prefix[..slash]),
        None => base.to_path_buf(),
    }
}

/// Expands file list entries relative to `base`.
///
/// Literal entries are kept as given; glob entries are replaced by the
/// matching files (relative to `base`, sorted). A glob without matches is
/// kept verbatim so the missing input is reported when it is read.
pub fn expand_file_globs(base: &Path, entries: &[String]) -> Result<Vec<String>, CommandError> {
    let mut matchers: Vec<(usize, GlobMatcher)> = Vec::new();
    for (idx, pattern) in entries.iter().enumerate() {
        if !has_glob_meta(pattern) {
            continue;
        }
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| CommandError::Glob {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        matchers.push((idx, glob.compile_matcher()));
    }
    if matchers.is_empty() {
        return Ok(entries.to_vec());
    }

    let mut roots: Vec<PathBuf> = Vec::new();
    for (idx, _) in &matchers {
        let root = static_prefix_dir(base, &entries[*idx]);
        if !roots.iter().any(|r| r == &root) {
            roots.push(root);
        }
    }

    // Walk roots in parallel, collecting files relative to `base`
    let files: Vec<String> = roots
        .par_iter()
        .map(|root| {
            let mut out: Vec<String> = Vec::new();
            let walker = WalkBuilder::new(root)
                .git_ignore(true)
                .git_global(true)
                .git_exclude(true)
                .hidden(false)
                .ignore(true)
                .parents(true)
                .build();

            for dent in walker.flatten() {
                if !dent.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                if let Ok(relative) = dent.path().strip_prefix(base) {
                    out.push(relative.to_string_lossy().replace('\\', "/"));
                }
            }
            out
        })
        .flatten()
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut results: Vec<String> = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let matched = match matchers.iter().find(|(i, _)| *i == idx) {
            Some((_, matcher)) => {
                let mut matched: Vec<String> = files
                    .iter()
                    .filter(|file| matcher.is_match(file.as_str()))
                    .cloned()
                    .collect();
                matched.sort();
                if matched.is_empty() {
                    vec![entry.clone()]
                } else {
                    matched
                }
            }
            None => vec![entry.clone()],
        };
        for file in matched {
            if seen.insert(file.clone()) {
                results.push(file);
            }
        }
    }
    Ok(results)
}
