//! Reconciliation of a string table against a freshly parsed version of it.
//!
//! [`Changeset::diff`] classifies every key of two [`StringsSource`]s as
//! replaced, moved, inserted or deleted; [`Changeset::apply`] merges the
//! changes back into the old source. Content is compared only on the
//! baseline language and OS of the [`ReconcileContext`]: a change in any
//! other language is not a change.
//!
//! ```rust
//! use assetsgen::{Changeset, ReconcileContext, StringItem, StringType, StringsSource};
//!
//! let old = StringsSource::new("Common.strings.json", vec![
//!     StringItem::new("a", StringType::Single).with_value("en", "A"),
//!     StringItem::new("b", StringType::Single).with_value("en", "B").with_value("ar", "Ba"),
//! ]);
//! let new = StringsSource::new("Common.strings.json", vec![
//!     StringItem::new("b", StringType::Single).with_value("en", "B2"),
//!     StringItem::new("c", StringType::Single).with_value("en", "C"),
//! ]);
//!
//! let ctx = ReconcileContext::default();
//! let changeset = Changeset::diff(&old, &new, &ctx);
//! assert_eq!(changeset.deletes[0].item.key, "a");
//! assert_eq!(changeset.replaces[0].index, 1);
//! assert_eq!(changeset.inserts[0].index, 1);
//!
//! let merged = changeset.apply(&old, &ctx);
//! let keys: Vec<&str> = merged.strings.iter().map(|item| item.key.as_str()).collect();
//! assert_eq!(keys, ["b", "c"]);
//! ```

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::{
    error::Error,
    language::{LanguageKey, Os},
    report::{DuplicateKeyRow, DuplicateValueRow, ItemRow, MoveRow, ReplaceRow, ReportSink},
    source::StringsSource,
    types::{StringItem, StringValue},
};

/// Baseline language and platform that decide whether an item changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileContext {
    pub base_lang: LanguageKey,
    pub os: Os,
}

impl Default for ReconcileContext {
    fn default() -> Self {
        ReconcileContext {
            base_lang: LanguageKey::raw("en"),
            os: Os::Ios,
        }
    }
}

impl ReconcileContext {
    pub fn new(base_lang: LanguageKey, os: Os) -> Self {
        ReconcileContext { base_lang, os }
    }

    /// The baseline value of `item`.
    pub fn base_value<'a>(&self, item: &'a StringItem) -> Option<&'a StringValue> {
        item.value(&self.base_lang, self.os)
    }

    /// The baseline value of `item` as flat localizable text.
    pub fn base_text(&self, item: &StringItem) -> Option<String> {
        self.base_value(item).map(StringValue::localizable_value)
    }

    /// Both items have a baseline value and the values render the same.
    /// A missing value on either side is never equal.
    pub fn same_content(&self, a: &StringItem, b: &StringItem) -> bool {
        match (self.base_text(a), self.base_text(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// An item only present in the new source, at its index there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insert {
    pub index: usize,
    pub item: StringItem,
}

/// An item only present in the old source, at its index there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delete {
    pub index: usize,
    pub item: StringItem,
}

/// An unchanged item whose position changed relative to the other unchanged items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub from_index: usize,
    pub to_index: usize,
    pub item: StringItem,
}

/// An item present in both sources with a different baseline value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace {
    /// Index in the old source.
    pub index: usize,
    pub old_item: StringItem,
    pub new_item: StringItem,
}

/// Differences between two versions of a string table.
///
/// Each collection is ordered by index. A key appears in at most one
/// collection: a changed and repositioned item is only a [`Replace`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    pub inserts: Vec<Insert>,
    pub deletes: Vec<Delete>,
    pub moves: Vec<Move>,
    pub replaces: Vec<Replace>,
}

impl Changeset {
    /// Computes the changes that turn `old` into `new`.
    ///
    /// Keys are expected to be unique; for a repeated key only its first
    /// occurrence takes part.
    pub fn diff(old: &StringsSource, new: &StringsSource, ctx: &ReconcileContext) -> Self {
        let old_lookup = index_by_key(&old.strings);
        let new_lookup = index_by_key(&new.strings);
        let mut changeset = Changeset::default();

        let mut unchanged: HashSet<&str> = HashSet::new();
        for (index, item) in old.strings.iter().enumerate() {
            if !is_first_occurrence(&old_lookup, item, index) {
                continue;
            }
            match new_lookup.get(item.key.as_str()) {
                None => changeset.deletes.push(Delete {
                    index,
                    item: item.clone(),
                }),
                Some((_, new_item)) if ctx.same_content(item, new_item) => {
                    unchanged.insert(&item.key);
                }
                Some((_, new_item)) => changeset.replaces.push(Replace {
                    index,
                    old_item: item.clone(),
                    new_item: (*new_item).clone(),
                }),
            }
        }

        for (index, item) in new.strings.iter().enumerate() {
            if is_first_occurrence(&new_lookup, item, index)
                && !old_lookup.contains_key(item.key.as_str())
            {
                changeset.inserts.push(Insert {
                    index,
                    item: item.clone(),
                });
            }
        }

        // Unchanged keys in new order, with their old index. Whatever is
        // outside the longest run of increasing old indices has moved.
        let unchanged_in_new: Vec<(&str, usize)> = new
            .strings
            .iter()
            .enumerate()
            .filter(|(index, item)| {
                unchanged.contains(item.key.as_str())
                    && is_first_occurrence(&new_lookup, item, *index)
            })
            .filter_map(|(_, item)| {
                let (old_index, _) = old_lookup.get(item.key.as_str())?;
                Some((item.key.as_str(), *old_index))
            })
            .collect();
        let stayed = longest_increasing_run(&unchanged_in_new);

        for (key, _) in unchanged_in_new {
            if stayed.contains(key) {
                continue;
            }
            if let (Some((from_index, _)), Some((to_index, item))) =
                (old_lookup.get(key), new_lookup.get(key))
            {
                changeset.moves.push(Move {
                    from_index: *from_index,
                    to_index: *to_index,
                    item: (*item).clone(),
                });
            }
        }
        changeset.moves.sort_by_key(|m| m.from_index);

        debug!(
            file = %old.file_name,
            replaces = changeset.replaces.len(),
            inserts = changeset.inserts.len(),
            deletes = changeset.deletes.len(),
            moves = changeset.moves.len(),
            "computed changeset"
        );
        changeset
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
            && self.deletes.is_empty()
            && self.moves.is_empty()
            && self.replaces.is_empty()
    }

    /// Merges the changes into a copy of `old`.
    ///
    /// Steps run in a fixed order:
    /// 1. replaces update only the baseline value of the old item, other
    ///    languages are kept. The value is written under the OS-specific key
    ///    when the old item already has one, else under the plain language;
    /// 2. deletes remove items by key;
    /// 3. inserts put the new item at its recorded index, clamped to the
    ///    current length;
    /// 4. moves overwrite the slot at `to_index` (or append past the end).
    ///    The item is not removed from its previous slot.
    ///
    /// Recorded indices are used as they are, so when deletes, inserts and
    /// moves interact the merged order can differ from the new source.
    pub fn apply(&self, old: &StringsSource, ctx: &ReconcileContext) -> StringsSource {
        let mut merged = old.clone();
        let specific = ctx.base_lang.specific(ctx.os);

        for replace in &self.replaces {
            let Some(value) = ctx.base_value(&replace.new_item) else {
                continue;
            };
            if let Some(item) = merged.item_mut(&replace.old_item.key) {
                let lang = if item.get(&specific).is_some() {
                    &specific
                } else {
                    &ctx.base_lang
                };
                item.set(value.clone(), lang);
            }
        }

        let deleted: HashSet<&str> = self.deletes.iter().map(|d| d.item.key.as_str()).collect();
        merged
            .strings
            .retain(|item| !deleted.contains(item.key.as_str()));

        for insert in &self.inserts {
            let index = insert.index.min(merged.strings.len());
            merged.strings.insert(index, insert.item.clone());
        }

        for mv in &self.moves {
            match merged.strings.get_mut(mv.to_index) {
                Some(slot) => *slot = mv.item.clone(),
                None => merged.strings.push(mv.item.clone()),
            }
        }

        merged
    }

    /// Writes one row per entry to `sink`; values are baseline texts.
    pub fn report(&self, ctx: &ReconcileContext, sink: &mut dyn ReportSink) -> Result<(), Error> {
        let text = |item: &StringItem| ctx.base_text(item).unwrap_or_default();

        for replace in &self.replaces {
            sink.replace(ReplaceRow {
                index: replace.index,
                key: replace.old_item.key.clone(),
                old_value: text(&replace.old_item),
                new_value: text(&replace.new_item),
            })?;
        }
        for insert in &self.inserts {
            sink.insert(ItemRow {
                index: insert.index,
                key: insert.item.key.clone(),
                value: text(&insert.item),
            })?;
        }
        for delete in &self.deletes {
            sink.delete(ItemRow {
                index: delete.index,
                key: delete.item.key.clone(),
                value: text(&delete.item),
            })?;
        }
        for mv in &self.moves {
            sink.moved(MoveRow {
                from_index: mv.from_index,
                to_index: mv.to_index,
                key: mv.item.key.clone(),
                value: text(&mv.item),
            })?;
        }
        Ok(())
    }
}

fn index_by_key(items: &[StringItem]) -> HashMap<&str, (usize, &StringItem)> {
    let mut lookup = HashMap::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        lookup.entry(item.key.as_str()).or_insert((index, item));
    }
    lookup
}

fn is_first_occurrence(
    lookup: &HashMap<&str, (usize, &StringItem)>,
    item: &StringItem,
    index: usize,
) -> bool {
    lookup
        .get(item.key.as_str())
        .is_some_and(|(first, _)| *first == index)
}

// Keys of one longest subsequence of `entries` whose old indices increase,
// by patience sorting. Among equally long runs, the one ending on the
// smallest old index is kept.
fn longest_increasing_run<'a>(entries: &[(&'a str, usize)]) -> HashSet<&'a str> {
    // tails[len]: position of the entry ending the best run of length len + 1.
    let mut tails: Vec<usize> = Vec::new();
    let mut previous: Vec<Option<usize>> = Vec::with_capacity(entries.len());

    for (position, (_, old_index)) in entries.iter().enumerate() {
        let len = tails.partition_point(|&tail| entries[tail].1 < *old_index);
        previous.push(len.checked_sub(1).map(|shorter| tails[shorter]));
        if len == tails.len() {
            tails.push(position);
        } else {
            tails[len] = position;
        }
    }

    let mut result = HashSet::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(position) = cursor {
        result.insert(entries[position].0);
        cursor = previous[position];
    }
    result
}

/// Keys sharing one baseline value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateValue {
    pub value: String,
    pub keys: Vec<String>,
}

/// Groups items by baseline text; groups of more than one key, in order of
/// first appearance. Items without a baseline value are not grouped.
pub fn duplicate_values(source: &StringsSource, ctx: &ReconcileContext) -> Vec<DuplicateValue> {
    let mut groups: Vec<DuplicateValue> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for item in &source.strings {
        let Some(value) = ctx.base_text(item) else {
            continue;
        };
        match positions.get(&value) {
            Some(&position) => groups[position].keys.push(item.key.clone()),
            None => {
                positions.insert(value.clone(), groups.len());
                groups.push(DuplicateValue {
                    value,
                    keys: vec![item.key.clone()],
                });
            }
        }
    }

    groups.retain(|group| group.keys.len() > 1);
    groups
}

/// Keys used by more than one item, each reported once, in order of first appearance.
pub fn duplicate_keys(source: &StringsSource) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in &source.strings {
        *counts.entry(item.key.as_str()).or_default() += 1;
    }

    let mut seen = HashSet::new();
    source
        .strings
        .iter()
        .map(|item| item.key.as_str())
        .filter(|key| counts.get(key).is_some_and(|count| *count > 1) && seen.insert(*key))
        .map(str::to_string)
        .collect()
}

/// Runs both duplicate audits on `source`. The source is not modified.
pub fn audit_duplicates(
    source: &StringsSource,
    ctx: &ReconcileContext,
    sink: &mut dyn ReportSink,
) -> Result<(), Error> {
    for group in duplicate_values(source, ctx) {
        sink.duplicate_value(DuplicateValueRow {
            source: source.file_name.clone(),
            value: group.value,
            duplicated_keys: group.keys.join(";"),
        })?;
    }
    for key in duplicate_keys(source) {
        sink.duplicate_key(DuplicateKeyRow {
            source: source.file_name.clone(),
            key,
        })?;
    }
    Ok(())
}
