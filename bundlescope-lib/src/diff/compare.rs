use super::{DiffItem, ValueDiff};
use crate::model::{Chunk, ResourceSize, StatsDocument};
use crate::versions::VersionChange;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

/// Structural differences between two root compilations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDiff {
    pub modules: EntityDiff,
    pub chunks: EntityDiff,
    pub assets: EntityDiff,
    pub packages: Vec<PackageChange>,
    pub entrypoints: Vec<SizeChange>,
    pub build_time: Option<TimeChange>,
}

/// Added, removed, and resized entities of one kind, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<SizeChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeChange {
    pub id: String,
    pub before: u64,
    pub after: u64,
    pub diff: ValueDiff,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeChange {
    pub before: u64,
    pub after: u64,
    pub diff: ValueDiff,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PackageChange {
    Added {
        name: String,
        version: Option<String>,
    },
    Removed {
        name: String,
        version: Option<String>,
    },
    Changed {
        name: String,
        before: String,
        after: String,
        change: VersionChange,
    },
}

/// One renderable line of a diff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    pub id: String,
    pub title: String,

    #[serde(flatten)]
    pub item: DiffItem,
}

/// Compare two documents.
///
/// Sizes are taken under `compressor` when given; entities whose size is not
/// available under it on either side are not reported as changed.
#[must_use]
pub fn compare(before: &StatsDocument, after: &StatsDocument, compressor: Option<&str>) -> DocumentDiff {
    DocumentDiff {
        modules: entity_diff(
            before.modules().iter().map(|m| (Cow::from(m.id.as_str()), &m.size)),
            after.modules().iter().map(|m| (Cow::from(m.id.as_str()), &m.size)),
            compressor,
        ),
        chunks: entity_diff(
            before.chunks().iter().map(|c| (chunk_key(c), &c.size)),
            after.chunks().iter().map(|c| (chunk_key(c), &c.size)),
            compressor,
        ),
        assets: entity_diff(
            before.assets().iter().map(|a| (Cow::from(a.name.as_str()), &a.size)),
            after.assets().iter().map(|a| (Cow::from(a.name.as_str()), &a.size)),
            compressor,
        ),
        packages: package_changes(before, after),
        entrypoints: entity_diff(
            before.entrypoints().iter().map(|e| (Cow::from(e.name.as_str()), &e.size)),
            after.entrypoints().iter().map(|e| (Cow::from(e.name.as_str()), &e.size)),
            compressor,
        )
        .changed,
        build_time: match (before.time(), after.time()) {
            (Some(b), Some(a)) => Some(TimeChange {
                before: b,
                after: a,
                diff: ValueDiff::between(as_f64(b), as_f64(a)),
            }),
            _ => None,
        },
    }
}

/// Key of a chunk across builds: its name, with the id appended when the two differ.
///
/// Names alone are not unique, so unrelated chunks sharing a name stay apart.
fn chunk_key(chunk: &Chunk) -> Cow<'_, str> {
    let name = chunk.display_name();
    if name == chunk.id {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{name} ({})", chunk.id))
    }
}

fn entity_diff<'a>(
    before: impl Iterator<Item = (Cow<'a, str>, &'a ResourceSize)>,
    after: impl Iterator<Item = (Cow<'a, str>, &'a ResourceSize)>,
    compressor: Option<&str>,
) -> EntityDiff {
    let before: BTreeMap<Cow<'a, str>, &ResourceSize> = before.collect();
    let after: BTreeMap<Cow<'a, str>, &ResourceSize> = after.collect();

    let mut diff = EntityDiff::default();

    for (id, old) in &before {
        let Some(new) = after.get(id) else {
            diff.removed.push(id.to_string());
            continue;
        };

        if let (Some(old), Some(new)) = (old.get(compressor), new.get(compressor))
            && old != new
        {
            diff.changed.push(SizeChange {
                id: id.to_string(),
                before: old,
                after: new,
                diff: ValueDiff::between(as_f64(old), as_f64(new)),
            });
        }
    }

    diff.added = after.keys().filter(|id| !before.contains_key(*id)).map(ToString::to_string).collect();
    diff
}

fn package_changes(before: &StatsDocument, after: &StatsDocument) -> Vec<PackageChange> {
    let names: BTreeSet<&str> = before
        .packages()
        .iter()
        .chain(after.packages())
        .map(|p| p.name.as_str())
        .collect();

    names
        .into_iter()
        .filter_map(|name| match (before.package(name), after.package(name)) {
            (Some(old), Some(new)) => {
                let (old_version, new_version) = (old.version.as_ref()?, new.version.as_ref()?);
                VersionChange::between(old_version, new_version).map(|change| PackageChange::Changed {
                    name: name.to_string(),
                    before: old_version.clone(),
                    after: new_version.clone(),
                    change,
                })
            }
            (Some(old), None) => Some(PackageChange::Removed {
                name: name.to_string(),
                version: old.version.clone(),
            }),
            (None, Some(new)) => Some(PackageChange::Added {
                name: name.to_string(),
                version: new.version.clone(),
            }),
            (None, None) => None,
        })
        .collect()
}

#[expect(clippy::cast_precision_loss, reason = "sizes and durations stay far below 2^52")]
const fn as_f64(value: u64) -> f64 {
    value as f64
}

impl DocumentDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Flatten the diff into renderable entries, ordered by section then id.
    #[must_use]
    pub fn entries(&self) -> Vec<DiffEntry> {
        let mut entries = Vec::new();

        if let Some(time) = &self.build_time {
            entries.push(DiffEntry {
                id: "build-time".to_string(),
                title: "Build time".to_string(),
                item: DiffItem::Time {
                    a: as_f64(time.before),
                    b: as_f64(time.after),
                },
            });
        }

        for (section, changes) in [
            ("entrypoint", &self.entrypoints),
            ("asset", &self.assets.changed),
            ("chunk", &self.chunks.changed),
            ("module", &self.modules.changed),
        ] {
            for change in changes {
                entries.push(DiffEntry {
                    id: format!("{section}:{}", change.id),
                    title: format!("{section} {}", change.id),
                    item: DiffItem::Size {
                        a: as_f64(change.before),
                        b: as_f64(change.after),
                    },
                });
            }
        }

        for package in &self.packages {
            if let PackageChange::Changed { name, before, after, .. } = package {
                entries.push(DiffEntry {
                    id: format!("package:{name}"),
                    title: format!("package {name}"),
                    item: DiffItem::Version {
                        a: before.clone(),
                        b: after.clone(),
                    },
                });
            }
        }

        entries
    }
}
