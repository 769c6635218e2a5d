//! Corpus field vocabulary
//!
//! A snapshot lists every dotted field path present in the indexed documents.
//! It is rebuilt wholesale from a corpus scan and stored under a single fixed
//! key, so there is never more than one live snapshot.

mod registry;

pub use registry::SchemaRegistry;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Document id of the one live snapshot in the schema index
pub const SCHEMA_SNAPSHOT_ID: &str = "current";

/// Field vocabulary of the corpus at the time of the last population run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SchemaSnapshot {
    /// Sorted, de-duplicated dotted field paths
    #[serde(default)]
    pub fields: Vec<String>,

    /// Number of documents the snapshot was derived from
    #[serde(default)]
    pub doc_count: usize,
}

impl SchemaSnapshot {
    /// Build a snapshot from a full set of documents
    pub fn from_documents<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut builder = SnapshotBuilder::default();
        for doc in documents {
            builder.add(doc);
        }
        builder.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Accumulates field paths one document at a time.
///
/// Only the path set is retained, so a scan can fold each page into the
/// builder and drop the documents.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    paths: BTreeSet<String>,
    doc_count: usize,
}

impl SnapshotBuilder {
    pub fn add(&mut self, doc: &Value) {
        collect_paths(doc, "", &mut self.paths);
        self.doc_count += 1;
    }

    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    pub fn finish(self) -> SchemaSnapshot {
        SchemaSnapshot {
            fields: self.paths.into_iter().collect(),
            doc_count: self.doc_count,
        }
    }
}

/// Extract every dotted field path reachable in `doc`.
///
/// Object keys extend the current prefix; array elements reuse the prefix of
/// the array itself, so indices never appear in a path.
pub fn extract_field_paths(doc: &Value) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    collect_paths(doc, "", &mut paths);
    paths
}

fn collect_paths(value: &Value, prefix: &str, paths: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let full_key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                collect_paths(child, &full_key, paths);
                paths.insert(full_key);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_paths(item, prefix, paths);
            }
        }
        _ => {}
    }
}
