//! Removal of excluded fields from preview documents
//!
//! All paths are merged into one removal trie and applied in a single pass
//! over the input. Array indices therefore always refer to positions in the
//! input document, an ancestor removal makes descendant paths irrelevant,
//! and the order in which paths are given never changes the result. This
//! matches removing the paths longest-first against the input positions.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use super::json_path::{JsonPath, PathSegment};

#[derive(Debug, Default)]
struct RemovalNode {
    remove: bool,
    children: BTreeMap<PathSegment, RemovalNode>,
}

impl RemovalNode {
    fn insert(&mut self, segments: &[PathSegment]) {
        match segments.split_first() {
            None => self.remove = true,
            Some((head, rest)) => self.children.entry(head.clone()).or_default().insert(rest),
        }
    }

    fn matching_member<'a>(&'a self, key: &str, out: &mut Vec<&'a RemovalNode>) {
        out.extend(self.children.get(&PathSegment::Key(key.to_string())));
        out.extend(self.children.get(&PathSegment::Wildcard));
    }

    fn matching_element<'a>(&'a self, index: usize, out: &mut Vec<&'a RemovalNode>) {
        out.extend(self.children.get(&PathSegment::Index(index)));
        // `items.0` addresses the same element as `items[0]`
        out.extend(self.children.get(&PathSegment::Key(index.to_string())));
        out.extend(self.children.get(&PathSegment::Wildcard));
    }
}

/// Removes the nodes addressed by a set of JSON paths from a document.
#[derive(Debug, Default)]
pub struct PathExclusionFilter {
    root: RemovalNode,
    path_count: usize,
}

impl PathExclusionFilter {
    /// Build a filter from raw path strings. Malformed paths never match
    /// anything and the root path `$` has no container to be removed from,
    /// so both are skipped.
    pub fn new<S: AsRef<str>>(paths: &[S]) -> Self {
        let parsed = paths.iter().filter_map(|raw| {
            let raw = raw.as_ref();
            match JsonPath::parse(raw) {
                Ok(path) => Some(path),
                Err(e) => {
                    debug!("Ignoring malformed exclusion path '{}': {}", raw, e);
                    None
                }
            }
        });
        Self::from_paths(parsed)
    }

    pub fn from_paths(paths: impl IntoIterator<Item = JsonPath>) -> Self {
        let mut filter = Self::default();
        for path in paths {
            if path.is_root() {
                debug!("Ignoring root exclusion path");
                continue;
            }
            filter.root.insert(path.segments());
            filter.path_count += 1;
        }
        filter
    }

    /// Remove `paths` from `document`, returning a new value.
    pub fn filter<S: AsRef<str>>(document: &Value, paths: &[S]) -> Value {
        Self::new(paths).apply(document)
    }

    /// True when no usable path was supplied
    pub fn is_empty(&self) -> bool {
        self.path_count == 0
    }

    pub fn apply(&self, document: &Value) -> Value {
        if self.is_empty() {
            return document.clone();
        }
        prune(document, &[&self.root])
    }
}

fn prune(value: &Value, nodes: &[&RemovalNode]) -> Value {
    if nodes.is_empty() {
        return value.clone();
    }

    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            let mut matched = Vec::new();
            for (key, child) in map {
                matched.clear();
                for &node in nodes {
                    node.matching_member(key, &mut matched);
                }
                if matched.iter().any(|n| n.remove) {
                    continue;
                }
                out.insert(key.clone(), prune(child, &matched));
            }
            Value::Object(out)
        }
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            let mut matched = Vec::new();
            for (index, child) in items.iter().enumerate() {
                matched.clear();
                for &node in nodes {
                    node.matching_element(index, &mut matched);
                }
                if matched.iter().any(|n| n.remove) {
                    continue;
                }
                out.push(prune(child, &matched));
            }
            Value::Array(out)
        }
        scalar => scalar.clone(),
    }
}
