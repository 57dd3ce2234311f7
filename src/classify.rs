//! Preview marker classification.
//!
//! An annotation class is a marker when the base preview annotation is
//! reachable through its meta-annotations. Annotation graphs may contain
//! cycles (an annotation can be annotated with itself, or two annotations with
//! each other), so reachability is computed over an explicitly explored
//! subgraph instead of by recursion.

use crate::host::Resolver;
use crate::symbols::{Annotation, ClassDecl};
use std::collections::{HashMap, HashSet};

/// Memo of qualified annotation name to "is a marker".
///
/// Only final answers are stored and an entry is never changed once written,
/// so the cache can be kept across rounds.
#[derive(Debug, Clone)]
pub struct MarkerCache {
    known: HashMap<String, bool>,
}

impl MarkerCache {
    pub fn new(base_marker: &str) -> Self {
        let mut known = HashMap::new();
        known.insert(base_marker.to_string(), true);
        Self { known }
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Cached answer for `name`, if any
    pub fn get(&self, name: &str) -> Option<bool> {
        self.known.get(name).copied()
    }

    /// Record a declaration found annotated with the base marker
    pub fn seed(&mut self, name: &str) {
        self.known.entry(name.to_string()).or_insert(true);
    }

    /// Mark every source class directly annotated with the base marker
    pub fn seed_from(&mut self, resolver: &dyn Resolver, base_marker: &str) {
        for class in resolver.symbols_with_annotation(base_marker) {
            if let Some(name) = &class.name {
                self.seed(name);
            }
        }
    }

    /// Whether the annotation's type is a marker
    pub fn is_marker_annotation(
        &mut self,
        resolver: &dyn Resolver,
        annotation: &Annotation,
    ) -> bool {
        if let Some(known) = self.get(&annotation.name) {
            return known;
        }
        match resolver.resolve(&annotation.name) {
            Some(declaration) => self.is_marker(resolver, declaration),
            None => false,
        }
    }

    pub fn is_marker(&mut self, resolver: &dyn Resolver, declaration: &ClassDecl) -> bool {
        let Some(root) = declaration.name.as_deref() else {
            return false;
        };
        if let Some(known) = self.get(root) {
            return known;
        }

        // Explore every uncached class reachable through meta-annotations.
        // `edges` doubles as the visited set.
        let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut pending: Vec<(&str, &ClassDecl)> = vec![(root, declaration)];
        let mut queued: HashSet<&str> = HashSet::from([root]);
        let mut complete = true;

        while let Some((name, class)) = pending.pop() {
            let mut targets = Vec::with_capacity(class.annotations.len());
            for meta in &class.annotations {
                let target = meta.name.as_str();
                targets.push(target);
                if self.known.contains_key(target) || queued.contains(target) {
                    continue;
                }
                match resolver.resolve(target) {
                    Some(meta_class) if meta_class.name.is_some() => {
                        queued.insert(target);
                        pending.push((target, meta_class));
                    }
                    // May resolve in a later round, so nothing depending on it is cached as false
                    _ => complete = false,
                }
            }
            edges.insert(name, targets);
        }

        // Propagate markers backwards until nothing changes
        let mut markers: HashSet<&str> = HashSet::new();
        loop {
            let before = markers.len();
            for (&name, targets) in &edges {
                if markers.contains(name) {
                    continue;
                }
                let reaches = targets
                    .iter()
                    .any(|target| markers.contains(target) || self.get(target) == Some(true));
                if reaches {
                    markers.insert(name);
                }
            }
            if markers.len() == before {
                break;
            }
        }

        for &name in edges.keys() {
            if markers.contains(name) {
                self.known.insert(name.to_string(), true);
            } else if complete {
                self.known.insert(name.to_string(), false);
            }
        }

        tracing::debug!(
            annotation = root,
            marker = markers.contains(root),
            explored = edges.len(),
            "classified"
        );
        markers.contains(root)
    }
}
