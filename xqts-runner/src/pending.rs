//! Index of test-cases waiting for resources from the cache.
//!
//! Four waiter maps (schema / source / resource / query) key resource paths
//! to the set of test-cases awaiting them. A test-case is pending iff it
//! appears in at least one waiter map; `deliver` and `fail` are the only
//! operations that may observe the intermediate states.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::{Collection, TestCase, TestCaseId, TestSource};
use crate::messages::RunTestCase;

/// Resources resolved so far for one pending test-case. Grows by appending
/// as `CachedResource` messages arrive; never shrinks.
#[derive(Debug, Clone, Default)]
pub struct ResolvedEnvironment {
    pub schemas: Vec<(PathBuf, Arc<[u8]>)>,
    pub sources: Vec<(PathBuf, Arc<[u8]>)>,
    pub resources: Vec<(PathBuf, Arc<[u8]>)>,
    pub query: Option<Arc<[u8]>>,
}

impl ResolvedEnvironment {
    pub fn source_bytes(&self, path: &Path) -> Option<&Arc<[u8]>> {
        self.sources
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, bytes)| bytes)
    }

    pub fn resource_bytes(&self, path: &Path) -> Option<&Arc<[u8]>> {
        self.resources
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, bytes)| bytes)
    }
}

fn append_unique(entries: &mut Vec<(PathBuf, Arc<[u8]>)>, path: &Path, bytes: &Arc<[u8]>) {
    if !entries.iter().any(|(p, _)| p == path) {
        entries.push((path.to_path_buf(), Arc::clone(bytes)));
    }
}

/// The dependency paths of a test-case, split by resource category.
#[derive(Debug, Clone, Default)]
pub struct ResourcePaths {
    pub schemas: Vec<PathBuf>,
    pub sources: Vec<PathBuf>,
    pub resources: Vec<PathBuf>,
    pub query: Option<PathBuf>,
}

impl ResourcePaths {
    /// Collect every dependency of a test case: schema, source and resource
    /// files, every collection-member source file, and the query file when
    /// the test references one.
    pub fn of(test_case: &TestCase) -> Self {
        let mut paths = Self::default();
        if let Some(env) = &test_case.environment {
            paths.schemas.extend(env.schemas.iter().map(|s| s.file.clone()));
            paths.sources.extend(env.sources.iter().map(|s| s.file.clone()));
            for Collection { sources, .. } in &env.collections {
                paths.sources.extend(sources.iter().map(|s| s.file.clone()));
            }
            paths
                .resources
                .extend(env.resources.iter().map(|r| r.file.clone()));
        }
        if let Some(TestSource::Path(query)) = &test_case.test {
            paths.query = Some(query.clone());
        }
        paths
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
            && self.sources.is_empty()
            && self.resources.is_empty()
            && self.query.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.schemas
            .iter()
            .chain(self.sources.iter())
            .chain(self.resources.iter())
            .chain(self.query.iter())
    }
}

/// A registered submission plus whatever has resolved for it so far.
#[derive(Debug)]
pub struct PendingTestCase {
    pub request: RunTestCase,
    pub env: ResolvedEnvironment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Schema,
    Source,
    Resource,
    Query,
}

const CATEGORIES: [Category; 4] = [
    Category::Schema,
    Category::Source,
    Category::Resource,
    Category::Query,
];

/// Waiter maps plus the pending-case table.
#[derive(Debug, Default)]
pub struct PendingCases {
    schema_waiters: HashMap<PathBuf, HashSet<TestCaseId>>,
    source_waiters: HashMap<PathBuf, HashSet<TestCaseId>>,
    resource_waiters: HashMap<PathBuf, HashSet<TestCaseId>>,
    query_waiters: HashMap<PathBuf, HashSet<TestCaseId>>,
    pending: HashMap<TestCaseId, PendingTestCase>,
}

impl PendingCases {
    pub fn new() -> Self {
        Self::default()
    }

    fn waiters(&mut self, category: Category) -> &mut HashMap<PathBuf, HashSet<TestCaseId>> {
        match category {
            Category::Schema => &mut self.schema_waiters,
            Category::Source => &mut self.source_waiters,
            Category::Resource => &mut self.resource_waiters,
            Category::Query => &mut self.query_waiters,
        }
    }

    /// Register a submission with its dependency paths. Refuses to overwrite
    /// a live pending entry: a duplicate submission returns `false` and
    /// changes nothing.
    pub fn register(&mut self, id: TestCaseId, request: RunTestCase, paths: &ResourcePaths) -> bool {
        if self.pending.contains_key(&id) {
            return false;
        }
        for path in &paths.schemas {
            self.schema_waiters
                .entry(path.clone())
                .or_default()
                .insert(id.clone());
        }
        for path in &paths.sources {
            self.source_waiters
                .entry(path.clone())
                .or_default()
                .insert(id.clone());
        }
        for path in &paths.resources {
            self.resource_waiters
                .entry(path.clone())
                .or_default()
                .insert(id.clone());
        }
        if let Some(path) = &paths.query {
            self.query_waiters
                .entry(path.clone())
                .or_default()
                .insert(id.clone());
        }
        self.pending.insert(
            id,
            PendingTestCase {
                request,
                env: ResolvedEnvironment::default(),
            },
        );
        true
    }

    /// A resource arrived: append it to every waiter's resolved environment
    /// and return the cases that are no longer waiting on anything.
    pub fn deliver(&mut self, path: &Path, bytes: &Arc<[u8]>) -> Vec<TestCaseId> {
        let mut affected = HashSet::new();
        for category in CATEGORIES {
            let Some(waiters) = self.waiters(category).remove(path) else {
                continue;
            };
            for id in waiters {
                if let Some(case) = self.pending.get_mut(&id) {
                    match category {
                        Category::Schema => append_unique(&mut case.env.schemas, path, bytes),
                        Category::Source => append_unique(&mut case.env.sources, path, bytes),
                        Category::Resource => append_unique(&mut case.env.resources, path, bytes),
                        Category::Query => case.env.query = Some(Arc::clone(bytes)),
                    }
                }
                affected.insert(id);
            }
        }
        affected
            .into_iter()
            .filter(|id| !self.is_waiting(id))
            .collect()
    }

    /// A resource fetch failed: drop every case that was waiting on the path
    /// and return them so the dispatcher can emit `Error` verdicts. Affected
    /// cases are also purged from the waiter sets of their other paths.
    pub fn fail(&mut self, path: &Path) -> Vec<PendingTestCase> {
        let mut affected = HashSet::new();
        for category in CATEGORIES {
            if let Some(waiters) = self.waiters(category).remove(path) {
                affected.extend(waiters);
            }
        }
        for category in CATEGORIES {
            let waiters = self.waiters(category);
            waiters.retain(|_, ids| {
                ids.retain(|id| !affected.contains(id));
                !ids.is_empty()
            });
        }
        affected
            .into_iter()
            .filter_map(|id| self.pending.remove(&id))
            .collect()
    }

    /// Remove a ready case for scheduling.
    pub fn take(&mut self, id: &TestCaseId) -> Option<PendingTestCase> {
        self.pending.remove(id)
    }

    fn is_waiting(&self, id: &TestCaseId) -> bool {
        [
            &self.schema_waiters,
            &self.source_waiters,
            &self.resource_waiters,
            &self.query_waiters,
        ]
        .iter()
        .any(|map| map.values().any(|ids| ids.contains(id)))
    }

    #[cfg(test)]
    fn is_pending(&self, id: &TestCaseId) -> bool {
        self.pending.contains_key(id)
    }

    /// Quiescent invariant: a case is pending iff it still waits on a path.
    /// Ready cases must have been `take`n already for this to hold.
    #[cfg(test)]
    fn invariant_holds(&self) -> bool {
        self.pending.keys().all(|id| self.is_waiting(id))
            && [
                &self.schema_waiters,
                &self.source_waiters,
                &self.resource_waiters,
                &self.query_waiters,
            ]
            .iter()
            .flat_map(|map| map.values())
            .flatten()
            .all(|id| self.pending.contains_key(id))
    }
}
