//! Dependency graph construction and traversal.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use apkgraph_core::config::DEFAULT_MAX_DEPTH;
use apkgraph_core::package::PackageId;
use apkgraph_core::source::DependencySource;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use tracing::{debug, info, warn};

/// Knobs for a single [`DependencyGraph::build`] run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Dependencies whose id contains this substring are ignored entirely.
    pub exclude: Option<String>,
    /// Packages discovered at this depth are visited but not expanded.
    pub max_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            exclude: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl BuildOptions {
    fn excludes(&self, package: &str) -> bool {
        self.exclude
            .as_deref()
            .is_some_and(|filter| !filter.is_empty() && package.contains(filter))
    }
}

/// A dependency lookup that failed during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    pub package: PackageId,
    pub message: String,
}

/// Package dependency graph backed by petgraph.
///
/// Edges accumulate across calls to [`build`](Self::build); the visited set,
/// the cycle list and the failure list describe the most recent build only.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<PackageId, ()>,
    index: HashMap<PackageId, NodeIndex>,
    visited: BTreeSet<PackageId>,
    cycles: Vec<(PackageId, PackageId)>,
    failures: Vec<LookupFailure>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Traverse breadth-first from `start`, asking `source` for each
    /// package's direct dependencies.
    ///
    /// A package is queried at most once, at the depth it was first
    /// discovered. A failed query is recorded in [`failures`](Self::failures)
    /// and the traversal carries on with the rest of the queue.
    pub fn build<S>(&mut self, start: &str, source: &S, options: &BuildOptions)
    where
        S: DependencySource + ?Sized,
    {
        let mut queue: VecDeque<(PackageId, usize)> = VecDeque::new();
        queue.push_back((start.to_string(), 0));
        self.visited = BTreeSet::from([start.to_string()]);
        self.cycles.clear();
        self.failures.clear();

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= options.max_depth {
                info!(
                    package = %current,
                    max_depth = options.max_depth,
                    "max depth reached, not expanding"
                );
                continue;
            }

            let deps = match source.dependencies_of(&current) {
                Ok(deps) => deps,
                Err(err) => {
                    warn!(package = %current, "failed to fetch dependencies: {err}");
                    self.failures.push(LookupFailure {
                        package: current,
                        message: err.to_string(),
                    });
                    continue;
                }
            };
            debug!(package = %current, depth, count = deps.len(), "expanding");

            for dep in deps {
                if dep.is_empty() {
                    continue;
                }
                if options.excludes(&dep) {
                    debug!(package = %dep, "skipped by exclude filter");
                    continue;
                }

                self.add_dependency(&current, &dep);

                if self.has_edge(&dep, &current) && !self.cycle_recorded(&current, &dep) {
                    info!("cyclic dependency: {current} <-> {dep}");
                    self.cycles.push((current.clone(), dep.clone()));
                }

                if !self.visited.contains(&dep) {
                    self.visited.insert(dep.clone());
                    queue.push_back((dep, depth + 1));
                }
            }
        }
    }

    /// Record that `package` depends on `dependency`. Empty ids are ignored.
    pub fn add_dependency(&mut self, package: &str, dependency: &str) {
        if dependency.is_empty() {
            return;
        }
        let from = self.node(package);
        let to = self.node(dependency);
        self.graph.update_edge(from, to, ());
    }

    fn node(&mut self, package: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(package) {
            return idx;
        }
        let idx = self.graph.add_node(package.to_string());
        self.index.insert(package.to_string(), idx);
        idx
    }

    fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    fn cycle_recorded(&self, a: &str, b: &str) -> bool {
        self.cycles
            .iter()
            .any(|(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// Direct dependencies recorded for `package`, sorted. Empty when the
    /// package was never expanded or has none.
    pub fn dependencies(&self, package: &str) -> BTreeSet<&str> {
        let Some(&idx) = self.index.get(package) else {
            return BTreeSet::new();
        };
        self.graph
            .neighbors(idx)
            .map(|n| self.graph[n].as_str())
            .collect()
    }

    /// Whether `package` has at least one recorded outgoing edge.
    pub fn has_dependencies(&self, package: &str) -> bool {
        self.index
            .get(package)
            .is_some_and(|&idx| self.graph.neighbors(idx).next().is_some())
    }

    /// Every package with recorded dependencies, mapped to those dependencies.
    pub fn edges(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors(idx).next().is_some())
            .map(|idx| {
                let name = self.graph[idx].as_str();
                (name, self.dependencies(name))
            })
            .collect()
    }

    /// Every package reachable from `package` through recorded edges, not
    /// counting `package` itself. Never queries a source.
    pub fn transitive_dependencies(&self, package: &str) -> BTreeSet<&str> {
        let Some(&start) = self.index.get(package) else {
            return BTreeSet::new();
        };
        let mut reachable = BTreeSet::new();
        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(idx) = bfs.next(&self.graph) {
            if idx != start {
                reachable.insert(self.graph[idx].as_str());
            }
        }
        reachable
    }

    /// Packages seen during the most recent build, including the start
    /// package and packages left unexpanded at the depth limit.
    pub fn visited(&self) -> &BTreeSet<PackageId> {
        &self.visited
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Mutually dependent pairs found by the most recent build, in the order
    /// they were detected. Longer cycles are not reported here.
    pub fn cycles(&self) -> &[(PackageId, PackageId)] {
        &self.cycles
    }

    /// Whether the unordered pair {a, b} was reported as a cycle.
    pub fn is_cycle_edge(&self, a: &str, b: &str) -> bool {
        self.cycle_recorded(a, b)
    }

    /// Dependency lookups that failed during the most recent build.
    pub fn failures(&self) -> &[LookupFailure] {
        &self.failures
    }

    /// Number of distinct packages visited by the most recent build.
    pub fn package_count(&self) -> usize {
        self.visited.len()
    }

    /// Total number of recorded dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// True when no edges have been recorded.
    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }
}
