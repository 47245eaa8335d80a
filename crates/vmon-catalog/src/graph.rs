//! Forward and reverse dependency edges over the whole catalog

use crate::ServiceCatalog;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Dependency edges of every service in a catalog.
///
/// Forward edge: "this service depends on that one". Reverse edge: "these
/// services depend on this one". Dependencies the catalog does not define
/// still get reverse edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    forward: IndexMap<String, Vec<String>>,
    reverse: IndexMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build the graph from every descriptor of `catalog`
    pub fn build<C: ServiceCatalog + ?Sized>(catalog: &C) -> Self {
        let mut graph = Self::default();

        for descriptor in catalog.descriptors() {
            graph
                .forward
                .insert(descriptor.name.clone(), descriptor.dependencies.clone());

            for dep in &descriptor.dependencies {
                let dependents = graph.reverse.entry(dep.clone()).or_default();
                if !dependents.contains(&descriptor.name) {
                    dependents.push(descriptor.name.clone());
                }
            }
        }

        graph
    }

    /// Services `service` depends on
    pub fn dependencies_of(&self, service: &str) -> &[String] {
        self.forward.get(service).map_or(&[], Vec::as_slice)
    }

    /// Services that depend directly on `service`
    pub fn dependents_of(&self, service: &str) -> &[String] {
        self.reverse.get(service).map_or(&[], Vec::as_slice)
    }

    /// Reverse edges for every service that has at least one dependent
    pub fn reverse_edges(&self) -> &IndexMap<String, Vec<String>> {
        &self.reverse
    }

    /// Every service that depends on `service`, directly or not, sorted.
    ///
    /// Cycles are tolerated; `service` itself is never part of the result.
    pub fn transitive_dependents(&self, service: &str) -> Vec<String> {
        let mut collected = HashSet::new();
        self.collect_dependents(service, &mut collected);
        collected.remove(service);

        let mut result: Vec<String> = collected.into_iter().collect();
        result.sort();
        result
    }

    fn collect_dependents(&self, service: &str, collected: &mut HashSet<String>) {
        for dependent in self.dependents_of(service) {
            if collected.insert(dependent.clone()) {
                self.collect_dependents(dependent, collected);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Catalog, ServiceDescriptor};

    fn service(name: &str, deps: &[&str], profiles: &[&str]) -> ServiceDescriptor {
        ServiceDescriptor {
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            profiles: profiles.iter().map(|p| p.to_string()).collect(),
            ..ServiceDescriptor::named(name)
        }
    }

    // Dependency chain: a -> b -> c
    fn create_test_catalog() -> Catalog {
        Catalog::from_descriptors([
            service("a", &["b"], &["Other"]),
            service("b", &["c"], &["ALL"]),
            service("c", &[], &["ALL"]),
        ])
    }

    #[test]
    fn test_reverse_edges() {
        let graph = create_test_catalog().dependency_graph();

        assert_eq!(graph.dependents_of("b"), ["a"]);
        assert_eq!(graph.dependents_of("c"), ["b"]);
        assert!(graph.dependents_of("a").is_empty());
        assert_eq!(graph.dependencies_of("a"), ["b"]);
        assert!(graph.dependencies_of("unknown").is_empty());
    }

    #[test]
    fn test_dangling_dependency_gets_reverse_edge() {
        let catalog = Catalog::from_descriptors([
            service("vpxd", &["vmware-postgres"], &["ALL"]),
            service("eam", &["vmware-postgres", "vpxd"], &["ALL"]),
        ]);
        let graph = catalog.dependency_graph();

        assert_eq!(graph.dependents_of("vmware-postgres"), ["vpxd", "eam"]);
        assert_eq!(graph.reverse_edges().len(), 2);
    }

    #[test]
    fn test_transitive_dependents() {
        let graph = create_test_catalog().dependency_graph();

        assert_eq!(graph.transitive_dependents("c"), vec!["a", "b"]);
        assert_eq!(graph.transitive_dependents("b"), vec!["a"]);
        assert!(graph.transitive_dependents("a").is_empty());
    }

    #[test]
    fn test_transitive_dependents_with_cycle() {
        let catalog = Catalog::from_descriptors([
            service("x", &["y"], &[]),
            service("y", &["z"], &[]),
            service("z", &["x"], &[]),
        ]);
        let graph = catalog.dependency_graph();

        assert_eq!(graph.transitive_dependents("x"), vec!["y", "z"]);
    }
}
