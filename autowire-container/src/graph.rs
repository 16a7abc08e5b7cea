//! Static validation of the declared-type graph.
//!
//! Every constructor parameter with a declared class type is an edge from
//! its class to that type (after alias mapping). The validator checks that
//! each edge ends at a registered class and that the graph has no cycles,
//! without constructing anything.
//!
//! A failing check here means the matching resolution would fail unless the
//! caller supplies the parameter by name.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, warn};

use autowire_support::rendering::suggest_similar;

use crate::error::{ContainerError, CyclicDependencyError};

/// One class and the classes its constructor declares.
#[derive(Debug, Clone)]
pub(crate) struct ClassNode {
    pub name: String,
    pub instantiable: bool,
    pub dependencies: Vec<String>,
}

/// Depth-first validator over [`ClassNode`]s.
pub(crate) struct GraphValidator {
    nodes: HashMap<String, ClassNode>,
    visiting: HashSet<String>,
    validated: HashSet<String>,
    path: Vec<String>,
}

impl GraphValidator {
    pub fn new(nodes: HashMap<String, ClassNode>) -> Self {
        Self {
            nodes,
            visiting: HashSet::new(),
            validated: HashSet::new(),
            path: Vec::new(),
        }
    }

    /// Validates the whole graph.
    ///
    /// # Errors
    /// - [`ContainerError::CyclicDependency`]: cycle detected
    /// - [`ContainerError::ClassNotFound`]: a declared type is not a registered,
    ///   instantiable class
    #[instrument(skip(self), name = "graph_validation")]
    pub fn validate(&mut self) -> Result<(), ContainerError> {
        // Abstract classes are fine on their own; only depending on one fails.
        let mut names: Vec<String> = self
            .nodes
            .values()
            .filter(|node| node.instantiable)
            .map(|node| node.name.clone())
            .collect();
        names.sort_unstable();

        debug!(class_count = names.len(), "Starting declared-type graph validation");

        for name in names {
            if !self.validated.contains(&name) {
                self.visit(&name)?;
            }
        }

        debug!("Declared-type graph validation passed");
        Ok(())
    }

    fn visit(&mut self, name: &str) -> Result<(), ContainerError> {
        if self.validated.contains(name) {
            return Ok(());
        }

        if self.visiting.contains(name) {
            let cycle_start = self.path.iter().position(|n| n == name).unwrap_or(0);
            let mut chain = self.path[cycle_start..].to_vec();
            chain.push(name.to_string());

            warn!(cycle = ?chain, "Cyclic dependency detected");
            return Err(ContainerError::CyclicDependency(CyclicDependencyError { chain }));
        }

        let node = match self.nodes.get(name) {
            Some(node) if node.instantiable => node.clone(),
            Some(_) => return Err(self.not_found(name, "class is not instantiable")),
            None => return Err(self.not_found(name, "class is not registered")),
        };

        self.visiting.insert(name.to_string());
        self.path.push(name.to_string());

        for dependency in &node.dependencies {
            self.visit(dependency)?;
        }

        self.path.pop();
        self.visiting.remove(name);
        self.validated.insert(name.to_string());

        Ok(())
    }

    fn not_found(&self, name: &str, reason: &str) -> ContainerError {
        let available: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        let cause = match self.path.last() {
            Some(parent) => format!("{reason}, required by {parent}"),
            None => reason.to_string(),
        };

        ContainerError::class_not_found(name, cause, suggest_similar(name, &available, 3))
    }
}
