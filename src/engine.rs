//! Lazy, memoizing evaluation engine
//!
//! Inputs are set eagerly; derived nodes are only marked dirty and recompute on
//! the next read. A derived node whose dependency versions did not change since
//! its last evaluation keeps its cached value without running the rule, and a
//! rule that produces an equal value does not bump the node's version, so the
//! nodes behind it are reused as well.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{RetrofitError, RuleError};
use crate::event_log::{EventKind, EventLog};
use crate::graph::{AttributeNode, DependencyGraph, NodeId, NodeKind, Rule};
use crate::value::{Args, Value};

/// Owns the nodes, their edges and the id registry
pub struct Engine {
    graph: DependencyGraph,
    nodes: Vec<AttributeNode>,
    index: HashMap<Arc<str>, NodeId>,
    events: EventLog,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_event_log(EventLog::new())
    }

    /// Record into a log the caller keeps a handle to
    pub fn with_event_log(events: EventLog) -> Self {
        Self {
            graph: DependencyGraph::new(),
            nodes: Vec::new(),
            index: HashMap::new(),
            events,
        }
    }

    // ═══════════════════════════════════════════
    // CONSTRUCTION
    // ═══════════════════════════════════════════

    pub fn create_input(&mut self, id: &str, initial: impl Into<Value>) -> Result<NodeId, RetrofitError> {
        if self.index.contains_key(id) {
            return Err(RetrofitError::DuplicateNode { id: id.to_string() });
        }
        let name: Arc<str> = Arc::from(id);
        let nid = self.graph.add_node();
        self.nodes.push(AttributeNode::input(Arc::clone(&name), initial.into()));
        self.index.insert(name, nid);
        trace!(node = id, "input created");
        Ok(nid)
    }

    /// Register a node computed by `rule` from `dependencies`
    ///
    /// Fails without touching the graph when the id is taken, a dependency is
    /// unknown, or the new edges would close a cycle.
    pub fn create_derived<F>(&mut self, id: &str, dependencies: &[&str], rule: F) -> Result<NodeId, RetrofitError>
    where
        F: Fn(Args<'_>) -> Result<Value, RuleError> + 'static,
    {
        self.insert_derived(id, dependencies, Box::new(rule))
    }

    pub(crate) fn insert_derived(
        &mut self,
        id: &str,
        dependencies: &[&str],
        rule: Rule,
    ) -> Result<NodeId, RetrofitError> {
        if self.index.contains_key(id) {
            return Err(RetrofitError::DuplicateNode { id: id.to_string() });
        }
        if dependencies.contains(&id) {
            return Err(RetrofitError::Cycle {
                path: vec![id.to_string(), id.to_string()],
            });
        }
        let deps = dependencies
            .iter()
            .map(|dep| {
                self.index
                    .get(*dep)
                    .copied()
                    .ok_or_else(|| RetrofitError::UnknownDependency {
                        id: id.to_string(),
                        dependency: dep.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let nid = self.graph.add_node();
        if let Err(path) = self.graph.connect(nid, &deps) {
            self.graph.truncate(self.nodes.len());
            return Err(RetrofitError::Cycle {
                path: path.iter().map(|n| self.name_of(*n)).collect(),
            });
        }
        let name: Arc<str> = Arc::from(id);
        self.nodes.push(AttributeNode::derived(Arc::clone(&name), deps, rule));
        self.index.insert(name, nid);
        trace!(node = id, deps = dependencies.len(), "derived node created");
        Ok(nid)
    }

    // ═══════════════════════════════════════════
    // INPUTS
    // ═══════════════════════════════════════════

    /// Replace an input value and mark everything downstream dirty
    ///
    /// The new value must be the same variant as the current one. Nothing is
    /// recomputed here.
    pub fn set_input(&mut self, id: &str, value: impl Into<Value>) -> Result<(), RetrofitError> {
        let nid = self.lookup(id)?;
        let value = value.into();
        let node = &mut self.nodes[nid.index()];
        if node.kind != NodeKind::Input {
            return Err(RetrofitError::NotAnInput { id: id.to_string() });
        }
        if let Some(current) = &node.value {
            if !current.same_kind(&value) {
                return Err(RetrofitError::InputType {
                    id: id.to_string(),
                    expected: current.kind_name(),
                    found: value.kind_name(),
                });
            }
        }
        node.value = Some(value);
        node.version += 1;
        let version = node.version;
        let name = Arc::clone(&node.id);
        debug!(node = id, version, "input set");
        self.events.emit(EventKind::InputSet { node: name, version });
        self.invalidate_from(nid);
        Ok(())
    }

    /// Mark the downstream closure of `origin` dirty
    ///
    /// Stops at nodes that are already dirty: everything behind a dirty node
    /// is dirty as well.
    fn invalidate_from(&mut self, origin: NodeId) {
        let mut queue = VecDeque::from([origin]);
        let mut marked = 0usize;
        while let Some(current) = queue.pop_front() {
            for &next in self.graph.successors(current) {
                let node = &mut self.nodes[next.index()];
                if node.dirty {
                    continue;
                }
                node.dirty = true;
                marked += 1;
                self.events.emit(EventKind::NodeInvalidated {
                    node: Arc::clone(&node.id),
                });
                queue.push_back(next);
            }
        }
        trace!(marked, "invalidated");
    }

    // ═══════════════════════════════════════════
    // EVALUATION
    // ═══════════════════════════════════════════

    /// Current value of a node, recomputing whatever is stale
    pub fn get(&mut self, id: &str) -> Result<Value, RetrofitError> {
        self.evaluate(id).cloned()
    }

    /// Like [`Engine::get`], without cloning
    pub fn evaluate(&mut self, id: &str) -> Result<&Value, RetrofitError> {
        let nid = self.lookup(id)?;
        self.refresh(nid)?;
        self.nodes[nid.index()]
            .value
            .as_ref()
            .ok_or_else(|| RetrofitError::UnknownNode { id: id.to_string() })
    }

    fn refresh(&mut self, nid: NodeId) -> Result<(), RetrofitError> {
        if !self.nodes[nid.index()].dirty {
            return Ok(());
        }

        let deps = self.nodes[nid.index()].dependencies.clone();
        for &dep in &deps {
            self.refresh(dep)?;
        }
        let current: Vec<u64> = deps.iter().map(|d| self.nodes[d.index()].version).collect();

        let node = &self.nodes[nid.index()];
        if node.value.is_some() && node.seen_versions == current {
            let name = Arc::clone(&node.id);
            self.nodes[nid.index()].dirty = false;
            trace!(node = %name, "reused");
            self.events.emit(EventKind::NodeReused { node: name });
            return Ok(());
        }

        let result = {
            let values: Vec<&Value> = deps
                .iter()
                .filter_map(|d| self.nodes[d.index()].value.as_ref())
                .collect();
            match &self.nodes[nid.index()].rule {
                Some(rule) => rule(Args::new(&values)),
                None => Err(RuleError::Arity {
                    expected: 0,
                    found: values.len(),
                }),
            }
        };

        let node = &mut self.nodes[nid.index()];
        node.invocations += 1;
        let name = Arc::clone(&node.id);
        match result {
            Ok(value) => {
                let changed = node.value.as_ref() != Some(&value);
                if changed {
                    node.version += 1;
                    node.value = Some(value);
                }
                node.seen_versions = current;
                node.dirty = false;
                let version = node.version;
                debug!(node = %name, changed, version, "recomputed");
                self.events.emit(EventKind::NodeRecomputed {
                    node: name,
                    changed,
                    version,
                });
                Ok(())
            }
            Err(source) => {
                node.value = None;
                node.seen_versions.clear();
                debug!(node = %name, error = %source, "rule failed");
                self.events.emit(EventKind::RuleFailed {
                    node: Arc::clone(&name),
                    error: source.to_string(),
                });
                Err(RetrofitError::RuleEvaluation {
                    node: name.to_string(),
                    source,
                })
            }
        }
    }

    // ═══════════════════════════════════════════
    // INTROSPECTION
    // ═══════════════════════════════════════════

    pub fn lookup(&self, id: &str) -> Result<NodeId, RetrofitError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| RetrofitError::UnknownNode { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Result<&AttributeNode, RetrofitError> {
        Ok(&self.nodes[self.lookup(id)?.index()])
    }

    pub fn kind(&self, id: &str) -> Result<NodeKind, RetrofitError> {
        Ok(self.node(id)?.kind)
    }

    pub fn version(&self, id: &str) -> Result<u64, RetrofitError> {
        Ok(self.node(id)?.version)
    }

    pub fn is_dirty(&self, id: &str) -> Result<bool, RetrofitError> {
        Ok(self.node(id)?.dirty)
    }

    /// Rule invocations for one node since construction
    pub fn invocations(&self, id: &str) -> Result<u64, RetrofitError> {
        Ok(self.node(id)?.invocations)
    }

    pub fn total_invocations(&self) -> u64 {
        self.nodes.iter().map(|n| n.invocations).sum()
    }

    /// Direct dependencies, in declaration order
    pub fn dependencies(&self, id: &str) -> Result<Vec<&str>, RetrofitError> {
        let node = self.node(id)?;
        Ok(node
            .dependencies
            .iter()
            .map(|d| self.nodes[d.index()].id())
            .collect())
    }

    /// Everything that must recompute when `id` changes
    pub fn downstream(&self, id: &str) -> Result<Vec<&str>, RetrofitError> {
        let nid = self.lookup(id)?;
        Ok(self
            .graph
            .downstream(nid)
            .into_iter()
            .map(|d| self.nodes[d.index()].id())
            .collect())
    }

    /// Node ids in creation order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(AttributeNode::id)
    }

    pub fn input_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter(|n| n.is_input()).map(AttributeNode::id)
    }

    /// Nodes nothing else reads
    pub fn output_ids(&self) -> Vec<&str> {
        self.graph
            .sinks()
            .into_iter()
            .map(|n| self.nodes[n.index()].id())
            .collect()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Shared handle to the event log
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn name_of(&self, nid: NodeId) -> String {
        self.nodes
            .get(nid.index())
            .map(|n| n.id().to_string())
            .unwrap_or_else(|| nid.to_string())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("nodes", &self.nodes.len())
            .field("events", &self.events.len())
            .finish()
    }
}
