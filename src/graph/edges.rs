//! Dependency edges between attribute nodes
//!
//! Edges point from a dependency to the node that reads it, so the successors
//! of an input are everything its change has to invalidate.

use std::collections::VecDeque;

use super::node::NodeId;

/// Acyclic adjacency lists indexed by `NodeId`
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// node -> nodes that read it
    successors: Vec<Vec<NodeId>>,
    /// node -> nodes it reads
    predecessors: Vec<Vec<NodeId>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            successors: Vec::with_capacity(capacity),
            predecessors: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.successors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.successors.len()
    }

    /// Register a node without edges
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.successors.len() as u32);
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
        id
    }

    /// Drop every node with an index `>= len`, along with its edges
    pub fn truncate(&mut self, len: usize) {
        self.successors.truncate(len);
        self.predecessors.truncate(len);
        for list in self.successors.iter_mut().chain(self.predecessors.iter_mut()) {
            list.retain(|n| n.index() < len);
        }
    }

    /// Make `node` read every id in `dependencies`
    ///
    /// All edges are checked before any is inserted. On a cycle the graph is
    /// left unchanged and the offending path is returned, starting and ending
    /// at `node`.
    pub fn connect(&mut self, node: NodeId, dependencies: &[NodeId]) -> Result<(), Vec<NodeId>> {
        for &dep in dependencies {
            if let Some(mut path) = self.path(node, dep) {
                path.push(node);
                return Err(path);
            }
        }
        for &dep in dependencies {
            if let Some(succ) = self.successors.get_mut(dep.index()) {
                succ.push(node);
            }
            if let Some(pred) = self.predecessors.get_mut(node.index()) {
                pred.push(dep);
            }
        }
        Ok(())
    }

    /// Nodes that read `id`
    #[inline]
    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        self.successors.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes `id` reads
    #[inline]
    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        self.predecessors.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if there's a path from `from` to `to` (BFS)
    pub fn has_path(&self, from: NodeId, to: NodeId) -> bool {
        self.path(from, to).is_some()
    }

    /// Shortest path from `from` to `to`, both included
    pub fn path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        if from == to {
            return Some(vec![from]);
        }

        let mut parent: Vec<Option<NodeId>> = vec![None; self.len()];
        let mut visited = vec![false; self.len()];
        let mut queue = VecDeque::new();
        visited[from.index()] = true;
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for &next in self.successors(current) {
                if visited[next.index()] {
                    continue;
                }
                visited[next.index()] = true;
                parent[next.index()] = Some(current);
                if next == to {
                    let mut path = vec![to];
                    let mut cursor = to;
                    while let Some(p) = parent[cursor.index()] {
                        path.push(p);
                        cursor = p;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }

        None
    }

    /// Transitive successors of `id`, excluding `id`, in BFS order
    pub fn downstream(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut visited = vec![false; self.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        visited[id.index()] = true;
        queue.push_back(id);

        while let Some(current) = queue.pop_front() {
            for &next in self.successors(current) {
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    order.push(next);
                    queue.push_back(next);
                }
            }
        }
        order
    }

    /// Nodes nothing reads (final outputs)
    pub fn sinks(&self) -> Vec<NodeId> {
        (0..self.len() as u32)
            .map(NodeId)
            .filter(|&id| self.successors(id).is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> (DependencyGraph, Vec<NodeId>) {
        let mut g = DependencyGraph::new();
        let ids: Vec<NodeId> = (0..n).map(|_| g.add_node()).collect();
        for w in ids.windows(2) {
            g.connect(w[1], &[w[0]]).unwrap();
        }
        (g, ids)
    }

    #[test]
    fn path_follows_edges() {
        let (g, ids) = chain(4);
        assert_eq!(g.path(ids[0], ids[3]), Some(ids.clone()));
        assert!(g.path(ids[3], ids[0]).is_none());
        assert!(g.has_path(ids[1], ids[2]));
    }

    #[test]
    fn closing_a_cycle_is_rejected_and_graph_unchanged() {
        let (mut g, ids) = chain(3);
        // make a read c: c -> a would close a -> b -> c -> a
        let err = g.connect(ids[0], &[ids[2]]).unwrap_err();
        assert_eq!(err, vec![ids[0], ids[1], ids[2], ids[0]]);
        assert!(g.predecessors(ids[0]).is_empty());
        assert_eq!(g.successors(ids[2]), &[] as &[NodeId]);
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut g = DependencyGraph::new();
        let a = g.add_node();
        assert_eq!(g.connect(a, &[a]).unwrap_err(), vec![a, a]);
    }

    #[test]
    fn downstream_is_transitive_closure() {
        let mut g = DependencyGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        let c = g.add_node();
        let d = g.add_node();
        g.connect(b, &[a]).unwrap();
        g.connect(c, &[b]).unwrap();
        g.connect(d, &[]).unwrap();
        let mut down = g.downstream(a);
        down.sort();
        assert_eq!(down, vec![b, c]);
        assert!(g.downstream(d).is_empty());
        assert_eq!(g.sinks(), vec![c, d]);
    }

    #[test]
    fn truncate_drops_nodes_and_edges() {
        let (mut g, ids) = chain(3);
        g.truncate(2);
        assert_eq!(g.len(), 2);
        assert!(g.successors(ids[1]).is_empty());
        assert_eq!(g.successors(ids[0]), &[ids[1]]);
    }

    #[test]
    fn out_of_range_ids_are_empty() {
        let g = DependencyGraph::new();
        assert!(g.successors(NodeId(7)).is_empty());
        assert!(g.downstream(NodeId(7)).is_empty());
        assert!(!g.has_path(NodeId(0), NodeId(1)));
    }
}
