//! Attribute node storage

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::value::{Args, Value};

/// Dense index of a node inside one engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Input,
    Derived,
}

/// Pure function of the dependency values, in declaration order
pub type Rule = Box<dyn Fn(Args<'_>) -> Result<Value, RuleError>>;

/// One named value in the graph
pub struct AttributeNode {
    pub(crate) id: Arc<str>,
    pub(crate) kind: NodeKind,
    /// `None` until first evaluation, and again after a failed one
    pub(crate) value: Option<Value>,
    /// Bumped whenever `value` changes
    pub(crate) version: u64,
    pub(crate) dirty: bool,
    pub(crate) rule: Option<Rule>,
    pub(crate) dependencies: Vec<NodeId>,
    /// Dependency versions the cached value was computed from
    pub(crate) seen_versions: Vec<u64>,
    pub(crate) invocations: u64,
}

impl AttributeNode {
    pub(crate) fn input(id: Arc<str>, value: Value) -> Self {
        Self {
            id,
            kind: NodeKind::Input,
            value: Some(value),
            version: 1,
            dirty: false,
            rule: None,
            dependencies: Vec::new(),
            seen_versions: Vec::new(),
            invocations: 0,
        }
    }

    pub(crate) fn derived(id: Arc<str>, dependencies: Vec<NodeId>, rule: Rule) -> Self {
        Self {
            id,
            kind: NodeKind::Derived,
            value: None,
            version: 0,
            dirty: true,
            rule: Some(rule),
            dependencies,
            seen_versions: Vec::new(),
            invocations: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_input(&self) -> bool {
        self.kind == NodeKind::Input
    }

    /// Cached value, without evaluating anything
    pub fn cached(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }

    /// Number of times the rule ran
    pub fn invocations(&self) -> u64 {
        self.invocations
    }
}

impl fmt::Debug for AttributeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeNode")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("version", &self.version)
            .field("dirty", &self.dirty)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_starts_clean_with_value() {
        let node = AttributeNode::input("a".into(), Value::Scalar(1.0));
        assert!(node.is_input());
        assert!(!node.is_dirty());
        assert_eq!(node.version(), 1);
        assert_eq!(node.cached(), Some(&Value::Scalar(1.0)));
    }

    #[test]
    fn derived_starts_dirty_and_empty() {
        let rule: Rule = Box::new(|_| Ok(Value::Count(0)));
        let node = AttributeNode::derived("b".into(), vec![NodeId(0)], rule);
        assert_eq!(node.kind(), NodeKind::Derived);
        assert!(node.is_dirty());
        assert!(node.cached().is_none());
        assert_eq!(node.dependencies(), &[NodeId(0)]);
    }
}
