//! Fluent graph construction
//!
//! Nodes can be declared in any order; `build` validates the whole set first
//! and only then wires an engine in dependency order.

use std::collections::{HashMap, HashSet, VecDeque};

use super::node::Rule;
use crate::engine::Engine;
use crate::error::{RetrofitError, RuleError};
use crate::event_log::EventLog;
use crate::value::{Args, Value};

enum Declaration {
    Input { id: String, value: Value },
    Derived { id: String, deps: Vec<String>, rule: Rule },
}

impl Declaration {
    fn id(&self) -> &str {
        match self {
            Declaration::Input { id, .. } | Declaration::Derived { id, .. } => id,
        }
    }

    fn deps(&self) -> &[String] {
        match self {
            Declaration::Input { .. } => &[],
            Declaration::Derived { deps, .. } => deps,
        }
    }
}

/// Collects node declarations and validates them as a whole
#[derive(Default)]
pub struct GraphBuilder {
    decls: Vec<Declaration>,
    events: Option<EventLog>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an input node
    pub fn input(mut self, id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.decls.push(Declaration::Input {
            id: id.into(),
            value: value.into(),
        });
        self
    }

    /// Declare a derived node; dependencies may be declared later
    pub fn derived<F>(mut self, id: impl Into<String>, deps: &[&str], rule: F) -> Self
    where
        F: Fn(Args<'_>) -> Result<Value, RuleError> + 'static,
    {
        self.decls.push(Declaration::Derived {
            id: id.into(),
            deps: deps.iter().map(|d| d.to_string()).collect(),
            rule: Box::new(rule),
        });
        self
    }

    /// Record evaluation events into `events`
    pub fn event_log(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    /// Number of declared nodes
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Validate ids and edges, then create every node in dependency order
    pub fn build(self) -> Result<Engine, RetrofitError> {
        let order = self.topological_order()?;

        let mut engine = Engine::with_event_log(self.events.unwrap_or_default());
        let mut slots: Vec<Option<Declaration>> = self.decls.into_iter().map(Some).collect();
        for idx in order {
            match slots[idx].take() {
                Some(Declaration::Input { id, value }) => {
                    engine.create_input(&id, value)?;
                }
                Some(Declaration::Derived { id, deps, rule }) => {
                    let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
                    engine.insert_derived(&id, &deps, rule)?;
                }
                None => {}
            }
        }
        Ok(engine)
    }

    /// Kahn's algorithm; ties keep declaration order
    fn topological_order(&self) -> Result<Vec<usize>, RetrofitError> {
        let mut position: HashMap<&str, usize> = HashMap::with_capacity(self.decls.len());
        for (i, decl) in self.decls.iter().enumerate() {
            if position.insert(decl.id(), i).is_some() {
                return Err(RetrofitError::DuplicateNode {
                    id: decl.id().to_string(),
                });
            }
        }

        let mut readers: Vec<Vec<usize>> = vec![Vec::new(); self.decls.len()];
        let mut pending: Vec<usize> = vec![0; self.decls.len()];
        for (i, decl) in self.decls.iter().enumerate() {
            for dep in decl.deps() {
                if dep == decl.id() {
                    return Err(RetrofitError::Cycle {
                        path: vec![dep.clone(), dep.clone()],
                    });
                }
                let &d = position
                    .get(dep.as_str())
                    .ok_or_else(|| RetrofitError::UnknownDependency {
                        id: decl.id().to_string(),
                        dependency: dep.clone(),
                    })?;
                readers[d].push(i);
                pending[i] += 1;
            }
        }

        let mut ready: VecDeque<usize> = (0..self.decls.len()).filter(|&i| pending[i] == 0).collect();
        let mut order = Vec::with_capacity(self.decls.len());
        while let Some(i) = ready.pop_front() {
            order.push(i);
            for &r in &readers[i] {
                pending[r] -= 1;
                if pending[r] == 0 {
                    ready.push_back(r);
                }
            }
        }

        if order.len() < self.decls.len() {
            return Err(RetrofitError::Cycle {
                path: self.find_cycle(&pending, &position),
            });
        }
        Ok(order)
    }

    /// Walk unresolved dependencies until a node repeats
    fn find_cycle(&self, pending: &[usize], position: &HashMap<&str, usize>) -> Vec<String> {
        let Some(start) = pending.iter().position(|&p| p > 0) else {
            return Vec::new();
        };

        let mut walk = vec![start];
        let mut seen = HashSet::from([start]);
        let mut current = start;
        loop {
            let next = self.decls[current]
                .deps()
                .iter()
                .filter_map(|d| position.get(d.as_str()).copied())
                .find(|&d| pending[d] > 0);
            let Some(next) = next else {
                break;
            };
            if !seen.insert(next) {
                let from = walk.iter().position(|&n| n == next).unwrap_or(0);
                let mut cycle: Vec<String> = walk[from..]
                    .iter()
                    .map(|&n| self.decls[n].id().to_string())
                    .collect();
                cycle.push(self.decls[next].id().to_string());
                // walked against the data flow
                cycle.reverse();
                return cycle;
            }
            walk.push(next);
            current = next;
        }
        walk.iter().map(|&n| self.decls[n].id().to_string()).collect()
    }
}
