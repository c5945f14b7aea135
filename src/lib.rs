//! h2retrofit - parametric model of a hydrogen-retrofitted aircraft
//!
//! A typed dependency graph of attribute nodes, evaluated lazily with
//! memoization, and the aircraft rule set wired on top of it.

pub mod config;
pub mod engine;
pub mod error;
pub mod event_log;
pub mod graph;
pub mod model;
pub mod output;
pub mod persist;
pub mod report;
pub mod rules;
pub mod seating;
pub mod value;

pub use config::ModelConfig;
pub use engine::Engine;
pub use error::{ErrorCategory, FixSuggestion, RetrofitError, RuleError};
pub use event_log::{Event, EventKind, EventLog};
pub use graph::{GraphBuilder, NodeId, NodeKind};
pub use model::{AircraftModel, ModelInputs};
pub use output::{OutputFormat, Summary};
pub use persist::ModelFile;
pub use seating::{SeatingClass, SeatingConfig};
pub use value::{Args, Value};
