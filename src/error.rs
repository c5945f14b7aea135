//! Error types with fix suggestions (v0.1)
//!
//! `RuleError` is what a derivation rule returns; the engine wraps it into
//! `RetrofitError::RuleEvaluation` together with the id of the failing node.

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Coarse error taxonomy, used by front-ends to decide how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Wiring mistake (cycle, unknown id). Fatal at construction time.
    GraphStructure,
    /// A rule rejected physically inconsistent inputs. The session survives.
    RuleEvaluation,
    /// Malformed user-supplied value, rejected before reaching the graph.
    InputValidation,
    /// File system or (de)serialization failure.
    Io,
}

/// Failures raised by derivation rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("cabin needs {required:.3} m but only {available:.3} m of fuselage is usable")]
    LayoutOverflow { required: f64, available: f64 },

    #[error("no room left for hydrogen tanks ({available:.3} m available)")]
    InsufficientTankSpace { available: f64 },

    #[error("{requested} tanks requested, at most {max} supported")]
    InvalidTankCount { requested: u32, max: u32 },

    #[error("total mass is {total:.3} kg, centre of gravity is undefined")]
    ZeroMass { total: f64 },

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("{quantity} = {value} is out of range")]
    OutOfRange { quantity: &'static str, value: f64 },

    #[error("aisle in class '{class}' is {width:.3} m wide, minimum is {minimum:.3} m")]
    AisleTooNarrow {
        class: String,
        width: f64,
        minimum: f64,
    },

    #[error("expected a {expected} value, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("rule expects {expected} inputs, got {found}")]
    Arity { expected: usize, found: usize },
}

/// All error variants are part of the public API.
#[derive(Error, Debug)]
pub enum RetrofitError {
    // ─────────────────────────────────────────────────────────────
    // Graph structure errors (H2R-010 to H2R-014)
    // ─────────────────────────────────────────────────────────────
    #[error("H2R-010: Node '{id}' is already registered")]
    DuplicateNode { id: String },

    #[error("H2R-011: Node '{id}' depends on unknown node '{dependency}'")]
    UnknownDependency { id: String, dependency: String },

    #[error("H2R-012: Unknown node '{id}'")]
    UnknownNode { id: String },

    #[error("H2R-013: Dependency cycle: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("H2R-014: Node '{id}' is derived and cannot be set directly")]
    NotAnInput { id: String },

    // ─────────────────────────────────────────────────────────────
    // Rule evaluation errors (H2R-020)
    // ─────────────────────────────────────────────────────────────
    #[error("H2R-020: Rule for '{node}' failed: {source}")]
    RuleEvaluation { node: String, source: RuleError },

    // ─────────────────────────────────────────────────────────────
    // Input validation errors (H2R-030 to H2R-035)
    // ─────────────────────────────────────────────────────────────
    #[error("H2R-030: Input '{id}' expects a {expected} value, got {found}")]
    InputType {
        id: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("H2R-031: Invalid value for '{id}': {details}")]
    InvalidInput { id: String, details: String },

    #[error("H2R-032: Seating file line {line}: {details}")]
    SeatingParse { line: usize, details: String },

    #[error("H2R-033: Model file rejected: {details}")]
    ModelFile { details: String },

    #[error("H2R-034: Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("H2R-035: Config value '{field}' rejected: {details}")]
    InvalidConfig { field: &'static str, details: String },

    // ─────────────────────────────────────────────────────────────
    // IO
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RetrofitError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateNode { .. }
            | Self::UnknownDependency { .. }
            | Self::UnknownNode { .. }
            | Self::Cycle { .. }
            | Self::NotAnInput { .. } => ErrorCategory::GraphStructure,
            Self::RuleEvaluation { .. } => ErrorCategory::RuleEvaluation,
            Self::InputType { .. }
            | Self::InvalidInput { .. }
            | Self::SeatingParse { .. }
            | Self::ModelFile { .. }
            | Self::Config(_)
            | Self::InvalidConfig { .. } => ErrorCategory::InputValidation,
            Self::Io(_) | Self::Json(_) => ErrorCategory::Io,
        }
    }

    /// Id of the node a front-end should highlight, if any
    pub fn node(&self) -> Option<&str> {
        match self {
            Self::DuplicateNode { id }
            | Self::UnknownDependency { id, .. }
            | Self::UnknownNode { id }
            | Self::NotAnInput { id }
            | Self::InputType { id, .. }
            | Self::InvalidInput { id, .. } => Some(id),
            Self::RuleEvaluation { node, .. } => Some(node),
            _ => None,
        }
    }

    /// The underlying rule failure, if this is a rule evaluation error
    pub fn rule_error(&self) -> Option<&RuleError> {
        match self {
            Self::RuleEvaluation { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl FixSuggestion for RetrofitError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            RetrofitError::DuplicateNode { .. } => Some("Give every node a unique id"),
            RetrofitError::UnknownDependency { .. } => {
                Some("Register the dependency before the node that reads it")
            }
            RetrofitError::UnknownNode { .. } => Some("Check the node id (see `h2retrofit nodes`)"),
            RetrofitError::Cycle { .. } => {
                Some("Remove the circular dependency - a node cannot read its own output")
            }
            RetrofitError::NotAnInput { .. } => Some("Only input nodes can be set; change an upstream input instead"),
            RetrofitError::RuleEvaluation { source, .. } => match source {
                RuleError::LayoutOverflow { .. } => Some("Remove seat rows or lengthen the fuselage"),
                RuleError::InsufficientTankSpace { .. } => {
                    Some("Reduce the number of rows to free space for the tanks")
                }
                RuleError::InvalidTankCount { .. } => Some("Use 0, 1 or 2 tanks"),
                RuleError::ZeroMass { .. } => Some("Restore at least one mass component"),
                RuleError::InvalidGeometry(_) => {
                    Some("Check the fuselage, cabin and wing dimensions")
                },
                RuleError::OutOfRange { .. } => Some("Bring the value back into its physical range"),
                RuleError::AisleTooNarrow { .. } => Some("Reduce the seats per row in that class"),
                RuleError::TypeMismatch { .. } | RuleError::Arity { .. } => None,
            },
            RetrofitError::InputType { .. } => Some("Pass a value of the same kind as the input's default"),
            RetrofitError::InvalidInput { .. } => Some("Check the value range for this input"),
            RetrofitError::SeatingParse { .. } => {
                Some("Use: class <name> rows=<n> seats=<n> pitch=<m> [seat_width=<m>] [seat_mass=<kg>]")
            }
            RetrofitError::ModelFile { .. } => Some("Re-save the model with `h2retrofit save`"),
            RetrofitError::Config(_) => Some("Check YAML syntax: indentation and field names"),
            RetrofitError::InvalidConfig { .. } => {
                Some("Lengths and masses must not be negative; fractions lie in [0, 1]")
            }
            RetrofitError::Io(_) => Some("Check file path and permissions"),
            RetrofitError::Json(_) => Some("Ensure the file is valid JSON (try parsing with jq)"),
        }
    }
}
