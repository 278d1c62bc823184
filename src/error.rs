//! Error types for model construction, data loading and reporting.
//!
//! Solver outcomes are deliberately *not* errors: a non-optimal terminal
//! status is a normal [`SolveStatus`](crate::solver::SolveStatus) value that
//! the caller branches on.

use thiserror::Error;

use crate::model::State;

/// Fatal build-time errors: malformed declarations and dangling references.
#[derive(Debug, Error, PartialEq)]
pub enum DeclarationError {
    #[error("index set '{0}' is already declared")]
    DuplicateSet(String),
    #[error("index set '{set}' contains duplicate member {member}")]
    DuplicateMember { set: String, member: String },
    #[error("unknown index set '{0}'")]
    UnknownSet(String),
    #[error("parameter '{0}' is already declared")]
    DuplicateParameter(String),
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("variable family '{0}' is already declared")]
    DuplicateVariable(String),
    #[error("unknown variable family '{0}'")]
    UnknownVariable(String),
    #[error("constraint family '{0}' is already declared")]
    DuplicateConstraint(String),
    #[error("constraint family '{0}' has no body")]
    EmptyFamily(String),
    #[error("invalid index {tuple} for '{name}'")]
    BadIndex { name: String, tuple: String },
    #[error("bounds {lower:?}..{upper:?} are malformed for domain {domain:?} of variable '{name}'")]
    MalformedBounds {
        name: String,
        domain: crate::variable::VarDomain,
        lower: Option<f64>,
        upper: Option<f64>,
    },
    #[error("guards of family '{family}' overlap at {tuple}")]
    GuardOverlap { family: String, tuple: String },
    #[error("guards of family '{family}' leave {tuple} uncovered")]
    GuardGap { family: String, tuple: String },
    #[error("objective is already set")]
    DuplicateObjective,
    #[error("objective must be set before freezing")]
    MissingObjective,
    #[error("operation '{op}' is not permitted in state {state:?}")]
    InvalidState { op: &'static str, state: State },
}

/// Fatal data-load errors raised while validating parameter tables.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("parameter '{name}' has no value for {tuple}")]
    Missing { name: String, tuple: String },
    #[error("parameter '{name}' value {value} at {tuple} is out of range ({expected})")]
    OutOfRange {
        name: String,
        tuple: String,
        value: f64,
        expected: &'static str,
    },
}

/// Contract violations on the reporting side.
#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("model is not solved (state {0:?})")]
    NotSolved(State),
    #[error("recomputed objective {recomputed} differs from reported {reported} by more than {tolerance}")]
    ObjectiveMismatch {
        reported: f64,
        recomputed: f64,
        tolerance: f64,
    },
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
}

/// Union of the fatal error classes, for callers that build, load and solve
/// in one sweep.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
