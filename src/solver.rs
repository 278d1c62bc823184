//! The boundary towards an external optimization engine.
//!
//! The core never runs simplex or branch-and-bound itself; it produces an
//! [`ExpandedModel`] with a stable enumeration of columns and rows and hands
//! it to a [`SolverBackend`]. Any conforming engine therefore sees the same
//! problem in the same order, and a reproducible assignment comes back as a
//! [`Solution`]. Engine failures are terminal statuses, not panics.

use std::time::Duration;

use crate::constraint::Row;
use crate::variable::VarDomain;

/// Objective sense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// One column of the expanded model, in arena order.
#[derive(Clone, Debug, PartialEq)]
pub struct Col {
    /// `family[k1,k2,...]`
    pub name: String,
    pub domain: VarDomain,
    pub lower: f64,
    pub upper: f64,
}

/// The fully expanded, submission-ready problem.
///
/// Column `j` corresponds to arena slot `j`; rows appear in family
/// declaration order, row-major within each family.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpandedModel {
    pub name: String,
    pub sense: Sense,
    /// Objective coefficient per column.
    pub objective: Vec<f64>,
    /// Constant term of the objective.
    pub objective_constant: f64,
    pub cols: Vec<Col>,
    pub rows: Vec<Row>,
}

impl ExpandedModel {
    /// The objective value implied by an assignment, as an engine would
    /// report it: cᵀx plus the constant.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .zip(values.iter())
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.objective_constant
    }
}

/// Terminal status of a solve. Every value is a normal outcome the caller
/// branches on; none of them is a crash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Timeout,
    Error,
}

impl SolveStatus {
    pub fn is_optimal(self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unbounded => "UNBOUNDED",
            SolveStatus::Timeout => "TIMEOUT",
            SolveStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Terminal assignment returned by a backend.
///
/// `values` is indexed by column (= arena slot) and is empty unless the
/// status is [`SolveStatus::Optimal`].
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub status: SolveStatus,
    pub objective: f64,
    pub values: Vec<f64>,
    /// Engine diagnostic accompanying an `Error` status.
    pub message: Option<String>,
}

impl Solution {
    /// A non-optimal terminal outcome with no assignment.
    pub fn failed(status: SolveStatus) -> Solution {
        Solution { status, objective: 0.0, values: Vec::new(), message: None }
    }

    pub fn error(message: impl Into<String>) -> Solution {
        Solution {
            status: SolveStatus::Error,
            objective: 0.0,
            values: Vec::new(),
            message: Some(message.into()),
        }
    }
}

/// Engine options fixed before submission. There is no retry and no
/// cancellation beyond the time limit; a timed-out model stays terminal.
#[derive(Clone, Debug, Default)]
pub struct SolveOptions {
    pub time_limit: Option<Duration>,
}

impl SolveOptions {
    pub fn with_time_limit(limit: Duration) -> SolveOptions {
        SolveOptions { time_limit: Some(limit) }
    }
}

/// An external optimization engine. The single long-running call of the
/// pipeline; it blocks until a terminal status is available.
pub trait SolverBackend {
    fn name(&self) -> &str;

    fn solve(&mut self, problem: &ExpandedModel, opts: &SolveOptions) -> Solution;
}
