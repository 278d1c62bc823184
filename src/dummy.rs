//! A backend that performs no optimization. It records the submitted
//! problem and replays a preset outcome, which is exactly what the state
//! machine, status propagation and reporter tests need without an engine.

use crate::solver::{ExpandedModel, SolveOptions, SolveStatus, Solution, SolverBackend};

enum Outcome {
    /// Report this assignment as optimal; the objective is computed from the
    /// submitted problem, the way an engine reports its own aggregate.
    Assignment(Vec<f64>),
    /// Replay a fixed non-optimal status.
    Status(SolveStatus),
    /// Replay a fully scripted solution verbatim.
    Verbatim(Solution),
}

/// Scripted backend for tests.
pub struct Backend {
    outcome: Outcome,
    /// The problem most recently submitted, for inspection.
    pub last_submitted: Option<ExpandedModel>,
}

impl Backend {
    /// Replays `values` as an optimal assignment, one value per column.
    pub fn optimal(values: Vec<f64>) -> Backend {
        Backend { outcome: Outcome::Assignment(values), last_submitted: None }
    }

    /// Replays a non-optimal terminal status with an empty assignment.
    pub fn failing(status: SolveStatus) -> Backend {
        Backend { outcome: Outcome::Status(status), last_submitted: None }
    }

    /// Replays `solution` exactly as given.
    pub fn scripted(solution: Solution) -> Backend {
        Backend { outcome: Outcome::Verbatim(solution), last_submitted: None }
    }
}

impl SolverBackend for Backend {
    fn name(&self) -> &str { "dummy" }

    fn solve(&mut self, problem: &ExpandedModel, _opts: &SolveOptions) -> Solution {
        self.last_submitted = Some(problem.clone());
        match self.outcome {
            Outcome::Assignment(ref values) => {
                assert_eq!(values.len(), problem.cols.len(), "scripted assignment width");
                Solution {
                    status: SolveStatus::Optimal,
                    objective: problem.objective_value(values),
                    values: values.clone(),
                    message: None,
                }
            }
            Outcome::Status(status) => Solution::failed(status),
            Outcome::Verbatim(ref sol) => sol.clone(),
        }
    }
}
