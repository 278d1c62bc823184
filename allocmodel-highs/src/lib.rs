//! HiGHS backend for `allocmodel`.
//!
//! Implements [`SolverBackend`] over the HiGHS engine: linear programs via
//! its simplex/interior-point solvers, integer and binary variables via its
//! branch-and-bound. The expanded model is loaded column by column and row
//! by row in the core's stable enumeration order, so repeated runs see the
//! same problem and return the same assignment.
//!
//! ```no_run
//! use allocmodel::{SolveOptions, staffing};
//! use allocmodel_highs::HighsBackend;
//!
//! let data = staffing::StaffingData::default();
//! let mut model = staffing::build(&data).unwrap();
//! let status = model.solve(&mut HighsBackend::new(), &SolveOptions::default()).unwrap();
//! if status.is_optimal() {
//!     print!("{}", staffing::report(&model).unwrap());
//! }
//! ```

use std::ops::Bound;

use highs::{HighsModelStatus, RowProblem};
use itertools::izip;
use tracing::{debug, info};

use allocmodel::{ExpandedModel, Sense, SolveOptions, SolveStatus, Solution, SolverBackend};

/// A stateless adapter: each call builds a fresh HiGHS problem from the
/// submitted model and blocks until the engine reaches a terminal status.
#[derive(Default)]
pub struct HighsBackend {
    /// Forwarded to the engine's `output_flag` option.
    pub verbose: bool,
}

impl HighsBackend {
    pub fn new() -> HighsBackend {
        HighsBackend::default()
    }
}

fn interval(lower: f64, upper: f64) -> (Bound<f64>, Bound<f64>) {
    let lo = if lower.is_finite() { Bound::Included(lower) } else { Bound::Unbounded };
    let up = if upper.is_finite() { Bound::Included(upper) } else { Bound::Unbounded };
    (lo, up)
}

impl SolverBackend for HighsBackend {
    fn name(&self) -> &str { "highs" }

    fn solve(&mut self, problem: &ExpandedModel, opts: &SolveOptions) -> Solution {
        if problem.cols.is_empty() {
            // Nothing to optimize over; the objective is its constant.
            return Solution {
                status: SolveStatus::Optimal,
                objective: problem.objective_constant,
                values: Vec::new(),
                message: None,
            };
        }

        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(problem.cols.len());
        for (col, &cost) in izip!(problem.cols.iter(), problem.objective.iter()) {
            let bounds = interval(col.lower, col.upper);
            let handle = if col.domain.is_integer() {
                pb.add_integer_column(cost, bounds)
            } else {
                pb.add_column(cost, bounds)
            };
            cols.push(handle);
        }
        for row in &problem.rows {
            let factors: Vec<_> =
                row.terms.iter().map(|&(v, c)| (cols[v.index()], c)).collect();
            pb.add_row(interval(row.lower, row.upper), &factors);
        }

        let sense = match problem.sense {
            Sense::Minimize => highs::Sense::Minimise,
            Sense::Maximize => highs::Sense::Maximise,
        };
        let mut model = pb.optimise(sense);
        model.set_option("output_flag", self.verbose);
        if let Some(limit) = opts.time_limit {
            model.set_option("time_limit", limit.as_secs_f64());
        }

        debug!(
            cols = problem.cols.len(),
            rows = problem.rows.len(),
            "handing problem to HiGHS"
        );
        let solved = model.solve();
        let status = solved.status();
        info!(?status, "HiGHS terminated");

        match status {
            HighsModelStatus::Optimal => {
                let values = solved.get_solution().columns().to_vec();
                let objective = problem.objective_value(&values);
                Solution { status: SolveStatus::Optimal, objective, values, message: None }
            }
            HighsModelStatus::Infeasible => Solution::failed(SolveStatus::Infeasible),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Solution::failed(SolveStatus::Unbounded)
            }
            HighsModelStatus::ReachedTimeLimit => Solution::failed(SolveStatus::Timeout),
            other => Solution::error(format!("HiGHS terminated with {:?}", other)),
        }
    }
}
