//! Deterministic post-solve reporting.
//!
//! The reporter reads a solved model only. It re-evaluates every objective
//! component from the same [`LinearExpr`](crate::expr::LinearExpr) that was
//! submitted, so a divergence between the engine-reported objective and the
//! recomputed component sum is detectable instead of silently printed.

use std::fmt::Write as _;

use crate::error::ReportError;
use crate::index::Key;
use crate::model::Model;
use crate::solver::Solution;
use crate::variable::VarDomain;

/// One column of a quantity table: a header, the variable family it reads,
/// and the fixed leading keys; the period key is appended per row.
pub struct TableColumn<'a> {
    pub header: &'a str,
    pub family: &'a str,
    pub prefix: &'a [Key],
}

/// Read-only view over a model in the `Solved` state.
pub struct Reporter<'a> {
    model: &'a Model,
    solution: &'a Solution,
}

impl<'a> Reporter<'a> {
    /// Fails unless the model is `Solved`; reporting on a failed or
    /// unsubmitted model is a contract violation, not a formatting concern.
    pub fn new(model: &'a Model) -> Result<Reporter<'a>, ReportError> {
        let solution = model.solution()?;
        Ok(Reporter { model, solution })
    }

    /// The single objective line, from the engine-reported value.
    pub fn objective_line(&self) -> String {
        format!("Objective: {:.2}", self.solution.objective)
    }

    /// One `"<keys> is OPEN"` line per binary cell of `family` whose value
    /// is 1, in domain order.
    pub fn selection_lines(&self, family: &str) -> Result<Vec<String>, ReportError> {
        let fam = self.model.var_family(family)?;
        debug_assert_eq!(fam.domain(), VarDomain::Binary);
        let refs: Vec<&crate::index::IndexSet> = fam
            .sets
            .iter()
            .map(|id| self.model.set_by_id(*id))
            .collect();
        let mut lines = Vec::new();
        for tuple in crate::index::tuple_iter(&refs) {
            let v = self.model.value(family, &tuple)?;
            if v > 0.5 {
                let label: Vec<String> = tuple.iter().map(|k| k.to_string()).collect();
                lines.push(format!("{} is OPEN", label.join(",")));
            }
        }
        Ok(lines)
    }

    /// A fixed-column table: one row per member of `period_set`, one column
    /// per entry of `columns`. An empty period set renders the header and
    /// zero rows.
    pub fn quantity_table(
        &self,
        title: &str,
        period_set: &str,
        columns: &[TableColumn<'_>],
    ) -> Result<String, ReportError> {
        let periods = self.model.set(period_set)?;
        let mut out = String::new();
        writeln!(out, "-- {} --", title).unwrap();
        write!(out, "{:>8}", periods.name()).unwrap();
        for col in columns {
            write!(out, "{:>12}", col.header).unwrap();
        }
        out.push('\n');
        for period in periods.iter() {
            write!(out, "{:>8}", period.to_string()).unwrap();
            for col in columns {
                let mut keys = col.prefix.to_vec();
                keys.push(period.clone());
                let v = self.model.value(col.family, &keys)?;
                write!(out, "{:>12.2}", v).unwrap();
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Recomputes every named objective component from its submitted
    /// expression against the solution assignment.
    pub fn components(&self) -> Vec<(String, f64)> {
        match self.model.objective() {
            Some(obj) => obj
                .components
                .iter()
                .map(|(name, expr)| (name.clone(), expr.eval(&self.solution.values)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Sum of the recomputed components.
    pub fn recomputed_objective(&self) -> f64 {
        self.components().iter().map(|(_, v)| v).sum()
    }

    /// Cross-checks the recomputed component sum against the engine-reported
    /// objective value.
    pub fn verify_objective(&self, tolerance: f64) -> Result<(), ReportError> {
        let recomputed = self.recomputed_objective();
        let reported = self.solution.objective;
        if (recomputed - reported).abs() > tolerance {
            Err(ReportError::ObjectiveMismatch { reported, recomputed, tolerance })
        } else {
            Ok(())
        }
    }

    /// The component breakdown as text, one `name: value` line each.
    pub fn component_lines(&self) -> Vec<String> {
        self.components()
            .into_iter()
            .map(|(name, v)| format!("{}: {:.2}", name, v))
            .collect()
    }
}

/// The single status line printed instead of a report when a run does not
/// reach `Optimal`.
pub fn status_line(status: crate::solver::SolveStatus) -> String {
    format!("Solve terminated: {}", status)
}
