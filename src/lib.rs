//! Multi-period resource allocation modeling.
//!
//! This crate formulates resource-constrained allocation problems over
//! discrete time periods as linear or mixed-integer models and hands them to
//! an external solving engine. The pipeline is strictly sequential: declare
//! index sets, parameters and variables, add constraint families and an
//! objective, freeze the model, submit it once through a
//! [`SolverBackend`](solver::SolverBackend), then report from the solution.
//!
//! The library never runs simplex or branch-and-bound itself; backends such
//! as `allocmodel-highs` bind a concrete engine. What the core guarantees is
//! a stable enumeration of columns and rows, exhaustive validation at
//! declaration time, and reporting computed from exactly the expressions
//! that were submitted.
//!
//! # Example
//!
//! ```
//! use allocmodel::*;
//!
//! let mut m = Model::new("toy");
//! m.declare_set("items", ["a", "b"]).unwrap();
//! m.declare_parameter("weight", &["items"], ParamRange::NonNegative, |t| {
//!     Some(if t[0] == Key::from("a") { 2.0 } else { 3.0 })
//! }).unwrap();
//! m.declare_variable("take", &["items"], VarDomain::Binary, Bounds::none()).unwrap();
//!
//! m.add_family(Family::new("knapsack", &[]).body(|m, _| {
//!     let mut lhs = LinearExpr::zero();
//!     for i in m.set("items")?.members().to_vec() {
//!         let w = m.param("weight", std::slice::from_ref(&i))?;
//!         lhs.add_term(m.var("take", &[i])?, w);
//!     }
//!     Ok((lhs, Relation::Le, LinearExpr::constant(4.0)))
//! })).unwrap();
//!
//! m.set_objective(Sense::Maximize, vec![
//!     ("value", m.var_expr("take", &["a".into()]).unwrap()
//!         .add(m.var_expr("take", &["b".into()]).unwrap())),
//! ]).unwrap();
//!
//! let expanded = m.expand().unwrap();
//! assert_eq!(expanded.rows.len(), 1);
//! assert_eq!(expanded.cols.len(), 2);
//! ```

pub mod constraint;
pub mod dummy;
pub mod error;
pub mod expr;
pub mod index;
pub mod model;
pub mod param;
pub mod production;
pub mod report;
pub mod solver;
pub mod staffing;
pub mod variable;

pub use constraint::{Family, Relation, Row};
pub use error::{DataError, DeclarationError, Error, ReportError};
pub use expr::{sum, LinearExpr};
pub use index::{IndexSet, Key};
pub use model::{Model, Objective, State};
pub use param::ParamRange;
pub use report::{status_line, Reporter, TableColumn};
pub use solver::{
    Col, ExpandedModel, Sense, SolveOptions, SolveStatus, Solution, SolverBackend,
};
pub use variable::{Bounds, VarDomain, VarId, VariableFamily};
