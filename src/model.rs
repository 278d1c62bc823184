//! The model registry and its lifecycle.
//!
//! A [`Model`] owns the index sets, parameters, variable families,
//! constraint families and the objective. It moves strictly forward through
//! `Draft → Frozen → Submitted → {Solved, Failed}`: declarations only in
//! `Draft`, one submission, no mutation after it. Retrying a solve means
//! building a fresh model.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::constraint::{Body, BuildFn, Family, Relation, Row};
use crate::error::{DataError, DeclarationError, Error, ReportError};
use crate::expr::LinearExpr;
use crate::index::{format_tuple, tuple_iter, IndexSet, Key, SetId};
use crate::param::{ParamRange, Parameter};
use crate::solver::{Col, ExpandedModel, Sense, SolveOptions, SolveStatus, Solution, SolverBackend};
use crate::variable::{Bounds, VarDomain, VarId, VariableFamily};

/// Lifecycle state of a model. No backward transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Draft,
    Frozen,
    Submitted,
    Solved,
    Failed,
}

/// The objective: a sense plus named additive components. The component
/// expressions are kept verbatim so the reporter can recompute each one
/// from the solution independently of the engine's aggregate.
pub struct Objective {
    pub sense: Sense,
    pub components: Vec<(String, LinearExpr)>,
}

impl Objective {
    /// The full objective expression, the sum of all components.
    pub fn expression(&self) -> LinearExpr {
        crate::expr::sum(self.components.iter().map(|(_, e)| e.clone()))
    }
}

pub struct Model {
    name: String,
    state: State,

    sets: Vec<IndexSet>,
    set_ids: HashMap<String, usize>,

    params: Vec<Parameter>,
    param_ids: HashMap<String, usize>,

    vars: Vec<VariableFamily>,
    var_ids: HashMap<String, usize>,
    /// Total number of variable cells allocated so far.
    num_slots: usize,

    families: Vec<Family>,
    family_names: HashMap<String, usize>,

    objective: Option<Objective>,
    solution: Option<Solution>,
}

impl Model {
    pub fn new(name: &str) -> Model {
        Model {
            name: name.to_string(),
            state: State::Draft,
            sets: Vec::new(),
            set_ids: HashMap::new(),
            params: Vec::new(),
            param_ids: HashMap::new(),
            vars: Vec::new(),
            var_ids: HashMap::new(),
            num_slots: 0,
            families: Vec::new(),
            family_names: HashMap::new(),
            objective: None,
            solution: None,
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn state(&self) -> State { self.state }

    fn require_draft(&self, op: &'static str) -> Result<(), DeclarationError> {
        if self.state == State::Draft {
            Ok(())
        } else {
            Err(DeclarationError::InvalidState { op, state: self.state })
        }
    }

    //======================================================
    // Declarations (Draft only)
    //======================================================

    /// Registers a named index set with the given ordered members.
    pub fn declare_set<I, K>(&mut self, name: &str, members: I) -> Result<(), DeclarationError>
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.require_draft("declare_set")?;
        if self.set_ids.contains_key(name) {
            return Err(DeclarationError::DuplicateSet(name.to_string()));
        }
        let set = IndexSet::new(name, members.into_iter().map(Into::into).collect())?;
        self.set_ids.insert(name.to_string(), self.sets.len());
        self.sets.push(set);
        Ok(())
    }

    /// Registers a parameter table. `provider` is queried for every tuple of
    /// the index product; a gap or an out-of-range value is fatal.
    pub fn declare_parameter<F>(
        &mut self,
        name: &str,
        sets: &[&str],
        range: ParamRange,
        provider: F,
    ) -> Result<(), Error>
    where
        F: Fn(&[Key]) -> Option<f64>,
    {
        self.require_draft("declare_parameter")?;
        if self.param_ids.contains_key(name) {
            return Err(DeclarationError::DuplicateParameter(name.to_string()).into());
        }
        let ids = self.resolve_sets(sets)?;
        let refs: Vec<&IndexSet> = ids.iter().map(|id| &self.sets[id.0]).collect();
        let param = Parameter::populate(name, ids.clone(), &refs, range, provider)?;
        self.param_ids.insert(name.to_string(), self.params.len());
        self.params.push(param);
        Ok(())
    }

    /// Convenience for a zero-index (scalar) parameter.
    pub fn declare_scalar(
        &mut self,
        name: &str,
        range: ParamRange,
        value: f64,
    ) -> Result<(), Error> {
        self.declare_parameter(name, &[], range, |_| Some(value))
    }

    /// Registers a decision variable family; its cells become a contiguous
    /// slot range in the model arena.
    pub fn declare_variable(
        &mut self,
        name: &str,
        sets: &[&str],
        domain: VarDomain,
        bounds: Bounds,
    ) -> Result<(), DeclarationError> {
        self.require_draft("declare_variable")?;
        if self.var_ids.contains_key(name) {
            return Err(DeclarationError::DuplicateVariable(name.to_string()));
        }
        let ids = self.resolve_sets(sets)?;
        let refs: Vec<&IndexSet> = ids.iter().map(|id| &self.sets[id.0]).collect();
        let len = refs.iter().map(|s| s.len()).product();
        let strides = crate::index::strides(&refs);
        let fam = VariableFamily::new(name, ids, domain, bounds, self.num_slots, len, strides)?;
        self.num_slots += len;
        self.var_ids.insert(name.to_string(), self.vars.len());
        self.vars.push(fam);
        Ok(())
    }

    /// Registers a constraint family. The builder bodies are validated when
    /// the family is expanded.
    pub fn add_family(&mut self, family: Family) -> Result<(), DeclarationError> {
        self.require_draft("add_family")?;
        if self.family_names.contains_key(&family.name) {
            return Err(DeclarationError::DuplicateConstraint(family.name.clone()));
        }
        if family.body.is_none() {
            return Err(DeclarationError::EmptyFamily(family.name.clone()));
        }
        let names: Vec<&str> = family.set_names.iter().map(String::as_str).collect();
        self.resolve_sets(&names)?;
        self.family_names.insert(family.name.clone(), self.families.len());
        self.families.push(family);
        Ok(())
    }

    /// Sets the objective from named additive components. At most once.
    pub fn set_objective(
        &mut self,
        sense: Sense,
        components: Vec<(&str, LinearExpr)>,
    ) -> Result<(), DeclarationError> {
        self.require_draft("set_objective")?;
        if self.objective.is_some() {
            return Err(DeclarationError::DuplicateObjective);
        }
        self.objective = Some(Objective {
            sense,
            components: components
                .into_iter()
                .map(|(n, e)| (n.to_string(), e.compacted()))
                .collect(),
        });
        Ok(())
    }

    /// Ends the declaration phase: `Draft → Frozen`.
    pub fn freeze(&mut self) -> Result<(), DeclarationError> {
        self.require_draft("freeze")?;
        if self.objective.is_none() {
            return Err(DeclarationError::MissingObjective);
        }
        self.state = State::Frozen;
        Ok(())
    }

    //======================================================
    // Lookups, also used inside constraint builders
    //======================================================

    fn resolve_sets(&self, names: &[&str]) -> Result<Vec<SetId>, DeclarationError> {
        names
            .iter()
            .map(|n| {
                self.set_ids
                    .get(*n)
                    .map(|&i| SetId(i))
                    .ok_or_else(|| DeclarationError::UnknownSet(n.to_string()))
            })
            .collect()
    }

    /// A declared index set.
    pub fn set(&self, name: &str) -> Result<&IndexSet, DeclarationError> {
        self.set_ids
            .get(name)
            .map(|&i| &self.sets[i])
            .ok_or_else(|| DeclarationError::UnknownSet(name.to_string()))
    }

    pub(crate) fn set_by_id(&self, id: SetId) -> &IndexSet {
        &self.sets[id.0]
    }

    /// A declared variable family.
    pub fn var_family(&self, name: &str) -> Result<&VariableFamily, DeclarationError> {
        self.var_ids
            .get(name)
            .map(|&i| &self.vars[i])
            .ok_or_else(|| DeclarationError::UnknownVariable(name.to_string()))
    }

    /// Row-major cell offset of `keys` within `fam`, validating arity and
    /// set membership.
    fn cell_offset(&self, fam: &VariableFamily, keys: &[Key]) -> Result<usize, DeclarationError> {
        if keys.len() != fam.sets.len() {
            return Err(DeclarationError::BadIndex {
                name: fam.name().to_string(),
                tuple: format_tuple(keys),
            });
        }
        let mut offset = 0;
        for ((key, set_id), stride) in keys.iter().zip(fam.sets.iter()).zip(fam.strides.iter()) {
            let pos = self.sets[set_id.0].position(key).ok_or_else(|| {
                DeclarationError::BadIndex {
                    name: fam.name().to_string(),
                    tuple: format_tuple(keys),
                }
            })?;
            offset += pos * stride;
        }
        Ok(offset)
    }

    /// The arena slot of one variable cell.
    pub fn var(&self, family: &str, keys: &[Key]) -> Result<VarId, DeclarationError> {
        let fam = self.var_family(family)?;
        Ok(fam.var_at(self.cell_offset(fam, keys)?))
    }

    /// The cell as a unit-coefficient expression.
    pub fn var_expr(&self, family: &str, keys: &[Key]) -> Result<LinearExpr, DeclarationError> {
        Ok(LinearExpr::var(self.var(family, keys)?))
    }

    /// A parameter value.
    pub fn param(&self, name: &str, keys: &[Key]) -> Result<f64, DeclarationError> {
        let i = *self
            .param_ids
            .get(name)
            .ok_or_else(|| DeclarationError::UnknownParameter(name.to_string()))?;
        let p = &self.params[i];
        if keys.len() != p.sets.len() {
            return Err(DeclarationError::BadIndex {
                name: name.to_string(),
                tuple: format_tuple(keys),
            });
        }
        let mut offset = 0;
        for ((key, set_id), stride) in keys.iter().zip(p.sets.iter()).zip(p.strides.iter()) {
            let pos = self.sets[set_id.0].position(key).ok_or_else(|| {
                DeclarationError::BadIndex { name: name.to_string(), tuple: format_tuple(keys) }
            })?;
            offset += pos * stride;
        }
        Ok(p.value_at(offset))
    }

    //======================================================
    // Constraint generation
    //======================================================

    /// Expands every constraint family into concrete rows, in declaration
    /// order, row-major within each family. Expansion is pure: it can be
    /// repeated on the same model and yields identical rows each time.
    pub fn expand(&self) -> Result<ExpandedModel, DeclarationError> {
        match self.state {
            State::Draft | State::Frozen => {}
            s => return Err(DeclarationError::InvalidState { op: "expand", state: s }),
        }

        let mut cols = Vec::with_capacity(self.num_slots);
        for fam in &self.vars {
            let refs: Vec<&IndexSet> = fam.sets.iter().map(|id| &self.sets[id.0]).collect();
            let (lower, upper) = fam.effective_bounds();
            for tuple in tuple_iter(&refs) {
                cols.push(Col {
                    name: cell_name(fam.name(), &tuple),
                    domain: fam.domain,
                    lower,
                    upper,
                });
            }
        }

        let mut rows = Vec::new();
        for (fi, fam) in self.families.iter().enumerate() {
            let names: Vec<&str> = fam.set_names.iter().map(String::as_str).collect();
            let ids = self.resolve_sets(&names)?;
            let refs: Vec<&IndexSet> = ids.iter().map(|id| &self.sets[id.0]).collect();
            let before = rows.len();
            for tuple in tuple_iter(&refs) {
                if let Some(ref filter) = fam.filter {
                    if !filter(&tuple) {
                        continue;
                    }
                }
                let build = self.select_arm(fam, &tuple)?;
                let (lhs, rel, rhs) = build(self, &tuple)?;
                let expr = lhs.sub(rhs).compacted();
                let bound = -expr.constant_term();
                let (lower, upper) = match rel {
                    Relation::Le => (f64::NEG_INFINITY, bound),
                    Relation::Ge => (bound, f64::INFINITY),
                    Relation::Eq => (bound, bound),
                };
                rows.push(Row {
                    name: cell_name(&fam.name, &tuple),
                    family: fi,
                    terms: expr.terms().to_vec(),
                    lower,
                    upper,
                });
            }
            debug!(family = %fam.name, rows = rows.len() - before, "expanded constraint family");
        }

        let mut objective = vec![0.0; self.num_slots];
        let mut objective_constant = 0.0;
        let sense = match self.objective {
            Some(ref obj) => {
                let total = obj.expression().compacted();
                for &(v, c) in total.terms() {
                    objective[v.index()] = c;
                }
                objective_constant = total.constant_term();
                obj.sense
            }
            None => Sense::Minimize,
        };

        Ok(ExpandedModel {
            name: self.name.clone(),
            sense,
            objective,
            objective_constant,
            cols,
            rows,
        })
    }

    /// Picks the builder for `tuple`: a uniform body, or the single matching
    /// guard arm. Two matching arms or none (without a catch-all) violate
    /// the partition contract.
    fn select_arm<'a>(
        &self,
        fam: &'a Family,
        tuple: &[Key],
    ) -> Result<&'a BuildFn, DeclarationError> {
        match fam.body {
            Some(Body::Uniform(ref f)) => Ok(f),
            Some(Body::Guarded { ref arms, ref otherwise }) => {
                let mut hit: Option<&BuildFn> = None;
                for (guard, build) in arms {
                    if guard(tuple) {
                        if hit.is_some() {
                            return Err(DeclarationError::GuardOverlap {
                                family: fam.name.clone(),
                                tuple: format_tuple(tuple),
                            });
                        }
                        hit = Some(build);
                    }
                }
                hit.or(otherwise.as_ref()).ok_or_else(|| DeclarationError::GuardGap {
                    family: fam.name.clone(),
                    tuple: format_tuple(tuple),
                })
            }
            None => Err(DeclarationError::EmptyFamily(fam.name.clone())),
        }
    }

    //======================================================
    // Submission
    //======================================================

    /// Expands the model and hands it to `backend`: `Frozen → Submitted →
    /// {Solved, Failed}`. Callable at most once per model; the outcome is
    /// the terminal status, which the caller must branch on.
    pub fn solve<B: SolverBackend>(
        &mut self,
        backend: &mut B,
        opts: &SolveOptions,
    ) -> Result<SolveStatus, DeclarationError> {
        if self.state != State::Frozen {
            return Err(DeclarationError::InvalidState { op: "solve", state: self.state });
        }
        let problem = self.expand()?;
        self.state = State::Submitted;
        info!(
            model = %self.name,
            backend = backend.name(),
            cols = problem.cols.len(),
            rows = problem.rows.len(),
            "submitting model"
        );
        let solution = backend.solve(&problem, opts);
        let status = solution.status;
        self.state = if status.is_optimal() { State::Solved } else { State::Failed };
        info!(model = %self.name, %status, "solve terminated");
        self.solution = Some(solution);
        Ok(status)
    }

    /// Terminal status, once the model has been submitted.
    pub fn status(&self) -> Option<SolveStatus> {
        self.solution.as_ref().map(|s| s.status)
    }

    /// The solution of a solved model.
    pub fn solution(&self) -> Result<&Solution, ReportError> {
        match (self.state, self.solution.as_ref()) {
            (State::Solved, Some(sol)) => Ok(sol),
            _ => Err(ReportError::NotSolved(self.state)),
        }
    }

    /// Value of one variable cell in the solution.
    pub fn value(&self, family: &str, keys: &[Key]) -> Result<f64, ReportError> {
        let sol = self.solution()?;
        let fam = self.var_family(family)?;
        let offset = self.cell_offset(fam, keys)?;
        Ok(sol.values[fam.base + offset])
    }

    pub(crate) fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }
}

fn cell_name(family: &str, tuple: &[Key]) -> String {
    if tuple.is_empty() {
        family.to_string()
    } else {
        format!("{}{}", family, format_tuple(tuple))
    }
}
