//! Workforce staffing instance: decide facility operation and weekly
//! staffing (hiring, firing, overtime) to meet demand at minimum cost.
//!
//! Hires take effect the following week; fires take effect immediately, so
//! the first week balances against the initial staff level only.

use std::collections::HashMap;

use crate::constraint::{Family, Relation};
use crate::error::{DeclarationError, Error, ReportError};
use crate::expr::LinearExpr;
use crate::index::Key;
use crate::model::Model;
use crate::param::ParamRange;
use crate::report::{status_line, Reporter, TableColumn};
use crate::solver::Sense;
use crate::variable::{Bounds, VarDomain};

/// Authoritative input data for one staffing run, normally read from an
/// external source before model construction.
#[derive(Clone, Debug, Default)]
pub struct StaffingData {
    pub facilities: Vec<String>,
    /// Number of weeks in the horizon; weeks are keyed `1..=weeks`.
    pub weeks: i64,
    /// Regular hours one employee works per week.
    pub hours_per_week: f64,
    /// Maximum overtime hours per employee per week.
    pub max_overtime: f64,
    /// Required hours per facility and week.
    pub demand: HashMap<(String, i64), f64>,
    pub initial_staff: HashMap<String, f64>,
    /// Maximum headcount of an open facility.
    pub capacity: HashMap<String, f64>,
    pub wage: HashMap<String, f64>,
    pub overtime_cost: HashMap<String, f64>,
    pub hire_cost: HashMap<String, f64>,
    pub fire_cost: HashMap<String, f64>,
    /// Weekly fixed cost of keeping a facility open.
    pub fixed_cost: HashMap<String, f64>,
    /// Hardcoded business rules: `(a, b)` means facility `a` may be open
    /// only if facility `b` is open. Kept as explicit named constraints.
    pub open_requires: Vec<(String, String)>,
}

fn week_of(key: &Key) -> Result<i64, DeclarationError> {
    key.as_int().ok_or_else(|| DeclarationError::BadIndex {
        name: "weeks".to_string(),
        tuple: key.to_string(),
    })
}

fn per_facility(
    m: &mut Model,
    name: &str,
    table: &HashMap<String, f64>,
) -> Result<(), Error> {
    let table = table.clone();
    m.declare_parameter(name, &["facilities"], ParamRange::NonNegative, move |t| {
        table.get(&t[0].to_string()).copied()
    })
}

/// Builds the frozen staffing model from `data`.
pub fn build(data: &StaffingData) -> Result<Model, Error> {
    let mut m = Model::new("staffing");

    m.declare_set("facilities", data.facilities.iter().map(String::as_str))?;
    m.declare_set("weeks", 1..=data.weeks)?;

    let demand = data.demand.clone();
    m.declare_parameter("demand", &["facilities", "weeks"], ParamRange::NonNegative, move |t| {
        t[1].as_int().and_then(|w| demand.get(&(t[0].to_string(), w)).copied())
    })?;
    per_facility(&mut m, "initial_staff", &data.initial_staff)?;
    per_facility(&mut m, "capacity", &data.capacity)?;
    per_facility(&mut m, "wage", &data.wage)?;
    per_facility(&mut m, "overtime_cost", &data.overtime_cost)?;
    per_facility(&mut m, "hire_cost", &data.hire_cost)?;
    per_facility(&mut m, "fire_cost", &data.fire_cost)?;
    per_facility(&mut m, "fixed_cost", &data.fixed_cost)?;
    m.declare_scalar("hours_per_week", ParamRange::NonNegative, data.hours_per_week)?;
    m.declare_scalar("max_overtime", ParamRange::NonNegative, data.max_overtime)?;

    m.declare_variable("open", &["facilities"], VarDomain::Binary, Bounds::none())?;
    for name in ["staff", "hire", "fire"] {
        m.declare_variable(
            name,
            &["facilities", "weeks"],
            VarDomain::NonNegativeInteger,
            Bounds::none(),
        )?;
    }
    m.declare_variable(
        "overtime",
        &["facilities", "weeks"],
        VarDomain::NonNegativeContinuous,
        Bounds::none(),
    )?;

    // Objective components, one per additive cost. The reporter recomputes
    // these same expressions after the solve.
    let mut wages = LinearExpr::zero();
    let mut overtime = LinearExpr::zero();
    let mut hiring = LinearExpr::zero();
    let mut firing = LinearExpr::zero();
    let mut facilities = LinearExpr::zero();
    for f in data.facilities.iter() {
        let fk = Key::from(f.as_str());
        facilities.add_term(
            m.var("open", std::slice::from_ref(&fk))?,
            m.param("fixed_cost", std::slice::from_ref(&fk))? * data.weeks as f64,
        );
        for w in 1..=data.weeks {
            let key = [fk.clone(), Key::from(w)];
            wages.add_term(m.var("staff", &key)?, m.param("wage", &key[..1])?);
            overtime.add_term(m.var("overtime", &key)?, m.param("overtime_cost", &key[..1])?);
            hiring.add_term(m.var("hire", &key)?, m.param("hire_cost", &key[..1])?);
            firing.add_term(m.var("fire", &key)?, m.param("fire_cost", &key[..1])?);
        }
    }
    m.set_objective(
        Sense::Minimize,
        vec![
            ("wages", wages),
            ("overtime", overtime),
            ("hiring", hiring),
            ("firing", firing),
            ("facilities", facilities),
        ],
    )?;

    // Staff conservation. The first-week equation replaces the general one.
    m.add_family(
        Family::new("staff_flow", &["facilities", "weeks"])
            .when(
                |t| t[1] == Key::Int(1),
                |m, t| {
                    let lhs = m.var_expr("staff", t)?.add(m.var_expr("fire", t)?);
                    let rhs = LinearExpr::constant(m.param("initial_staff", &t[..1])?);
                    Ok((lhs, Relation::Eq, rhs))
                },
            )
            .otherwise(|m, t| {
                let w = week_of(&t[1])?;
                let prev = [t[0].clone(), Key::Int(w - 1)];
                let lhs = m
                    .var_expr("staff", t)?
                    .sub(m.var_expr("staff", &prev)?)
                    .add(m.var_expr("fire", t)?)
                    .sub(m.var_expr("hire", &prev)?);
                Ok((lhs, Relation::Eq, LinearExpr::zero()))
            }),
    )?;

    m.add_family(Family::new("cover_demand", &["facilities", "weeks"]).body(|m, t| {
        let hours = m.param("hours_per_week", &[])?;
        let lhs = m.var_expr("staff", t)?.scale(hours).add(m.var_expr("overtime", t)?);
        Ok((lhs, Relation::Ge, LinearExpr::constant(m.param("demand", t)?)))
    }))?;

    m.add_family(Family::new("overtime_cap", &["facilities", "weeks"]).body(|m, t| {
        let cap = m.param("max_overtime", &[])?;
        Ok((m.var_expr("overtime", t)?, Relation::Le, m.var_expr("staff", t)?.scale(cap)))
    }))?;

    m.add_family(Family::new("respect_capacity", &["facilities", "weeks"]).body(|m, t| {
        let cap = m.param("capacity", &t[..1])?;
        Ok((m.var_expr("staff", t)?, Relation::Le, m.var_expr("open", &t[..1])?.scale(cap)))
    }))?;

    // Cross-facility opening rules are business-specific and keyed by
    // entity name; each pair stays its own named constraint.
    for (a, b) in data.open_requires.iter() {
        let (a, b) = (a.clone(), b.clone());
        let name = format!("open_{}_requires_{}", a, b);
        m.add_family(Family::new(&name, &[]).body(move |m, _| {
            Ok((
                m.var_expr("open", &[Key::from(a.as_str())])?,
                Relation::Le,
                m.var_expr("open", &[Key::from(b.as_str())])?,
            ))
        }))?;
    }

    m.freeze()?;
    Ok(m)
}

/// Renders the full staffing report for a solved model: objective line,
/// open-facility lines, then one weekly table per facility.
pub fn report(model: &Model) -> Result<String, ReportError> {
    let reporter = Reporter::new(model)?;
    reporter.verify_objective(1e-6)?;

    let mut out = String::new();
    out.push_str(&reporter.objective_line());
    out.push('\n');
    for line in reporter.selection_lines("open")? {
        out.push_str(&line);
        out.push('\n');
    }
    let facilities: Vec<Key> = model.set("facilities")?.members().to_vec();
    for f in facilities {
        let prefix = [f.clone()];
        let table = reporter.quantity_table(
            &f.to_string(),
            "weeks",
            &[
                TableColumn { header: "staff", family: "staff", prefix: &prefix },
                TableColumn { header: "hire", family: "hire", prefix: &prefix },
                TableColumn { header: "fire", family: "fire", prefix: &prefix },
                TableColumn { header: "overtime", family: "overtime", prefix: &prefix },
            ],
        )?;
        out.push_str(&table);
    }
    for line in reporter.component_lines() {
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// The line to print instead of a report when the run did not reach
/// `Optimal`.
pub fn failure_line(model: &Model) -> Option<String> {
    model.status().filter(|s| !s.is_optimal()).map(status_line)
}
