//! Production–inventory instance: choose material purchases and a monthly
//! product mix to maximize profit, carrying inventory forward and allowing
//! backorders that must be cleared by the end of the horizon.

use std::collections::HashMap;

use crate::constraint::{Family, Relation};
use crate::error::{DeclarationError, Error, ReportError};
use crate::expr::LinearExpr;
use crate::index::Key;
use crate::model::Model;
use crate::param::ParamRange;
use crate::report::{Reporter, TableColumn};
use crate::solver::Sense;
use crate::variable::{Bounds, VarDomain};

/// Input data for one production run.
#[derive(Clone, Debug, Default)]
pub struct ProductionData {
    pub products: Vec<String>,
    pub materials: Vec<String>,
    /// Number of months in the horizon; months are keyed `1..=months`.
    pub months: i64,
    pub demand: HashMap<(String, i64), f64>,
    /// Sales price per unit of product.
    pub price: HashMap<String, f64>,
    pub material_cost: HashMap<String, f64>,
    /// Purchasable amount of material per month.
    pub material_avail: HashMap<(String, i64), f64>,
    /// Units of material needed per unit of product.
    pub usage: HashMap<(String, String), f64>,
    /// Machine hours per unit of product.
    pub machine_hours: HashMap<String, f64>,
    /// Machine hours available per month.
    pub machine_capacity: HashMap<i64, f64>,
    pub holding_cost: HashMap<String, f64>,
    pub backorder_cost: HashMap<String, f64>,
    pub initial_inventory: HashMap<String, f64>,
    pub max_inventory: HashMap<String, f64>,
}

fn month_of(key: &Key) -> Result<i64, DeclarationError> {
    key.as_int().ok_or_else(|| DeclarationError::BadIndex {
        name: "months".to_string(),
        tuple: key.to_string(),
    })
}

fn per_product(m: &mut Model, name: &str, table: &HashMap<String, f64>) -> Result<(), Error> {
    let table = table.clone();
    m.declare_parameter(name, &["products"], ParamRange::NonNegative, move |t| {
        table.get(&t[0].to_string()).copied()
    })
}

/// Builds the frozen production model from `data`.
pub fn build(data: &ProductionData) -> Result<Model, Error> {
    let mut m = Model::new("production");

    m.declare_set("products", data.products.iter().map(String::as_str))?;
    m.declare_set("materials", data.materials.iter().map(String::as_str))?;
    m.declare_set("months", 1..=data.months)?;

    let demand = data.demand.clone();
    m.declare_parameter("demand", &["products", "months"], ParamRange::NonNegative, move |t| {
        t[1].as_int().and_then(|p| demand.get(&(t[0].to_string(), p)).copied())
    })?;
    per_product(&mut m, "price", &data.price)?;
    per_product(&mut m, "machine_hours", &data.machine_hours)?;
    per_product(&mut m, "holding_cost", &data.holding_cost)?;
    per_product(&mut m, "backorder_cost", &data.backorder_cost)?;
    per_product(&mut m, "initial_inventory", &data.initial_inventory)?;
    per_product(&mut m, "max_inventory", &data.max_inventory)?;

    let cost = data.material_cost.clone();
    m.declare_parameter("material_cost", &["materials"], ParamRange::NonNegative, move |t| {
        cost.get(&t[0].to_string()).copied()
    })?;
    let avail = data.material_avail.clone();
    m.declare_parameter(
        "material_avail",
        &["materials", "months"],
        ParamRange::NonNegative,
        move |t| t[1].as_int().and_then(|p| avail.get(&(t[0].to_string(), p)).copied()),
    )?;
    let usage = data.usage.clone();
    m.declare_parameter("usage", &["materials", "products"], ParamRange::NonNegative, move |t| {
        usage.get(&(t[0].to_string(), t[1].to_string())).copied()
    })?;
    let capacity = data.machine_capacity.clone();
    m.declare_parameter("machine_capacity", &["months"], ParamRange::NonNegative, move |t| {
        t[0].as_int().and_then(|p| capacity.get(&p).copied())
    })?;

    for name in ["make", "backorder"] {
        m.declare_variable(
            name,
            &["products", "months"],
            VarDomain::NonNegativeContinuous,
            Bounds::none(),
        )?;
    }
    m.declare_variable(
        "inventory",
        &["products", "months"],
        VarDomain::NonNegativeContinuous,
        Bounds::none(),
    )?;
    m.declare_variable(
        "buy",
        &["materials", "months"],
        VarDomain::NonNegativeContinuous,
        Bounds::none(),
    )?;

    let mut revenue = LinearExpr::zero();
    let mut materials = LinearExpr::zero();
    let mut holding = LinearExpr::zero();
    let mut backorders = LinearExpr::zero();
    for i in data.products.iter() {
        let ik = Key::from(i.as_str());
        let price = m.param("price", std::slice::from_ref(&ik))?;
        let hold = m.param("holding_cost", std::slice::from_ref(&ik))?;
        let back = m.param("backorder_cost", std::slice::from_ref(&ik))?;
        for t in 1..=data.months {
            let key = [ik.clone(), Key::from(t)];
            revenue.add_term(m.var("make", &key)?, price);
            holding.add_term(m.var("inventory", &key)?, -hold);
            backorders.add_term(m.var("backorder", &key)?, -back);
        }
    }
    for mat in data.materials.iter() {
        let mk = Key::from(mat.as_str());
        let cost = m.param("material_cost", std::slice::from_ref(&mk))?;
        for t in 1..=data.months {
            materials.add_term(m.var("buy", &[mk.clone(), Key::from(t)])?, -cost);
        }
    }
    m.set_objective(
        Sense::Maximize,
        vec![
            ("revenue", revenue),
            ("materials", materials),
            ("holding", holding),
            ("backorders", backorders),
        ],
    )?;

    // Net inventory position (inventory - backorder) is conserved; the
    // first month balances against the initial inventory parameter.
    m.add_family(
        Family::new("inventory_balance", &["products", "months"])
            .when(
                |t| t[1] == Key::Int(1),
                |m, t| {
                    let lhs = m
                        .var_expr("inventory", t)?
                        .sub(m.var_expr("backorder", t)?)
                        .sub(m.var_expr("make", t)?);
                    let rhs = LinearExpr::constant(
                        m.param("initial_inventory", &t[..1])? - m.param("demand", t)?,
                    );
                    Ok((lhs, Relation::Eq, rhs))
                },
            )
            .otherwise(|m, t| {
                let p = month_of(&t[1])?;
                let prev = [t[0].clone(), Key::Int(p - 1)];
                let lhs = m
                    .var_expr("inventory", t)?
                    .sub(m.var_expr("backorder", t)?)
                    .sub(m.var_expr("inventory", &prev)?)
                    .add(m.var_expr("backorder", &prev)?)
                    .sub(m.var_expr("make", t)?);
                Ok((lhs, Relation::Eq, LinearExpr::constant(-m.param("demand", t)?)))
            }),
    )?;

    m.add_family(Family::new("material_use", &["materials", "months"]).body(|m, t| {
        let mut used = LinearExpr::zero();
        for i in m.set("products")?.members().to_vec() {
            let rate = m.param("usage", &[t[0].clone(), i.clone()])?;
            used.add_term(m.var("make", &[i, t[1].clone()])?, rate);
        }
        Ok((used, Relation::Le, m.var_expr("buy", t)?))
    }))?;

    m.add_family(Family::new("material_limit", &["materials", "months"]).body(|m, t| {
        Ok((
            m.var_expr("buy", t)?,
            Relation::Le,
            LinearExpr::constant(m.param("material_avail", t)?),
        ))
    }))?;

    m.add_family(Family::new("machine_capacity", &["months"]).body(|m, t| {
        let mut hours = LinearExpr::zero();
        for i in m.set("products")?.members().to_vec() {
            let rate = m.param("machine_hours", std::slice::from_ref(&i))?;
            hours.add_term(m.var("make", &[i, t[0].clone()])?, rate);
        }
        Ok((hours, Relation::Le, LinearExpr::constant(m.param("machine_capacity", t)?)))
    }))?;

    m.add_family(Family::new("inventory_limit", &["products", "months"]).body(|m, t| {
        Ok((
            m.var_expr("inventory", t)?,
            Relation::Le,
            LinearExpr::constant(m.param("max_inventory", &t[..1])?),
        ))
    }))?;

    // All demand must be met by the end of the horizon.
    let last = data.months;
    m.add_family(
        Family::new("clear_backorders", &["products", "months"])
            .filter(move |t| t[1] == Key::Int(last))
            .body(|m, t| {
                Ok((m.var_expr("backorder", t)?, Relation::Eq, LinearExpr::zero()))
            }),
    )?;

    m.freeze()?;
    Ok(m)
}

/// Renders the production report: objective line, one monthly table per
/// product, then one per material.
pub fn report(model: &Model) -> Result<String, ReportError> {
    let reporter = Reporter::new(model)?;
    reporter.verify_objective(1e-6)?;

    let mut out = String::new();
    out.push_str(&reporter.objective_line());
    out.push('\n');
    let products: Vec<Key> = model.set("products")?.members().to_vec();
    for i in products {
        let prefix = [i.clone()];
        out.push_str(&reporter.quantity_table(
            &i.to_string(),
            "months",
            &[
                TableColumn { header: "make", family: "make", prefix: &prefix },
                TableColumn { header: "inventory", family: "inventory", prefix: &prefix },
                TableColumn { header: "backorder", family: "backorder", prefix: &prefix },
            ],
        )?);
    }
    let materials: Vec<Key> = model.set("materials")?.members().to_vec();
    for mat in materials {
        let prefix = [mat.clone()];
        out.push_str(&reporter.quantity_table(
            &mat.to_string(),
            "months",
            &[TableColumn { header: "buy", family: "buy", prefix: &prefix }],
        )?);
    }
    for line in reporter.component_lines() {
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}
