//! Constraint families and their concrete rows.
//!
//! A family is a parameterized template: a builder function from an index
//! tuple to a relation triple `(lhs, relation, rhs)`. Expansion instantiates
//! it once per tuple of the (possibly filtered) index product. Where the
//! equation differs by tuple, the family carries guarded arms that must
//! partition the domain: the boundary arm replaces the general case, and the
//! generator rejects tuples matched by two arms or by none.

use crate::error::DeclarationError;
use crate::expr::LinearExpr;
use crate::index::Key;
use crate::model::Model;
use crate::variable::VarId;

/// Relation of a constraint triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
    /// `lhs == rhs`
    Eq,
}

/// A builder result: `(lhs, relation, rhs)`.
pub type Triple = (LinearExpr, Relation, LinearExpr);

pub type BuildFn = Box<dyn Fn(&Model, &[Key]) -> Result<Triple, DeclarationError>>;
pub type GuardFn = Box<dyn Fn(&[Key]) -> bool>;

pub(crate) enum Body {
    /// One builder for the whole domain.
    Uniform(BuildFn),
    /// Guarded arms partitioning the domain, with an optional catch-all.
    Guarded {
        arms: Vec<(GuardFn, BuildFn)>,
        otherwise: Option<BuildFn>,
    },
}

/// A named, indexed constraint family, built with a fluent interface:
///
/// ```ignore
/// Family::new("staff_flow", &["facilities", "weeks"])
///     .when(|t| t[1] == Key::Int(1), |m, t| { ... })
///     .otherwise(|m, t| { ... })
/// ```
pub struct Family {
    pub(crate) name: String,
    pub(crate) set_names: Vec<String>,
    pub(crate) filter: Option<GuardFn>,
    pub(crate) body: Option<Body>,
}

impl Family {
    pub fn new(name: &str, sets: &[&str]) -> Family {
        Family {
            name: name.to_string(),
            set_names: sets.iter().map(|s| s.to_string()).collect(),
            filter: None,
            body: None,
        }
    }

    /// Restricts the domain: tuples failing `pred` produce no constraint and
    /// do not count towards the domain size.
    pub fn filter<P>(mut self, pred: P) -> Family
    where
        P: Fn(&[Key]) -> bool + 'static,
    {
        self.filter = Some(Box::new(pred));
        self
    }

    /// Sets a single builder covering the whole domain.
    pub fn body<F>(mut self, build: F) -> Family
    where
        F: Fn(&Model, &[Key]) -> Result<Triple, DeclarationError> + 'static,
    {
        self.body = Some(Body::Uniform(Box::new(build)));
        self
    }

    /// Adds a guarded arm. Arms must be mutually exclusive over the domain.
    pub fn when<P, F>(mut self, guard: P, build: F) -> Family
    where
        P: Fn(&[Key]) -> bool + 'static,
        F: Fn(&Model, &[Key]) -> Result<Triple, DeclarationError> + 'static,
    {
        let arm = (Box::new(guard) as GuardFn, Box::new(build) as BuildFn);
        match self.body {
            Some(Body::Guarded { ref mut arms, .. }) => arms.push(arm),
            _ => {
                self.body = Some(Body::Guarded { arms: vec![arm], otherwise: None });
            }
        }
        self
    }

    /// Builder for every tuple no arm matches.
    pub fn otherwise<F>(mut self, build: F) -> Family
    where
        F: Fn(&Model, &[Key]) -> Result<Triple, DeclarationError> + 'static,
    {
        match self.body {
            Some(Body::Guarded { ref mut otherwise, .. }) => *otherwise = Some(Box::new(build)),
            _ => {
                self.body = Some(Body::Guarded { arms: Vec::new(), otherwise: Some(Box::new(build)) });
            }
        }
        self
    }
}

/// One concrete constraint: `lower <= terms <= upper`.
///
/// Identity is `name`, formed as `family[k1,k2,...]`, stable across
/// re-expansions of the same model.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub name: String,
    /// Declaration index of the originating family.
    pub family: usize,
    pub terms: Vec<(VarId, f64)>,
    pub lower: f64,
    pub upper: f64,
}
