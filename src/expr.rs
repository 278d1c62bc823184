//! Linear expressions.
//!
//! An expression is a weighted sum of variable cells plus a constant. The
//! same expression type is used to state constraints, to define objective
//! components, and by the reporter to recompute those components from a
//! solution, so the numbers printed after a solve come from exactly the
//! formulas that were submitted.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::variable::VarId;

/// A weighted sum of variable cells and a constant term.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    pub(crate) terms: Vec<(VarId, f64)>,
    pub(crate) constant: f64,
}

impl LinearExpr {
    /// The empty expression (value 0).
    pub fn zero() -> LinearExpr { LinearExpr::default() }

    /// A constant expression.
    pub fn constant(c: f64) -> LinearExpr {
        LinearExpr { terms: Vec::new(), constant: c }
    }

    /// A single term `coef * var`.
    pub fn term(var: VarId, coef: f64) -> LinearExpr {
        LinearExpr { terms: vec![(var, coef)], constant: 0.0 }
    }

    /// A single variable with coefficient 1.
    pub fn var(var: VarId) -> LinearExpr {
        LinearExpr::term(var, 1.0)
    }

    pub fn terms(&self) -> &[(VarId, f64)] { &self.terms }
    pub fn constant_term(&self) -> f64 { self.constant }

    /// Appends `coef * var`.
    pub fn add_term(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }

    pub fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
        self
    }

    pub fn sub(self, rhs: LinearExpr) -> LinearExpr {
        self.add(rhs.scale(-1.0))
    }

    pub fn scale(mut self, a: f64) -> LinearExpr {
        for (_, c) in self.terms.iter_mut() {
            *c *= a;
        }
        self.constant *= a;
        self
    }

    /// Merges duplicate variable terms and drops zero coefficients. The
    /// remaining terms are sorted by arena slot, which makes two expansions
    /// of the same model compare equal term for term.
    pub fn compacted(mut self) -> LinearExpr {
        self.terms.sort_by_key(|&(v, _)| v);
        let mut out: Vec<(VarId, f64)> = Vec::with_capacity(self.terms.len());
        for (v, c) in self.terms {
            match out.last_mut() {
                Some((lv, lc)) if *lv == v => *lc += c,
                _ => out.push((v, c)),
            }
        }
        out.retain(|&(_, c)| c != 0.0);
        LinearExpr { terms: out, constant: self.constant }
    }

    /// Evaluates the expression against a value arena indexed by [`VarId`].
    pub fn eval(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(v, c)| c * values[v.index()])
            .sum::<f64>()
            + self.constant
    }
}

/// Sums an iterator of expressions.
pub fn sum<I>(exprs: I) -> LinearExpr
where
    I: IntoIterator<Item = LinearExpr>,
{
    exprs.into_iter().fold(LinearExpr::zero(), LinearExpr::add)
}

impl Add for LinearExpr {
    type Output = LinearExpr;
    fn add(self, rhs: LinearExpr) -> LinearExpr { LinearExpr::add(self, rhs) }
}

impl AddAssign for LinearExpr {
    fn add_assign(&mut self, rhs: LinearExpr) {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl Sub for LinearExpr {
    type Output = LinearExpr;
    fn sub(self, rhs: LinearExpr) -> LinearExpr { LinearExpr::sub(self, rhs) }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;
    fn neg(self) -> LinearExpr { self.scale(-1.0) }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;
    fn mul(self, a: f64) -> LinearExpr { self.scale(a) }
}

impl Mul<LinearExpr> for f64 {
    type Output = LinearExpr;
    fn mul(self, e: LinearExpr) -> LinearExpr { e.scale(self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_merges_and_sorts() {
        let e = LinearExpr::term(VarId(3), 2.0)
            .add(LinearExpr::term(VarId(1), 1.0))
            .add(LinearExpr::term(VarId(3), -2.0))
            .add(LinearExpr::constant(5.0));
        let c = e.compacted();
        assert_eq!(c.terms, vec![(VarId(1), 1.0)]);
        assert_eq!(c.constant, 5.0);
    }

    #[test]
    fn eval_uses_arena_slots() {
        let e = LinearExpr::term(VarId(0), 2.0)
            .add(LinearExpr::term(VarId(2), -1.0))
            .add(LinearExpr::constant(1.0));
        assert_eq!(e.eval(&[3.0, 100.0, 4.0]), 2.0 * 3.0 - 4.0 + 1.0);
    }
}
