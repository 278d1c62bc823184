//! Decision variable families.
//!
//! Variable cells live in a single model-global arena: a family owns a
//! contiguous slot range, and a cell is addressed as family base offset plus
//! the row-major offset of its index tuple. Expressions and solutions refer
//! to cells by [`VarId`] only.

use crate::error::DeclarationError;
use crate::index::SetId;

/// Identifies one variable cell in the model arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Arena slot of the cell; also its column index in the expanded model.
    pub fn index(self) -> usize { self.0 }
}

/// Domain of every cell in a variable family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarDomain {
    Binary,
    NonNegativeInteger,
    NonNegativeContinuous,
}

impl VarDomain {
    pub fn is_integer(self) -> bool {
        !matches!(self, VarDomain::NonNegativeContinuous)
    }
}

/// Optional explicit bounds, intersected with the domain's implicit ones.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Bounds {
    /// No explicit bounds; the domain alone decides.
    pub fn none() -> Bounds { Bounds::default() }

    pub fn upper(u: f64) -> Bounds {
        Bounds { lower: None, upper: Some(u) }
    }

    pub fn range(l: f64, u: f64) -> Bounds {
        Bounds { lower: Some(l), upper: Some(u) }
    }
}

/// A named table of decision variable cells over index sets.
pub struct VariableFamily {
    name: String,
    pub(crate) sets: Vec<SetId>,
    pub(crate) domain: VarDomain,
    pub(crate) bounds: Bounds,
    /// First arena slot owned by this family.
    pub(crate) base: usize,
    /// Number of cells (product of the index set sizes).
    pub(crate) len: usize,
    pub(crate) strides: Vec<usize>,
}

impl VariableFamily {
    pub(crate) fn new(
        name: &str,
        sets: Vec<SetId>,
        domain: VarDomain,
        bounds: Bounds,
        base: usize,
        len: usize,
        strides: Vec<usize>,
    ) -> Result<VariableFamily, DeclarationError> {
        let (dlo, dup) = domain_interval(domain);
        let lo = bounds.lower.unwrap_or(dlo);
        let up = bounds.upper.unwrap_or(dup);
        if lo < dlo || up > dup || lo > up {
            return Err(DeclarationError::MalformedBounds {
                name: name.to_string(),
                domain,
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        Ok(VariableFamily { name: name.to_string(), sets, domain, bounds, base, len, strides })
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn domain(&self) -> VarDomain { self.domain }
    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Effective `(lower, upper)` column bounds of every cell.
    pub fn effective_bounds(&self) -> (f64, f64) {
        let (dlo, dup) = domain_interval(self.domain);
        (self.bounds.lower.unwrap_or(dlo), self.bounds.upper.unwrap_or(dup))
    }

    pub(crate) fn var_at(&self, offset: usize) -> VarId {
        VarId(self.base + offset)
    }
}

fn domain_interval(domain: VarDomain) -> (f64, f64) {
    match domain {
        VarDomain::Binary => (0.0, 1.0),
        VarDomain::NonNegativeInteger | VarDomain::NonNegativeContinuous => (0.0, f64::INFINITY),
    }
}
