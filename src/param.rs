//! Immutable parameter tables.
//!
//! A parameter is populated once, before model construction, from a provider
//! closure that stands in for whatever external data source feeds the run.
//! Validation is exhaustive at declaration time: every tuple of the index
//! product must have a value, and every value must lie in the declared range.

use crate::error::DataError;
use crate::index::{format_tuple, tuple_iter, IndexSet, Key, SetId};

/// Admissible value range of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamRange {
    /// Any finite value.
    Any,
    /// Values must be `>= 0`.
    NonNegative,
}

impl ParamRange {
    fn check(self, v: f64) -> Result<(), &'static str> {
        if !v.is_finite() {
            return Err("finite value");
        }
        match self {
            ParamRange::Any => Ok(()),
            ParamRange::NonNegative if v >= 0.0 => Ok(()),
            ParamRange::NonNegative => Err(">= 0"),
        }
    }
}

/// A named, dense, read-only numeric table over one or more index sets.
pub struct Parameter {
    name: String,
    pub(crate) sets: Vec<SetId>,
    pub(crate) strides: Vec<usize>,
    values: Vec<f64>,
}

impl Parameter {
    /// Builds the dense table by querying `provider` for every tuple of the
    /// cartesian product of `sets`, in row-major order.
    pub(crate) fn populate<F>(
        name: &str,
        set_ids: Vec<SetId>,
        sets: &[&IndexSet],
        range: ParamRange,
        provider: F,
    ) -> Result<Parameter, DataError>
    where
        F: Fn(&[Key]) -> Option<f64>,
    {
        let size = sets.iter().map(|s| s.len()).product();
        let mut values = Vec::with_capacity(size);
        for tuple in tuple_iter(sets) {
            let v = provider(&tuple).ok_or_else(|| DataError::Missing {
                name: name.to_string(),
                tuple: format_tuple(&tuple),
            })?;
            range.check(v).map_err(|expected| DataError::OutOfRange {
                name: name.to_string(),
                tuple: format_tuple(&tuple),
                value: v,
                expected,
            })?;
            values.push(v);
        }
        Ok(Parameter {
            name: name.to_string(),
            strides: crate::index::strides(sets),
            sets: set_ids,
            values,
        })
    }

    pub fn name(&self) -> &str { &self.name }

    /// Value at the row-major cell offset. Positions are resolved by the
    /// owning model, which knows the index sets.
    pub(crate) fn value_at(&self, offset: usize) -> f64 {
        self.values[offset]
    }

    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}
