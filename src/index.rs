//! Index sets and keys.
//!
//! Every parameter, variable and constraint family is indexed by a list of
//! [`IndexSet`]s. A set is declared once with an ordered member list and is
//! read-only afterwards; all iteration over tuples happens in declaration
//! order so that expansion is reproducible.

use std::collections::HashMap;
use std::fmt;
use std::iter::once;

use itertools::Itertools;

use crate::error::DeclarationError;

/// An atomic index key: a symbolic name or an integer (typically a period).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Str(String),
    Int(i64),
}

impl Key {
    /// The integer behind the key, if it is an [`Key::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            Key::Str(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) => f.write_str(s),
            Key::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Key { Key::Str(s.to_string()) }
}
impl From<String> for Key {
    fn from(s: String) -> Key { Key::Str(s) }
}
impl From<i64> for Key {
    fn from(i: i64) -> Key { Key::Int(i) }
}

/// Renders an index tuple as `[k1,k2,...]`.
pub fn format_tuple(keys: &[Key]) -> String {
    format!("[{}]", keys.iter().join(","))
}

/// Internal handle of a declared set within a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SetId(pub(crate) usize);

/// A named, ordered collection of atomic keys.
pub struct IndexSet {
    name: String,
    members: Vec<Key>,
    positions: HashMap<Key, usize>,
}

impl IndexSet {
    pub(crate) fn new(name: &str, members: Vec<Key>) -> Result<IndexSet, DeclarationError> {
        let mut positions = HashMap::with_capacity(members.len());
        for (i, k) in members.iter().enumerate() {
            if positions.insert(k.clone(), i).is_some() {
                return Err(DeclarationError::DuplicateMember {
                    set: name.to_string(),
                    member: k.to_string(),
                });
            }
        }
        Ok(IndexSet { name: name.to_string(), members, positions })
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn len(&self) -> usize { self.members.len() }
    pub fn is_empty(&self) -> bool { self.members.is_empty() }
    pub fn members(&self) -> &[Key] { &self.members }
    pub fn iter(&self) -> std::slice::Iter<'_, Key> { self.members.iter() }

    /// Position of `key` in declaration order.
    pub fn position(&self, key: &Key) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// First member in declaration order.
    pub fn first(&self) -> Option<&Key> { self.members.first() }

    /// Last member in declaration order.
    pub fn last(&self) -> Option<&Key> { self.members.last() }
}

/// Iterates the cartesian product of `sets` in row-major declaration order.
///
/// The product of zero sets is a single empty tuple, so scalar parameters
/// and zero-index constraint families expand to exactly one element.
pub(crate) fn tuple_iter<'a>(
    sets: &'a [&'a IndexSet],
) -> Box<dyn Iterator<Item = Vec<Key>> + 'a> {
    if sets.is_empty() {
        Box::new(once(Vec::new()))
    } else {
        Box::new(
            sets.iter()
                .map(|s| s.members.iter().cloned())
                .multi_cartesian_product(),
        )
    }
}

/// Row-major strides for addressing cells of a table indexed by `sets`.
pub(crate) fn strides(sets: &[&IndexSet]) -> Vec<usize> {
    let mut st = vec![1usize; sets.len()];
    for i in (0..sets.len().saturating_sub(1)).rev() {
        st[i] = st[i + 1] * sets[i + 1].len();
    }
    st
}
