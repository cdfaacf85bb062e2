//! Definition of the variable module
//!
//! A `Variable` represents a discrete random variable in a Bayesian network. Variables are
//! identified by name; everything downstream (factors, evidence, query results) refers to them
//! by that name.

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::iter::FromIterator;


/// A named, discrete random variable with an ordered set of state labels.
///
/// The order of the states matters only when building tables: axis index `i` of a table over
/// the `Variable` corresponds to `states()[i]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    /// The name of the `Variable`
    name: String,

    /// The labels of the values the `Variable` can take
    states: Vec<String>
}

impl Variable {

    /// Construct a new binary `Variable` with the states `"True"` and `"False"`, in that order.
    pub fn binary(name: &str) -> Variable {
        Variable::enumerated(name, &["True", "False"])
    }

    /// Construct a new discrete `Variable` with integer tags `"0"` to `"count - 1"`.
    pub fn discrete(name: &str, count: usize) -> Variable {
        Variable {
            name: String::from(name),
            states: (0..count).map(|i| i.to_string()).collect()
        }
    }

    /// Construct a new `Variable` over an enumerated set of named states.
    pub fn enumerated(name: &str, states: &[&str]) -> Variable {
        Variable {
            name: String::from(name),
            states: states.iter().map(|s| String::from(*s)).collect()
        }
    }

    /// Get the name of the `Variable`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the state labels of the `Variable`
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Get the number of states of the `Variable`
    pub fn cardinality(&self) -> usize {
        self.states.len()
    }

    /// Get the position of the given state label, if it is in the domain
    pub fn state_index(&self, state: &str) -> Option<usize> {
        self.states.iter().position(|s| s == state)
    }

    /// Check if the state label is in the domain of this `Variable`
    pub fn has_state(&self, state: &str) -> bool {
        self.state_index(state).is_some()
    }
}

impl fmt::Display for Variable {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }

}


/// A (partial) assignment of states to variables, keyed by variable name.
///
/// Insertion order is kept for display purposes only: two `Assignment`s are equal when they
/// hold the same (variable, state) pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment(IndexMap<String, String>);

impl Assignment {

    /// Construct an empty `Assignment`
    pub fn new() -> Self {
        Assignment(IndexMap::new())
    }

    /// Assign `state` to `var`, replacing any previous value
    pub fn set(&mut self, var: &str, state: &str) {
        self.0.insert(String::from(var), String::from(state));
    }

    /// Get the state assigned to `var`, if any
    pub fn get(&self, var: &str) -> Option<&str> {
        self.0.get(var).map(|s| s.as_str())
    }

    /// Check if `var` is assigned
    pub fn contains(&self, var: &str) -> bool {
        self.0.contains_key(var)
    }

    /// Remove `var` from the assignment, returning its state
    pub fn remove(&mut self, var: &str) -> Option<String> {
        self.0.shift_remove(var)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the (variable, state) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over the assigned variables in insertion order
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    /// Check that `self` and `other` assign the same state to every variable they share
    pub fn agrees_with(&self, other: &Assignment) -> bool {
        self.0.iter().all(|(k, v)| other.0.get(k).map_or(true, |o| o == v))
    }

    /// The union of `self` and `other`. Shared variables keep the state from `self`.
    pub fn merge(&self, other: &Assignment) -> Assignment {
        let mut merged = self.clone();
        for (k, v) in other.0.iter() {
            merged.0.entry(k.clone()).or_insert_with(|| v.clone());
        }
        merged
    }

    /// The sub-assignment over `scope`, ordered by `scope`. Variables of `scope` missing from
    /// `self` are skipped.
    pub fn restrict(&self, scope: &[String]) -> Assignment {
        scope.iter()
             .filter_map(|v| self.0.get(v).map(|s| (v.clone(), s.clone())))
             .collect()
    }
}

impl FromIterator<(String, String)> for Assignment {

    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Assignment(iter.into_iter().collect())
    }

}

impl<'a> FromIterator<(&'a str, &'a str)> for Assignment {

    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Assignment(iter.into_iter().map(|(k, v)| (String::from(k), String::from(v))).collect())
    }

}

impl fmt::Display for Assignment {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().map(|(k, v)| format!("{}: {}", k, v)).join(", "))
    }

}


/// Enumerate every full assignment to `vars`.
///
/// The last `Variable` varies fastest, which is the iteration order of a row-major table whose
/// axes follow `vars`. An empty list of variables has exactly one (empty) assignment.
pub fn all_assignments(vars: &[&Variable]) -> std::vec::IntoIter<Assignment> {
    if vars.is_empty() {
        return vec![Assignment::new()].into_iter();
    }

    vars.iter()
        .map(|v| v.states().iter())
        .multi_cartesian_product()
        .map(|states| {
            vars.iter()
                .zip(states)
                .map(|(v, s)| (v.name(), s.as_str()))
                .collect::<Assignment>()
        })
        .collect::<Vec<Assignment>>()
        .into_iter()
}
